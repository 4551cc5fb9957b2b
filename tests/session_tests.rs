//! # Session Tests
//!
//! End-to-end behavior of a printer session over the in-memory transport:
//! what reaches the characteristic, in which frames, and how the connection
//! state reacts to link failures.

use std::sync::Arc;
use std::time::Duration;

use bluepos::printer::{ConnectionState, PrinterConfig, PrinterSession};
use bluepos::protocol::text::{Alignment, FontSize};
use bluepos::transport::chunker::{MAX_FRAME_SIZE, PACING_DELAY};
use bluepos::transport::MockTransport;
use bluepos::{BlueposError, PrintRequest};
use pretty_assertions::assert_eq;
use tokio::sync::Mutex;

const ADDR: &str = "66:22:4F:10:8A:3C";

fn session() -> (PrinterSession<MockTransport>, MockTransport) {
    let mock = MockTransport::new();
    let config = PrinterConfig::new(ADDR).validate().unwrap();
    (PrinterSession::new(mock.clone(), &config), mock)
}

// ============================================================================
// FRAMING
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_frames_respect_size_and_pacing() {
    let (mut session, mock) = session();
    // 400 bytes of content + 18 bytes of framing
    session
        .print_text(&"x".repeat(400), FontSize::Normal, Alignment::Left, false)
        .await
        .unwrap();

    let writes = mock.writes();
    assert_eq!(writes.len(), 418usize.div_ceil(MAX_FRAME_SIZE));
    assert!(writes.iter().all(|w| w.data.len() <= MAX_FRAME_SIZE));
    assert!(writes.iter().all(|w| w.characteristic == PrinterConfig::default().characteristic));
    for pair in writes.windows(2) {
        assert!(pair[1].at - pair[0].at >= PACING_DELAY);
    }
}

#[tokio::test(start_paused = true)]
async fn test_frames_reassemble_to_encoded_job() {
    let (mut session, mock) = session();
    session.print_qr(&"q".repeat(300), 4).await.unwrap();

    let expected = bluepos::encoder::encode_qr(&"q".repeat(300), 4).unwrap();
    assert_eq!(mock.written_bytes(), expected.into_bytes());
}

#[tokio::test]
async fn test_feed_paper_is_raw_line_feeds() {
    let (mut session, mock) = session();
    session.feed_paper(5).await.unwrap();
    assert_eq!(mock.written_bytes(), vec![0x0A; 5]);
}

// ============================================================================
// CONNECTION HANDLING
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_connects_once_across_jobs() {
    let (mut session, mock) = session();
    session.feed_paper(1).await.unwrap();
    session.print_barcode("ABC", "CODE128").await.unwrap();
    session.print_qr("x", 6).await.unwrap();

    assert_eq!(mock.connect_attempts(), 1);
    assert_eq!(mock.address().as_deref(), Some(ADDR));
    assert_eq!(session.state(), ConnectionState::Connected);
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_on_second_of_three_frames() {
    let (mut session, mock) = session();
    mock.fail_write_at(1);

    // 47 bytes: init(2) + center(3) + setup(9) + tag(4) + 26 + left(3)
    let content = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let err = session.print_barcode(content, "CODE128").await.unwrap_err();

    assert!(matches!(err, BlueposError::TransportWrite(_)));
    assert!(err.is_transport());
    assert_eq!(mock.write_attempts(), 2);
    assert_eq!(mock.writes().len(), 1);
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_link_drop() {
    let (mut session, mock) = session();
    session.feed_paper(1).await.unwrap();

    mock.drop_link();
    mock.fail_connect(true);
    let err = session.feed_paper(1).await.unwrap_err();
    assert!(matches!(err, BlueposError::Connection(_)));

    // The next probe brings the link back
    mock.fail_connect(false);
    let status = session.refresh().await.unwrap();
    assert!(status.connected);

    mock.clear_writes();
    session.feed_paper(2).await.unwrap();
    assert_eq!(mock.written_bytes(), vec![0x0A; 2]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_link_failure() {
    let (mut session, _mock) = session();
    let request = PrintRequest::text("y".repeat(200));

    let err = session
        .print_within(&request, Some(Duration::from_millis(120)))
        .await
        .unwrap_err();
    assert!(matches!(err, BlueposError::Timeout(_)));
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_jobs_behind_a_mutex_never_interleave() {
    let (session, mock) = session();
    let session = Arc::new(Mutex::new(session));

    let a = PrintRequest::text("a".repeat(60));
    let b = PrintRequest::text("b".repeat(60));

    let tasks: Vec<_> = [a.clone(), b.clone()]
        .into_iter()
        .map(|request| {
            let session = session.clone();
            tokio::spawn(async move { session.lock().await.print(&request).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let a = a.encode().unwrap().into_bytes();
    let b = b.encode().unwrap().into_bytes();
    let written = mock.written_bytes();
    let ab = [a.clone(), b.clone()].concat();
    let ba = [b, a].concat();
    assert!(written == ab || written == ba, "jobs were interleaved");
}
