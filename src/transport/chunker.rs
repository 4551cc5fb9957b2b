//! # Chunked Writes
//!
//! BLE attribute writes are limited to the negotiated ATT payload; 20 bytes
//! is the size every peripheral accepts. A job is split into frames of at
//! most that size and written one after the other.
//!
//! Small printers have tiny input buffers and silently drop or corrupt
//! back-to-back writes, so the chunker waits a fixed delay between frames.
//! The delay is an async sleep and yields to the runtime.
//!
//! ```text
//! job (47 bytes)  [....20....][....20....][..7..]
//!                      write  50ms  write  50ms  write
//! ```
//!
//! The first failed write aborts the job. Frames already written stay
//! written; the printer may be left mid-format until the next `ESC @`.

use std::time::Duration;

use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use super::{BleTransport, TransportError};
use crate::encoder::CommandBuffer;

/// Default frame size (minimum ATT write payload)
pub const MAX_FRAME_SIZE: usize = 20;

/// Default delay between frames
pub const PACING_DELAY: Duration = Duration::from_millis(50);

/// # Frame Chunker
///
/// Splits command buffers into frames and paces their delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    frame_size: usize,
    pacing: Duration,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            frame_size: MAX_FRAME_SIZE,
            pacing: PACING_DELAY,
        }
    }
}

impl Chunker {
    /// Create a chunker. A zero `frame_size` is raised to one.
    pub fn new(frame_size: usize, pacing: Duration) -> Self {
        Self {
            frame_size: frame_size.max(1),
            pacing,
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Write `buffer` to `characteristic` frame by frame.
    ///
    /// The link must already be up; this does not connect. Returns the
    /// number of frames written.
    ///
    /// ## Errors
    ///
    /// The first write error, unchanged. Remaining frames are not sent.
    #[instrument(skip_all, fields(bytes = buffer.len(), frame_size = self.frame_size))]
    pub async fn send<T: BleTransport + ?Sized>(
        &self,
        transport: &mut T,
        characteristic: Uuid,
        buffer: CommandBuffer,
    ) -> Result<usize, TransportError> {
        let total = buffer.frame_count(self.frame_size);

        for (i, frame) in buffer.frames(self.frame_size).enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            if let Err(e) = transport.write(characteristic, frame).await {
                warn!(frame = i + 1, frames = total, error = %e, "frame write failed, aborting job");
                return Err(e);
            }
            trace!(frame = i + 1, len = frame.len(), "frame written");
        }

        debug!(frames = total, "job sent");
        Ok(total)
    }
}
