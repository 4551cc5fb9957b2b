//! # Bluepos CLI
//!
//! Command-line interface for BLE thermal receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Print a line of text
//! bluepos --address 66:22:4F:10:8A:3C text "Hello" --align center --bold
//!
//! # Print a QR code and a barcode
//! bluepos --address 66:22:4F:10:8A:3C qr "https://example.com" --size 8
//! bluepos --address 66:22:4F:10:8A:3C barcode ORDER-0042
//!
//! # Advance the paper
//! bluepos --address 66:22:4F:10:8A:3C feed --lines 5
//!
//! # Test the connection
//! bluepos --config printer.json check
//!
//! # Show the frames a job would send, without a printer
//! bluepos --address 00:00:00:00:00:00 --dry-run text "Hi"
//!
//! # Run the HTTP API
//! bluepos --config printer.json serve --listen 0.0.0.0:8080
//! ```
//!
//! Logging is controlled by `RUST_LOG`; `-v` raises the default level.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use bluepos::{
    BleTransport, BlueposError, MockTransport, PrintRequest, PrinterConfig, PrinterSession,
    encoder::{DEFAULT_FEED_LINES, DEFAULT_QR_SIZE, DEFAULT_SYMBOLOGY},
    protocol::text::{Alignment, FontSize},
    server::{self, ServerConfig},
};

/// Bluepos - ESC/POS printing over Bluetooth LE
#[derive(Parser, Debug)]
#[command(name = "bluepos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Printer config file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Printer MAC address (overrides the config file)
    #[arg(long, global = true)]
    address: Option<String>,

    /// Record frames in memory and print them instead of using Bluetooth
    #[arg(long, global = true)]
    dry_run: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one line of text
    Text {
        content: String,

        /// small, normal or large
        #[arg(long, default_value = "normal")]
        font_size: FontSize,

        /// left, center or right
        #[arg(long, default_value = "left")]
        align: Alignment,

        #[arg(long)]
        bold: bool,
    },

    /// Print a QR code
    Qr {
        content: String,

        /// Module size in dots (1-16)
        #[arg(long, default_value_t = DEFAULT_QR_SIZE)]
        size: u8,
    },

    /// Print a 1D barcode
    Barcode {
        content: String,

        /// Symbology (only CODE128 is supported)
        #[arg(long = "type", default_value = DEFAULT_SYMBOLOGY)]
        barcode_type: String,
    },

    /// Advance the paper
    Feed {
        /// Number of lines (1-10)
        #[arg(long, default_value_t = DEFAULT_FEED_LINES)]
        lines: u8,
    },

    /// Connect to the printer, then disconnect
    Check,

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "bluepos=info,tower_http=info",
        1 => "bluepos=debug,tower_http=debug",
        _ => "bluepos=trace,tower_http=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

async fn run(cli: Cli) -> Result<(), BlueposError> {
    let config = load_config(cli.config.as_ref(), cli.address.as_deref())?;

    let recorder = cli.dry_run.then(MockTransport::new);
    let transport: Box<dyn BleTransport> = match &recorder {
        Some(mock) => Box::new(mock.clone()),
        None => open_transport(&config).await?,
    };

    let request = match cli.command {
        Commands::Serve { listen } => {
            let server_config = ServerConfig {
                listen_addr: listen,
                printer: config,
            };
            return server::serve(server_config, transport).await;
        }
        Commands::Check => {
            let mut session = PrinterSession::new(transport, &config);
            session.check().await?;
            println!("Connected to {} ({})", config.name, config.address);
            return Ok(());
        }
        Commands::Text {
            content,
            font_size,
            align,
            bold,
        } => PrintRequest::Text {
            content,
            font_size,
            alignment: align,
            bold,
        },
        Commands::Qr { content, size } => PrintRequest::QrCode { content, size },
        Commands::Barcode {
            content,
            barcode_type,
        } => PrintRequest::Barcode {
            content,
            symbology: barcode_type,
        },
        Commands::Feed { lines } => PrintRequest::FeedPaper { line_count: lines },
    };

    let mut session = PrinterSession::new(transport, &config);
    let result = session
        .print_within(&request, config.operation_timeout())
        .await;
    session.disconnect().await;
    result?;

    match recorder {
        Some(mock) => dump_frames(&mock),
        None => info!(kind = request.kind(), printer = %config.address, "printed"),
    }
    Ok(())
}

/// Config file (if any), then the `--address` override, then validation.
fn load_config(path: Option<&PathBuf>, address: Option<&str>) -> Result<PrinterConfig, BlueposError> {
    let mut config = match path {
        Some(path) => PrinterConfig::from_file(path)?,
        None => PrinterConfig::default(),
    };
    if let Some(address) = address {
        config.address = address.to_string();
    }
    config.validate()
}

#[cfg(feature = "ble")]
async fn open_transport(config: &PrinterConfig) -> Result<Box<dyn BleTransport>, BlueposError> {
    let mut transport = bluepos::transport::BtleTransport::open_default()
        .await
        .map_err(|e| BlueposError::Connection(e.to_string()))?;
    transport.set_scan_timeout(config.scan_timeout());
    Ok(Box::new(transport))
}

#[cfg(not(feature = "ble"))]
async fn open_transport(_config: &PrinterConfig) -> Result<Box<dyn BleTransport>, BlueposError> {
    Err(BlueposError::Config(
        "built without Bluetooth support; rebuild with `--features ble` or use --dry-run"
            .to_string(),
    ))
}

/// Print recorded frames as hex, one per line.
fn dump_frames(mock: &MockTransport) {
    let writes = mock.writes();
    println!(
        "{} frames, {} bytes",
        writes.len(),
        writes.iter().map(|w| w.data.len()).sum::<usize>()
    );
    for (i, write) in writes.iter().enumerate() {
        let hex: Vec<String> = write.data.iter().map(|b| format!("{:02X}", b)).collect();
        println!("{:>3}: {}", i + 1, hex.join(" "));
    }
}
