//! TSAT ground station daemon
//!
//! Opens the receiver's serial port, ingests the downlink on a background thread and
//! logs every telemetry sample as it arrives. Stops on Ctrl-C or when the port closes.
//!
//! ```text
//! tsat-ground [PORT] [--config|-c PATH]
//! ```

use std::env;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tsat_ground::error::{Error, Result};
use tsat_ground::transport::SerialTransport;
use tsat_ground::{telemetry_stream, Config, GroundLink, TelemetryPacket};

/// Config file picked up from the working directory when no path is given
const DEFAULT_CONFIG_PATH: &str = "tsat-ground.toml";

/// How often the console consumer polls the stream
const DISPLAY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Command line options
#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    port: Option<String>,
}

/// Parse command line arguments.
///
/// Supports:
/// - `tsat-ground <port>` (positional, overrides `link.port`)
/// - `tsat-ground --config <path>` / `-c <path>`
fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| Error::Config(format!("{} requires a path", arg)))?;
                args.config_path = Some(path);
            }
            flag if flag.starts_with('-') => {
                return Err(Error::Config(format!("Unknown option: {}", flag)));
            }
            _ if args.port.is_none() => args.port = Some(arg.clone()),
            _ => return Err(Error::Config(format!("Unexpected argument: {}", arg))),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)?,
        None => Config::default(),
    };
    if let Some(port) = &args.port {
        config.link.port = port.clone();
        config.validate()?;
    }
    Ok(config)
}

fn log_sample(index: usize, sample: &TelemetryPacket) {
    log::info!(
        "#{} frame={} t={:.3}s alt={:.3} p={:.3} temp={:.3} acc={:.3} v={:.3}",
        index,
        sample.frame_count,
        sample.time,
        sample.altitude,
        sample.pressure,
        sample.temperature,
        sample.acceleration_magnitude,
        sample.velocity
    );
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = load_config(&args)?;

    // RUST_LOG takes precedence over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("TSAT ground station v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Receiver: {} @ {} baud",
        config.link.port,
        config.link.baud_rate
    );

    let transport = SerialTransport::open(
        &config.link.port,
        config.link.baud_rate,
        config.link.read_timeout(),
    )?;

    let (writer, reader) = telemetry_stream();
    let mut link = GroundLink::new(transport, config.link.settings());

    let signal = link.shutdown_signal();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        signal.trigger();
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    link.start(writer)?;
    log::info!("Ground station running. Press Ctrl-C to stop.");

    // Console consumer: print each sample once, in arrival order
    let shutdown = link.shutdown_signal();
    let mut cursor = reader.cursor();
    loop {
        while let Some(sample) = cursor.next_sample() {
            log_sample(cursor.position() - 1, &sample);
        }
        if shutdown.is_triggered() || !link.is_running() {
            break;
        }
        thread::sleep(DISPLAY_POLL_INTERVAL);
    }

    let result = link.shutdown();

    // Samples appended between the last poll and shutdown
    while let Some(sample) = cursor.next_sample() {
        log_sample(cursor.position() - 1, &sample);
    }

    log::info!("TSAT ground station stopped ({} samples)", reader.len());
    result
}
