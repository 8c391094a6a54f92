//! Expansion board EEPROM tool
//! Reads the board description from the EEPROM, or programs it from a profile

use board_eeprom::validation::{has_errors, validate_board};
use board_eeprom::{profiles, BoardEeprom, BusConfig, EepromData, ProgramOptions};
use embedded_hal::i2c::I2c;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage: board-eeprom <read|write> [options]

  read  [--json] [--hex]              Decode and print the board description
  write [--profile NAME | FILE.json]  Program the board (default profile: ADLIOIPTX)
        [--no-verify]

Environment:
  BOARD_EEPROM_BUS        i2c-dev node (default /dev/i2c-5)
  BOARD_EEPROM_ADDRESS    7-bit device address (default 0x56)
  BOARD_EEPROM_SETTLE_MS  delay after each bus transaction (default 5)
  RUST_LOG                log filter (default info)";

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Builtin(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Read { json: bool, hex: bool },
    Write { source: Source, verify: bool },
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let (verb, rest) = args
        .split_first()
        .ok_or_else(|| "Please provide action 'read' or 'write'".to_string())?;

    match verb.as_str() {
        "read" => {
            let mut json = false;
            let mut hex = false;
            for arg in rest {
                match arg.as_str() {
                    "--json" => json = true,
                    "--hex" => hex = true,
                    other => return Err(format!("Unknown option for read: {}", other)),
                }
            }
            Ok(Command::Read { json, hex })
        }
        "write" => {
            let mut source = Source::Builtin("ADLIOIPTX".to_string());
            let mut verify = true;
            let mut iter = rest.iter();
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--no-verify" => verify = false,
                    "--profile" => {
                        let name = iter
                            .next()
                            .ok_or_else(|| "--profile needs a name".to_string())?;
                        source = Source::Builtin(name.clone());
                    }
                    other if other.starts_with("--") => {
                        return Err(format!("Unknown option for write: {}", other))
                    }
                    path => source = Source::File(PathBuf::from(path)),
                }
            }
            Ok(Command::Write { source, verify })
        }
        other => Err(format!("Invalid command: {}", other)),
    }
}

/// Exit status for a command line that could not be parsed
const EXIT_USAGE: i32 = 2;

/// Parse the command line, reporting usage and yielding the exit status on failure
fn command_or_usage(args: &[String]) -> Result<Command, i32> {
    parse_args(args).map_err(|msg| {
        tracing::error!("{}", msg);
        eprintln!("{}", USAGE);
        EXIT_USAGE
    })
}

fn load_source(source: &Source) -> anyhow::Result<EepromData> {
    match source {
        Source::Builtin(name) => profiles::builtin(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown profile {}; built-in profiles: {}",
                name,
                profiles::BUILTIN_NAMES.join(", ")
            )
        }),
        Source::File(path) => Ok(board_eeprom::load_profile(path)?),
    }
}

async fn run<I: I2c>(eeprom: &mut BoardEeprom<I>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Read { json, hex } => {
            let image = eeprom.read_image().await?;
            let data = board_eeprom::decode(image.as_bytes())?;
            tracing::info!("Read {} resources", data.resources.len());

            if json {
                println!("{}", board_eeprom::formats::to_json(&data)?);
            } else {
                print!("{}", data);
            }
            if hex {
                print!("{}", image.printable(None, None));
            }
        }
        Command::Write { source, verify } => {
            let data = load_source(&source)?;

            let messages = validate_board(&data);
            for msg in &messages {
                if msg.is_error() {
                    tracing::error!("{}", msg.message());
                } else {
                    tracing::warn!("{}", msg.message());
                }
            }
            if has_errors(&messages) {
                anyhow::bail!("Board description is not writable");
            }

            let options = ProgramOptions {
                terminate: true,
                verify,
            };
            let report = eeprom.program_board(&data, options).await?;
            tracing::info!(
                "Programmed {} bytes (verified: {})",
                report.bytes_written,
                report.verified
            );
        }
    }
    Ok(())
}

#[cfg(target_os = "linux")]
async fn open_and_run(config: BusConfig, command: Command) -> anyhow::Result<()> {
    let bus = board_eeprom::bus::linux::open(config)?;
    let mut eeprom = BoardEeprom::new(bus);
    run(&mut eeprom, command).await
}

#[cfg(not(target_os = "linux"))]
async fn open_and_run(_config: BusConfig, _command: Command) -> anyhow::Result<()> {
    anyhow::bail!("I2C access is only supported on Linux")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match command_or_usage(&args) {
        Ok(command) => command,
        Err(status) => std::process::exit(status),
    };

    tracing::info!("board-eeprom {}", board_eeprom::VERSION);
    let config = BusConfig::from_env()?;
    tracing::info!(
        "Device 0x{:02X} on {}, settle delay {:?}",
        config.address,
        config.bus_path,
        config.settle_delay
    );

    open_and_run(config, command).await
}
