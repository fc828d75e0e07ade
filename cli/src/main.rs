mod commands;
mod config;
mod error;
mod logging;

use clap::{Parser, Subcommand};
use config::{AppConfig, Overrides, ProtocolArg};
use log::error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "fftt")]
#[command(about = "Send files as multi-tone audio bursts and read them back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "CONFIG.JSON")]
    config: Option<PathBuf>,

    /// Bit spacing variant; encoder and decoder must agree
    #[arg(long, global = true, value_enum)]
    protocol: Option<ProtocolArg>,

    /// Also write log records to <PREFIX>.log
    #[arg(long, global = true)]
    log_file: bool,

    /// Do not write log records to stderr
    #[arg(long, global = true)]
    no_terminal_log: bool,

    /// Log file name prefix (default: fftt)
    #[arg(long, global = true, value_name = "PREFIX")]
    log_prefix: Option<String>,

    /// Disable coloured log levels
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a binary file to a WAV audio file
    Encode {
        /// Input binary file
        #[arg(value_name = "INPUT-FILE")]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long, value_name = "OUTPUT.WAV", default_value = "encoded.wav")]
        output: PathBuf,
    },

    /// Decode a WAV audio file back to binary data
    Decode {
        /// Input WAV file
        #[arg(value_name = "AUDIO-FILE")]
        input: PathBuf,

        /// Output binary file
        #[arg(short, long, value_name = "OUTPUT.BIN", default_value = "decoded.bin")]
        output: PathBuf,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            protocol: self.protocol,
            log_to_file: self.log_file,
            no_terminal_log: self.no_terminal_log,
            log_prefix: self.log_prefix.clone(),
            no_color: self.no_color,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::resolve(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log, cli.verbose) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let result = match &cli.command {
        Commands::Encode { input, output } => commands::encode_command(input, output, &config),
        Commands::Decode { input, output } => commands::decode_command(input, output, &config),
    };

    if let Err(e) = result {
        if config.log.log_to_file {
            error!("{}", e);
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
