//! Logger setup for the `fftt` binary
//!
//! Library code only talks to the `log` facade. This module decides where the
//! records go: stderr, `<prefix>.log`, both, or nowhere.

use crate::config::LogConfig;
use crate::error::{CliError, Result};
use env_logger::{Builder, Env, Target, WriteStyle};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

pub fn log_file_path(config: &LogConfig) -> PathBuf {
    PathBuf::from(format!("{}.log", config.file_prefix))
}

/// Writer that appends every record to the log file and optionally mirrors it to stderr
struct LogSink {
    file: File,
    terminal: bool,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        if self.terminal {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.terminal {
            io::stderr().flush()?;
        }
        Ok(())
    }
}

/// Install the global logger described by `config`
///
/// `RUST_LOG` still selects levels; `verbose` only changes the default from
/// `info` to `debug`. Level colours apply to terminal-only output.
pub fn init(config: &LogConfig, verbose: bool) -> Result<()> {
    if !config.log_to_file && !config.log_to_terminal {
        return Ok(());
    }

    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));
    builder.format_timestamp_millis();

    if config.log_to_file {
        let path = log_file_path(config);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder
            .target(Target::Pipe(Box::new(LogSink {
                file,
                terminal: config.log_to_terminal,
            })))
            .write_style(WriteStyle::Never);
    } else {
        let style = if config.color_levels {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        };
        builder.target(Target::Stderr).write_style(style);
    }

    builder
        .try_init()
        .map_err(|e| CliError::Config(format!("logger already initialized: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_log_file_path() {
        let config = LogConfig {
            file_prefix: "logs/run".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(log_file_path(&config), PathBuf::from("logs/run.log"));
    }

    #[test]
    fn test_sink_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.log");

        for line in ["first\n", "second\n"] {
            let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();
            let mut sink = LogSink {
                file,
                terminal: false,
            };
            sink.write_all(line.as_bytes()).unwrap();
            sink.flush().unwrap();
        }

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
