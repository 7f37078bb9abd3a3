//! Logger setup: stderr plus an appended log file

use crate::error::{Result, ValueError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Copies every log line to stderr and the log file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // stderr is best-effort; the file is the record
        let _ = io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}

fn builder(default_level: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
}

/// Log to stderr and append to `log_file`.
///
/// `RUST_LOG` overrides `default_level`.
pub fn init(log_file: &Path, default_level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            ValueError::Config(format!(
                "cannot open log file {}: {}",
                log_file.display(),
                e
            ))
        })?;

    builder(default_level)
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .write_style(env_logger::WriteStyle::Never)
        .try_init()
        .map_err(|e| ValueError::Config(format!("logger already initialized: {}", e)))
}

/// Log to stderr only, for failures before the settings are known
pub fn init_stderr(default_level: &str) {
    if let Err(e) = builder(default_level).try_init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
