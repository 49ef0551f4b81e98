//! Logger setup: plain messages on stdout, optional tee into a log file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Level implied by the global flags. `--verbose` wins over `--quiet`.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG` overrides the flag-derived level.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(quiet, verbose));
    builder.parse_default_env();

    builder.format(move |buf, record| {
        if verbose {
            let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
            writeln!(buf, "{}", verbose_line(&time, record))
        } else {
            match record.level() {
                Level::Error => writeln!(
                    buf,
                    "{} {}",
                    "error:".if_supports_color(Stdout, |t| t.red()),
                    record.args()
                ),
                Level::Warn => writeln!(
                    buf,
                    "{} {}",
                    "warning:".if_supports_color(Stdout, |t| t.yellow()),
                    record.args()
                ),
                _ => writeln!(buf, "{}", record.args()),
            }
        }
    });

    match logfile {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder.try_init().map_err(io::Error::other)
}

/// `HH:MM:SS.mmm LEVEL [target] message`
fn verbose_line(time: &str, record: &log::Record<'_>) -> String {
    format!(
        "{} {:<5} [{}] {}",
        time,
        record.level(),
        record.target(),
        record.args()
    )
}

/// Writes everything to stdout and an ANSI-stripped copy to a file.
struct TeeWriter<W: Write = File> {
    file: W,
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}
