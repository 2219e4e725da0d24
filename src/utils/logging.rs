use anyhow::{Context, Result};
use env_logger::{Builder, Logger, Target};
use std::fs::OpenOptions;
use std::path::Path;

/// Logger appending to `path`. `RUST_LOG` filters as usual.
pub fn file_logger(path: &Path) -> Result<Logger> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Opening log file {:?}", path))?;
    Ok(Builder::from_default_env()
        .target(Target::Pipe(Box::new(file)))
        .build())
}

/// Route logs to `path` while the TUI owns the terminal.
pub fn init_file(path: &Path) -> Result<()> {
    let logger = file_logger(path)?;
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(logger)).context("Installing logger")?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};

    #[test]
    fn errors_go_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miqat.log");
        let logger = file_logger(&path).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("miqat::counter")
                .args(format_args!("Error saving counter: disk I/O error"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Error saving counter: disk I/O error"), "{written}");
    }

    #[test]
    fn appends_across_openings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miqat.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let logger = file_logger(&path).unwrap();
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .args(format_args!("later run"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("earlier run\n"));
        assert!(written.contains("later run"));
    }
}
