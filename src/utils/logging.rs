//! Plain-text transcript logging.
//!
//! When the user passes `-l <file>`, every exchange in the active session is
//! appended to the file as it happens. This is a human-readable transcript,
//! not a state store: nothing is ever read back from it.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// Create a logging state. If a file path is given, logging is enabled
    /// immediately and a timestamped header is written.
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };

        if let Some(path) = log_file {
            logging.enable(path)?;
        }

        Ok(logging)
    }

    pub fn enable(&mut self, path: String) -> Result<(), Box<dyn std::error::Error>> {
        self.test_file_access(&path)?;

        self.file_path = Some(path);
        self.is_active = true;
        self.write_to_log(&format!(
            "## Logging started at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Append a message to the log, preserving its line structure. A blank
    /// line follows each message for spacing, matching the screen display.
    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active || self.file_path.is_none() {
            return Ok(());
        }

        self.write_to_log(content)
    }

    pub fn status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "off".to_string(),
            (Some(path), true) => format!(
                "on ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            (Some(path), false) => format!(
                "paused ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
        }
    }

    fn write_to_log(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    fn test_file_access(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn disabled_logging_is_a_no_op() {
        let logging = LoggingState::new(None).expect("logging state");
        assert!(!logging.is_active());
        assert_eq!(logging.status_string(), "off");
        logging.log_message("dropped").expect("no-op log");
    }

    #[test]
    fn enabled_logging_writes_header_and_messages() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let logging =
            LoggingState::new(Some(path.to_string_lossy().to_string())).expect("logging state");

        assert!(logging.is_active());
        logging.log_message("You: hello").expect("log message");
        logging.log_message("line one\nline two").expect("log message");

        let contents = std::fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("## Logging started at"));
        assert!(contents.contains("You: hello"));
        assert!(contents.contains("line one\nline two\n"));
    }

    #[test]
    fn status_string_names_the_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.log");
        let logging =
            LoggingState::new(Some(path.to_string_lossy().to_string())).expect("logging state");

        assert_eq!(logging.status_string(), "on (session.log)");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("chat.log");
        let result = LoggingState::new(Some(path.to_string_lossy().to_string()));
        assert!(result.is_err());
    }
}
