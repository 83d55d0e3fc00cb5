//! The run log: an append-only, timestamped, level-tagged record of every
//! event of a run, mirrored to the console as it is written.

use anyhow::{Context, Result};
use chrono::Local;
use colored::{ColoredString, Colorize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Success => "SUCCESS",
        }
    }

    fn colored_tag(self) -> ColoredString {
        match self {
            LogLevel::Info => self.tag().cyan(),
            LogLevel::Warning => self.tag().yellow().bold(),
            LogLevel::Error => self.tag().red().bold(),
            LogLevel::Success => self.tag().green().bold(),
        }
    }
}

/// Where console copies of log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stdout,
    Stderr,
    Off,
}

pub struct RunLog {
    file: Option<File>,
    console: Console,
    captured: Option<Vec<String>>,
}

impl RunLog {
    /// Open (or create) the log file for appending
    pub fn open(path: &Path, console: Console) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok(Self {
            file: Some(file),
            console,
            captured: None,
        })
    }

    /// Log that only echoes to the console
    pub fn console_only(console: Console) -> Self {
        Self {
            file: None,
            console,
            captured: None,
        }
    }

    /// Log that keeps lines in memory for inspection
    #[cfg(test)]
    pub fn capture() -> Self {
        Self {
            file: None,
            console: Console::Off,
            captured: Some(Vec::new()),
        }
    }

    /// Captured lines as `[LEVEL] message`
    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        self.captured.as_deref().unwrap_or(&[])
    }

    pub fn log(&mut self, level: LogLevel, message: impl AsRef<str>) {
        let message = message.as_ref();
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

        if let Some(file) = self.file.as_mut() {
            let written = writeln!(file, "[{}] [{}] {}", timestamp, level.tag(), message)
                .and_then(|_| file.flush());
            if let Err(e) = written {
                // Keep the run going on the console; the artifact is lost from here on
                eprintln!("{}: failed to write run log: {}", "Warning".yellow().bold(), e);
                self.file = None;
            }
        }

        match self.console {
            Console::Stdout => println!("[{}] [{}] {}", timestamp, level.colored_tag(), message),
            Console::Stderr => eprintln!("[{}] [{}] {}", timestamp, level.colored_tag(), message),
            Console::Off => {}
        }

        if let Some(captured) = self.captured.as_mut() {
            captured.push(format!("[{}] {}", level.tag(), message));
        }
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Success, message);
    }
}
