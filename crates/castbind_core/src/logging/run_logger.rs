//! Per-run logger with file and console output.
//!
//! Each run gets its own logger that:
//! - Writes to a dedicated log file
//! - Forwards lines to a console callback (if provided)
//! - Supports compact mode with progress filtering
//! - Keeps a tail buffer of tool output for failure reports

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{ConsoleCallback, LogConfig, LogLevel, MessagePrefix};
use crate::media::ToolLog;

/// Per-run logger with dual output (file + console).
pub struct RunLogger {
    run_name: String,
    log_path: PathBuf,
    file_writer: Mutex<Option<BufWriter<File>>>,
    console: Mutex<Option<ConsoleCallback>>,
    config: LogConfig,
    tail_buffer: Mutex<VecDeque<String>>,
    /// Last progress value logged (for compact mode filtering).
    last_progress: Mutex<Option<u32>>,
}

impl RunLogger {
    /// Create a new run logger writing `<log_dir>/<run_name>.log`.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        console: Option<ConsoleCallback>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            run_name,
            log_path,
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            console: Mutex::new(console),
            tail_buffer: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
            last_progress: Mutex::new(None),
        })
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a media tool invocation.
    pub fn command(&self, command: &str) {
        let msg = MessagePrefix::Command.format(command);
        self.log(LogLevel::Info, &msg);
    }

    pub fn phase(&self, phase_name: &str) {
        let msg = MessagePrefix::Phase.format(phase_name);
        self.log(LogLevel::Info, &msg);
    }

    pub fn section(&self, section_name: &str) {
        let msg = MessagePrefix::Section.format(section_name);
        self.log(LogLevel::Info, &msg);
    }

    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Log progress (filtered in compact mode).
    ///
    /// Returns true if the progress was logged, false if filtered.
    pub fn progress(&self, percent: u32) -> bool {
        let percent = percent.min(100);
        if self.config.compact {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step.max(1);

            if let Some(prev) = *last {
                if percent / step <= prev / step && percent < 100 {
                    return false;
                }
            }
            *last = Some(percent);
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Record output from an external tool.
    ///
    /// In compact mode, lines only go to the tail buffer.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut buffer = self.tail_buffer.lock();
            if self.config.error_tail == 0 {
                buffer.clear();
            } else {
                while buffer.len() >= self.config.error_tail {
                    buffer.pop_front();
                }
                buffer.push_back(line.to_string());
            }
        }

        if self.config.compact {
            return;
        }

        let prefix = if is_stderr { "[stderr] " } else { "" };
        self.output(&self.format_message(&format!("{}{}", prefix, line)));
    }

    /// Show the tail buffer after a tool failure.
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            self.output(&self.format_message(line));
        }
    }

    /// Forget buffered tool output, so the next tail shows one invocation.
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and release the log file.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref callback) = *self.console.lock() {
            callback(formatted);
        }
    }
}

impl ToolLog for RunLogger {
    fn command(&self, command_line: &str) {
        RunLogger::command(self, command_line);
    }

    fn output_line(&self, line: &str, is_stderr: bool) {
        RunLogger::output_line(self, line, is_stderr);
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sanitize a string to be safe for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Builder for creating a RunLogger with fluent API.
pub struct RunLoggerBuilder {
    run_name: String,
    log_dir: PathBuf,
    config: LogConfig,
    console: Option<ConsoleCallback>,
}

impl RunLoggerBuilder {
    pub fn new(run_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_name: run_name.into(),
            log_dir: log_dir.into(),
            config: LogConfig::default(),
            console: None,
        }
    }

    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.config.compact = compact;
        self
    }

    pub fn console(mut self, callback: ConsoleCallback) -> Self {
        self.console = Some(callback);
        self
    }

    pub fn build(self) -> std::io::Result<RunLogger> {
        RunLogger::new(self.run_name, self.log_dir, self.config, self.console)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("audiobook", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().ends_with("audiobook.log"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        logger.phase("Convert");
        logger.info("Found 3 files");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Convert ==="));
        assert!(content.contains("Found 3 files"));
    }

    #[test]
    fn forwards_to_console() {
        let dir = tempdir().unwrap();
        let call_count = Arc::new(AtomicUsize::new(0));
        let count_clone = call_count.clone();

        let logger = RunLoggerBuilder::new("run", dir.path())
            .console(Box::new(move |_msg| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .build()
            .unwrap();

        logger.info("Message 1");
        logger.success("Message 2");
        logger.debug("filtered at info level");

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compact_mode_filters_progress() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.progress(0));
        assert!(!logger.progress(5));
        assert!(!logger.progress(15));
        assert!(logger.progress(20));
        assert!(!logger.progress(25));
        assert!(logger.progress(40));
        assert!(logger.progress(100));
    }

    fn capture(config: LogConfig, dir: &Path) -> (RunLogger, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let logger = RunLoggerBuilder::new("run", dir)
            .config(config)
            .console(Box::new(move |msg| sink.lock().push(msg.to_string())))
            .build()
            .unwrap();
        (logger, lines)
    }

    fn quiet() -> LogConfig {
        LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            error_tail: 5,
            ..quiet()
        };
        let (logger, lines) = capture(config, dir.path());

        for i in 0..10 {
            logger.output_line(&format!("Line {}", i), true);
        }
        assert!(lines.lock().is_empty());

        logger.show_tail("ffmpeg");
        let shown = lines.lock().clone();
        assert_eq!(
            shown,
            vec!["[ffmpeg/tail]", "Line 5", "Line 6", "Line 7", "Line 8", "Line 9"]
        );

        lines.lock().clear();
        logger.clear_tail();
        logger.show_tail("ffmpeg");
        assert!(lines.lock().is_empty());
    }

    #[test]
    fn verbose_mode_streams_tool_output() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: false,
            ..quiet()
        };
        let (logger, lines) = capture(config, dir.path());

        let tool_log: &dyn ToolLog = &logger;
        tool_log.command("ffmpeg -i 01.mp3 out.m4a");
        tool_log.output_line("Stream mapping:", false);
        tool_log.output_line("Invalid data found", true);

        assert_eq!(
            *lines.lock(),
            vec![
                "$ ffmpeg -i 01.mp3 out.m4a",
                "Stream mapping:",
                "[stderr] Invalid data found",
            ]
        );
    }

    #[test]
    fn timestamps_can_be_disabled() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        };
        let logger = RunLogger::new("run", dir.path(), config, None).unwrap();
        logger.info("bare");
        logger.close();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert_eq!(content, "bare\n");
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("podcast-20261019"), "podcast-20261019");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
    }
}
