use std::io::Write;
use std::sync::{Mutex, OnceLock};

use chrono::{Local, Utc};
use serde_json::{json, Value};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::config::LoggerConfig;
use crate::utils::error::Result;

struct LoggerState {
    local_time: bool,
    error_file: Option<Mutex<RollingFileAppender>>,
}

static LOGGER_STATE: OnceLock<LoggerState> = OnceLock::new();

pub struct StructuredLogger;

impl StructuredLogger {
    /// Installs the JSON tracing subscriber for library events and, when a
    /// directory is configured, opens the daily error log that warnings and
    /// errors are mirrored to. Only the first call has any effect.
    pub fn init(config: &LoggerConfig) -> Result<()> {
        let filter = match config.level.to_lowercase().as_str() {
            "error" => "error",
            "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        };

        let error_file = match &config.dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&config.file_name)
                    .filename_suffix("error.log")
                    .build(dir)?;
                Some(Mutex::new(appender))
            }
            None => None,
        };

        let state = LoggerState {
            local_time: config.local_time,
            error_file,
        };
        if LOGGER_STATE.set(state).is_err() {
            return Ok(());
        }

        // A subscriber may already be installed by a test harness.
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init();

        Ok(())
    }

    pub fn log_info(message: &str, request_id: Option<&str>, additional_data: Option<Value>) {
        let mut log_entry = Self::entry("info", message, request_id);

        if let (Value::Object(map), Some(Value::Object(data_map))) = (&mut log_entry, additional_data) {
            for (key, value) in data_map {
                map.insert(key, value);
            }
        }

        println!("{}", log_entry);
    }

    pub fn log_warning(message: &str, request_id: Option<&str>) {
        let log_entry = Self::entry("warning", message, request_id);
        println!("{}", log_entry);
        Self::write_to_file(&log_entry.to_string());
    }

    pub fn log_error(error: &str, request_id: Option<&str>) {
        let log_entry = Self::entry("error", error, request_id);
        println!("{}", log_entry);
        Self::write_to_file(&log_entry.to_string());
    }

    fn entry(level: &str, message: &str, request_id: Option<&str>) -> Value {
        let use_local_time = LOGGER_STATE.get().map(|s| s.local_time).unwrap_or(false);
        let timestamp = if use_local_time {
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
        } else {
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
        };

        json!({
            "message": { level: message },
            "timestamp": timestamp,
            "requestId": request_id.unwrap_or("MAIN"),
        })
    }

    fn write_to_file(log_line: &str) {
        let Some(file) = LOGGER_STATE.get().and_then(|s| s.error_file.as_ref()) else {
            return;
        };
        if let Ok(mut appender) = file.lock() {
            let _ = writeln!(appender, "{}", log_line);
        }
    }
}
