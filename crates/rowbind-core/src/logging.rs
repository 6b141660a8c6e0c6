//! Logging setup and a tagged logger.
//!
//! Library code logs through the `log` macros directly. `Logger` is for app
//! code that wants one switch to silence its own output (e.g. release builds)
//! and a common prefix on every target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use log::Level;

pub const APP_TAG: &str = "rowbind: ";

static ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));
static INIT: Once = Once::new();

/// Installs the platform logger once: `android_logger` on Android,
/// `env_logger` elsewhere (filter from `RUST_LOG`, `info` by default).
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("rowbind"),
        );

        #[cfg(not(target_os = "android"))]
        {
            let env = env_logger::Env::default().default_filter_or("info");
            if let Err(e) = env_logger::Builder::from_env(env).try_init() {
                // Someone else (a test harness, the host app) already owns the logger.
                log::debug!("init_logging: logger already installed: {e}");
            }
        }
    });
}

pub fn set_logging_enabled(on: bool) {
    ENABLED.store(on, Ordering::Relaxed);
}

pub fn logging_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

#[derive(Clone, Debug)]
pub struct Logger {
    target: String,
}

impl Logger {
    pub fn new(tag: &str) -> Self {
        Self {
            target: format!("{APP_TAG}{tag}"),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self, level: Level, message: &str) {
        if logging_enabled() {
            log::log!(target: self.target.as_str(), level, "{message}");
        }
    }

    /// Logs `err` after `message`, or on its own when `message` is empty.
    pub fn log_err(&self, level: Level, message: &str, err: &dyn std::error::Error) {
        if !logging_enabled() {
            return;
        }
        if message.is_empty() {
            log::log!(target: self.target.as_str(), level, "{err}");
        } else {
            log::log!(target: self.target.as_str(), level, "{message}: {err}");
        }
    }

    pub fn v(&self, message: &str) {
        self.log(Level::Trace, message);
    }
    pub fn d(&self, message: &str) {
        self.log(Level::Debug, message);
    }
    pub fn i(&self, message: &str) {
        self.log(Level::Info, message);
    }
    pub fn w(&self, message: &str) {
        self.log(Level::Warn, message);
    }
    pub fn e(&self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn v_with(&self, message: &str, err: &dyn std::error::Error) {
        self.log_err(Level::Trace, message, err);
    }
    pub fn d_with(&self, message: &str, err: &dyn std::error::Error) {
        self.log_err(Level::Debug, message, err);
    }
    pub fn i_with(&self, message: &str, err: &dyn std::error::Error) {
        self.log_err(Level::Info, message, err);
    }
    pub fn w_with(&self, message: &str, err: &dyn std::error::Error) {
        self.log_err(Level::Warn, message, err);
    }
    pub fn e_with(&self, message: &str, err: &dyn std::error::Error) {
        self.log_err(Level::Error, message, err);
    }

    /// Warns with the error alone.
    pub fn w_err(&self, err: &dyn std::error::Error) {
        self.log_err(Level::Warn, "", err);
    }
}
