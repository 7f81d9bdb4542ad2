mod config;
mod error;
mod init;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a global subscriber is already set.
///
/// # Local timezone
/// With `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before the tokio
/// runtime starts; offset detection is unreliable once threads exist.
///
/// # Examples
/// ```rust
/// use relay_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("failed to initialize logger");
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => init::text(cfg),
        LoggerFormat::Json => init::json(cfg),
        LoggerFormat::Journald => init::journald(cfg),
    }
}
