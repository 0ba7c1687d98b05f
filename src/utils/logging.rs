use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::credentials::ServiceConfig;
use crate::config::settings::{LogFormat, LoggingConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Resolve the effective logging config (CLI flag wins over the config file)
/// and initialize tracing with it.
pub fn run(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) {
    let file_config = service_config.settings.logging.as_ref();
    let level = arg_log_level
        .map(|lvl| lvl.as_str().to_owned())
        .or_else(|| file_config.map(|cfg| cfg.level.clone()))
        .unwrap_or_else(|| "info".to_owned());
    let format = file_config
        .map(|cfg| cfg.format.clone())
        .unwrap_or_else(LogFormat::from_env);

    init_logging(&LoggingConfig { level, format });
}

/// Initialize tracing with the desired config.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match cfg.format {
        LogFormat::Json => {
            // Flattened fields, no ANSI: CRI log parsers choke on both.
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true)
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(true);

            let _ = registry.with(layer).try_init();
        }
    };
}
