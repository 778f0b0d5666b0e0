use anyhow::Result;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Picks the filter: `RUST_LOG` first, then `-v` count, then the configured level.
fn filter_directive(verbose_level: u8, configured: &str) -> String {
    match verbose_level {
        0 => configured.to_string(),
        // -v: debug but keep the HTTP stack quiet
        1 => "debug,hyper=warn,hyper_util=warn,reqwest=info".to_string(),
        _ => "trace".to_string(),
    }
}

/// Logs go to a daily rolling file; the terminal belongs to the UI.
pub fn init_logging(verbose_level: u8, configured: &str, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(verbose_level, configured)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Files are named popcorn.log.2026-01-17 and so on.
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "popcorn.log");

    let fmt_layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_writer(file_appender);

    Registry::default().with(filter).with(fmt_layer).try_init()?;

    Ok(())
}
