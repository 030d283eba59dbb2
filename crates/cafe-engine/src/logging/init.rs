use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provides one.
///
/// GPU backends are chatty at `info`; keep them at `warn`.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g.
/// `"cafe_engine=debug,wgpu=warn"`. It takes precedence over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,

    /// Prefix lines with a millisecond timestamp.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directives actually applied.
    fn resolve_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger.
///
/// Only the first call has an effect. A logger installed elsewhere (test
/// harnesses, embedding hosts) is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter();

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        // The browser console stamps lines itself.
        if config.timestamps && !cfg!(target_arch = "wasm32") {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        match install(builder) {
            Ok(()) => log::debug!("logging initialized ({filter})"),
            Err(e) => log::debug!("logger already installed: {e}"),
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn install(mut builder: env_logger::Builder) -> Result<(), log::SetLoggerError> {
    builder.try_init()
}

#[cfg(target_arch = "wasm32")]
fn install(mut builder: env_logger::Builder) -> Result<(), log::SetLoggerError> {
    let logger = super::console::ConsoleLogger::new(builder.build());
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig::default().with_filter("cafe_engine=trace");
        assert_eq!(cfg.resolve_filter(), "cafe_engine=trace");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default().with_filter("off"));
        log::info!("still logging");
    }
}
