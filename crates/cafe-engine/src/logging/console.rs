use log::{Level, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// Routes records to the browser console, filtered by an `env_logger` logger.
///
/// Browsers have no stderr, so `env_logger`'s own writer would go nowhere.
pub(super) struct ConsoleLogger {
    filter: env_logger::Logger,
}

impl ConsoleLogger {
    pub(super) fn new(filter: env_logger::Logger) -> Self {
        Self { filter }
    }

    pub(super) fn max_level(&self) -> log::LevelFilter {
        self.filter.filter()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.filter.matches(record) {
            return;
        }

        let line = JsValue::from_str(&format!(
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}
