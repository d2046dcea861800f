use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

static START: OnceLock<Instant> = OnceLock::new();

/// A logger that writes to stdout, stamping each line with the time elapsed
/// since the logger was installed.
pub struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        println!("{}", format_record(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

fn format_record(record: &Record) -> String {
    let elapsed = START.get_or_init(Instant::now).elapsed().as_secs_f64();
    format!(
        "[+{:.3}s {} {:?} {}:{}] {}",
        elapsed,
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Default level for the current build: Debug in debug builds, Info otherwise.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Read a level filter from the environment variable `var`, falling back to
/// `default` when it is unset or unparsable.
pub fn level_from_env(var: &str, default: LevelFilter) -> LevelFilter {
    std::env::var(var)
        .ok()
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(default)
}

/// Install `StdoutLogger` as the global logger.
///
/// This can only be called once per process. Subsequent calls are silently ignored.
pub fn init_stdout_logger(level: LevelFilter) {
    static LOGGER: StdoutLogger = StdoutLogger;
    START.get_or_init(Instant::now);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
