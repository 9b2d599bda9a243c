mod error;
pub mod fmt;

use std::sync::{Mutex, OnceLock, PoisonError};

use core::str::FromStr;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use varasto_mem::DynamicArray;

use crate::*;

pub use error::LogError;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec, SegmentSpec};

/// Handle to a format registered with [`custom_fmt`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CustomFmt(usize);

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Per target verbosity parsed from a `RUST_LOG` style string.
///
/// The string is a comma separated list of `level` or `target=level` entries. A bare
/// level sets the base level; unknown levels are ignored. When a target is listed more
/// than once, the least verbose level wins.
#[derive(Clone, Debug)]
pub struct Filters {
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl Filters {

    pub fn parse(spec: &str) -> Self {
        let mut target_levels = FxHashMap::default();
        let mut base_level = Level::Error;
        for arg in spec.split(',') {
            let (module, level) = match arg.find('=') {
                Some(j) => (Some(arg[0..j].trim()), arg[j + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            if let Some(module) = module {
                let entry = target_levels
                    .entry(CompactString::new(module))
                    .or_insert(level);
                *entry = (*entry).min(level);
            } else {
                base_level = level;
            }
        }
        Self {
            target_levels,
            base_level,
        }
    }

    #[inline(always)]
    pub fn base_level(&self) -> Level {
        self.base_level
    }

    /// Level of the longest `::` separated prefix of `target` that has an entry.
    pub fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[0..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }
}

impl Default for Filters {

    fn default() -> Self {
        Self::parse("")
    }
}

struct Logger {
    stderr: StandardStream,
    info_fmt: LogFmt,
    warn_fmt: LogFmt,
    error_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    custom_fmt: DynamicArray<LogFmt>,
    filters: Filters,
}

impl Logger {

    fn new(filters: Filters) -> Result<Self> {
        Ok(Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            info_fmt: LogFmt::tagged("[info]", Color::Green)?,
            warn_fmt: LogFmt::tagged("[warn]", Color::Yellow)?,
            error_fmt: LogFmt::tagged("[error]", Color::Red)?,
            debug_fmt: LogFmt::tagged("[debug]", Color::Blue)?,
            trace_fmt: LogFmt::tagged("[trace]", Color::Magenta)?,
            custom_fmt: DynamicArray::new(),
            filters,
        })
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        let target_level = self.filters.target_level(target);
        let (fmt, level) = match level {
            LevelFmt::Error => (&self.error_fmt, Level::Error),
            LevelFmt::Warn => (&self.warn_fmt, Level::Warn),
            LevelFmt::Info => (&self.info_fmt, Level::Info),
            LevelFmt::Debug => (&self.debug_fmt, Level::Debug),
            LevelFmt::Trace => (&self.trace_fmt, Level::Trace),
            LevelFmt::Other(fmt, level) => {
                let fmt = self.custom_fmt
                    .get(fmt.0)
                    .ok_or(LogError::UnknownFormat { index: fmt.0 })?;
                (fmt, level)
            },
        };
        if target_level < level {
            return Ok(false)
        }
        fmt.write_line(&mut self.stderr, msg)?;
        Ok(true)
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

fn with_logger<R>(f: impl FnOnce(&mut Logger) -> Result<R>) -> Result<R> {
    let logger = LOGGER.get().ok_or(LogError::NotInitialized)?;
    let mut logger = logger.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut logger)
}

/// Initializes the global logger from the `RUST_LOG` environment variable.
///
/// Later calls are no-ops.
pub fn init() -> Result<()> {
    let spec = std::env::var("RUST_LOG").unwrap_or_default();
    init_with_filter(&spec)
}

pub fn init_with_filter(spec: &str) -> Result<()> {
    if LOGGER.get().is_some() { return Ok(()) }
    let logger = Logger::new(Filters::parse(spec))?;
    let _ = LOGGER.set(Mutex::new(logger));
    Ok(())
}

#[inline(always)]
pub fn error_fmt(f: impl FnOnce(&mut LogFmtBuilder) -> Result<()>) -> Result<()> {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.error_fmt)))
}

#[inline(always)]
pub fn warn_fmt(f: impl FnOnce(&mut LogFmtBuilder) -> Result<()>) -> Result<()> {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.warn_fmt)))
}

#[inline(always)]
pub fn info_fmt(f: impl FnOnce(&mut LogFmtBuilder) -> Result<()>) -> Result<()> {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.info_fmt)))
}

#[inline(always)]
pub fn debug_fmt(f: impl FnOnce(&mut LogFmtBuilder) -> Result<()>) -> Result<()> {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.debug_fmt)))
}

#[inline(always)]
pub fn trace_fmt(f: impl FnOnce(&mut LogFmtBuilder) -> Result<()>) -> Result<()> {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.trace_fmt)))
}

pub fn custom_fmt(fmt: LogFmt) -> Result<CustomFmt> {
    with_logger(|logger| {
        let index = logger.custom_fmt.len();
        logger.custom_fmt.push(fmt)?;
        Ok(CustomFmt(index))
    })
}

#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    with_logger(|logger| logger.log(target, level, args))
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(Level::from_str("WARN"), Ok(Level::Warn));
        assert_eq!(Level::from_str("trace"), Ok(Level::Trace));
        assert_eq!(Level::from_str("loud"), Err(()));
    }

    #[test]
    fn empty_filter_defaults_to_error() {
        let filters = Filters::default();
        assert_eq!(filters.base_level(), Level::Error);
        assert_eq!(filters.target_level("anything::at::all"), Level::Error);
    }

    #[test]
    fn most_specific_prefix_wins() {
        let filters = Filters::parse("info, varasto_mem=debug ,varasto_mem::dynamic_array=trace");
        assert_eq!(filters.base_level(), Level::Info);
        assert_eq!(filters.target_level("varasto_mem::dynamic_array::iter"), Level::Trace);
        assert_eq!(filters.target_level("varasto_mem::raw_buffer"), Level::Debug);
        assert_eq!(filters.target_level("varasto_demo"), Level::Info);
    }

    #[test]
    fn repeated_target_keeps_least_verbose_level() {
        let filters = Filters::parse("demo=trace,demo=warn,demo=bogus");
        assert_eq!(filters.target_level("demo"), Level::Warn);
    }

    #[test]
    fn logging_through_global_logger() {
        init_with_filter("varasto_log=info").unwrap();
        assert!(info!("visible {}", 1));
        assert!(!debug!("hidden {}", 2));
        let fmt = custom_fmt(LogFmt::tagged("[note]", Color::Cyan).unwrap()).unwrap();
        assert!(log(module_path!(), LevelFmt::Other(fmt, Level::Warn), format_args!("custom")).unwrap());
        let missing = log(module_path!(), LevelFmt::Other(CustomFmt(usize::MAX), Level::Error), format_args!("x"));
        assert!(matches!(missing, Err(LogError::UnknownFormat { .. })));
    }
}
