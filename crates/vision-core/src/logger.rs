//! Stderr logging for tools and tests built on the conversion engine.
//!
//! Records from the engine's own crates (`vision`, `vision_core`) pass at the
//! chosen level; everything else, codec crates included, only at `warn` and
//! above. Lines look like `[elapsed LEVEL target] message`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Log targets owned by the conversion engine.
pub const ENGINE_TARGETS: [&str; 2] = ["vision_core", "vision"];

/// Ceiling for records from any other target.
const FOREIGN_LEVEL: Level = Level::Warn;

fn is_engine_target(target: &str) -> bool {
    ENGINE_TARGETS.iter().any(|t| {
        target
            .strip_prefix(t)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

struct EngineLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for EngineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if is_engine_target(metadata.target()) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= FOREIGN_LEVEL && metadata.level() <= self.level
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr(),
            "[{:7.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<EngineLogger> = OnceLock::new();

/// Install the stderr logger, showing engine records up to `level`.
///
/// Only the first call installs anything; later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| EngineLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directives matching [`init_with_level`]'s scoping.
#[cfg(feature = "tracing")]
pub fn engine_directives(level: LevelFilter) -> String {
    let mut directives = FOREIGN_LEVEL.as_str().to_ascii_lowercase();
    for target in ENGINE_TARGETS {
        directives.push_str(&format!(",{target}={}", level.as_str().to_ascii_lowercase()));
    }
    directives
}

/// Install a `tracing` subscriber. `RUST_LOG` wins when set; otherwise the
/// engine crates log at `info` and the rest at `warn`.
///
/// `json` switches to flattened JSON lines. Span close events carry the
/// raster kind and size of each conversion. Returns `false` when another
/// subscriber was already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(engine_directives(LevelFilter::Info)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if json {
        builder.json().flatten_event(true).finish().try_init().is_ok()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(target: &str, level: Level) -> Metadata<'_> {
        Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn engine_targets_follow_the_level() {
        let logger = EngineLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert!(logger.enabled(&meta("vision_core::gray", Level::Debug)));
        assert!(logger.enabled(&meta("vision::io", Level::Debug)));
        assert!(!logger.enabled(&meta("vision_core::gray", Level::Trace)));

        assert!(!logger.enabled(&meta("zune_jpeg::decoder", Level::Debug)));
        assert!(!logger.enabled(&meta("visionary", Level::Info)));
        assert!(logger.enabled(&meta("png::decoder", Level::Warn)));
    }

    #[test]
    fn foreign_targets_never_exceed_engine_level() {
        let logger = EngineLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert!(!logger.enabled(&meta("png", Level::Warn)));
        assert!(logger.enabled(&meta("png", Level::Error)));
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with_level(LevelFilter::Debug).expect("first init");
        init_with_level(LevelFilter::Trace).expect("second init");
        assert_eq!(LOGGER.get().map(|l| l.level), Some(LevelFilter::Debug));
        log::debug!("logger installed");
    }
}

#[cfg(all(test, feature = "tracing"))]
mod tracing_tests {
    use super::*;

    #[test]
    fn directives_scope_engine_crates() {
        assert_eq!(
            engine_directives(LevelFilter::Debug),
            "warn,vision_core=debug,vision=debug"
        );
    }

    #[test]
    fn tracing_installs_once() {
        assert!(init_tracing(false), "first subscriber installs");
        assert!(!init_tracing(true), "second subscriber must be rejected");
        tracing::info!(target: "vision_core::logger", "subscriber installed");
    }
}
