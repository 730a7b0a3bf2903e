use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing_appender::non_blocking::{ErrorCounter, NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
const DEFAULT_DIRECTIVE: &str = "info";

/// Lines buffered between the app and the writer thread before new ones are dropped.
const BUFFERED_LINES: usize = 1000;

/// The filter directive to install, and why the requested one was refused (if it was).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChoice {
    pub directive: String,
    pub rejected: Option<String>,
}

impl FilterChoice {
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::new(&self.directive)
    }
}

/// Pick the filter directive for a raw `LOG_LEVEL` value.
///
/// Unset or blank → `info`. A bare word must be a level name (`debug`, `WARN`, `off`);
/// anything else bare would be read by `EnvFilter` as a target and silence the
/// rest of the app. Full directives (`swipe_server=debug,tower_http=info`) are
/// accepted when they parse. Everything refused falls back to `info`.
pub fn choose_filter(raw: Option<&str>) -> FilterChoice {
    let fallback = |reason: String| FilterChoice {
        directive: DEFAULT_DIRECTIVE.to_owned(),
        rejected: Some(reason),
    };

    let raw = match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => raw,
        None => {
            return FilterChoice {
                directive: DEFAULT_DIRECTIVE.to_owned(),
                rejected: None,
            }
        }
    };

    if let Ok(level) = raw.parse::<LevelFilter>() {
        return FilterChoice {
            directive: level.to_string().to_lowercase(),
            rejected: None,
        };
    }

    if !raw.contains('=') && !raw.contains(',') {
        return fallback(format!("{raw:?} is not a log level"));
    }

    match EnvFilter::try_new(raw) {
        Ok(_) => FilterChoice {
            directive: raw.to_owned(),
            rejected: None,
        },
        Err(e) => fallback(e.to_string()),
    }
}

/// Keeps the background log writer alive. Dropping it flushes pending lines,
/// so hold it until `main` returns.
pub struct LogGuard {
    _worker: WorkerGuard,
    dropped: ErrorCounter,
}

impl LogGuard {
    /// Periodically report lines the lossy writer had to drop.
    pub fn spawn_drop_reporter(&self, every: Duration) -> JoinHandle<()> {
        let dropped = self.dropped.clone();
        tokio::spawn(async move {
            let mut tracker = DropTracker::default();
            let mut ticks = IntervalStream::new(tokio::time::interval(every));
            while ticks.next().await.is_some() {
                if let Some(missed) = tracker.observe(dropped.dropped_lines()) {
                    // Bypass the logger: it is the thing that is overloaded
                    let _ = writeln!(std::io::stderr(), "logger dropped {missed} messages");
                }
            }
        })
    }
}

/// Turns the writer's running total of dropped lines into per-interval deltas.
#[derive(Debug, Default)]
pub struct DropTracker {
    seen: usize,
}

impl DropTracker {
    /// Returns how many lines were dropped since the last call, if any.
    pub fn observe(&mut self, total: usize) -> Option<usize> {
        let missed = total.saturating_sub(self.seen);
        self.seen = self.seen.max(total);
        (missed > 0).then_some(missed)
    }
}

/// Non-blocking, lossy writer: a full buffer drops lines instead of stalling callers.
pub fn lossy_writer<W>(writer: W) -> (NonBlocking, WorkerGuard)
where
    W: Write + Send + 'static,
{
    NonBlockingBuilder::default()
        .buffered_lines_limit(BUFFERED_LINES)
        .lossy(true)
        .finish(writer)
}

/// Install the global subscriber using `LOG_LEVEL`, defaulting to `info`.
///
/// Runs before configuration is parsed so config errors are already logged.
pub fn init_from_env() -> LogGuard {
    let raw = std::env::var(LOG_LEVEL_VAR).ok();
    init(choose_filter(raw.as_deref()))
}

/// Install the global `fmt` subscriber writing to stdout. Call once, from `main`.
pub fn init(choice: FilterChoice) -> LogGuard {
    let (writer, worker) = lossy_writer(std::io::stdout());
    let dropped = writer.error_counter();

    fmt()
        .with_env_filter(choice.filter())
        .with_writer(writer)
        .with_target(false)
        .init();

    if let Some(reason) = &choice.rejected {
        tracing::warn!(reason = %reason, "invalid LOG_LEVEL, using info");
    }
    tracing::info!(level = %choice.directive, "current log level");

    LogGuard {
        _worker: worker,
        dropped,
    }
}
