//! Progress reporting
//!
//! Progress values are percentages in `[0, 100]`. Within one hashing call
//! they never decrease and the last one is always 100. Reading owns the
//! `[0, 80]` band, digest computation the `(80, 100]` band.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Progress emitted before a single-shot read
pub const SINGLE_READ_STARTED: u8 = 50;

/// Upper bound of the reading band
pub const READ_COMPLETE: u8 = 80;

/// Progress emitted before finalizing a chunked digest
pub const DIGEST_STARTED: u8 = 90;

pub const COMPLETE: u8 = 100;

// ============================================================================
// Progress Value
// ============================================================================

/// A progress percentage in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// Build a progress value, saturating at 100
    pub fn new(percent: u8) -> Self {
        Self(percent.min(COMPLETE))
    }

    /// Reading progress after `loaded` of `total` bytes, scaled into the
    /// reading band and rounded down
    pub fn reading(loaded: u64, total: u64) -> Self {
        if total == 0 {
            return Self(READ_COMPLETE);
        }
        let scaled = (loaded.min(total) as u128 * READ_COMPLETE as u128) / total as u128;
        Self(scaled as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn phase(self) -> Phase {
        match self.0 {
            p if p < READ_COMPLETE => Phase::Reading,
            p if p < COMPLETE => Phase::Digesting,
            _ => Phase::Done,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Coarse stage of a hashing call, for status text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Reading,
    Digesting,
    Done,
}

// ============================================================================
// Observers
// ============================================================================

/// Receives progress updates from a hashing call
///
/// Errors returned here are logged and ignored; they never abort hashing.
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, progress: Progress) -> anyhow::Result<()>;
}

impl<F> ProgressObserver for F
where
    F: FnMut(Progress) -> anyhow::Result<()> + Send,
{
    fn on_progress(&mut self, progress: Progress) -> anyhow::Result<()> {
        self(progress)
    }
}

/// Forwards progress into an unbounded channel
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Progress>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Progress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&mut self, progress: Progress) -> anyhow::Result<()> {
        self.tx
            .send(progress)
            .map_err(|_| anyhow::anyhow!("progress receiver dropped"))
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Per-call wrapper around an optional observer
///
/// Clamps values so the observer never sees a decrease, and isolates
/// observer failures (errors and panics) from the hashing call.
pub(crate) struct ProgressReporter<'a> {
    observer: Option<&'a mut dyn ProgressObserver>,
    last: Option<Progress>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(observer: Option<&'a mut dyn ProgressObserver>) -> Self {
        Self {
            observer,
            last: None,
        }
    }

    pub(crate) fn emit(&mut self, progress: Progress) {
        let progress = match self.last {
            Some(last) if last > progress => last,
            _ => progress,
        };
        self.last = Some(progress);

        let Some(observer) = self.observer.as_deref_mut() else {
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| observer.on_progress(progress))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(progress = progress.percent(), error = %e, "Progress observer failed");
            }
            Err(_) => {
                tracing::warn!(progress = progress.percent(), "Progress observer panicked");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn last(&self) -> Option<Progress> {
        self.last
    }
}
