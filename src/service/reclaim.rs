//! Garbage collection of session namespaces by periodic sweep.
//!
//! Sessions have no close signal, so nothing tracks their use. Instead a single
//! background task wipes everything under both namespace roots on a fixed
//! interval. The sweep is not coordinated with request handlers: a request that
//! races with it sees an I/O error or a 404, never a corrupted file.

use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::fs::{read_dir, remove_dir_all, remove_file, symlink_metadata};
use tokio::io;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Process-wide start-once flag.
pub struct StartOnce(AtomicBool);

impl StartOnce {
    pub const fn new() -> Self {
        StartOnce(AtomicBool::new(false))
    }

    /// Returns true for the first caller only.
    pub fn claim(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for StartOnce {
    fn default() -> Self {
        Self::new()
    }
}

static DAEMON: StartOnce = StartOnce::new();

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: usize,
    pub failed: usize,
}

impl AddAssign for SweepReport {
    fn add_assign(&mut self, other: Self) {
        self.removed += other.removed;
        self.failed += other.failed;
    }
}

#[derive(Clone, Debug)]
pub struct Reclaimer {
    roots: [PathBuf; 2],
}

impl Reclaimer {
    pub fn new(upload_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Reclaimer {
            roots: [upload_root.into(), output_root.into()],
        }
    }

    /// Starts the process-wide daemon. Returns `None` if one is already running.
    pub fn start(self, period: Duration) -> Option<JoinHandle<()>> {
        self.start_with(&DAEMON, period)
    }

    /// Like [`Reclaimer::start`], guarded by a caller-owned flag.
    pub fn start_with(self, guard: &StartOnce, period: Duration) -> Option<JoinHandle<()>> {
        if !guard.claim() {
            warn!("reclamation daemon already running, not starting another");
            return None;
        }
        info!(interval_secs = period.as_secs(), "starting reclamation daemon");
        Some(tokio::spawn(self.run(period)))
    }

    // idle (waiting for the tick) -> sweeping -> idle, until the process exits.
    // The first tick completes immediately.
    async fn run(self, period: Duration) {
        let mut timer = interval(period.max(Duration::from_millis(1)));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            timer.tick().await;
            self.sweep().await;
        }
    }

    /// Deletes every entry directly under both roots. Failures are logged and skipped.
    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        for root in &self.roots {
            report += sweep_root(root).await;
        }
        info!(
            removed = report.removed,
            failed = report.failed,
            "reclamation sweep finished"
        );
        report
    }
}

async fn sweep_root(root: &Path) -> SweepReport {
    let mut report = SweepReport::default();

    let mut entries = match read_dir(root).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "namespace root missing, nothing to sweep");
            return report;
        }
        Err(err) => {
            warn!(root = %root.display(), "failed to list namespace root: {err}");
            report.failed += 1;
            return report;
        }
    };

    let mut paths = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => paths.push(entry.path()),
            Ok(None) => break,
            Err(err) => {
                warn!(root = %root.display(), "failed to read namespace entry: {err}");
                report.failed += 1;
                break;
            }
        }
    }

    let results = join_all(paths.iter().map(|path| remove_entry(path))).await;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(()) => report.removed += 1,
            // Vanished between listing and deletion.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), "failed to delete: {err}");
                report.failed += 1;
            }
        }
    }
    report
}

async fn remove_entry(path: &Path) -> io::Result<()> {
    if symlink_metadata(path).await?.is_dir() {
        remove_dir_all(path).await
    } else {
        remove_file(path).await
    }
}
