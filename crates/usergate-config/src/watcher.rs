//! Configuration hot reload.
//!
//! [`ConfigWatcher`] polls the loader's source files and, when any of them
//! changes, reloads the configuration and publishes the new snapshot on a
//! `tokio::sync::watch` channel. Subscribers always see a complete,
//! validated `Arc<AppConfig>`; a failed reload leaves the previous snapshot
//! in place.

use crate::{AppConfig, ConfigLoader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use usergate_core::UsergateResult;

/// Receiving side of the configuration channel.
pub type ConfigReceiver = watch::Receiver<Arc<AppConfig>>;

/// Modification time and length of one source file, `None` if absent.
type FileStamp = Option<(SystemTime, u64)>;

/// Polls config files and publishes reloaded snapshots.
#[derive(Debug)]
pub struct ConfigWatcher {
    loader: ConfigLoader,
    files: Vec<PathBuf>,
    stamps: Vec<FileStamp>,
    interval: Duration,
    sender: watch::Sender<Arc<AppConfig>>,
}

impl ConfigWatcher {
    /// Creates a watcher seeded with `initial` and returns the first receiver.
    #[must_use]
    pub fn new(loader: ConfigLoader, initial: AppConfig) -> (Self, ConfigReceiver) {
        let interval = initial.observability.watch_interval().max(Duration::from_secs(1));
        let (sender, receiver) = watch::channel(Arc::new(initial));
        let files = loader.source_files();
        let stamps = stamp_all(&files);

        let watcher = Self {
            loader,
            files,
            stamps,
            interval,
            sender,
        };
        (watcher, receiver)
    }

    /// Returns another receiver for the configuration channel.
    #[must_use]
    pub fn subscribe(&self) -> ConfigReceiver {
        self.sender.subscribe()
    }

    /// Returns the most recently published snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<AppConfig> {
        self.sender.borrow().clone()
    }

    /// Checks the files once. Returns `Ok(true)` when a new snapshot was
    /// published, `Ok(false)` when nothing changed.
    pub fn check(&mut self) -> UsergateResult<bool> {
        let stamps = stamp_all(&self.files);
        if stamps == self.stamps {
            return Ok(false);
        }
        self.stamps = stamps;

        debug!("Config files changed, reloading");
        let config = self.loader.load()?;
        self.sender.send_replace(Arc::new(config));
        info!("Configuration reloaded");
        Ok(true)
    }

    /// Runs the polling loop on the tokio runtime until `shutdown` flips to
    /// `true` or its sender is dropped.
    pub fn spawn(mut self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.check() {
                            warn!(error = %e, "Config reload failed, keeping previous configuration");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!("Config watcher stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}

fn stamp_all(files: &[PathBuf]) -> Vec<FileStamp> {
    files
        .iter()
        .map(|path| {
            let meta = std::fs::metadata(path).ok()?;
            Some((meta.modified().ok()?, meta.len()))
        })
        .collect()
}
