//! Retention sweeper implementation.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::RetentionConfig;
use crate::metrics::{SWEEPS_TOTAL, SWEEP_FAILURES, SWEEP_REMOVALS};
use crate::storage::StorageLayout;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub uploads_removed: usize,
    pub job_dirs_removed: usize,
    /// Deletions or directory reads that failed. Never aborts the sweep.
    pub failures: usize,
}

/// Periodically deletes aged uploads and job directories.
pub struct RetentionSweeper {
    layout: StorageLayout,
    config: RetentionConfig,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl RetentionSweeper {
    pub fn new(layout: StorageLayout, config: RetentionConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            layout,
            config,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Start the periodic sweep loop.
    ///
    /// Returns `None` when retention is disabled or the loop is already running.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            info!("Retention sweeper disabled; storage areas will not be cleaned");
            return None;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Retention sweeper already running");
            return None;
        }

        let sweeper = Self {
            layout: self.layout.clone(),
            config: self.config.clone(),
            running: Arc::clone(&self.running),
            shutdown_tx: self.shutdown_tx.clone(),
        };
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let interval = self.config.interval();

        info!(
            "Retention sweeper started (interval {}s, ttl {}s)",
            self.config.interval_secs, self.config.ttl_secs
        );

        Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Retention sweeper received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !sweeper.running.load(Ordering::Relaxed) {
                            break;
                        }
                        sweeper.sweep().await;
                    }
                }
            }
            sweeper.running.store(false, Ordering::SeqCst);
        }))
    }

    /// Stop the sweep loop.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(());
        info!("Retention sweeper stopped");
    }

    /// Run one sweep over both storage areas.
    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(SystemTime::now()).await
    }

    /// Run one sweep, measuring ages against `now`.
    pub async fn sweep_at(&self, now: SystemTime) -> SweepReport {
        info!("Starting retention sweep");
        let ttl = self.config.ttl();
        let mut report = SweepReport::default();

        self.sweep_uploads(now, ttl, &mut report).await;
        self.sweep_job_dirs(now, ttl, &mut report).await;

        SWEEPS_TOTAL.inc();
        SWEEP_REMOVALS
            .with_label_values(&["uploads"])
            .inc_by(report.uploads_removed as u64);
        SWEEP_REMOVALS
            .with_label_values(&["job_dirs"])
            .inc_by(report.job_dirs_removed as u64);
        SWEEP_FAILURES.inc_by(report.failures as u64);

        info!(
            "Retention sweep finished: {} uploads removed, {} job directories removed, {} failures",
            report.uploads_removed, report.job_dirs_removed, report.failures
        );
        report
    }

    /// Walk the upload area recursively and delete aged upload files.
    async fn sweep_uploads(&self, now: SystemTime, ttl: Duration, report: &mut SweepReport) {
        let mut pending: Vec<PathBuf> = vec![self.layout.upload_dir().to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Cleanup error reading {:?}: {}", dir, e);
                    report.failures += 1;
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Cleanup error reading {:?}: {}", dir, e);
                        report.failures += 1;
                        break;
                    }
                };
                let path = entry.path();
                let Ok(metadata) = entry.metadata().await else {
                    continue;
                };

                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !self.layout.is_upload_file(&path) || !is_expired(&metadata, now, ttl) {
                    continue;
                }

                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {
                        info!("Cleaned up upload file: {:?}", path);
                        report.uploads_removed += 1;
                    }
                    Err(e) => {
                        warn!("Failed to remove upload file {:?}: {}", path, e);
                        report.failures += 1;
                    }
                }
            }
        }
    }

    /// Delete every job directory that directly contains an aged file.
    async fn sweep_job_dirs(&self, now: SystemTime, ttl: Duration, report: &mut SweepReport) {
        let root = self.layout.output_dir();
        let mut entries = match tokio::fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cleanup error reading {:?}: {}", root, e);
                report.failures += 1;
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Cleanup error reading {:?}: {}", root, e);
                    report.failures += 1;
                    break;
                }
            };
            let job_dir = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => {}
                _ => continue,
            }

            match contains_expired_file(&job_dir, now, ttl).await {
                Ok(false) => {}
                Ok(true) => match tokio::fs::remove_dir_all(&job_dir).await {
                    Ok(()) => {
                        info!("Cleaned up job directory: {:?}", job_dir);
                        report.job_dirs_removed += 1;
                    }
                    Err(e) => {
                        warn!("Failed to remove job directory {:?}: {}", job_dir, e);
                        report.failures += 1;
                    }
                },
                Err(e) => {
                    warn!("Cleanup error reading {:?}: {}", job_dir, e);
                    report.failures += 1;
                }
            }
        }
    }
}

fn is_expired(metadata: &std::fs::Metadata, now: SystemTime, ttl: Duration) -> bool {
    metadata
        .modified()
        .ok()
        .and_then(|modified| now.duration_since(modified).ok())
        .is_some_and(|age| age > ttl)
}

/// Whether any non-directory entry directly inside `dir` is older than `ttl`.
async fn contains_expired_file(dir: &Path, now: SystemTime, ttl: Duration) -> std::io::Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_dir() && is_expired(&metadata, now, ttl) {
            debug!("Expired file {:?} marks {:?} for removal", entry.path(), dir);
            return Ok(true);
        }
    }
    Ok(false)
}
