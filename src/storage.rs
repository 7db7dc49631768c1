// Manages local file storage for the job history.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to Job or its nested types (ParsedJob, FormProgress, ...) require
// incrementing JOB_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::Job;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: current job + history list
const JOB_STORAGE_VERSION: u32 = 1;

/// The job currently being worked on plus the saved history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(default)]
    pub current: Option<Job>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Wrapper struct for versioned local storage
#[derive(Serialize, Deserialize)]
struct JobStorageData {
    #[serde(default)]
    version: u32,
    #[serde(flatten)]
    snapshot: JobSnapshot,
}

/// Layout written by the browser app's persisted job store:
/// `{"state": {"currentJob": ..., "jobs": [...]}, "version": 0}`.
#[derive(Deserialize)]
struct WebExport {
    state: WebExportState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebExportState {
    #[serde(default)]
    current_job: Option<Job>,
    #[serde(default)]
    jobs: Vec<Job>,
}

pub struct LocalStorage;

impl LocalStorage {
    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on `<file>.lock`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Loads the job snapshot. A missing file is an empty history; a file
    /// that cannot be read is an error so it never gets overwritten blindly.
    pub fn load_jobs(ctx: &dyn AppContext) -> Result<JobSnapshot> {
        let path = ctx.get_jobs_path()?;
        Self::load_from_path(&path)
    }

    pub fn save_jobs(ctx: &dyn AppContext, snapshot: &JobSnapshot) -> Result<()> {
        let path = ctx.get_jobs_path()?;
        Self::save_to_path(&path, snapshot)
    }

    /// Locks the job file once for a whole read-modify-write cycle.
    pub fn modify_jobs<F, T>(ctx: &dyn AppContext, f: F) -> Result<T>
    where
        F: FnOnce(&mut JobSnapshot) -> Result<T>,
    {
        let path = ctx.get_jobs_path()?;
        Self::with_lock(&path, || {
            let mut snapshot = Self::read_internal(&path)?;
            let result = f(&mut snapshot)?;
            Self::write_internal(&path, &snapshot)?;
            Ok(result)
        })
    }

    fn load_from_path(path: &Path) -> Result<JobSnapshot> {
        if !path.exists() {
            return Ok(JobSnapshot::default());
        }
        Self::with_lock(path, || Self::read_internal(path))
    }

    fn save_to_path(path: &Path, snapshot: &JobSnapshot) -> Result<()> {
        Self::with_lock(path, || Self::write_internal(path, snapshot))
    }

    fn read_internal(path: &Path) -> Result<JobSnapshot> {
        if !path.exists() {
            return Ok(JobSnapshot::default());
        }
        let json =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let data: JobStorageData = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse job storage {:?}", path))?;

        if data.version > JOB_STORAGE_VERSION {
            anyhow::bail!(
                "Job storage version {} is newer than supported version {}. Please upgrade jobsheet.",
                data.version,
                JOB_STORAGE_VERSION
            );
        }
        if data.version < JOB_STORAGE_VERSION {
            log::info!(
                "Upgrading job storage from v{} to v{}",
                data.version,
                JOB_STORAGE_VERSION
            );
        }

        log::debug!(
            "Loaded {} jobs from {:?} (current: {})",
            data.snapshot.jobs.len(),
            path,
            data.snapshot.current.is_some()
        );
        Ok(data.snapshot)
    }

    fn write_internal(path: &Path, snapshot: &JobSnapshot) -> Result<()> {
        let data = JobStorageData {
            version: JOB_STORAGE_VERSION,
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_string_pretty(&data)?;
        Self::atomic_write(path, json)
    }

    /// Reads the JSON persisted by the browser version of the app.
    pub fn parse_web_export(json: &str) -> Result<JobSnapshot> {
        let export: WebExport =
            serde_json::from_str(json).context("Not a browser job-store export")?;
        Ok(JobSnapshot {
            current: export.state.current_job,
            jobs: export.state.jobs,
        })
    }
}
