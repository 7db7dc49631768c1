// File: src/store.rs
//! The job being worked on plus the saved job history.
//!
//! Every mutation of the current job is mirrored into the history: an
//! existing entry is replaced in place, a new one is put at the front and
//! the history is cut down to `history_limit` entries.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::context::AppContext;
use crate::error::ParseError;
use crate::model::{FormKind, FormStatus, Job, parse_job_text};
use crate::storage::{JobSnapshot, LocalStorage};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct JobStore {
    current: Option<Job>,
    jobs: Vec<Job>,
    history_limit: usize,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl JobStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            current: None,
            jobs: Vec::new(),
            history_limit,
        }
    }

    pub fn from_snapshot(snapshot: JobSnapshot, history_limit: usize) -> Self {
        let mut store = Self {
            current: snapshot.current,
            jobs: snapshot.jobs,
            history_limit,
        };
        store.jobs.truncate(history_limit);
        store
    }

    pub fn to_snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            current: self.current.clone(),
            jobs: self.jobs.clone(),
        }
    }

    pub fn load(ctx: &dyn AppContext, history_limit: usize) -> Result<Self> {
        let snapshot = LocalStorage::load_jobs(ctx)?;
        Ok(Self::from_snapshot(snapshot, history_limit))
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        LocalStorage::save_jobs(ctx, &self.to_snapshot())
    }

    /// Loads, mutates and saves the store under a single file lock.
    /// Nothing is written when `f` fails.
    pub fn modify<F, T>(ctx: &dyn AppContext, history_limit: usize, f: F) -> Result<T>
    where
        F: FnOnce(&mut JobStore) -> Result<T>,
    {
        LocalStorage::modify_jobs(ctx, |snapshot| {
            let mut store = Self::from_snapshot(std::mem::take(snapshot), history_limit);
            let result = f(&mut store)?;
            *snapshot = store.to_snapshot();
            Ok(result)
        })
    }

    // --- Accessors ---

    pub fn current(&self) -> Option<&Job> {
        self.current.as_ref()
    }

    /// Saved jobs, newest first.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn get_job_by_id(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    // --- Mutations ---

    /// Parses pasted ticket text into a new current job. The job only lands
    /// in the history once it is saved or one of its forms is touched.
    pub fn create_job_from_text(&mut self, text: &str) -> Result<&Job, ParseError> {
        let parsed = parse_job_text(text)?;
        let job = Job::from_parsed(parsed);
        log::info!(
            "Created {} job {} for '{}'",
            job.job_type(),
            job.id,
            job.customer_name()
        );
        Ok(&*self.current.insert(job))
    }

    pub fn set_current(&mut self, job: Option<Job>) {
        self.current = job;
    }

    /// Makes a job from the history the current one.
    pub fn open_job(&mut self, id: &str) -> bool {
        match self.get_job_by_id(id).cloned() {
            Some(job) => {
                self.current = Some(job);
                true
            }
            None => false,
        }
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Writes the current job into the history. Returns false without a current job.
    pub fn save_current(&mut self) -> bool {
        let Some(job) = self.current.clone() else {
            return false;
        };
        self.upsert(job);
        true
    }

    pub fn update_form_progress(&mut self, form: FormKind, status: FormStatus) -> bool {
        let Some(job) = self.current.as_mut() else {
            return false;
        };
        job.form_progress.set(form, status);
        log::debug!("Job {}: {} -> {}", job.id, form, status);
        let job = job.clone();
        self.upsert(job);
        true
    }

    pub fn update_form_data(&mut self, form: FormKind, data: serde_json::Value) -> bool {
        let Some(job) = self.current.as_mut() else {
            return false;
        };
        job.forms.insert(form, data);
        let job = job.clone();
        self.upsert(job);
        true
    }

    /// Removes a job from the history, and from `current` if it is that job.
    pub fn delete_job(&mut self, id: &str) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != id);
        if self.current.as_ref().is_some_and(|j| j.id == id) {
            self.current = None;
        }
        before != self.jobs.len()
    }

    /// Adds jobs from another snapshot that are not already known.
    /// Returns how many were added.
    pub fn merge(&mut self, snapshot: JobSnapshot) -> usize {
        let mut added = 0;
        let incoming = snapshot.current.into_iter().chain(snapshot.jobs);
        for job in incoming {
            if self.get_job_by_id(&job.id).is_some() {
                continue;
            }
            self.jobs.push(job);
            added += 1;
        }
        self.jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.jobs.truncate(self.history_limit);
        added
    }

    fn upsert(&mut self, job: Job) {
        if let Some(existing) = self.jobs.iter_mut().find(|j| j.id == job.id) {
            *existing = job;
        } else {
            self.jobs.insert(0, job);
            self.jobs.truncate(self.history_limit);
        }
    }
}
