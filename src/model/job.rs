// File: ./src/model/job.rs
use crate::model::forms;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[default]
    Installation,
    Wo,
    Prefit,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Installation => "installation",
            JobType::Wo => "wo",
            JobType::Prefit => "prefit",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown job type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Confirmed,
    #[default]
    Pending,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Confirmed => write!(f, "confirmed"),
            JobStatus::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
}

/// Structured fields pulled out of a pasted calendar invite.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedJob {
    pub status: JobStatus,
    pub job_type: JobType,
    pub region: String,
    pub customer: Customer,
    pub address: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

// --- FORMS ---

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum FormKind {
    StartNotes,
    ChangeNotes,
    KitchenArticles,
    CompletionReport,
    WallAnchoring,
    SiteCondition,
}

impl FormKind {
    /// The key used for this form in persisted jobs and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            FormKind::StartNotes => "startNotes",
            FormKind::ChangeNotes => "changeNotes",
            FormKind::KitchenArticles => "kitchenArticles",
            FormKind::CompletionReport => "completionReport",
            FormKind::WallAnchoring => "wallAnchoring",
            FormKind::SiteCondition => "siteCondition",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FormKind::iter()
            .find(|k| k.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("Unknown form '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormStatus::NotStarted => write!(f, "not_started"),
            FormStatus::InProgress => write!(f, "in_progress"),
            FormStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for FormStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "not_started" => Ok(FormStatus::NotStarted),
            "in_progress" => Ok(FormStatus::InProgress),
            "completed" | "done" => Ok(FormStatus::Completed),
            _ => Err(anyhow::anyhow!("Unknown form status '{}'", s)),
        }
    }
}

/// Per-form status. Every form has an entry, required or not.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormProgress {
    pub start_notes: FormStatus,
    pub change_notes: FormStatus,
    pub kitchen_articles: FormStatus,
    pub completion_report: FormStatus,
    pub wall_anchoring: FormStatus,
    pub site_condition: FormStatus,
}

impl FormProgress {
    pub fn get(&self, kind: FormKind) -> FormStatus {
        match kind {
            FormKind::StartNotes => self.start_notes,
            FormKind::ChangeNotes => self.change_notes,
            FormKind::KitchenArticles => self.kitchen_articles,
            FormKind::CompletionReport => self.completion_report,
            FormKind::WallAnchoring => self.wall_anchoring,
            FormKind::SiteCondition => self.site_condition,
        }
    }

    pub fn set(&mut self, kind: FormKind, status: FormStatus) {
        let slot = match kind {
            FormKind::StartNotes => &mut self.start_notes,
            FormKind::ChangeNotes => &mut self.change_notes,
            FormKind::KitchenArticles => &mut self.kitchen_articles,
            FormKind::CompletionReport => &mut self.completion_report,
            FormKind::WallAnchoring => &mut self.wall_anchoring,
            FormKind::SiteCondition => &mut self.site_condition,
        };
        *slot = status;
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormKind, FormStatus)> + '_ {
        FormKind::iter().map(move |k| (k, self.get(k)))
    }
}

// --- JOB RECORD ---

/// A parsed job plus the bookkeeping the installer works against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub parsed: ParsedJob,
    pub form_progress: FormProgress,
    #[serde(default)]
    pub forms: BTreeMap<FormKind, serde_json::Value>,
}

impl Job {
    /// Wraps a freshly parsed job: new id, creation time, progress derived
    /// from the job type and no form data yet.
    pub fn from_parsed(parsed: ParsedJob) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            form_progress: forms::initial_progress(parsed.job_type),
            parsed,
            forms: BTreeMap::new(),
        }
    }

    pub fn job_type(&self) -> JobType {
        self.parsed.job_type
    }

    pub fn customer_name(&self) -> &str {
        &self.parsed.customer.name
    }

    /// Forms that still need work, in canonical order.
    pub fn pending_forms(&self) -> Vec<FormKind> {
        self.form_progress
            .iter()
            .filter(|(_, status)| *status != FormStatus::Completed)
            .map(|(kind, _)| kind)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.pending_forms().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(job_type: JobType) -> ParsedJob {
        ParsedJob {
            status: JobStatus::Confirmed,
            job_type,
            region: "CT".to_string(),
            customer: Customer {
                name: "Wayne Zhan".to_string(),
                phone: "12032430501".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_from_parsed_wraps_fields() {
        let job = Job::from_parsed(parsed(JobType::Wo));
        assert!(Uuid::parse_str(&job.id).is_ok());
        assert!(job.forms.is_empty());
        assert_eq!(job.customer_name(), "Wayne Zhan");
        assert_eq!(
            job.pending_forms(),
            vec![FormKind::ChangeNotes, FormKind::CompletionReport]
        );
        assert!(!job.is_complete());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Job::from_parsed(parsed(JobType::Prefit));
        let b = Job::from_parsed(parsed(JobType::Prefit));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_job_serializes_with_flat_camel_case_keys() {
        let mut job = Job::from_parsed(parsed(JobType::Prefit));
        job.forms.insert(
            FormKind::SiteCondition,
            serde_json::json!({ "contact": "Renee" }),
        );
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["jobType"], "prefit");
        assert_eq!(value["status"], "confirmed");
        assert_eq!(value["customer"]["phone"], "12032430501");
        assert_eq!(value["formProgress"]["siteCondition"], "not_started");
        assert_eq!(value["formProgress"]["startNotes"], "completed");
        assert_eq!(value["forms"]["siteCondition"]["contact"], "Renee");
        assert!(value["createdAt"].as_str().unwrap().contains('T'));

        let back: Job = serde_json::from_value(value).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn test_form_kind_and_status_from_str() {
        assert_eq!(
            "completionReport".parse::<FormKind>().unwrap(),
            FormKind::CompletionReport
        );
        assert_eq!(
            "WALLANCHORING".parse::<FormKind>().unwrap(),
            FormKind::WallAnchoring
        );
        assert!("kitchen".parse::<FormKind>().is_err());

        assert_eq!(
            "in-progress".parse::<FormStatus>().unwrap(),
            FormStatus::InProgress
        );
        assert_eq!("done".parse::<FormStatus>().unwrap(), FormStatus::Completed);
        assert!("half".parse::<FormStatus>().is_err());

        assert_eq!("WO".parse::<JobType>().unwrap(), JobType::Wo);
        assert!("repair".parse::<JobType>().is_err());
    }

    #[test]
    fn test_progress_set_and_get() {
        let mut progress = FormProgress::default();
        progress.set(FormKind::KitchenArticles, FormStatus::InProgress);
        assert_eq!(
            progress.get(FormKind::KitchenArticles),
            FormStatus::InProgress
        );
        assert_eq!(progress.iter().count(), 6);
    }
}
