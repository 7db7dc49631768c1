// File: ./src/model/forms.rs
//! Which paper forms each job type needs, and their localized titles.
//!
//! Titles come from `locales/*.json` through `rust_i18n::t!()`; the locale
//! is passed explicitly so callers never depend on a process-wide setting.

use crate::config::Language;
use crate::model::job::{FormKind, FormProgress, FormStatus, JobType};
use strum::IntoEnumIterator;

const INSTALLATION_FORMS: &[FormKind] = &[
    FormKind::StartNotes,
    FormKind::KitchenArticles,
    FormKind::ChangeNotes,
    FormKind::CompletionReport,
    FormKind::WallAnchoring,
];
const WORK_ORDER_FORMS: &[FormKind] = &[FormKind::ChangeNotes, FormKind::CompletionReport];
const PREFIT_FORMS: &[FormKind] = &[FormKind::SiteCondition];

/// Forms the installer has to fill for a job of this type.
pub fn required_forms(job_type: JobType) -> &'static [FormKind] {
    match job_type {
        JobType::Installation => INSTALLATION_FORMS,
        JobType::Wo => WORK_ORDER_FORMS,
        JobType::Prefit => PREFIT_FORMS,
    }
}

pub fn is_required(job_type: JobType, kind: FormKind) -> bool {
    required_forms(job_type).contains(&kind)
}

/// Required forms start as not started. The rest are marked completed so
/// progress indicators skip them.
pub fn initial_progress(job_type: JobType) -> FormProgress {
    let mut progress = FormProgress::default();
    for kind in FormKind::iter() {
        let status = if is_required(job_type, kind) {
            FormStatus::NotStarted
        } else {
            FormStatus::Completed
        };
        progress.set(kind, status);
    }
    progress
}

pub fn display_name(kind: FormKind, lang: Language) -> String {
    let locale = lang.code();
    match kind {
        FormKind::StartNotes => rust_i18n::t!("form_start_notes", locale = locale),
        FormKind::ChangeNotes => rust_i18n::t!("form_change_notes", locale = locale),
        FormKind::KitchenArticles => rust_i18n::t!("form_kitchen_articles", locale = locale),
        FormKind::CompletionReport => rust_i18n::t!("form_completion_report", locale = locale),
        FormKind::WallAnchoring => rust_i18n::t!("form_wall_anchoring", locale = locale),
        FormKind::SiteCondition => rust_i18n::t!("form_site_condition", locale = locale),
    }
    .to_string()
}

pub fn job_type_name(job_type: JobType, lang: Language) -> String {
    let locale = lang.code();
    match job_type {
        JobType::Installation => rust_i18n::t!("job_type_installation", locale = locale),
        JobType::Wo => rust_i18n::t!("job_type_wo", locale = locale),
        JobType::Prefit => rust_i18n::t!("job_type_prefit", locale = locale),
    }
    .to_string()
}

pub fn status_name(status: FormStatus, lang: Language) -> String {
    let locale = lang.code();
    match status {
        FormStatus::NotStarted => rust_i18n::t!("status_not_started", locale = locale),
        FormStatus::InProgress => rust_i18n::t!("status_in_progress", locale = locale),
        FormStatus::Completed => rust_i18n::t!("status_completed", locale = locale),
    }
    .to_string()
}
