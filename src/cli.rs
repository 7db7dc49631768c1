// File: ./src/cli.rs
//! Command-line interface: argument definitions and command handlers.
//!
//! Handlers write to a caller-supplied writer and read pasted text from a
//! caller-supplied reader so they can be driven from tests.

use crate::config::{Config, InstallerProfile, Language};
use crate::context::AppContext;
use crate::model::forms;
use crate::model::{FormKind, FormStatus, Job, JobType, parse_job_text};
use crate::storage::LocalStorage;
use crate::store::JobStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "jobsheet",
    version,
    about = "Turn pasted calendar job tickets into tracked installer jobs",
    after_help = "Job text is read from FILE, or from stdin when FILE is omitted or '-'. \
                  The first line must contain the IKEA marker, e.g. \
                  'Confirmed/wo/IKEA CT Wayne Zhan 12032430501'."
)]
pub struct Cli {
    /// Use a different directory for config and data.
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse job text and print the extracted fields as JSON
    Parse {
        /// Text file with the pasted ticket
        file: Option<PathBuf>,
    },

    /// Parse job text and save it as a new job
    Add {
        /// Text file with the pasted ticket
        file: Option<PathBuf>,
    },

    /// List saved jobs, newest first
    List,

    /// Print a saved job as JSON
    Show {
        /// Job id or a unique prefix of it
        id: String,
    },

    /// Set the status of one form of a job
    Progress {
        /// Job id or a unique prefix of it
        id: String,
        /// Form key, e.g. changeNotes
        form: FormKind,
        /// not_started, in_progress or completed
        status: FormStatus,
    },

    /// Attach form data (a JSON object) to a job
    FormData {
        /// Job id or a unique prefix of it
        id: String,
        /// Form key, e.g. siteCondition
        form: FormKind,
        /// JSON file with the form contents
        file: Option<PathBuf>,
    },

    /// Delete a saved job
    Delete {
        /// Job id or a unique prefix of it
        id: String,
    },

    /// List the forms a job type requires
    Forms {
        /// installation, wo or prefit
        job_type: JobType,
    },

    /// Show or update the installer profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },

    /// Set the display language (en or ru)
    Language { language: Language },

    /// Import jobs from a browser job-store export (JSON)
    Import { file: PathBuf },
}

/// Runs one command against the given context.
pub fn run(
    command: Command,
    ctx: &dyn AppContext,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let config = Config::load_or_default(ctx)?;
    match command {
        Command::Parse { file } => cmd_parse(&config, file.as_deref(), input, out),
        Command::Add { file } => cmd_add(ctx, &config, file.as_deref(), input, out),
        Command::List => cmd_list(ctx, &config, out),
        Command::Show { id } => cmd_show(ctx, &config, &id, out),
        Command::Progress { id, form, status } => {
            cmd_progress(ctx, &config, &id, form, status, out)
        }
        Command::FormData { id, form, file } => {
            cmd_form_data(ctx, &config, &id, form, file.as_deref(), input, out)
        }
        Command::Delete { id } => cmd_delete(ctx, &config, &id, out),
        Command::Forms { job_type } => cmd_forms(&config, job_type, out),
        Command::Profile {
            name,
            phone,
            company,
        } => cmd_profile(ctx, config, name, phone, company, out),
        Command::Language { language } => cmd_language(ctx, config, language, out),
        Command::Import { file } => cmd_import(ctx, &config, &file, out),
    }
}

fn read_text(file: Option<&Path>, input: &mut dyn Read) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
        }
        _ => {
            let mut text = String::new();
            input
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn parse_failure(config: &Config, err: crate::error::ParseError) -> anyhow::Error {
    let message = rust_i18n::t!("parse_failed", locale = config.language.code());
    anyhow::anyhow!("{}: {}", message, err)
}

/// Resolves a full id or a unique prefix to a saved job id.
fn resolve_id(store: &JobStore, id: &str) -> Result<String> {
    if let Some(job) = store.get_job_by_id(id) {
        return Ok(job.id.clone());
    }
    let matches: Vec<&Job> = store
        .jobs()
        .iter()
        .filter(|j| j.id.starts_with(id))
        .collect();
    match matches.as_slice() {
        [job] => Ok(job.id.clone()),
        [] => Err(anyhow::anyhow!("No job with id '{}'", id)),
        _ => Err(anyhow::anyhow!(
            "Id '{}' is ambiguous ({} jobs match)",
            id,
            matches.len()
        )),
    }
}

fn open_store(ctx: &dyn AppContext, config: &Config) -> Result<JobStore> {
    JobStore::load(ctx, config.history_limit)
}

fn cmd_parse(
    config: &Config,
    file: Option<&Path>,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let text = read_text(file, input)?;
    let parsed = parse_job_text(&text).map_err(|e| parse_failure(config, e))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&parsed)?)?;
    Ok(())
}

fn cmd_add(
    ctx: &dyn AppContext,
    config: &Config,
    file: Option<&Path>,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let text = read_text(file, input)?;
    let id = JobStore::modify(ctx, config.history_limit, |store| {
        let id = store
            .create_job_from_text(&text)
            .map_err(|e| parse_failure(config, e))?
            .id
            .clone();
        store.save_current();
        Ok(id)
    })?;
    writeln!(out, "{}", id)?;
    Ok(())
}

fn cmd_list(ctx: &dyn AppContext, config: &Config, out: &mut dyn Write) -> Result<()> {
    let store = open_store(ctx, config)?;
    for job in store.jobs() {
        let pending: Vec<String> = job
            .pending_forms()
            .into_iter()
            .map(|k| forms::display_name(k, config.language))
            .collect();
        let short_id: String = job.id.chars().take(8).collect();
        writeln!(
            out,
            "{}  {}  {:<12}  {}  [{}]",
            short_id,
            job.created_at.format("%Y-%m-%d"),
            forms::job_type_name(job.job_type(), config.language),
            job.customer_name(),
            pending.join(", ")
        )?;
    }
    Ok(())
}

fn cmd_show(ctx: &dyn AppContext, config: &Config, id: &str, out: &mut dyn Write) -> Result<()> {
    let store = open_store(ctx, config)?;
    let id = resolve_id(&store, id)?;
    if let Some(job) = store.get_job_by_id(&id) {
        writeln!(out, "{}", serde_json::to_string_pretty(job)?)?;
    }
    Ok(())
}

fn cmd_progress(
    ctx: &dyn AppContext,
    config: &Config,
    id: &str,
    form: FormKind,
    status: FormStatus,
    out: &mut dyn Write,
) -> Result<()> {
    JobStore::modify(ctx, config.history_limit, |store| {
        let id = resolve_id(store, id)?;
        store.open_job(&id);
        store.update_form_progress(form, status);
        Ok(())
    })?;
    writeln!(
        out,
        "{}: {}",
        forms::display_name(form, config.language),
        forms::status_name(status, config.language)
    )?;
    Ok(())
}

fn cmd_form_data(
    ctx: &dyn AppContext,
    config: &Config,
    id: &str,
    form: FormKind,
    file: Option<&Path>,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let raw = read_text(file, input)?;
    let data: serde_json::Value =
        serde_json::from_str(&raw).context("Form data must be valid JSON")?;
    if !data.is_object() {
        anyhow::bail!("Form data must be a JSON object");
    }

    JobStore::modify(ctx, config.history_limit, |store| {
        let id = resolve_id(store, id)?;
        store.open_job(&id);
        store.update_form_data(form, data);
        Ok(())
    })?;
    writeln!(out, "{}", forms::display_name(form, config.language))?;
    Ok(())
}

fn cmd_delete(ctx: &dyn AppContext, config: &Config, id: &str, out: &mut dyn Write) -> Result<()> {
    let id = JobStore::modify(ctx, config.history_limit, |store| {
        let id = resolve_id(store, id)?;
        store.delete_job(&id);
        Ok(id)
    })?;
    writeln!(out, "Deleted {}", id)?;
    Ok(())
}

fn cmd_forms(config: &Config, job_type: JobType, out: &mut dyn Write) -> Result<()> {
    for kind in forms::required_forms(job_type) {
        writeln!(
            out,
            "{:<18} {}",
            kind.key(),
            forms::display_name(*kind, config.language)
        )?;
    }
    Ok(())
}

fn cmd_profile(
    ctx: &dyn AppContext,
    mut config: Config,
    name: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    out: &mut dyn Write,
) -> Result<()> {
    if name.is_some() || phone.is_some() || company.is_some() {
        let profile = config.installer.get_or_insert_with(InstallerProfile::default);
        if let Some(name) = name {
            profile.name = name;
        }
        if let Some(phone) = phone {
            profile.phone = phone;
        }
        if let Some(company) = company {
            profile.company = company;
        }
        config.save(ctx)?;
        log::info!("Saved installer profile to {}", Config::get_path_string(ctx)?);
    }

    match &config.installer {
        Some(profile) => {
            writeln!(out, "name:    {}", profile.name)?;
            writeln!(out, "phone:   {}", profile.phone)?;
            writeln!(out, "company: {}", profile.company)?;
        }
        None => writeln!(out, "No installer profile set")?,
    }
    Ok(())
}

fn cmd_language(
    ctx: &dyn AppContext,
    mut config: Config,
    language: Language,
    out: &mut dyn Write,
) -> Result<()> {
    config.language = language;
    config.save(ctx)?;
    writeln!(out, "{}", language)?;
    Ok(())
}

fn cmd_import(ctx: &dyn AppContext, config: &Config, file: &Path, out: &mut dyn Write) -> Result<()> {
    let json = fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let snapshot = LocalStorage::parse_web_export(&json)?;
    let added = JobStore::modify(ctx, config.history_limit, |store| Ok(store.merge(snapshot)))?;
    writeln!(out, "Imported {} jobs", added)?;
    Ok(())
}
