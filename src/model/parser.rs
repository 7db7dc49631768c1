// File: ./src/model/parser.rs
//! Turns text copied out of a calendar invite into a [`ParsedJob`].
//!
//! The first non-blank line is the identity line, e.g.
//! `Confirmed/wo/IKEA CT Wayne Zhan 12032430501`. The remaining lines carry
//! the street address, a `date⋅time` line and free-form notes in no fixed
//! order. Each of those is located by its own predicate over the full line
//! list; the first matching line wins.

use crate::error::ParseError;
use crate::model::job::{Customer, JobStatus, JobType, ParsedJob};
use regex::Regex;
use std::sync::LazyLock;

const ANCHOR: &str = "ikea";
const MIN_NOTE_CHARS: usize = 3;

static PATTERNS: LazyLock<TicketPatterns> = LazyLock::new(TicketPatterns::new);

struct TicketPatterns {
    // Identity line
    trailing_phone: Regex,
    wo_marker: Regex,
    prefit_word: Regex,
    wo_word: Regex,
    region_prefix: Regex,
    slashes: Regex,
    whitespace_run: Regex,

    // Address line
    zip_code: Regex,
    state_code: Regex,
    country_suffix: Regex,

    // Date/time line
    clock_time: Regex,
    range_dash: Regex,
    date_time_separator: Regex,
}

impl TicketPatterns {
    fn new() -> Self {
        // Patterns are constants; a failure here is a programming error.
        Self {
            trailing_phone: Regex::new(r"[0-9]{10,11}$").expect("static regex must compile"),
            wo_marker: Regex::new(r"(?i)/wo/|\bwo\b").expect("static regex must compile"),
            prefit_word: Regex::new(r"(?i)\bprefit\b").expect("static regex must compile"),
            wo_word: Regex::new(r"(?i)\bwo\b").expect("static regex must compile"),
            region_prefix: Regex::new(r"^([A-Z]{2})\s+").expect("static regex must compile"),
            slashes: Regex::new(r"[/\\]").expect("static regex must compile"),
            whitespace_run: Regex::new(r"\s+").expect("static regex must compile"),

            // 06032 or 06032-1234
            zip_code: Regex::new(r"\b[0-9]{5}(?:-[0-9]{4})?\b").expect("static regex must compile"),
            state_code: Regex::new(r"\b[A-Z]{2}\b").expect("static regex must compile"),
            country_suffix: Regex::new(r"(?i)\s*(?:United States|USA|Unit)$")
                .expect("static regex must compile"),

            clock_time: Regex::new(r"[0-9]{1,2}:[0-9]{2}").expect("static regex must compile"),
            range_dash: Regex::new(r"[–-][0-9]").expect("static regex must compile"),
            // ⋅ (U+22C5), • (U+2022), · (U+00B7)
            date_time_separator: Regex::new(r"[\x{22C5}\x{2022}\x{00B7}]")
                .expect("static regex must compile"),
        }
    }
}

/// Name, phone and region decoded from the identity line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityLine {
    pub name: String,
    pub phone: String,
    pub region: String,
}

/// Parses a pasted job ticket.
///
/// Fails only when the text is blank, the identity line has no `ikea`
/// marker, or nothing usable is left as a customer name. Every other field
/// falls back to an empty string.
pub fn parse_job_text(text: &str) -> Result<ParsedJob, ParseError> {
    let lines = normalize_lines(text);
    let Some(first_line) = lines.first().copied() else {
        log::warn!("Job text has no non-blank lines");
        return Err(ParseError::Empty);
    };

    let job_type = detect_job_type(first_line);
    let identity = parse_identity_line(first_line).inspect_err(|e| {
        log::warn!("Rejected identity line '{}': {}", first_line, e);
    })?;

    let address = find_address_line(&lines);
    let (date, time) = find_date_time(&lines);
    let notes = extract_notes(&lines, &address);
    let status = detect_status(first_line);

    log::debug!(
        "Parsed job: type={} status={} region='{}' name='{}' phone='{}'",
        job_type,
        status,
        identity.region,
        identity.name,
        identity.phone
    );
    log::debug!(
        "Parsed job: address='{}' date='{}' time='{}' note_lines={}",
        address,
        date,
        time,
        notes.lines().count()
    );

    Ok(ParsedJob {
        status,
        job_type,
        region: identity.region,
        customer: Customer {
            name: identity.name,
            phone: identity.phone,
        },
        address,
        date,
        time,
        notes,
    })
}

/// Splits on newlines, trims every line and drops blank ones.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn detect_status(identity_line: &str) -> JobStatus {
    if identity_line.to_lowercase().contains("confirmed") {
        JobStatus::Confirmed
    } else {
        JobStatus::Pending
    }
}

/// `prefit` beats `wo`; anything else is an installation.
pub fn detect_job_type(identity_line: &str) -> JobType {
    if identity_line.to_lowercase().contains("prefit") {
        return JobType::Prefit;
    }
    if PATTERNS.wo_marker.is_match(identity_line) {
        return JobType::Wo;
    }
    JobType::Installation
}

pub fn parse_identity_line(line: &str) -> Result<IdentityLine, ParseError> {
    let p = &*PATTERNS;
    let line = line.trim();

    let phone = p
        .trailing_phone
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let without_phone = p.trailing_phone.replace(line, "");
    let without_phone = without_phone.trim();

    // ASCII lowercasing keeps byte offsets aligned with the original.
    let anchor_at = without_phone
        .to_ascii_lowercase()
        .find(ANCHOR)
        .ok_or(ParseError::NoAnchor)?;
    let after_anchor = without_phone[anchor_at + ANCHOR.len()..].trim();

    let rest = p.prefit_word.replace_all(after_anchor, "");
    let rest = p.wo_word.replace_all(rest.trim(), "");
    let mut rest = rest.trim();

    let mut region = String::new();
    if let Some(caps) = p.region_prefix.captures(rest) {
        region = caps[1].to_string();
        rest = rest[caps[0].len()..].trim();
    }

    let cleaned = p.slashes.replace_all(rest, " ");
    let cleaned = p.whitespace_run.replace_all(&cleaned, " ");
    let name = format_name(cleaned.trim());
    if name.is_empty() {
        return Err(ParseError::NoName);
    }

    Ok(IdentityLine {
        name,
        phone,
        region,
    })
}

/// Upper-cases the first character of each space separated word and
/// lower-cases the rest. `Pierre-Louis` becomes `Pierre-louis`.
pub fn format_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A ZIP code (`06032` or `06032-1234`) plus a standalone two-letter state code.
pub fn is_address_line(line: &str) -> bool {
    PATTERNS.zip_code.is_match(line) && PATTERNS.state_code.is_match(line)
}

/// First address-looking line with a trailing `United States`, `USA` or
/// `Unit` removed, or an empty string.
pub fn find_address_line(lines: &[&str]) -> String {
    lines
        .iter()
        .find(|line| is_address_line(line))
        .map(|line| {
            PATTERNS
                .country_suffix
                .replace(line, "")
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

/// An `H:MM` clock time, or a dash directly followed by a digit.
pub fn is_date_time_line(line: &str) -> bool {
    PATTERNS.clock_time.is_match(line) || PATTERNS.range_dash.is_match(line)
}

/// Splits `Friday, December 12⋅11:00AM–3:00PM` into its date and time halves.
/// Without a separator the whole line is the date.
pub fn split_date_time(line: &str) -> (String, String) {
    let mut parts = PATTERNS.date_time_separator.split(line);
    let date = parts.next().unwrap_or_default().trim().to_string();
    let time = parts.next().unwrap_or_default().trim().to_string();
    (date, time)
}

pub fn find_date_time(lines: &[&str]) -> (String, String) {
    lines
        .iter()
        .find(|line| is_date_time_line(line))
        .map(|line| split_date_time(line))
        .unwrap_or_default()
}

/// Everything after the identity line that is not the date/time line, not
/// the address line and at least a few characters long.
pub fn extract_notes(lines: &[&str], address: &str) -> String {
    lines
        .iter()
        .skip(1)
        .filter(|line| !is_date_time_line(line))
        .filter(|line| !is_address_source(line, address))
        .filter(|line| line.chars().count() >= MIN_NOTE_CHARS)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_address_source(line: &str, address: &str) -> bool {
    line == address || (!address.is_empty() && line.contains(address))
}
