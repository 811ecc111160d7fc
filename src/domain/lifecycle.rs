//! Incident lifecycle rules.
//!
//! Each function applies one admin or citizen action to a record in place.
//! Callers run them inside a single repository mutation so the change is
//! committed atomically or not at all.

use chrono::{DateTime, Utc};

use crate::models::{Incident, IncidentStatus, Severity};
use crate::{CivicAlertError, CivicResult};

/// Confirmations at which an unverified incident becomes verified.
pub const AUTO_VERIFY_THRESHOLD: u32 = 3;

/// Add one citizen confirmation, rescore, and auto-verify at the threshold.
pub fn confirm(incident: &mut Incident, now: DateTime<Utc>) {
    incident.confirmations = incident.confirmations.saturating_add(1);
    incident.refresh_score();

    if incident.confirmations >= AUTO_VERIFY_THRESHOLD
        && incident.status == IncidentStatus::Unverified
    {
        incident.status = IncidentStatus::Verified;
    }

    incident.touch(now);
}

/// Explicit status change. Any status may move to any other.
pub fn set_status(
    incident: &mut Incident,
    status: IncidentStatus,
    now: DateTime<Utc>,
) -> CivicResult<()> {
    ensure_not_false_report(incident)?;
    incident.status = status;
    incident.touch(now);
    Ok(())
}

pub fn set_severity(
    incident: &mut Incident,
    severity: Severity,
    now: DateTime<Utc>,
) -> CivicResult<()> {
    ensure_not_false_report(incident)?;
    incident.severity = severity;
    incident.refresh_score();
    incident.touch(now);
    Ok(())
}

/// Append a timestamped note, creating the note list on first use.
pub fn add_note(incident: &mut Incident, text: &str, now: DateTime<Utc>) {
    let entry = format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S UTC"), text);
    incident.notes.get_or_insert_with(Vec::new).push(entry);
    incident.touch(now);
}

/// Flag as a false report and force resolution. Returns `false` when the
/// record was already flagged and nothing changed.
pub fn mark_false_report(incident: &mut Incident, now: DateTime<Utc>) -> bool {
    if incident.is_false_report {
        return false;
    }

    incident.is_false_report = true;
    incident.status = IncidentStatus::Resolved;
    incident.touch(now);
    true
}

fn ensure_not_false_report(incident: &Incident) -> CivicResult<()> {
    if incident.is_false_report {
        return Err(CivicAlertError::IncidentLocked(incident.id.clone()));
    }
    Ok(())
}
