//! Grant display formatting
//!
//! Formats grants, vesting schedules and summaries for terminal output.

use crate::models::{Grant, Units, VestingEvent};
use crate::services::VestingSummary;

/// Format a list of grants as a table
pub fn format_grant_list(grants: &[Grant]) -> String {
    if grants.is_empty() {
        return "No grants found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<38}  {:<10}  {:>14}  {:>6}  {:>8}  {:<10}  {}\n",
        "ID", "Granted", "Units", "Cliff", "Duration", "Frequency", "Status"
    ));
    output.push_str(&format!(
        "{:-<38}  {:-<10}  {:->14}  {:->6}  {:->8}  {:-<10}  {:-<9}\n",
        "", "", "", "", "", "", ""
    ));

    for grant in grants {
        output.push_str(&format!(
            "{:<38}  {:<10}  {:>14}  {:>6}  {:>8}  {:<10}  {}\n",
            grant.id.as_uuid().to_string(),
            grant.terms.grant_date.to_string(),
            grant.terms.total_units.to_string(),
            format!("{}m", grant.terms.cliff_months),
            format!("{}m", grant.terms.duration_months),
            grant.terms.frequency.to_string(),
            grant.status,
        ));
    }

    output
}

/// Format the header block of one grant
pub fn format_grant_details(grant: &Grant) -> String {
    let mut output = String::new();
    output.push_str(&format!("Grant: {}\n", grant.id.as_uuid()));
    output.push_str(&format!("  Shareholder:   {}\n", grant.shareholder_id.as_uuid()));
    output.push_str(&format!("  Share class:   {}\n", grant.share_class_id.as_uuid()));
    output.push_str(&format!("  Grant date:    {}\n", grant.terms.grant_date));
    output.push_str(&format!("  Vesting start: {}\n", grant.terms.vesting_start_date));
    output.push_str(&format!("  Terms:         {}\n", grant));
    output.push_str(&format!("  Status:        {}\n", grant.status));

    if let (Some(date), Some(reason)) = (grant.cancellation_date, &grant.cancellation_reason) {
        output.push_str(&format!("  Cancelled:     {} ({})\n", date, reason));
    }
    if let Some(path) = &grant.grant_document_path {
        output.push_str(&format!("  Document:      {}\n", path));
    }
    if !grant.notes.is_empty() {
        output.push_str(&format!("  Notes:         {}\n", grant.notes));
    }

    output
}

/// Format a vesting schedule with a running cumulative column
pub fn format_schedule(events: &[VestingEvent]) -> String {
    if events.is_empty() {
        return "No vesting events.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<10}  {:>14}  {:>14}  {:<9}  {}\n",
        "#", "Date", "Units", "Cumulative", "State", "Notified"
    ));
    output.push_str(&format!(
        "{:->3}  {:-<10}  {:->14}  {:->14}  {:-<9}  {:-<8}\n",
        "", "", "", "", "", ""
    ));

    let mut cumulative = Units::zero();
    for (i, event) in events.iter().enumerate() {
        cumulative += event.units;
        let state = if event.is_projected { "projected" } else { "vested" };
        let notified = match (event.notification_sent, event.pre_vest_notification_sent) {
            (true, _) => "vested",
            (false, true) => "reminder",
            (false, false) => "",
        };

        output.push_str(&format!(
            "{:>3}  {:<10}  {:>14}  {:>14}  {:<9}  {}\n",
            i + 1,
            event.vesting_date.to_string(),
            event.units.to_string(),
            cumulative.to_string(),
            state,
            notified,
        ));
    }

    output
}

/// Format a shareholder's vesting totals
pub fn format_summary(summary: &VestingSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Shareholder: {}\n",
        summary.shareholder_id.as_uuid()
    ));
    output.push_str(&format!("  Active grants: {}\n", summary.active_grants));
    output.push_str(&format!("  Granted:       {}\n", summary.total_granted));
    output.push_str(&format!("  Vested:        {}\n", summary.total_vested));
    output.push_str(&format!("  Unvested:      {}\n", summary.total_unvested));

    match &summary.next_vesting {
        Some((date, units)) => {
            output.push_str(&format!("  Next vesting:  {} units on {}\n", units, date))
        }
        None => output.push_str("  Next vesting:  none scheduled\n"),
    }

    output
}
