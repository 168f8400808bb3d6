//! Sweep report formatting

use crate::services::SweepReport;

/// One line per sweep run
pub fn format_sweep_report(name: &str, report: &SweepReport) -> String {
    if report.disabled {
        return format!("{}: disabled in settings\n", name);
    }

    let date = report
        .target_date
        .map(|d| d.to_string())
        .unwrap_or_default();

    let mut line = format!(
        "{} ({}): {} due, {} notified",
        name, date, report.considered, report.notified
    );
    if report.promoted > 0 {
        line.push_str(&format!(", {} realized", report.promoted));
    }
    if report.failed > 0 {
        line.push_str(&format!(", {} failed (will retry)", report.failed));
    }
    line.push('\n');
    line
}
