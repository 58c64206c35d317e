// src/report.rs
// =============================================================================
// Prints the final run report, either as a readable summary or as JSON.
//
// Only Dead / Warning / Error findings appear; Alive links are silent.
// Issues are grouped under the item (channel or video) they were found in.
// =============================================================================

use crate::audit::{Issue, RunReport, SourceType};
use crate::checker::Verdict;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    target: &'a str,
    #[serde(flatten)]
    report: &'a RunReport,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    target: &'a str,
    failure: String,
    #[serde(flatten)]
    report: &'a RunReport,
}

// Prints the report
//
// Parameters:
//   target: what was audited (channel title, "videos", "input")
//   report: the finalized run report
//   json:   whether to print JSON instead of text
pub fn print_report(target: &str, report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&JsonReport { target, report })?);
    } else {
        print!("{}", render_text(target, report));
    }
    Ok(())
}

/// Printed instead of the normal report when the run could not complete
pub fn print_failure(target: &str, error: &anyhow::Error, report: &RunReport, json: bool) -> Result<()> {
    if json {
        let failure = JsonFailure { target, failure: format!("{:#}", error), report };
        println!("{}", serde_json::to_string_pretty(&failure)?);
    } else {
        println!("❌ AUDIT FAILED: {}", target);
        println!("   {:#}", error);
        println!();
        print!("{}", render_text(target, report));
    }
    Ok(())
}

pub fn render_text(target: &str, report: &RunReport) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    out.push_str(&format!("=== AUDIT: {} ===\n", target));
    out.push_str(&format!("- Items scanned: {}\n", stats.items_scanned));
    out.push_str(&format!(
        "- Unique links: {} ({} occurrences)\n",
        report.unique_links, stats.links_seen
    ));
    out.push_str(&format!("- Links OK: {}\n", stats.links_ok));
    out.push_str(&format!("- Link issues: {}\n", stats.links_error));
    out.push_str(&format!("- End screen issues: {}\n", stats.end_card_issues));
    out.push_str(&format!("{}\n\n", "=".repeat(38)));

    if !report.has_issues() {
        out.push_str("✅ No dead links found.\n");
        return out;
    }

    let mut current_item: Option<&str> = None;
    for issue in &report.issues {
        if current_item != Some(issue.item_id.as_str()) {
            if current_item.is_some() {
                out.push_str(&format!("{}\n", "-".repeat(20)));
            }
            out.push_str(&format!("❌ {} ({})\n", issue.title, item_link(issue)));
            current_item = Some(issue.item_id.as_str());
        }
        out.push_str(&format!("   {}\n", format_issue(issue)));
    }

    out
}

// "[Description] 💀 DEAD (404 - not found) - https://example.com/x"
fn format_issue(issue: &Issue) -> String {
    format!(
        "[{}] {} {} ({}) - {}",
        issue.source_type,
        verdict_icon(issue.verdict),
        issue.verdict,
        issue.describe(),
        issue.target
    )
}

fn verdict_icon(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Alive => "✅",
        Verdict::Dead => "💀",
        Verdict::Warning => "⚠️",
        Verdict::Error => "🔌",
    }
}

fn item_link(issue: &Issue) -> String {
    match issue.source_type {
        SourceType::ChannelDescription => format!("https://www.youtube.com/channel/{}", issue.item_id),
        SourceType::Input => "command line input".to_string(),
        _ => format!("https://youtu.be/{}", issue.item_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::StatsSnapshot;

    fn issue(item_id: &str, target: &str, verdict: Verdict, reason: &str) -> Issue {
        Issue {
            status: None,
            item_id: item_id.to_string(),
            title: format!("Title {}", item_id),
            source_type: SourceType::Description,
            target: target.to_string(),
            verdict,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_clean_report() {
        let report = RunReport { stats: StatsSnapshot::default(), unique_links: 0, issues: vec![] };
        let text = render_text("My Channel", &report);
        assert!(text.contains("=== AUDIT: My Channel ==="));
        assert!(text.contains("No dead links found"));
    }

    #[test]
    fn test_issues_grouped_by_item() {
        let report = RunReport {
            stats: StatsSnapshot { items_scanned: 2, links_seen: 3, links_ok: 0, links_error: 3, end_card_issues: 0 },
            unique_links: 3,
            issues: vec![
                Issue { status: Some(404), ..issue("abc", "https://a.example.com", Verdict::Dead, "not found") },
                Issue { status: Some(500), ..issue("abc", "https://b.example.com", Verdict::Warning, "unexpected status") },
                issue("def", "https://c.example.com", Verdict::Error, "timeout"),
            ],
        };

        let text = render_text("Chan", &report);

        assert_eq!(text.matches("❌").count(), 2);
        assert!(text.contains("https://youtu.be/abc"));
        assert!(text.contains("[Description] 💀 DEAD (404 - not found) - https://a.example.com"));
        assert!(text.contains("[Description] 🔌 ERROR (timeout) - https://c.example.com"));
        assert!(text.contains("- Unique links: 3 (3 occurrences)"));
    }

    #[test]
    fn test_json_report_serializes() {
        let report = RunReport {
            stats: StatsSnapshot::default(),
            unique_links: 1,
            issues: vec![
                Issue { status: Some(410), ..issue("abc", "https://a.example.com", Verdict::Dead, "not found") },
                issue("abc", "https://b.example.com", Verdict::Error, "timeout"),
            ],
        };
        let json = serde_json::to_value(JsonReport { target: "Chan", report: &report }).unwrap();
        assert_eq!(json["target"], "Chan");
        assert_eq!(json["issues"][0]["verdict"], "dead");
        assert_eq!(json["issues"][0]["source_type"], "description");
        assert_eq!(json["issues"][0]["reason"], "not found");
        assert_eq!(json["issues"][0]["status"], 410);
        assert!(json["issues"][1].get("status").is_none());
        assert_eq!(json["unique_links"], 1);
    }
}
