// Colored terminal output for contribution reports.
//
// main.rs delegates all human-facing formatting here; `--json` output
// bypasses this module entirely.

use std::borrow::Cow;

use colored::Colorize;

use crate::batch::BatchRow;
use crate::geometry::{ContributionScore, ScoreNormalization};
use crate::pairwise::PairwiseContribution;
use crate::pipeline::ContributionReport;

/// How many of the target's heaviest terms to list.
const TOP_TERMS: usize = 8;

/// Longest error reason shown in a batch table row.
const MAX_REASON_CHARS: usize = 60;

/// Shorten a batch error reason to `max` characters, cutting on a char
/// boundary and marking the cut with "...".
fn clip_reason(reason: &str, max: usize) -> Cow<'_, str> {
    match reason.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &reason[..cut])),
        None => Cow::Borrowed(reason),
    }
}

/// Display a single geometric contribution report.
pub fn display_report(report: &ContributionReport) {
    println!(
        "\n{}",
        format!("=== Contribution of {} ===", report.target_id).bold()
    );

    let value = format!("{:.4}", report.value);
    println!("  Score: {}", value.bright_green().bold());

    match report.score {
        ContributionScore::Projection { raw, normalized } => {
            let selected = match report.normalization {
                ScoreNormalization::Raw => "raw",
                ScoreNormalization::Normalized => "normalized",
            };
            println!("  Mode: projection ({selected})");
            println!("    Raw orthogonal distance: {raw:.4}");
            println!("    Normalized by |S - P|:   {normalized:.4}");
            if let Some(lambda) = report.geometry.projection_coefficient {
                println!("    Position along P->S:     {lambda:.3}");
            }
        }
        ContributionScore::Distance { metric, value } => {
            println!(
                "  Mode: {} ({} distance to predecessors, centroids coincide)",
                "fallback".yellow(),
                metric.as_str()
            );
            println!("    Distance: {value:.4}");
        }
    }

    println!(
        "  Corpus: {} predecessors, {} successors, {} terms",
        report.predecessor_count,
        report.successor_count,
        report.space.dimension()
    );
    println!("  |S - P|: {:.4}", report.geometry.baseline_length);

    let terms = report.top_target_terms(TOP_TERMS);
    if !terms.is_empty() {
        let listed: Vec<String> = terms
            .iter()
            .map(|(term, weight)| format!("{term} ({weight:.2})"))
            .collect();
        println!("  Distinctive target terms: {}", listed.join(", ").dimmed());
    }
    println!();
}

/// Display the pairwise-distance form of the score.
pub fn display_pairwise(id: &str, result: &PairwiseContribution) {
    println!(
        "\n{}",
        format!("=== Pairwise contribution of {id} ===").bold()
    );
    println!(
        "  Score: {}",
        format!("{:.4}", result.value).bright_green().bold()
    );
    println!("  Mean cited/citing distance: {:.4}", result.mean_distance);
    println!(
        "  Spread: predecessors {:.4}, successors {:.4}",
        result.predecessor_spread, result.successor_spread
    );
    println!();
}

/// Display a batch run as a ranked table, highest score first.
pub fn display_batch(rows: &[BatchRow]) {
    if rows.is_empty() {
        println!("No documents with both predecessors and successors.");
        return;
    }

    let mut ranked: Vec<&BatchRow> = rows.iter().collect();
    ranked.sort_by(|a, b| {
        b.value
            .unwrap_or(f64::NEG_INFINITY)
            .partial_cmp(&a.value.unwrap_or(f64::NEG_INFINITY))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "\n{}",
        format!("=== Contribution Report ({} documents) ===", rows.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<24} {:>8}  {:<10}",
        "Rank".dimmed(),
        "Document".dimmed(),
        "Score".dimmed(),
        "Mode".dimmed(),
    );
    println!("  {}", "-".repeat(52).dimmed());

    for (i, row) in ranked.iter().enumerate() {
        match (&row.value, &row.error) {
            (Some(value), _) => {
                let mode = row.mode.as_deref().unwrap_or("?");
                let mode = if row.degenerate == Some(true) {
                    mode.yellow()
                } else {
                    mode.normal()
                };
                println!("  {:>4}. {:<24} {:>8.4}  {:<10}", i + 1, row.id, value, mode);
            }
            (None, error) => {
                let reason = error.as_deref().unwrap_or("unknown error");
                println!(
                    "  {:>4}. {:<24} {:>8}  {}",
                    i + 1,
                    row.id,
                    "-",
                    clip_reason(reason, MAX_REASON_CHARS).as_ref().red()
                );
            }
        }
    }

    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        println!("\n  {} {} documents could not be scored", "!".bright_red(), failed);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reason_is_borrowed() {
        let reason = "Empty vocabulary";
        assert!(matches!(clip_reason(reason, 60), Cow::Borrowed(r) if r == reason));
    }

    #[test]
    fn test_reason_cut_on_char_boundary() {
        assert_eq!(clip_reason("naïve café", 5), "naïve...");
        assert_eq!(clip_reason("naïve", 5), "naïve");
    }
}
