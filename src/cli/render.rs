//! Terminal rendering of an analysis as dashboard tiles.

use std::fmt::Write;

use console::style;

use super::icons::{citation, pointer, sentiment};
use crate::analysis::{DocumentAnalysis, SentimentLabel};

const BAR_WIDTH: usize = 10;

/// Render every tile of an analysis for `label`.
pub fn render_analysis(analysis: &DocumentAnalysis, label: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", style(format!("Analysis: {}", label)).bold());
    let _ = writeln!(out, "{}", "=".repeat(40));

    tile(&mut out, "Abstract");
    let _ = writeln!(out, "{}", analysis.abstract_text);

    tile(&mut out, "Summary");
    let _ = writeln!(out, "{}", analysis.summary);

    tile(&mut out, "Sentiment");
    let _ = writeln!(
        out,
        "{} {} {}",
        sentiment(analysis.sentiment.overall),
        sentiment_label(analysis.sentiment.overall),
        style(format!("({:.0}%)", analysis.sentiment.score * 100.0)).dim()
    );

    if !analysis.keywords.is_empty() {
        tile(&mut out, "Keywords");
        let _ = writeln!(out, "{}", analysis.keywords.join(", "));
    }

    if !analysis.entities.is_empty() {
        tile(&mut out, "Entities");
        for (category, values) in analysis.entities.categories() {
            if values.is_empty() {
                continue;
            }
            let _ = writeln!(
                out,
                "{:<15} {}",
                format!("{}:", capitalize(category)),
                values.join(", ")
            );
        }
    }

    if !analysis.sections.is_empty() {
        tile(&mut out, "Sections");
        for section in &analysis.sections {
            let _ = writeln!(
                out,
                "{} {} {}",
                importance_bar(section.importance),
                style(&section.title).bold(),
                style(format!("({:.2})", section.importance)).dim()
            );
            let _ = writeln!(out, "  {}", section.summary);
        }
    }

    if !analysis.timeline.is_empty() {
        tile(&mut out, "Timeline");
        for event in &analysis.timeline {
            let _ = writeln!(out, "{} {:<15} {}", pointer(), event.date, event.event);
        }
    }

    if !analysis.citations.is_empty() {
        tile(&mut out, "Citations");
        for cited in &analysis.citations {
            let _ = writeln!(out, "{} {}", citation(), cited);
        }
    }

    if !analysis.questions.is_empty() {
        tile(&mut out, "Questions");
        for qa in &analysis.questions {
            let _ = writeln!(out, "{} {}", style("Q:").cyan(), qa.question);
            let _ = writeln!(out, "{} {}", style("A:").green(), qa.answer);
        }
    }

    out
}

fn tile(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", style(title).bold().underlined());
}

fn sentiment_label(label: SentimentLabel) -> String {
    match label {
        SentimentLabel::Positive => style("Positive").green().to_string(),
        SentimentLabel::Negative => style("Negative").red().to_string(),
        SentimentLabel::Neutral => style("Neutral").yellow().to_string(),
    }
}

/// Fixed-width bar for a value in `[0, 1]`.
pub fn importance_bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
