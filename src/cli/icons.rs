//! Glyphs used in analysis output.

use console::{style, StyledObject};

use crate::analysis::SentimentLabel;

/// Finished analysis, found config file.
pub fn done() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Something the user should act on: a missing key, an oversize document.
pub fn notice() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Leads a timeline entry or a follow-up hint.
pub fn pointer() -> StyledObject<&'static str> {
    style("→").dim()
}

/// Leads a citation line.
pub fn citation() -> StyledObject<&'static str> {
    style("¶").dim()
}

/// Direction of the overall sentiment.
pub fn sentiment(label: SentimentLabel) -> StyledObject<&'static str> {
    match label {
        SentimentLabel::Positive => style("▲").green(),
        SentimentLabel::Negative => style("▼").red(),
        SentimentLabel::Neutral => style("●").yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_sentiment_has_its_own_glyph() {
        console::set_colors_enabled(false);
        let glyphs: Vec<String> = [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ]
        .into_iter()
        .map(|label| sentiment(label).to_string())
        .collect();

        assert_eq!(glyphs, vec!["▲", "▼", "●"]);
    }
}
