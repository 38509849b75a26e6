//! Structured document analysis record and the reply parser that produces it.
//!
//! A [`DocumentAnalysis`] is built exactly once from a model reply and is
//! never mutated afterwards. Re-analyzing a document yields a fresh record
//! that replaces the old one.

mod parser;
mod validate;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use parser::{extract_json_span, parse_analysis, ParseError};
pub use validate::{decode_analysis, ValidationError, ValidationIssue};

/// Structured analysis of a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Short two or three sentence abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Paragraph-length summary.
    pub summary: String,
    /// Key terms, in the order the model listed them.
    pub keywords: Vec<String>,
    pub entities: Entities,
    pub sentiment: Sentiment,
    pub sections: Vec<Section>,
    pub timeline: Vec<TimelineEvent>,
    pub citations: Vec<String>,
    /// Suggested questions answered from the document text.
    pub questions: Vec<QuestionAnswer>,
}

/// Named entities grouped by the four fixed categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entities {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
}

impl Entities {
    /// Total number of entities across all categories.
    pub fn len(&self) -> usize {
        self.people.len() + self.organizations.len() + self.locations.len() + self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate categories as `(name, values)` pairs in a stable order.
    pub fn categories(&self) -> [(&'static str, &[String]); 4] {
        [
            ("people", self.people.as_slice()),
            ("organizations", self.organizations.as_slice()),
            ("locations", self.locations.as_slice()),
            ("dates", self.dates.as_slice()),
        ]
    }
}

/// Overall sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub overall: SentimentLabel,
    /// Confidence score in `[0.0, 1.0]`.
    pub score: f64,
}

/// One logical section of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub summary: String,
    /// Relative importance in `[0.0, 1.0]`.
    pub importance: f64,
}

/// A dated event. The date is free-form text and may not be parseable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Errors turning a model reply into a [`DocumentAnalysis`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_label_wire_format_is_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Negative).unwrap();
        assert_eq!(json, "\"negative\"");

        let label: SentimentLabel = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(label, SentimentLabel::Neutral);
        assert!(serde_json::from_str::<SentimentLabel>("\"Positive\"").is_err());
    }

    #[test]
    fn entities_categories_are_fixed_and_ordered() {
        let entities = Entities {
            people: vec!["Ada Lovelace".into()],
            organizations: vec![],
            locations: vec!["London".into(), "Paris".into()],
            dates: vec!["1843".into()],
        };

        let names: Vec<_> = entities.categories().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["people", "organizations", "locations", "dates"]);
        assert_eq!(entities.len(), 4);
        assert!(!entities.is_empty());
        assert!(Entities::default().is_empty());
    }

    #[test]
    fn abstract_field_serializes_under_wire_name() {
        let analysis = DocumentAnalysis {
            abstract_text: "Short.".into(),
            summary: "Longer.".into(),
            keywords: vec![],
            entities: Entities::default(),
            sentiment: Sentiment {
                overall: SentimentLabel::Neutral,
                score: 0.5,
            },
            sections: vec![],
            timeline: vec![],
            citations: vec![],
            questions: vec![],
        };

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["abstract"], "Short.");
        assert!(value.get("abstract_text").is_none());
    }
}
