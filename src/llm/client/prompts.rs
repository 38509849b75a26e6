//! Prompt templates for document analysis and question answering.

/// Prompt for structured document analysis.
///
/// Placeholders: `{label}`, `{content}`.
pub const ANALYSIS_PROMPT: &str = r#"Analyze the following document content and provide a comprehensive analysis in JSON format:

Document: {label}
Content: {content}

Please provide:
1. A concise abstract (2-3 sentences)
2. A detailed summary (paragraph)
3. Key keywords (array of 5-10 terms)
4. Named entities (people, organizations, locations, dates)
5. Sentiment analysis (overall sentiment and score 0-1)
6. Section breakdown with summaries and importance scores
7. Timeline of events if applicable
8. Citations if any academic references
9. 3-5 potential questions with answers based only on the content

Return only valid JSON matching this structure:
{
  "abstract": "string",
  "summary": "string",
  "keywords": ["string"],
  "entities": {
    "people": ["string"],
    "organizations": ["string"],
    "locations": ["string"],
    "dates": ["string"]
  },
  "sentiment": {
    "overall": "positive|negative|neutral",
    "score": 0.0
  },
  "sections": [
    {
      "title": "string",
      "summary": "string",
      "importance": 0.0
    }
  ],
  "timeline": [
    {
      "date": "string",
      "event": "string"
    }
  ],
  "citations": ["string"],
  "questions": [
    {
      "question": "string",
      "answer": "string"
    }
  ]
}"#;

/// Prompt for answering a question about a document.
///
/// Placeholders: `{question}`, `{content}`.
pub const QUESTION_PROMPT: &str = r#"Based on the following document content, answer this question: "{question}"

Document content: {content}

Provide a clear, concise answer based only on the information in the document."#;

/// Build the analysis prompt for a document.
///
/// Pure and deterministic. No length checks happen here; the client
/// applies its size policy before calling this.
pub fn build_analysis_prompt(content: &str, label: &str) -> String {
    fill_template(ANALYSIS_PROMPT, &[("label", label), ("content", content)])
}

/// Build the prompt for answering `question` from `content`.
pub fn build_question_prompt(question: &str, content: &str) -> String {
    fill_template(QUESTION_PROMPT, &[("question", question), ("content", content)])
}

/// Substitute `{name}` placeholders in a single pass over the template.
///
/// Substituted values are never rescanned, so document text containing
/// `{label}` or `{content}` is inserted literally.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let matched = vars
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));
        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_label_content_and_schema() {
        let prompt = build_analysis_prompt("Revenue grew 15% in Q4.", "report.txt");
        assert!(prompt.contains("Document: report.txt"));
        assert!(prompt.contains("Content: Revenue grew 15% in Q4."));
        assert!(prompt.contains("\"overall\": \"positive|negative|neutral\""));
        assert!(prompt.contains("Return only valid JSON"));
        assert!(!prompt.contains("{label}"));
        assert!(!prompt.contains("{content}"));
    }

    #[test]
    fn analysis_prompt_is_deterministic() {
        assert_eq!(
            build_analysis_prompt("text", "a.txt"),
            build_analysis_prompt("text", "a.txt")
        );
    }

    #[test]
    fn placeholder_text_inside_content_is_not_expanded() {
        let prompt = build_analysis_prompt("literal {label} and {content}", "doc.md");
        assert!(prompt.contains("Content: literal {label} and {content}"));
        assert!(prompt.contains("Document: doc.md"));
    }

    #[test]
    fn schema_braces_survive_substitution() {
        let prompt = build_analysis_prompt("x", "y");
        assert!(prompt.contains("\"entities\": {\n    \"people\""));
        assert!(prompt.trim_end().ends_with('}'));
    }

    #[test]
    fn placeholder_text_inside_label_is_not_expanded() {
        let prompt = build_analysis_prompt("body", "{content}.txt");
        assert!(prompt.contains("Document: {content}.txt"));
        assert!(prompt.contains("Content: body"));
    }

    #[test]
    fn question_prompt_quotes_question() {
        let prompt = build_question_prompt("Who signed it?", "Signed by A. Jones.");
        assert!(prompt.contains("answer this question: \"Who signed it?\""));
        assert!(prompt.contains("Document content: Signed by A. Jones."));
        assert!(prompt.contains("based only on the information in the document"));
    }
}
