//! Visible-text extraction from HTML pages.

use scraper::Html;

/// Elements whose contents are never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template", "svg"];

/// Extract visible text from an HTML document.
///
/// Each text node becomes one line with internal whitespace collapsed;
/// blank nodes are dropped.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_body_text_and_drops_scripts() {
        let html = r#"<!doctype html>
            <html>
              <head><title>Quarterly report</title><style>p { color: red }</style></head>
              <body>
                <h1>Q4   results</h1>
                <script>var tracking = true;</script>
                <p>Revenue grew <b>15%</b> in Q4.</p>
                <noscript>Enable JavaScript</noscript>
              </body>
            </html>"#;

        let text = extract_text(html);
        assert_eq!(text, "Q4 results\nRevenue grew\n15%\nin Q4.");
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
        assert!(!text.contains("Quarterly report"));
    }

    #[test]
    fn empty_markup_yields_empty_text() {
        assert_eq!(extract_text("<html><body>   </body></html>"), "");
    }
}
