//! Marking the parts of a filename that a plain query matched.

use super::query::has_operator_word;
use regex::RegexBuilder;
use serde::Serialize;
use std::fmt;

/// A run of filename text, either matched by the query or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// A filename split into matched and unmatched segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    segments: Vec<Segment>,
}

impl Highlighted {
    fn plain(filename: &str) -> Self {
        Self {
            segments: vec![Segment {
                text: filename.to_string(),
                matched: false,
            }],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_matches(&self) -> bool {
        self.segments.iter().any(|s| s.matched)
    }

    /// Wrap every matched segment in `open` / `close`.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.matched {
                out.push_str(open);
                out.push_str(&segment.text);
                out.push_str(close);
            } else {
                out.push_str(&segment.text);
            }
        }
        out
    }
}

/// Renders the filename without markers.
impl fmt::Display for Highlighted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

/// Split `filename` into segments matched by the terms of `query`.
///
/// Wildcard, phrase and operator queries are never highlighted; the filename comes
/// back as one unmatched segment. Longer terms win over shorter ones that overlap them.
pub fn highlight(query: &str, filename: &str) -> Highlighted {
    if query.contains('*') || query.contains('"') || has_operator_word(query) {
        return Highlighted::plain(filename);
    }

    let mut terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.replace(['"', '\''], ""))
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        return Highlighted::plain(filename);
    }

    terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let pattern = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!("Highlight pattern for '{}' rejected: {}", query, e);
            return Highlighted::plain(filename);
        }
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in regex.find_iter(filename) {
        if m.start() > last {
            segments.push(Segment {
                text: filename[last..m.start()].to_string(),
                matched: false,
            });
        }
        segments.push(Segment {
            text: m.as_str().to_string(),
            matched: true,
        });
        last = m.end();
    }
    if last < filename.len() || segments.is_empty() {
        segments.push(Segment {
            text: filename[last..].to_string(),
            matched: false,
        });
    }

    Highlighted { segments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("report", "report.pdf", "[report].pdf")]
    #[case("report", "report_final.pdf", "[report]_final.pdf")]
    #[case("REPORT", "My Report.pdf", "My [Report].pdf")]
    #[case("a b", "a-b-a.txt", "[a]-[b]-[a].txt")]
    #[case("rep report", "report rep", "[report] [rep]")]
    #[case("pdf -final", "report.pdf", "report.[pdf]")]
    #[case("a.b", "axb a.b", "axb [a.b]")]
    fn test_highlight(#[case] query: &str, #[case] filename: &str, #[case] expected: &str) {
        check!(highlight(query, filename).render("[", "]") == expected);
    }

    #[rstest]
    #[case("rep*", "report.pdf")]
    #[case("\"report\"", "report.pdf")]
    #[case("report AND pdf", "report.pdf")]
    #[case("", "report.pdf")]
    #[case("   ", "report.pdf")]
    #[case("zzz", "report.pdf")]
    fn test_highlight_leaves_filename_untouched(#[case] query: &str, #[case] filename: &str) {
        let highlighted = highlight(query, filename);
        check!(!highlighted.has_matches());
        check!(highlighted.render("[", "]") == filename);
        check!(highlighted.to_string() == filename);
    }

    #[test]
    fn test_highlight_segments() {
        let highlighted = highlight("final", "report_final.pdf");
        check!(
            highlighted.segments()
                == [
                    Segment {
                        text: "report_".to_string(),
                        matched: false
                    },
                    Segment {
                        text: "final".to_string(),
                        matched: true
                    },
                    Segment {
                        text: ".pdf".to_string(),
                        matched: false
                    },
                ]
        );
    }

    #[test]
    fn test_highlight_empty_filename() {
        check!(highlight("x", "").segments().len() == 1);
    }
}
