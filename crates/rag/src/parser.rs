//! Model output parser.
//!
//! The expected reply is a two-section grammar:
//!
//! ```text
//! <answer>
//! ...
//! </answer>
//!
//! <references>
//! ...
//! </references>
//! ```
//!
//! The first `<references>` marker splits the output into an answer part and
//! a references part. Whitespace between the final `</answer>` and that
//! marker separates the sections and is dropped. In both parts every
//! `<answer>`, `</answer>` and `</references>` marker is removed and all
//! other text, whitespace included, is kept. Output without a
//! `<references>` marker is malformed.
//!
//! A `<references>` literal appearing inside either section is not escaped:
//! the first occurrence is always the delimiter.

const ANSWER_OPEN: &str = "<answer>";
const ANSWER_CLOSE: &str = "</answer>";
const REFERENCES_OPEN: &str = "<references>";
const REFERENCES_CLOSE: &str = "</references>";

/// Markers removed from both sections.
const STRIPPED_MARKERS: [&str; 3] = [ANSWER_OPEN, ANSWER_CLOSE, REFERENCES_CLOSE];

/// Outcome of parsing raw model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Both sections were found.
    WellFormed { answer: String, references: String },

    /// The output did not follow the grammar.
    Malformed,
}

impl ParsedResponse {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParsedResponse::Malformed)
    }
}

/// Parse raw model output. Never fails.
pub fn parse(raw: &str) -> ParsedResponse {
    let Some((answer_part, references_part)) = raw.split_once(REFERENCES_OPEN) else {
        return ParsedResponse::Malformed;
    };

    ParsedResponse::WellFormed {
        answer: strip_markers(trim_section_separator(answer_part)),
        references: strip_markers(references_part),
    }
}

/// Drop whitespace-only text after the final `</answer>`.
fn trim_section_separator(answer_part: &str) -> &str {
    match answer_part.rfind(ANSWER_CLOSE) {
        Some(idx) if answer_part[idx + ANSWER_CLOSE.len()..].trim().is_empty() => {
            &answer_part[..idx]
        }
        _ => answer_part,
    }
}

fn strip_markers(section: &str) -> String {
    STRIPPED_MARKERS
        .iter()
        .fold(section.to_string(), |text, marker| text.replace(marker, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed(answer: &str, references: &str) -> ParsedResponse {
        ParsedResponse::WellFormed {
            answer: answer.to_string(),
            references: references.to_string(),
        }
    }

    #[test]
    fn test_parse_compact_output() {
        assert_eq!(
            parse("<answer>A</answer>\n<references>R</references>"),
            well_formed("A", "R")
        );
    }

    #[test]
    fn test_parse_preserves_section_whitespace() {
        let raw = "<answer>\nParis\n</answer>\n<references>\nParis is the capital of France.\n</references>";
        assert_eq!(
            parse(raw),
            well_formed("\nParis\n", "\nParis is the capital of France.\n")
        );
    }

    #[test]
    fn test_parse_blank_line_between_sections() {
        let raw = "<answer>\nA\n</answer>\n\n  <references>\nR\n</references>";
        assert_eq!(parse(raw), well_formed("\nA\n", "\nR\n"));
    }

    #[test]
    fn test_parse_without_references_is_malformed() {
        assert!(parse("Paris is the capital.").is_malformed());
        assert!(parse("<answer>Paris</answer>").is_malformed());
        assert!(parse("<answer>Paris</answer></references>").is_malformed());
        assert!(parse("").is_malformed());
    }

    #[test]
    fn test_parse_only_references_marker() {
        assert_eq!(parse("<references>"), well_formed("", ""));
    }

    #[test]
    fn test_parse_missing_closing_tags() {
        assert_eq!(
            parse("<answer>Paris<references>capital"),
            well_formed("Paris", "capital")
        );
    }

    #[test]
    fn test_parse_keeps_text_after_answer_close() {
        assert_eq!(
            parse("<answer>A</answer> see below <references>R"),
            well_formed("A see below ", "R")
        );
    }

    #[test]
    fn test_parse_first_references_marker_wins() {
        assert_eq!(
            parse("<answer>A</answer><references>one <references> two</references>"),
            well_formed("A", "one <references> two")
        );
    }

    #[test]
    fn test_parse_strips_every_occurrence_of_markers() {
        assert_eq!(
            parse("<answer>A</answer><answer>B</answer><references>R</references></references>"),
            well_formed("AB", "R")
        );
    }
}
