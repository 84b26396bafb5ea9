//! The six cleaning stages, in order

use super::patterns::{
    BARE_URL, EMAIL, EXCESS_BLANK_LINES, HORIZONTAL_WHITESPACE, MARKDOWN_LINK, METADATA_LINES,
    NAVIGATION_LINES, SPACE_AROUND_NEWLINE, WEB_ARTIFACTS,
};
use super::quality::looks_like_heading;
use regex::Regex;

const MIN_LINE_CHARS: usize = 10;
const MAX_LINE_CHARS: usize = 500;
const MIN_ALPHA_RATIO: f64 = 0.3;
/// Lines longer than this get a missing terminator repaired
const SENTENCE_REPAIR_CHARS: usize = 20;

/// One pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Whitespace,
    WebArtifacts,
    Navigation,
    QualityFilter,
    Structure,
    Final,
}

impl Stage {
    pub(crate) const ALL: [Stage; 6] = [
        Stage::Whitespace,
        Stage::WebArtifacts,
        Stage::Navigation,
        Stage::QualityFilter,
        Stage::Structure,
        Stage::Final,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Stage::Whitespace => "Whitespace cleaning",
            Stage::WebArtifacts => "Web artifacts removal",
            Stage::Navigation => "Navigation removal",
            Stage::QualityFilter => "Quality filtering",
            Stage::Structure => "Structure improvement",
            Stage::Final => "Final cleanup",
        }
    }

    pub(crate) fn apply(self, text: &str) -> String {
        match self {
            Stage::Whitespace => normalize_whitespace(text),
            Stage::WebArtifacts => remove_web_artifacts(text),
            Stage::Navigation => remove_navigation_lines(text),
            Stage::QualityFilter => filter_quality_lines(text),
            Stage::Structure => improve_structure(text),
            Stage::Final => final_cleanup(text),
        }
    }
}

fn matches_any(patterns: &[Regex], line: &str) -> bool {
    patterns.iter().any(|p| p.is_match(line))
}

fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    let text = HORIZONTAL_WHITESPACE.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    text.trim().to_string()
}

fn remove_web_artifacts(text: &str) -> String {
    let text = WEB_ARTIFACTS
        .iter()
        .fold(text.to_string(), |acc, pattern| {
            pattern.replace_all(&acc, "").into_owned()
        });
    let text = MARKDOWN_LINK.replace_all(&text, "$1");
    let text = BARE_URL.replace_all(&text, "");
    EMAIL.replace_all(&text, "").into_owned()
}

fn remove_navigation_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !matches_any(&NAVIGATION_LINES, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn keep_quality_line(line: &str) -> bool {
    let len = line.chars().count();
    if !(MIN_LINE_CHARS..=MAX_LINE_CHARS).contains(&len) {
        return false;
    }

    let alpha = line.chars().filter(char::is_ascii_alphabetic).count();
    if (alpha as f64) / (len as f64) < MIN_ALPHA_RATIO {
        return false;
    }

    !matches_any(&METADATA_LINES, line)
}

fn filter_quality_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| keep_quality_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Blank line before every heading that is not first, and after a heading
/// followed by body text
fn improve_structure(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() * 2);

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }

        let heading = looks_like_heading(line);
        if heading && !out.is_empty() {
            out.push("");
        }
        out.push(line);

        if heading {
            if let Some(next) = lines.get(i + 1) {
                if !next.is_empty() && !looks_like_heading(next) {
                    out.push("");
                }
            }
        }
    }

    out.join("\n")
}

fn repair_terminator(line: &str) -> String {
    let needs_period = line.chars().count() > SENTENCE_REPAIR_CHARS
        && line.contains(' ')
        && !line.ends_with(['.', '!', '?', ':', ';'])
        && !line.ends_with('…');

    if needs_period {
        format!("{line}.")
    } else {
        line.to_string()
    }
}

/// Collapse blank-line runs to a single blank line, repair sentence
/// terminators, trim
fn final_cleanup(text: &str) -> String {
    let text = EXCESS_BLANK_LINES.replace_all(text, "\n\n");

    let mut out: Vec<String> = Vec::new();
    for line in text.split('\n').map(str::trim) {
        if line.is_empty() {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push(String::new());
            }
        } else {
            out.push(repair_terminator(line));
        }
    }

    out.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_stage() {
        assert_eq!(
            normalize_whitespace("  a\r\nb \t c\n\n\n\n  d  \r e "),
            "a\nb c\n\nd\ne"
        );
    }

    #[test]
    fn test_navigation_stage_drops_blank_and_menu_lines() {
        assert_eq!(
            remove_navigation_lines("Home\n\nReal content line\nNEXT\nBlog posts we like"),
            "Real content line\nBlog posts we like"
        );
    }

    #[test]
    fn test_quality_stage() {
        let long = "long ".repeat(120);
        let text = [
            "short",
            "A perfectly reasonable line of text",
            "12345 67890 !!!",
            "By: someone important",
            long.as_str(),
            "01/02/2024 release notes",
        ]
        .join("\n");
        assert_eq!(filter_quality_lines(&text), "A perfectly reasonable line of text");
    }

    #[test]
    fn test_structure_stage() {
        let text = "Opening paragraph of the page.\nDesign Principles\nBody text follows the heading.\nSECOND SECTION\nTHIRD SECTION\nMore body.";
        assert_eq!(
            improve_structure(text),
            "Opening paragraph of the page.\n\nDesign Principles\n\nBody text follows the heading.\n\nSECOND SECTION\n\nTHIRD SECTION\n\nMore body."
        );
    }

    #[test]
    fn test_final_stage_repairs_terminators() {
        assert_eq!(
            final_cleanup("A sentence without its period\n\n\n\nShort line\nAlready done!\nTrailing thought…"),
            "A sentence without its period.\n\nShort line\nAlready done!\nTrailing thought…"
        );
        assert_eq!(final_cleanup("Heading\n\nNoSpacesInThisVeryLongToken"), "Heading\n\nNoSpacesInThisVeryLongToken");
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names[0], "Whitespace cleaning");
        assert_eq!(names[5], "Final cleanup");
    }
}
