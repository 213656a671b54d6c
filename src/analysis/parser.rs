//! Model response parsing.
//!
//! Turns one free-form model response into a [`ParsedRun`] using simple
//! line-prefix rules. Parsing never fails: anything that does not match
//! is ignored and the corresponding field stays empty.
//!
//! Bullets are assigned to the section whose header they appear under.
//! A response such as
//!
//! ```text
//! ATS Score: 72.5%
//! Strengths:
//! - Clear formatting
//! Weaknesses:
//! - No metrics
//! ```
//!
//! yields `Clear formatting` as a strength and `No metrics` as a weakness,
//! never both.

use crate::models::ParsedRun;
use tracing::debug;

const SCORE_PREFIX: &str = "ATS Score:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Strengths,
    Weaknesses,
}

/// Parse a single model response.
pub fn parse_response(response: &str) -> ParsedRun {
    let mut run = ParsedRun {
        score: parse_score(response),
        ..ParsedRun::default()
    };

    let mut section: Option<Section> = None;

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // A run of dashes is a markdown rule, not a bullet.
        if line.chars().all(|c| c == '-') && line.len() > 1 {
            continue;
        }

        if let Some(item) = line.strip_prefix('-') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            match section {
                Some(Section::Strengths) => run.strengths.push(item.to_string()),
                Some(Section::Weaknesses) => run.weaknesses.push(item.to_string()),
                None => debug!("Ignoring bullet outside a section: {}", item),
            }
            continue;
        }

        if let Some(header) = section_header(line) {
            section = Some(header);
        } else if line.starts_with(SCORE_PREFIX) || header_text(line).is_some() {
            section = None;
        }
    }

    debug!(
        "Parsed run: score={:?}, {} strengths, {} weaknesses",
        run.score,
        run.strengths.len(),
        run.weaknesses.len()
    );

    run
}

/// Score from the first `ATS Score:` line, if it holds a number in [0, 100].
///
/// Only the first such line is considered.
pub fn parse_score(response: &str) -> Option<f64> {
    let line = response
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with(SCORE_PREFIX))?;

    let (_, value) = line.split_once(':')?;
    let value = value.trim();
    let value = value.strip_suffix('%').unwrap_or(value).trim();

    match value.parse::<f64>() {
        Ok(score) if score.is_finite() && (0.0..=100.0).contains(&score) => Some(score),
        _ => {
            debug!("Unusable score line: {}", line);
            None
        }
    }
}

/// Text of a header-like line: markdown `#`/`*` stripped, then a trailing `:`
/// required and removed.
fn header_text(line: &str) -> Option<&str> {
    line.trim_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
        .strip_suffix(':')
        .map(|name| name.trim_matches(|c: char| c == '*' || c.is_whitespace()))
}

/// Drops a leading list number such as `1.` or `2)`.
fn strip_list_number(text: &str) -> &str {
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return text;
    }
    let rest = &text[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .map(str::trim_start)
        .unwrap_or(text)
}

/// Recognizes section headers.
///
/// A bare `## Strengths` or `**Weakness**` counts. So does any line ending
/// in `:` that mentions either word, such as `Key Strengths:` or
/// `2. Areas of Weakness:`. When both words appear, the first one wins.
fn section_header(line: &str) -> Option<Section> {
    if let Some(name) = header_text(line) {
        return section_named_in(&name.to_lowercase());
    }

    let bare = line
        .trim_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
        .to_lowercase();
    match strip_list_number(&bare) {
        "strength" | "strengths" => Some(Section::Strengths),
        "weakness" | "weaknesses" => Some(Section::Weaknesses),
        _ => None,
    }
}

fn section_named_in(name: &str) -> Option<Section> {
    match (name.find("strength"), name.find("weakness")) {
        (Some(s), Some(w)) if w < s => Some(Section::Weaknesses),
        (Some(_), _) => Some(Section::Strengths),
        (None, Some(_)) => Some(Section::Weaknesses),
        (None, None) => None,
    }
}
