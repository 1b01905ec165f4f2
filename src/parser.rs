use crate::error::{DiagramError, Result};
use crate::ir::{DiagramSet, SequenceDiagram, StateMachine};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

static SEQUENCE_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"var\s+sequence_diagrams\s*=\s*\[").unwrap());
static STATE_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"var\s+state_machines\s*=\s*\[").unwrap());

/// Reads every diagram a document describes.
///
/// Accepts a JSON or JSON5 object with `sequence_diagrams`/`state_machines`
/// arrays, or a doc-gen HTML page (or bare script) carrying them as
/// `var` declarations.
pub fn parse_document(input: &str) -> Result<DiagramSet> {
    let trimmed = input.trim_start_matches('\u{feff}').trim();
    let is_page = trimmed.starts_with('<')
        || SEQUENCE_VAR_RE.is_match(trimmed)
        || STATE_VAR_RE.is_match(trimmed);
    let set = if is_page {
        parse_page(trimmed)?
    } else {
        parse_object(trimmed)?
    };

    if set.is_empty() {
        return Err(DiagramError::NoDiagrams);
    }
    debug!(
        sequence_diagrams = set.sequence_diagrams.len(),
        state_machines = set.state_machines.len(),
        "parsed document"
    );
    Ok(set)
}

fn parse_object(input: &str) -> Result<DiagramSet> {
    match serde_json::from_str::<DiagramSet>(input) {
        Ok(set) => Ok(set),
        // Only syntax problems are worth a second attempt as JSON5.
        Err(err) if err.is_syntax() || err.is_eof() => Ok(json5::from_str(input)?),
        Err(err) => Err(err.into()),
    }
}

fn parse_page(input: &str) -> Result<DiagramSet> {
    Ok(DiagramSet {
        sequence_diagrams: parse_script_array::<SequenceDiagram>(input, &SEQUENCE_VAR_RE)?,
        state_machines: parse_script_array::<StateMachine>(input, &STATE_VAR_RE)?,
    })
}

fn parse_script_array<T: DeserializeOwned>(input: &str, var: &Regex) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for found in var.find_iter(input) {
        // The match ends just past the opening bracket.
        let start = found.end() - 1;
        let Some(literal) = bracketed(&input[start..]) else {
            debug!(offset = start, "unterminated script array skipped");
            continue;
        };
        items.extend(json5::from_str::<Vec<T>>(literal)?);
    }
    Ok(items)
}

/// The `[...]` literal at the start of `input`, brackets included, skipping
/// over brackets inside quoted strings.
fn bracketed(input: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in input.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&input[..offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
