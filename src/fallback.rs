//! Plain-text renderings for diagrams that have no drawing surface.

use crate::ir::{SequenceDiagram, StateMachine};
use std::fmt::Write;

const HEADER_PADDING: usize = 4;
const ARROW_PADDING: usize = 8;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn column_width(diagram: &SequenceDiagram) -> usize {
    let timelines = diagram
        .timelines()
        .iter()
        .map(|name| char_len(name) + HEADER_PADDING);
    let messages = diagram
        .messages()
        .iter()
        .map(|message| char_len(&message.name) + ARROW_PADDING);
    timelines.chain(messages).max().unwrap_or(0).max(1)
}

/// `---name-->` stretched to `span` characters.
fn right_arrow(name: &str, span: usize) -> String {
    let dashes = span.saturating_sub(char_len(name) + 1).max(2);
    let lead = dashes / 2;
    format!("{}{name}{}>", "-".repeat(lead), "-".repeat(dashes - lead))
}

/// `<--name---` stretched to `span` characters.
fn left_arrow(name: &str, span: usize) -> String {
    let dashes = span.saturating_sub(char_len(name) + 1).max(2);
    let tail = dashes / 2;
    format!("<{}{name}{}", "-".repeat(dashes - tail), "-".repeat(tail))
}

/// Timeline headers on one line, then one arrow per message between the
/// columns it connects. A self message is drawn as `<--name` at its column.
pub fn sequence_text(diagram: &SequenceDiagram) -> String {
    let width = column_width(diagram);
    let center = |column: usize| column * width + width / 2;
    let mut out = String::new();

    if let Some(name) = diagram.name() {
        let _ = writeln!(out, "{name}");
    }

    let mut header = String::new();
    for name in diagram.timelines() {
        let _ = write!(header, "{:^width$}", format!("[{name}]"));
    }
    let _ = writeln!(out, "{}", header.trim_end());

    for message in diagram.messages() {
        let from = center(message.from.get());
        let to = center(message.to.get());
        let line = if from == to {
            format!("{}<--{}", " ".repeat(from), message.name)
        } else if from < to {
            format!("{}{}", " ".repeat(from), right_arrow(&message.name, to - from + 1))
        } else {
            format!("{}{}", " ".repeat(to), left_arrow(&message.name, from - to + 1))
        };
        let _ = writeln!(out, "{line}");
    }
    out
}

/// Node list with grid positions, then one `from --label--> to` line per edge.
pub fn state_machine_text(machine: &StateMachine) -> String {
    let mut out = String::new();
    if let Some(name) = machine.name() {
        let _ = writeln!(out, "{name}");
    }

    let _ = writeln!(out, "nodes:");
    for (index, node) in machine.nodes().iter().enumerate() {
        let _ = writeln!(out, "  {index} {} ({}, {})", node.name, node.x, node.y);
    }

    let _ = writeln!(out, "edges:");
    for edge in machine.vertices() {
        let from = &machine.node(edge.from_node).name;
        let to = &machine.node(edge.to_node).name;
        if edge.label.is_empty() {
            let _ = writeln!(out, "  {from} --> {to}");
        } else {
            let _ = writeln!(out, "  {from} --{}--> {to}", edge.label);
        }
    }
    out
}
