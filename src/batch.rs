//! Batch drivers over diagram lists, plus the panel show/hide glue doc pages
//! use to fold diagrams away.

use crate::canvas::{RenderOutcome, SurfaceProvider};
use crate::config::Config;
use crate::ir::{DiagramSet, SequenceDiagram, StateMachine};
use crate::sequence::draw_sequence_diagram;
use crate::state_machine::draw_state_machine;
use std::collections::BTreeMap;
use tracing::debug;

/// Class name doc-gen gives every collapsible panel.
pub const PANEL_CLASS: &str = "hh";

/// Canvas ids split by whether a surface took the drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub drawn: Vec<String>,
    pub missing: Vec<String>,
}

impl BatchReport {
    fn record(&mut self, canvas_id: &str, outcome: RenderOutcome) {
        match outcome {
            RenderOutcome::Drawn { .. } => self.drawn.push(canvas_id.to_string()),
            RenderOutcome::SurfaceMissing => self.missing.push(canvas_id.to_string()),
        }
    }

    fn merge(&mut self, other: BatchReport) {
        self.drawn.extend(other.drawn);
        self.missing.extend(other.missing);
    }
}

pub fn update_sequence_diagrams<P: SurfaceProvider + ?Sized>(
    surfaces: &mut P,
    diagrams: &[SequenceDiagram],
    config: &Config,
) -> BatchReport {
    let mut report = BatchReport::default();
    for diagram in diagrams {
        report.record(diagram.canvas_id(), draw_sequence_diagram(surfaces, diagram, config));
    }
    report
}

pub fn update_state_machines<P: SurfaceProvider + ?Sized>(
    surfaces: &mut P,
    machines: &[StateMachine],
    config: &Config,
) -> BatchReport {
    let mut report = BatchReport::default();
    for machine in machines {
        report.record(machine.canvas_id(), draw_state_machine(surfaces, machine, config));
    }
    report
}

/// Sequence diagrams first, then state machines, each in input order.
pub fn render_all<P: SurfaceProvider + ?Sized>(
    surfaces: &mut P,
    set: &DiagramSet,
    config: &Config,
) -> BatchReport {
    let mut report = update_sequence_diagrams(surfaces, &set.sequence_diagrams, config);
    report.merge(update_state_machines(surfaces, &set.state_machines, config));
    debug!(
        drawn = report.drawn.len(),
        missing = report.missing.len(),
        "rendered diagram set"
    );
    report
}

/// Something holding show/hide panels addressed by id and grouped by class.
pub trait PanelHost {
    fn is_visible(&self, id: &str) -> Option<bool>;
    fn set_visible(&mut self, id: &str, visible: bool);
    fn ids_with_class(&self, class: &str) -> Vec<String>;
}

/// Flips a panel between shown and hidden. Returns the new state, or `None`
/// for an unknown id.
pub fn toggle_panel<H: PanelHost + ?Sized>(host: &mut H, id: &str) -> Option<bool> {
    let visible = !host.is_visible(id)?;
    host.set_visible(id, visible);
    Some(visible)
}

/// Hides every panel of [`PANEL_CLASS`].
pub fn close_all_panels<H: PanelHost + ?Sized>(host: &mut H) {
    for id in host.ids_with_class(PANEL_CLASS) {
        host.set_visible(&id, false);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Panel {
    class: String,
    visible: bool,
}

/// In-memory [`PanelHost`].
#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    panels: BTreeMap<String, Panel>,
}

impl PanelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, class: impl Into<String>, visible: bool) {
        self.panels.insert(
            id.into(),
            Panel {
                class: class.into(),
                visible,
            },
        );
    }
}

impl PanelHost for PanelSet {
    fn is_visible(&self, id: &str) -> Option<bool> {
        self.panels.get(id).map(|panel| panel.visible)
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(panel) = self.panels.get_mut(id) {
            panel.visible = visible;
        }
    }

    fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.panels
            .iter()
            .filter(|(_, panel)| panel.class == class)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::SurfaceRegistry;
    use crate::ir::{SequenceMessage, StateEdge, StateNode};
    use crate::text_metrics::FixedAdvance;

    fn set() -> DiagramSet {
        DiagramSet {
            sequence_diagrams: vec![
                SequenceDiagram::new(
                    "seq_0",
                    vec!["A".into(), "B".into()],
                    vec![SequenceMessage::new(0, 1, "ping")],
                )
                .unwrap(),
                SequenceDiagram::new("seq_1", vec!["A".into()], Vec::new()).unwrap(),
            ],
            state_machines: vec![
                StateMachine::new(
                    "sta_0",
                    vec![StateNode::new("idle", 0, 0), StateNode::new("busy", 1, 0)],
                    vec![StateEdge::new(0, 1, "work")],
                )
                .unwrap(),
            ],
        }
    }

    #[test]
    fn renders_every_diagram_with_a_surface() {
        let mut surfaces = SurfaceRegistry::new(FixedAdvance(6.0));
        surfaces.provision("seq_0");
        surfaces.provision("sta_0");
        let report = render_all(&mut surfaces, &set(), &Config::default());
        assert_eq!(report.drawn, vec!["seq_0", "sta_0"]);
        assert_eq!(report.missing, vec!["seq_1"]);
        assert!(!surfaces.get("sta_0").unwrap().is_blank());
    }

    #[test]
    fn empty_lists_do_nothing() {
        let mut surfaces = SurfaceRegistry::new(FixedAdvance(6.0));
        let report = update_state_machines(&mut surfaces, &[], &Config::default());
        assert_eq!(report, BatchReport::default());
    }

    #[test]
    fn toggles_panels() {
        let mut panels = PanelSet::new();
        panels.insert("seq_0_div", PANEL_CLASS, false);
        assert_eq!(toggle_panel(&mut panels, "seq_0_div"), Some(true));
        assert_eq!(toggle_panel(&mut panels, "seq_0_div"), Some(false));
        assert_eq!(toggle_panel(&mut panels, "nope"), None);
    }

    #[test]
    fn closes_only_collapsible_panels() {
        let mut panels = PanelSet::new();
        panels.insert("a", PANEL_CLASS, true);
        panels.insert("b", PANEL_CLASS, true);
        panels.insert("nav", "menu", true);
        close_all_panels(&mut panels);
        assert_eq!(panels.is_visible("a"), Some(false));
        assert_eq!(panels.is_visible("b"), Some(false));
        assert_eq!(panels.is_visible("nav"), Some(true));
    }
}
