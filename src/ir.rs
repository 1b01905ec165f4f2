use crate::error::{DiagramError, IndexKind, Result};
use serde::{Deserialize, Serialize};

/// Position of a timeline (column) inside a [`SequenceDiagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineIndex(usize);

impl TimelineIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// Position of a node inside a [`StateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceMessage {
    pub from: TimelineIndex,
    pub to: TimelineIndex,
    #[serde(alias = "label")]
    pub name: String,
}

impl SequenceMessage {
    pub fn new(from: usize, to: usize, name: impl Into<String>) -> Self {
        Self {
            from: TimelineIndex::new(from),
            to: TimelineIndex::new(to),
            name: name.into(),
        }
    }

    pub fn is_self_message(&self) -> bool {
        self.from == self.to
    }
}

/// A validated sequence diagram: every message references an existing timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSequenceDiagram")]
pub struct SequenceDiagram {
    name: Option<String>,
    canvas_id: String,
    timelines: Vec<String>,
    messages: Vec<SequenceMessage>,
}

#[derive(Deserialize)]
struct RawSequenceDiagram {
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "canvasTargetId", alias = "canvasId")]
    canvas_id: String,
    #[serde(default)]
    timelines: Vec<String>,
    #[serde(default)]
    messages: Vec<SequenceMessage>,
}

impl TryFrom<RawSequenceDiagram> for SequenceDiagram {
    type Error = DiagramError;

    fn try_from(raw: RawSequenceDiagram) -> Result<Self> {
        let diagram = Self::new(raw.canvas_id, raw.timelines, raw.messages)?;
        Ok(match raw.name {
            Some(name) => diagram.with_name(name),
            None => diagram,
        })
    }
}

impl SequenceDiagram {
    pub fn new(
        canvas_id: impl Into<String>,
        timelines: Vec<String>,
        messages: Vec<SequenceMessage>,
    ) -> Result<Self> {
        let canvas_id = canvas_id.into();
        if timelines.is_empty() && !messages.is_empty() {
            return Err(DiagramError::EmptyTimelines(canvas_id));
        }
        let len = timelines.len();
        for (position, message) in messages.iter().enumerate() {
            for index in [message.from, message.to] {
                if index.get() >= len {
                    return Err(DiagramError::IndexOutOfRange {
                        kind: IndexKind::Timeline,
                        position,
                        index: index.get(),
                        len,
                    });
                }
            }
        }
        Ok(Self {
            name: None,
            canvas_id,
            timelines,
            messages,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn timelines(&self) -> &[String] {
        &self.timelines
    }

    pub fn timeline(&self, index: TimelineIndex) -> &str {
        &self.timelines[index.get()]
    }

    pub fn messages(&self) -> &[SequenceMessage] {
        &self.messages
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    pub x: u32,
    pub y: u32,
}

impl StateNode {
    pub fn new(name: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStateEdge")]
pub struct StateEdge {
    pub from_node: NodeIndex,
    pub to_node: NodeIndex,
    pub label: String,
}

#[derive(Deserialize)]
struct RawStateEdge {
    #[serde(alias = "fromNode")]
    from_node: NodeIndex,
    #[serde(alias = "toNode")]
    to_node: NodeIndex,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    trigger: Option<String>,
    #[serde(default)]
    triggers: Option<String>,
}

impl From<RawStateEdge> for StateEdge {
    fn from(raw: RawStateEdge) -> Self {
        // doc-gen pages carry the transition text as `trigger`/`triggers`.
        let label = [raw.label, raw.trigger, raw.triggers]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .unwrap_or_default();
        Self {
            from_node: raw.from_node,
            to_node: raw.to_node,
            label,
        }
    }
}

impl StateEdge {
    pub fn new(from: usize, to: usize, label: impl Into<String>) -> Self {
        Self {
            from_node: NodeIndex::new(from),
            to_node: NodeIndex::new(to),
            label: label.into(),
        }
    }
}

/// A validated state machine: every edge references an existing node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStateMachine")]
pub struct StateMachine {
    name: Option<String>,
    canvas_id: String,
    #[serde(rename = "x_size")]
    x_extent: u32,
    #[serde(rename = "y_size")]
    y_extent: u32,
    nodes: Vec<StateNode>,
    vertices: Vec<StateEdge>,
}

#[derive(Deserialize)]
struct RawStateMachine {
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "canvasTargetId", alias = "canvasId")]
    canvas_id: String,
    #[serde(default, alias = "xExtent")]
    x_size: Option<u32>,
    #[serde(default, alias = "yExtent")]
    y_size: Option<u32>,
    #[serde(default)]
    nodes: Vec<StateNode>,
    #[serde(default, alias = "edges")]
    vertices: Vec<StateEdge>,
}

impl TryFrom<RawStateMachine> for StateMachine {
    type Error = DiagramError;

    fn try_from(raw: RawStateMachine) -> Result<Self> {
        let mut machine = Self::new(raw.canvas_id, raw.nodes, raw.vertices)?;
        if let Some(x) = raw.x_size {
            machine.x_extent = x;
        }
        if let Some(y) = raw.y_size {
            machine.y_extent = y;
        }
        if let Some(name) = raw.name {
            machine.name = Some(name);
        }
        Ok(machine)
    }
}

impl StateMachine {
    /// Builds a machine whose grid extent covers every node.
    pub fn new(
        canvas_id: impl Into<String>,
        nodes: Vec<StateNode>,
        vertices: Vec<StateEdge>,
    ) -> Result<Self> {
        let len = nodes.len();
        for (position, edge) in vertices.iter().enumerate() {
            for index in [edge.from_node, edge.to_node] {
                if index.get() >= len {
                    return Err(DiagramError::IndexOutOfRange {
                        kind: IndexKind::Node,
                        position,
                        index: index.get(),
                        len,
                    });
                }
            }
        }
        let x_extent = nodes.iter().map(|node| node.x.saturating_add(1)).max().unwrap_or(0);
        let y_extent = nodes.iter().map(|node| node.y.saturating_add(1)).max().unwrap_or(0);
        Ok(Self {
            name: None,
            canvas_id: canvas_id.into(),
            x_extent,
            y_extent,
            nodes,
            vertices,
        })
    }

    pub fn with_extent(mut self, x_extent: u32, y_extent: u32) -> Self {
        self.x_extent = x_extent;
        self.y_extent = y_extent;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn x_extent(&self) -> u32 {
        self.x_extent
    }

    pub fn y_extent(&self) -> u32 {
        self.y_extent
    }

    pub fn nodes(&self) -> &[StateNode] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &StateNode {
        &self.nodes[index.get()]
    }

    pub fn vertices(&self) -> &[StateEdge] {
        &self.vertices
    }
}

/// Everything a single input document describes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSet {
    #[serde(default, alias = "sequenceDiagrams")]
    pub sequence_diagrams: Vec<SequenceDiagram>,
    #[serde(default, alias = "stateMachines")]
    pub state_machines: Vec<StateMachine>,
}

impl DiagramSet {
    pub fn is_empty(&self) -> bool {
        self.sequence_diagrams.is_empty() && self.state_machines.is_empty()
    }

    pub fn canvas_ids(&self) -> impl Iterator<Item = &str> {
        self.sequence_diagrams
            .iter()
            .map(SequenceDiagram::canvas_id)
            .chain(self.state_machines.iter().map(StateMachine::canvas_id))
    }
}
