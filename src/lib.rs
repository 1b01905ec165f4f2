pub mod batch;
pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod command_dump;
pub mod config;
pub mod draw;
pub mod error;
pub mod fallback;
pub mod ir;
pub mod parser;
pub mod render;
pub mod sequence;
pub mod state_machine;
pub mod text_metrics;
pub mod theme;

pub use batch::{BatchReport, render_all, update_sequence_diagrams, update_state_machines};
pub use canvas::{DrawingContext, Recorder, RenderOutcome, SurfaceProvider, SurfaceRegistry};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use error::DiagramError;
pub use ir::{DiagramSet, SequenceDiagram, SequenceMessage, StateEdge, StateMachine, StateNode};
pub use parser::parse_document;
pub use sequence::draw_sequence_diagram;
pub use state_machine::draw_state_machine;
