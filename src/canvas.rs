//! The drawing-surface seam.
//!
//! Renderers only ever talk to a [`DrawingContext`], a narrow slice of the
//! HTML canvas 2D API. Surfaces are looked up by id through a
//! [`SurfaceProvider`]; an unknown id means "no canvas here" and the renderer
//! leaves the diagram alone.

use crate::text_metrics::TextMeasure;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
}

pub trait DrawingContext {
    /// Resizes the owning surface. Clears whatever was drawn before.
    fn resize(&mut self, width: f32, height: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32);
    /// Clockwise arc around `(x, y)`; angles in radians.
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn measure_text(&self, text: &str) -> f32;
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);
}

/// Resolves a surface id to a drawing context.
pub trait SurfaceProvider {
    fn surface(&mut self, id: &str) -> Option<&mut dyn DrawingContext>;
}

/// What a render call did with the surface it was pointed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    Drawn { width: f32, height: f32 },
    /// No surface with that id; the caller should fall back to text.
    SurfaceMissing,
}

impl RenderOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, RenderOutcome::Drawn { .. })
    }
}

/// One call made against a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Resize {
        width: f32,
        height: f32,
    },
    BeginPath,
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    BezierCurveTo {
        cp1: (f32, f32),
        cp2: (f32, f32),
        end: (f32, f32),
    },
    Arc {
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Stroke,
    Fill,
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
    },
    TextBaseline {
        baseline: TextBaseline,
    },
    FillStyle {
        color: String,
    },
    StrokeStyle {
        color: String,
    },
    LineWidth {
        width: f32,
    },
}

/// A drawing context that keeps every call in order instead of painting.
///
/// The recorded stream is what the SVG writer, the command dump and the tests
/// consume.
#[derive(Debug, Clone)]
pub struct Recorder<M> {
    measure: M,
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl<M: TextMeasure> Recorder<M> {
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            width: 0.0,
            height: 0.0,
            commands: Vec::new(),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl<M: TextMeasure> DrawingContext for Recorder<M> {
    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
        self.push(DrawCommand::Resize { width, height });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        self.push(DrawCommand::BezierCurveTo {
            cp1: (cp1x, cp1y),
            cp2: (cp2x, cp2y),
            end: (x, y),
        });
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::StrokeRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn measure_text(&self, text: &str) -> f32 {
        self.measure.text_width(text)
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawCommand::TextBaseline { baseline });
    }

    fn set_fill_style(&mut self, color: &str) {
        self.push(DrawCommand::FillStyle {
            color: color.to_string(),
        });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.push(DrawCommand::StrokeStyle {
            color: color.to_string(),
        });
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(DrawCommand::LineWidth { width });
    }
}

/// Recording surfaces keyed by id, iterated in id order.
#[derive(Debug, Clone)]
pub struct SurfaceRegistry<M> {
    measure: M,
    surfaces: BTreeMap<String, Recorder<M>>,
}

impl<M: TextMeasure + Clone> SurfaceRegistry<M> {
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            surfaces: BTreeMap::new(),
        }
    }

    /// Makes `id` resolvable. Provisioning an existing id keeps its drawing.
    pub fn provision(&mut self, id: impl Into<String>) {
        let measure = self.measure.clone();
        self.surfaces
            .entry(id.into())
            .or_insert_with(|| Recorder::new(measure));
    }

    pub fn get(&self, id: &str) -> Option<&Recorder<M>> {
        self.surfaces.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Recorder<M>)> {
        self.surfaces.iter().map(|(id, surface)| (id.as_str(), surface))
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl<M: TextMeasure> SurfaceProvider for SurfaceRegistry<M> {
    fn surface(&mut self, id: &str) -> Option<&mut dyn DrawingContext> {
        self.surfaces
            .get_mut(id)
            .map(|surface| surface as &mut dyn DrawingContext)
    }
}
