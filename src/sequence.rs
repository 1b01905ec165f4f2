//! Sequence diagram renderer.
//!
//! Timelines are evenly spaced columns, wide enough for the widest timeline
//! header or message label. Each message takes one row below the headers.

use crate::canvas::{DrawingContext, RenderOutcome, SurfaceProvider};
use crate::config::{Config, LayoutConfig};
use crate::draw::Painter;
use crate::ir::SequenceDiagram;
use tracing::{debug, trace};

/// Pure geometry of a sequence diagram; no drawing involved.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceLayout {
    pub column_spacing: f32,
    pub column_offsets: Vec<f32>,
    pub y_top: f32,
    pub width: f32,
    pub height: f32,
}

impl SequenceLayout {
    pub fn compute<C: DrawingContext + ?Sized>(
        ctx: &C,
        diagram: &SequenceDiagram,
        layout: &LayoutConfig,
    ) -> Self {
        let column_spacing = calculate_columns(ctx, diagram, layout);
        let (width, height) = surface_size(ctx, diagram, layout, column_spacing);
        Self {
            column_spacing,
            column_offsets: column_offsets(
                first_label_width(diagram, |name| ctx.measure_text(name)),
                column_spacing,
                diagram.timelines().len(),
                layout,
            ),
            y_top: layout.top_margin(),
            width,
            height,
        }
    }
}

/// Uniform distance between adjacent timelines: the widest padded timeline
/// label or message label.
pub fn calculate_columns<C: DrawingContext + ?Sized>(
    ctx: &C,
    diagram: &SequenceDiagram,
    layout: &LayoutConfig,
) -> f32 {
    let timelines = diagram
        .timelines()
        .iter()
        .map(|name| ctx.measure_text(name) + layout.box_padding);
    let messages = diagram
        .messages()
        .iter()
        .map(|message| ctx.measure_text(&message.name) + layout.message_padding);
    timelines.chain(messages).fold(0.0, f32::max)
}

/// Pixel size the surface must have to hold the whole diagram.
pub fn surface_size<C: DrawingContext + ?Sized>(
    ctx: &C,
    diagram: &SequenceDiagram,
    layout: &LayoutConfig,
    column_spacing: f32,
) -> (f32, f32) {
    let timelines = diagram.timelines();
    let first = first_label_width(diagram, |name| ctx.measure_text(name));
    let last = timelines.last().map_or(0.0, |name| ctx.measure_text(name));

    let width = layout.box_padding
        + first / 2.0
        + column_spacing * timelines.len() as f32
        + layout.box_padding
        + last / 2.0
        + layout.box_padding;
    let height = layout.box_height()
        + (diagram.messages().len() + 1) as f32 * layout.message_row_height
        + layout.box_height()
        + layout.box_padding;
    (width, height)
}

fn first_label_width(diagram: &SequenceDiagram, measure: impl Fn(&str) -> f32) -> f32 {
    diagram.timelines().first().map_or(0.0, |name| measure(name))
}

fn column_offsets(
    first_width: f32,
    column_spacing: f32,
    count: usize,
    layout: &LayoutConfig,
) -> Vec<f32> {
    // Centre the first column on its own header box.
    let sequence_offset = layout.box_padding + first_width / 2.0;
    (0..count)
        .map(|column| sequence_offset + column as f32 * column_spacing)
        .collect()
}

/// Draws header box, lifeline and footer box for every timeline and returns
/// the x offset of each column.
pub fn draw_timelines<C: DrawingContext + ?Sized>(
    painter: &mut Painter<'_, C>,
    layout: &LayoutConfig,
    column_spacing: f32,
    y: f32,
    diagram: &SequenceDiagram,
) -> Vec<f32> {
    let total_timeline_height =
        layout.message_row_height * (diagram.messages().len() + 1) as f32;
    let box_height = layout.box_height();
    let offsets = column_offsets(
        first_label_width(diagram, |name| painter.measure(name)),
        column_spacing,
        diagram.timelines().len(),
        layout,
    );

    for (name, &x) in diagram.timelines().iter().zip(&offsets) {
        painter.draw_text_box(x, y, name);
        painter.draw_line(x, y + box_height, x, y + box_height + total_timeline_height);
        painter.draw_text_box(x, y + box_height + total_timeline_height, name);
    }
    offsets
}

/// Draws one labelled arrow per message, a row apart, below the headers.
pub fn draw_messages<C: DrawingContext + ?Sized>(
    painter: &mut Painter<'_, C>,
    layout: &LayoutConfig,
    y: f32,
    column_offsets: &[f32],
    diagram: &SequenceDiagram,
) {
    let mut y_axis = y + layout.box_height();
    for message in diagram.messages() {
        y_axis += layout.message_row_height;
        let start = column_offsets[message.from.get()];
        let end = column_offsets[message.to.get()];
        painter.draw_text_arrow(start, y_axis, end - start, &message.name);
    }
}

/// Lays out and paints `diagram` onto an already resolved context.
pub fn paint_sequence_diagram<C: DrawingContext + ?Sized>(
    ctx: &mut C,
    diagram: &SequenceDiagram,
    config: &Config,
) -> SequenceLayout {
    let layout = &config.layout;
    let computed = SequenceLayout::compute(&*ctx, diagram, layout);
    trace!(
        canvas = diagram.canvas_id(),
        width = computed.width,
        height = computed.height,
        column_spacing = computed.column_spacing,
        "sequence diagram layout"
    );

    ctx.resize(computed.width, computed.height);
    let mut painter = Painter::new(ctx, layout, &config.theme);
    let offsets = draw_timelines(
        &mut painter,
        layout,
        computed.column_spacing,
        computed.y_top,
        diagram,
    );
    draw_messages(&mut painter, layout, computed.y_top, &offsets, diagram);
    computed
}

/// Resolves the diagram's surface and renders onto it. A missing surface is a
/// no-op so the page can keep its text rendering.
pub fn draw_sequence_diagram<P: SurfaceProvider + ?Sized>(
    surfaces: &mut P,
    diagram: &SequenceDiagram,
    config: &Config,
) -> RenderOutcome {
    let Some(ctx) = surfaces.surface(diagram.canvas_id()) else {
        debug!(canvas = diagram.canvas_id(), "no surface for sequence diagram");
        return RenderOutcome::SurfaceMissing;
    };
    let computed = paint_sequence_diagram(ctx, diagram, config);
    RenderOutcome::Drawn {
        width: computed.width,
        height: computed.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, Recorder, SurfaceRegistry};
    use crate::ir::SequenceMessage;
    use crate::text_metrics::FixedAdvance;

    fn diagram(timelines: &[&str], messages: Vec<SequenceMessage>) -> SequenceDiagram {
        SequenceDiagram::new(
            "seq_0",
            timelines.iter().map(|name| name.to_string()).collect(),
            messages,
        )
        .unwrap()
    }

    fn ping() -> SequenceDiagram {
        diagram(&["A", "B"], vec![SequenceMessage::new(0, 1, "ping")])
    }

    #[test]
    fn column_spacing_covers_every_label() {
        let ctx = Recorder::new(FixedAdvance(6.0));
        let layout = LayoutConfig::default();
        let d = diagram(
            &["client", "a-much-longer-server-name"],
            vec![SequenceMessage::new(0, 1, "hi"), SequenceMessage::new(1, 0, "ok")],
        );
        let spacing = calculate_columns(&ctx, &d, &layout);
        assert_eq!(spacing, 25.0 * 6.0 + 8.0);
        for name in d.timelines() {
            assert!(spacing >= ctx.measure_text(name) + layout.box_padding);
        }
        for message in d.messages() {
            assert!(spacing >= ctx.measure_text(&message.name) + layout.message_padding);
        }
    }

    #[test]
    fn message_labels_can_set_column_spacing() {
        let ctx = Recorder::new(FixedAdvance(6.0));
        let spacing = calculate_columns(&ctx, &ping(), &LayoutConfig::default());
        assert_eq!(spacing, 24.0 + 34.0);
    }

    #[test]
    fn height_depends_only_on_message_count() {
        let ctx = Recorder::new(FixedAdvance(6.0));
        let layout = LayoutConfig::default();
        let short = diagram(&["A", "B"], vec![SequenceMessage::new(0, 1, "x"); 3]);
        let long = diagram(
            &["Alpha", "Beta", "Gamma"],
            vec![SequenceMessage::new(2, 0, "a very long label indeed"); 3],
        );
        let expected = 18.0 + 4.0 * 15.0 + 18.0 + 8.0;
        for d in [&short, &long] {
            let spacing = calculate_columns(&ctx, d, &layout);
            assert_eq!(surface_size(&ctx, d, &layout, spacing).1, expected);
        }
    }

    #[test]
    fn width_adds_half_labels_and_margins() {
        let ctx = Recorder::new(FixedAdvance(6.0));
        let layout = LayoutConfig::default();
        let d = ping();
        let (width, _) = surface_size(&ctx, &d, &layout, 58.0);
        assert_eq!(width, 8.0 + 3.0 + 58.0 * 2.0 + 8.0 + 3.0 + 8.0);
    }

    #[test]
    fn ping_scenario_draws_expected_elements() {
        let mut surfaces = SurfaceRegistry::new(FixedAdvance(6.0));
        surfaces.provision("seq_0");
        let outcome = draw_sequence_diagram(&mut surfaces, &ping(), &Config::default());
        assert!(outcome.is_drawn());

        let commands = surfaces.get("seq_0").unwrap().commands();
        let boxes = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        assert_eq!(boxes, 4);

        // Lifelines are the only vertical single-segment strokes.
        let lifelines = commands
            .windows(4)
            .filter(|w| match w {
                [
                    DrawCommand::BeginPath,
                    DrawCommand::MoveTo { x: x1, .. },
                    DrawCommand::LineTo { x: x2, .. },
                    DrawCommand::Stroke,
                ] => x1 == x2,
                _ => false,
            })
            .count();
        assert_eq!(lifelines, 2);

        let labels: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect();
        let arrows: Vec<_> = labels.iter().filter(|(text, _)| *text == "ping").collect();
        assert_eq!(arrows.len(), 1);
        // Header top at 4, header height 18, first row 15 below; label sits 5 above.
        assert_eq!(arrows[0].1, 4.0 + 18.0 + 15.0 - 5.0);
    }

    #[test]
    fn resizes_surface_first() {
        let mut surfaces = SurfaceRegistry::new(FixedAdvance(6.0));
        surfaces.provision("seq_0");
        let outcome = draw_sequence_diagram(&mut surfaces, &ping(), &Config::default());
        let recorder = surfaces.get("seq_0").unwrap();
        let RenderOutcome::Drawn { width, height } = outcome else {
            panic!("expected a drawn diagram");
        };
        assert_eq!(recorder.size(), (width, height));
        assert!(matches!(recorder.commands()[0], DrawCommand::Resize { .. }));
    }

    #[test]
    fn missing_surface_is_a_no_op() {
        let mut surfaces = SurfaceRegistry::new(FixedAdvance(6.0));
        surfaces.provision("other");
        let outcome = draw_sequence_diagram(&mut surfaces, &ping(), &Config::default());
        assert_eq!(outcome, RenderOutcome::SurfaceMissing);
        assert!(surfaces.get("other").unwrap().is_blank());
    }

    #[test]
    fn rendering_is_deterministic() {
        let d = diagram(
            &["A", "B", "C"],
            vec![
                SequenceMessage::new(0, 2, "open"),
                SequenceMessage::new(2, 1, "fwd"),
                SequenceMessage::new(1, 1, "self"),
            ],
        );
        let run = || {
            let mut ctx = Recorder::new(FixedAdvance(6.0));
            paint_sequence_diagram(&mut ctx, &d, &Config::default());
            ctx.into_commands()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn columns_are_evenly_spaced() {
        let ctx = Recorder::new(FixedAdvance(6.0));
        let d = diagram(&["AB", "C", "D"], vec![SequenceMessage::new(0, 2, "go")]);
        let computed = SequenceLayout::compute(&ctx, &d, &LayoutConfig::default());
        assert_eq!(computed.column_offsets, vec![14.0, 14.0 + 46.0, 14.0 + 92.0]);
    }
}
