//! State machine renderer.
//!
//! Nodes sit on an integer grid scaled by a uniform spacing derived from the
//! widest node label. Edges that would run straight through an unrelated node
//! are bowed out with a bezier curve instead.

use crate::canvas::{DrawingContext, RenderOutcome, SurfaceProvider};
use crate::config::{Config, LayoutConfig};
use crate::draw::{EdgeRoute, Painter};
use crate::ir::{StateEdge, StateMachine, StateNode};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateMachineLayout {
    pub node_size: f32,
    pub node_spacing: f32,
    pub radius: f32,
    pub width: f32,
    pub height: f32,
}

impl StateMachineLayout {
    pub fn compute<C: DrawingContext + ?Sized>(
        ctx: &C,
        machine: &StateMachine,
        layout: &LayoutConfig,
    ) -> Self {
        let node_size = calculate_node_size(ctx, machine, layout);
        let node_spacing = node_size + layout.node_gap;
        Self {
            node_size,
            node_spacing,
            radius: node_size / 2.0,
            width: machine.x_extent() as f32 * node_spacing,
            height: machine.y_extent() as f32 * node_spacing,
        }
    }

    /// Pixel centre of a node.
    pub fn position(&self, node: &StateNode) -> (f32, f32) {
        (
            node.x as f32 * self.node_spacing,
            node.y as f32 * self.node_spacing,
        )
    }
}

/// Widest padded node label; the diameter basis for every node circle.
pub fn calculate_node_size<C: DrawingContext + ?Sized>(
    ctx: &C,
    machine: &StateMachine,
    layout: &LayoutConfig,
) -> f32 {
    machine
        .nodes()
        .iter()
        .map(|node| ctx.measure_text(&node.name) + layout.box_padding)
        .fold(0.0, f32::max)
}

/// Whether some node other than the edge's endpoints lies exactly on the line
/// through them, between the source and the far end.
///
/// Grid coordinates are integers, so collinearity is an exact cross product.
pub fn detect_clash(machine: &StateMachine, edge: &StateEdge) -> bool {
    let from = machine.node(edge.from_node);
    let to = machine.node(edge.to_node);
    let dx = i64::from(from.x) - i64::from(to.x);
    let dy = i64::from(from.y) - i64::from(to.y);

    machine
        .nodes()
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != edge.from_node.get() && *index != edge.to_node.get())
        .any(|(_, node)| {
            let dx_c = i64::from(from.x) - i64::from(node.x);
            let dy_c = i64::from(from.y) - i64::from(node.y);
            dx.abs() > dx_c.abs() && dx * dx_c >= 0 && dx * dy_c - dy * dx_c == 0
        })
}

/// Lays out and paints `machine` onto an already resolved context. Returns
/// the geometry together with the route each edge took, in edge order.
pub fn paint_state_machine<C: DrawingContext + ?Sized>(
    ctx: &mut C,
    machine: &StateMachine,
    config: &Config,
) -> (StateMachineLayout, Vec<EdgeRoute>) {
    let layout = &config.layout;
    let computed = StateMachineLayout::compute(&*ctx, machine, layout);
    trace!(
        canvas = machine.canvas_id(),
        width = computed.width,
        height = computed.height,
        radius = computed.radius,
        "state machine layout"
    );

    ctx.resize(computed.width, computed.height);
    let mut painter = Painter::new(ctx, layout, &config.theme);

    for node in machine.nodes() {
        let (x, y) = computed.position(node);
        painter.draw_text_circle(x, y, computed.radius, &node.name);
    }

    let routes = machine
        .vertices()
        .iter()
        .map(|edge| {
            let clash = detect_clash(machine, edge);
            let from = computed.position(machine.node(edge.from_node));
            let to = computed.position(machine.node(edge.to_node));
            let route = painter.draw_circle_text_arrow(from, to, computed.radius, clash, &edge.label);
            trace!(
                from = edge.from_node.get(),
                to = edge.to_node.get(),
                clash,
                ?route,
                "edge drawn"
            );
            route
        })
        .collect();

    (computed, routes)
}

/// Resolves the machine's surface and renders onto it. A missing surface is a
/// no-op so the page can keep its text rendering.
pub fn draw_state_machine<P: SurfaceProvider + ?Sized>(
    surfaces: &mut P,
    machine: &StateMachine,
    config: &Config,
) -> RenderOutcome {
    let Some(ctx) = surfaces.surface(machine.canvas_id()) else {
        debug!(canvas = machine.canvas_id(), "no surface for state machine");
        return RenderOutcome::SurfaceMissing;
    };
    let (computed, _) = paint_state_machine(ctx, machine, config);
    RenderOutcome::Drawn {
        width: computed.width,
        height: computed.height,
    }
}
