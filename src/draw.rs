//! Primitive drawing layer: arrows, arrowheads, labelled boxes and circles.

use crate::canvas::{DrawingContext, TextBaseline};
use crate::config::LayoutConfig;
use crate::theme::Theme;
use std::f32::consts::{FRAC_PI_4, TAU};
use tracing::debug;

/// How an edge between two node circles gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRoute {
    SelfLoop,
    Straight,
    Angled,
    Curved,
}

impl EdgeRoute {
    /// A clash wins over axis alignment: a straight edge along a row or
    /// column would run through the node sitting between its ends.
    pub fn classify(from: (f32, f32), to: (f32, f32), clash: bool) -> Self {
        if from == to {
            EdgeRoute::SelfLoop
        } else if clash {
            EdgeRoute::Curved
        } else if from.0 == to.0 || from.1 == to.1 {
            EdgeRoute::Straight
        } else {
            EdgeRoute::Angled
        }
    }
}

/// Direction of travel along one axis; zero counts as positive.
fn axis_dir(delta: f32) -> f32 {
    if delta < 0.0 { -1.0 } else { 1.0 }
}

/// Stateless drawing helpers bound to a context and the style they paint with.
pub struct Painter<'a, C: DrawingContext + ?Sized> {
    ctx: &'a mut C,
    layout: &'a LayoutConfig,
    theme: &'a Theme,
}

impl<'a, C: DrawingContext + ?Sized> Painter<'a, C> {
    pub fn new(ctx: &'a mut C, layout: &'a LayoutConfig, theme: &'a Theme) -> Self {
        Self { ctx, layout, theme }
    }

    pub fn measure(&self, text: &str) -> f32 {
        self.ctx.measure_text(text)
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ctx.set_stroke_style(&self.theme.line_color);
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    /// Horizontal segment of signed `length`, optionally tipped at its far end.
    pub fn draw_flat_arrow(&mut self, x: f32, y: f32, length: f32, with_head: bool) {
        self.ctx.begin_path();
        self.ctx.move_to(x, y);
        self.ctx.line_to(x + length, y);
        self.ctx.stroke();

        if !with_head {
            return;
        }
        if length == 0.0 {
            debug!(x, y, "zero-length flat arrow has no direction, head skipped");
            return;
        }

        let point_dir = -length.signum();
        let tip = x + length;
        let back = tip + self.layout.arrow_tip_length * point_dir;
        let half = self.layout.arrow_tip_half_width;

        self.ctx.set_fill_style(&self.theme.line_color);
        self.ctx.begin_path();
        self.ctx.move_to(tip, y);
        self.ctx.line_to(back, y - half);
        self.ctx.line_to(back, y + half);
        self.ctx.fill();
    }

    /// Axis-aligned arrow; the head sits at the origin end. Exactly one of
    /// `x_length`/`y_length` is expected to be zero.
    pub fn draw_straight_arrow(&mut self, x: f32, y: f32, x_length: f32, y_length: f32) {
        let half = self.layout.arrow_tip_half_width;
        let along = self.layout.arrow_head_length;
        let (x_offset, y_offset, x_line_offset, y_line_offset) = if x_length == 0.0 {
            (half, 0.0, 0.0, along * axis_dir(y_length))
        } else {
            (0.0, half, along * axis_dir(x_length), 0.0)
        };

        self.ctx.begin_path();
        self.ctx.move_to(x, y);
        self.ctx.line_to(x + x_length, y + y_length);
        self.ctx.stroke();

        self.ctx.set_fill_style(&self.theme.line_color);
        self.ctx.begin_path();
        self.ctx.move_to(x, y);
        self.ctx
            .line_to(x + x_offset + x_line_offset, y + y_offset + y_line_offset);
        self.ctx
            .line_to(x - x_offset + x_line_offset, y - y_offset + y_line_offset);
        self.ctx.fill();
    }

    /// Filled triangle with its apex at `(x, y)`, rotated by `angle` and
    /// mirrored by the sign of `x_dir`/`y_dir`.
    pub fn draw_arrow_head(&mut self, x: f32, y: f32, angle: f32, x_dir: f32, y_dir: f32) {
        let length = self.layout.arrow_head_length;
        let half = self.layout.arrow_head_half_width;
        let (sin, cos) = angle.sin_cos();

        let y2 = y - sin * length * y_dir - cos * half * y_dir;
        let y3 = y - sin * length * y_dir + cos * half * y_dir;
        let x2 = x + cos * length * x_dir - sin * half * x_dir;
        let x3 = x + cos * length * x_dir + sin * half * x_dir;

        self.ctx.set_fill_style(&self.theme.line_color);
        self.ctx.begin_path();
        self.ctx.move_to(x, y);
        self.ctx.line_to(x2, y2);
        self.ctx.line_to(x3, y3);
        self.ctx.fill();
    }

    /// Straight connector between two circles of `radius`, trimmed to their
    /// boundaries, with the head on the `to` circle.
    pub fn draw_angled_arrow(&mut self, from: (f32, f32), to: (f32, f32), radius: f32, label: &str) {
        self.ctx.set_stroke_style(&self.theme.line_color);
        self.ctx.set_fill_style(&self.theme.line_color);

        // Always work left to right.
        let ((x1, y1), (x2, y2), arrow_dir) = if from.0 > to.0 {
            (to, from, 1.0)
        } else {
            (from, to, -1.0)
        };

        let theta = (y2 - y1).atan2(x2 - x1);
        let x_offset = theta.cos() * radius;
        let y_offset = theta.sin() * radius;
        let y_dir = axis_dir(to.1 - from.1);

        let start = (x1 + x_offset, y1 + y_offset);
        let end = (x2 - x_offset, y2 - y_offset);

        self.ctx.begin_path();
        self.ctx.move_to(start.0, start.1);
        self.ctx.line_to(end.0, end.1);
        self.ctx.stroke();

        self.draw_arrow_head(
            to.0 + x_offset * arrow_dir,
            to.1 + y_offset * arrow_dir,
            theta.abs(),
            arrow_dir,
            y_dir,
        );

        self.draw_edge_label((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0, label);
    }

    /// Like [`Self::draw_angled_arrow`] but bowed out through a cubic bezier so
    /// the edge clears nodes sitting on the straight line.
    pub fn draw_curved_arrow(&mut self, from: (f32, f32), to: (f32, f32), radius: f32, label: &str) {
        self.ctx.set_stroke_style(&self.theme.line_color);
        self.ctx.set_fill_style(&self.theme.line_color);

        let ((x1, y1), (x2, y2), arrow_dir) = if from.0 > to.0 {
            (to, from, 1.0)
        } else {
            (from, to, -1.0)
        };

        let theta = (y2 - y1).atan2(x2 - x1);
        let x_offset = theta.cos() * radius;
        let y_offset = theta.sin() * radius;

        let start = (x1 + x_offset, y1 + y_offset);
        let end = (x2 - x_offset, y2 - y_offset);

        let angle = theta.abs();
        let bow = radius * self.layout.curve_offset_factor;
        let cp1 = (start.0 - angle.sin() * bow, start.1 + angle.cos() * bow);
        let cp2 = (end.0 - angle.sin() * bow, end.1 + angle.cos() * bow);

        self.ctx.begin_path();
        self.ctx.move_to(start.0, start.1);
        self.ctx
            .bezier_curve_to(cp1.0, cp1.1, cp2.0, cp2.1, end.0, end.1);
        self.ctx.stroke();

        // The head sits on whichever trimmed end belongs to `to`.
        let head = if arrow_dir > 0.0 { start } else { end };
        self.draw_arrow_head(head.0, head.1, angle, arrow_dir, axis_dir(to.1 - from.1));

        // Cubic bezier midpoint, t = 0.5.
        let mid_x = (start.0 + 3.0 * cp1.0 + 3.0 * cp2.0 + end.0) / 8.0;
        let mid_y = (start.1 + 3.0 * cp1.1 + 3.0 * cp2.1 + end.1) / 8.0;
        self.draw_edge_label(mid_x, mid_y, label);
    }

    /// Horizontal arrow of signed `length` split around its centred label.
    pub fn draw_text_arrow(&mut self, x: f32, y: f32, length: f32, label: &str) {
        let text_size = self.ctx.measure_text(label);
        let line_size = (length.abs() - text_size) / 2.0;
        let gap = self.layout.label_gap;
        let point_dir = if length != 0.0 { -length.signum() } else { 1.0 };

        let seg_1_end = x - (line_size - gap) * point_dir;
        let seg_2_start = x - (line_size + text_size + gap) * point_dir;
        let seg_2_end = x - (line_size * 2.0 + text_size) * point_dir;

        self.ctx.begin_path();
        self.ctx.move_to(x, y);
        self.ctx.line_to(seg_1_end, y);
        self.ctx.stroke();

        self.ctx.begin_path();
        self.ctx.move_to(seg_2_start, y);
        self.ctx.line_to(seg_2_end, y);
        self.ctx.stroke();

        let back = seg_2_end + self.layout.arrow_tip_length * point_dir;
        let half = self.layout.arrow_tip_half_width;
        self.ctx.set_fill_style(&self.theme.line_color);
        self.ctx.begin_path();
        self.ctx.move_to(seg_2_end, y);
        self.ctx.line_to(back, y - half);
        self.ctx.line_to(back, y + half);
        self.ctx.fill();

        let text_x = if point_dir < 0.0 {
            seg_1_end + gap
        } else {
            seg_2_start + gap
        };
        self.ctx.set_fill_style(&self.theme.text_color);
        self.ctx.fill_text(label, text_x, y - self.layout.label_lift);
    }

    /// Labelled box centred on `x` with its top edge at `y`.
    pub fn draw_text_box(&mut self, x: f32, y: f32, label: &str) {
        let text_length = self.ctx.measure_text(label);
        let width = self.layout.box_padding + text_length;
        let height = self.layout.box_height();

        self.ctx.set_text_baseline(TextBaseline::Top);
        self.apply_box_style();

        let x_pos = x - width / 2.0;
        self.ctx.fill_rect(x_pos, y, width, height);
        self.ctx.stroke_rect(x_pos, y, width, height);

        self.ctx.set_fill_style(&self.theme.text_color);
        self.ctx.fill_text(
            label,
            x_pos + self.layout.box_inset,
            y + self.layout.box_inset,
        );
    }

    /// Labelled circle centred on `(x, y)`.
    pub fn draw_text_circle(&mut self, x: f32, y: f32, radius: f32, label: &str) {
        self.ctx.set_text_baseline(TextBaseline::Middle);
        self.apply_box_style();

        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, TAU);
        self.ctx.fill();
        self.ctx.stroke();

        let text_width = self.ctx.measure_text(label);
        self.ctx.set_fill_style(&self.theme.text_color);
        self.ctx.fill_text(label, x - text_width / 2.0, y);
    }

    /// Routes an edge between two node circles and returns the route taken.
    pub fn draw_circle_text_arrow(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        radius: f32,
        clash: bool,
        label: &str,
    ) -> EdgeRoute {
        self.ctx.set_text_baseline(TextBaseline::Middle);
        self.apply_box_style();

        let route = EdgeRoute::classify(from, to, clash);
        match route {
            EdgeRoute::SelfLoop => self.draw_self_loop(from, radius, label),
            EdgeRoute::Straight => {
                let x_diff = from.0 - to.0;
                let y_diff = from.1 - to.1;
                let (x_offset, y_offset) = if x_diff == 0.0 {
                    (0.0, radius * axis_dir(y_diff))
                } else {
                    (radius * axis_dir(x_diff), 0.0)
                };
                self.draw_straight_arrow(
                    to.0 + x_offset,
                    to.1 + y_offset,
                    x_diff - x_offset * 2.0,
                    y_diff - y_offset * 2.0,
                );
                self.draw_edge_label((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0, label);
            }
            EdgeRoute::Angled => self.draw_angled_arrow(from, to, radius, label),
            EdgeRoute::Curved => self.draw_curved_arrow(from, to, radius, label),
        }
        route
    }

    /// Loop leaving and re-entering the right-hand side of a circle.
    fn draw_self_loop(&mut self, center: (f32, f32), radius: f32, label: &str) {
        let (x, y) = (center.0 + radius, center.1);
        let reach = radius * self.layout.self_loop_reach;
        let point_x = x + FRAC_PI_4.sin() * reach;
        let point_y1 = y - FRAC_PI_4.cos() * reach;
        let point_y2 = y + FRAC_PI_4.cos() * reach;
        let anchor_x = x + self.layout.self_loop_gap;

        self.ctx.begin_path();
        self.ctx.move_to(anchor_x, y);
        self.ctx
            .bezier_curve_to(point_x, point_y1, point_x, point_y2, anchor_x, y);
        self.ctx.stroke();

        self.draw_arrow_head(x, y, 0.0, 1.0, -1.0);

        // The loop's outermost point is 3/4 of the way to the control points.
        let apex_x = anchor_x + (point_x - anchor_x) * 0.75;
        let label_width = self.ctx.measure_text(label);
        self.draw_edge_label(apex_x + self.layout.self_loop_gap + label_width / 2.0, y, label);
    }

    fn draw_edge_label(&mut self, x: f32, y: f32, label: &str) {
        if !self.layout.edge_labels || label.is_empty() {
            return;
        }
        let width = self.ctx.measure_text(label);
        self.ctx.set_text_baseline(TextBaseline::Middle);
        self.ctx.set_fill_style(&self.theme.text_color);
        self.ctx.fill_text(label, x - width / 2.0, y);
    }

    fn apply_box_style(&mut self) {
        self.ctx.set_fill_style(&self.theme.box_fill);
        self.ctx.set_stroke_style(&self.theme.line_color);
        self.ctx.set_line_width(self.theme.line_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, Recorder};
    use crate::text_metrics::FixedAdvance;

    fn recorder() -> Recorder<FixedAdvance> {
        Recorder::new(FixedAdvance(6.0))
    }

    fn points(commands: &[DrawCommand]) -> Vec<(f32, f32)> {
        commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::MoveTo { x, y } | DrawCommand::LineTo { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn flat_arrow_head_points_along_travel() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_flat_arrow(10.0, 5.0, 30.0, true);
        let pts = points(ctx.commands());
        assert_eq!(pts[..2], [(10.0, 5.0), (40.0, 5.0)]);
        assert_eq!(pts[2..], [(40.0, 5.0), (30.0, 1.0), (30.0, 9.0)]);

        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_flat_arrow(40.0, 5.0, -30.0, true);
        let pts = points(ctx.commands());
        assert_eq!(pts[2..], [(10.0, 5.0), (20.0, 1.0), (20.0, 9.0)]);
    }

    #[test]
    fn zero_length_flat_arrow_draws_no_head() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_flat_arrow(10.0, 5.0, 0.0, true);
        assert!(!ctx.commands().contains(&DrawCommand::Fill));
        assert!(points(ctx.commands()).iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn straight_arrow_head_sits_at_origin() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_straight_arrow(0.0, 0.0, 0.0, 50.0);
        let pts = points(ctx.commands());
        assert_eq!(pts[..2], [(0.0, 0.0), (0.0, 50.0)]);
        assert_eq!(pts[2..], [(0.0, 0.0), (4.0, 4.0), (-4.0, 4.0)]);

        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_straight_arrow(0.0, 0.0, -50.0, 0.0);
        let pts = points(ctx.commands());
        assert_eq!(pts[2..], [(0.0, 0.0), (-4.0, 4.0), (-4.0, -4.0)]);
    }

    #[test]
    fn arrow_head_at_zero_angle() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_arrow_head(10.0, 10.0, 0.0, 1.0, 1.0);
        let pts = points(ctx.commands());
        assert_eq!(pts, vec![(10.0, 10.0), (14.0, 7.0), (14.0, 13.0)]);
    }

    #[test]
    fn text_arrow_splits_around_label() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        // "ping" measures 24, leaving 38 px of line on each side.
        Painter::new(&mut ctx, &layout, &theme).draw_text_arrow(0.0, 20.0, 100.0, "ping");
        let pts = points(ctx.commands());
        assert_eq!(pts[0], (0.0, 20.0));
        assert_eq!(pts[1], (37.0, 20.0));
        assert_eq!(pts[2], (63.0, 20.0));
        assert_eq!(pts[3], (100.0, 20.0));
        assert_eq!(pts[4..], [(100.0, 20.0), (90.0, 16.0), (90.0, 24.0)]);
        assert!(ctx.commands().contains(&DrawCommand::FillText {
            text: "ping".into(),
            x: 38.0,
            y: 15.0
        }));
    }

    #[test]
    fn text_arrow_mirrors_for_negative_length() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_text_arrow(100.0, 20.0, -100.0, "ping");
        let pts = points(ctx.commands());
        assert_eq!(pts[3], (0.0, 20.0));
        assert_eq!(pts[4..], [(0.0, 20.0), (10.0, 16.0), (10.0, 24.0)]);
        assert!(ctx.commands().contains(&DrawCommand::FillText {
            text: "ping".into(),
            x: 38.0,
            y: 15.0
        }));
    }

    #[test]
    fn zero_length_text_arrow_stays_finite() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_text_arrow(50.0, 20.0, 0.0, "self");
        assert!(points(ctx.commands()).iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn text_box_is_centred_and_padded() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_text_box(50.0, 4.0, "abc");
        assert!(ctx.commands().contains(&DrawCommand::FillRect {
            x: 37.0,
            y: 4.0,
            width: 26.0,
            height: 18.0
        }));
        assert!(ctx.commands().contains(&DrawCommand::FillText {
            text: "abc".into(),
            x: 41.0,
            y: 8.0
        }));
    }

    #[test]
    fn text_circle_centres_label() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_text_circle(30.0, 30.0, 20.0, "on");
        assert!(ctx.commands().contains(&DrawCommand::Arc {
            x: 30.0,
            y: 30.0,
            radius: 20.0,
            start_angle: 0.0,
            end_angle: TAU
        }));
        assert!(ctx.commands().contains(&DrawCommand::TextBaseline {
            baseline: TextBaseline::Middle
        }));
        assert!(ctx.commands().contains(&DrawCommand::FillText {
            text: "on".into(),
            x: 24.0,
            y: 30.0
        }));
    }

    #[test]
    fn classify_routes() {
        assert_eq!(EdgeRoute::classify((1.0, 1.0), (1.0, 1.0), true), EdgeRoute::SelfLoop);
        assert_eq!(EdgeRoute::classify((0.0, 1.0), (5.0, 1.0), false), EdgeRoute::Straight);
        assert_eq!(EdgeRoute::classify((0.0, 1.0), (5.0, 1.0), true), EdgeRoute::Curved);
        assert_eq!(EdgeRoute::classify((0.0, 0.0), (0.0, 9.0), false), EdgeRoute::Straight);
        assert_eq!(EdgeRoute::classify((0.0, 0.0), (3.0, 9.0), false), EdgeRoute::Angled);
        assert_eq!(EdgeRoute::classify((0.0, 0.0), (3.0, 9.0), true), EdgeRoute::Curved);
    }

    #[test]
    fn self_loop_never_delegates() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        let route = Painter::new(&mut ctx, &layout, &theme).draw_circle_text_arrow(
            (40.0, 40.0),
            (40.0, 40.0),
            10.0,
            false,
            "again",
        );
        assert_eq!(route, EdgeRoute::SelfLoop);
        let curves: Vec<_> = ctx
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::BezierCurveTo { .. }))
            .collect();
        assert_eq!(curves.len(), 1);
        match curves[0] {
            DrawCommand::BezierCurveTo { end, .. } => assert_eq!(*end, (54.0, 40.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn straight_route_trims_to_circle_edges() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        let route = Painter::new(&mut ctx, &layout, &theme).draw_circle_text_arrow(
            (0.0, 0.0),
            (100.0, 0.0),
            10.0,
            false,
            "",
        );
        assert_eq!(route, EdgeRoute::Straight);
        let pts = points(ctx.commands());
        // Line runs from the target's edge back to the source's edge.
        assert_eq!(pts[..2], [(90.0, 0.0), (10.0, 0.0)]);
        assert_eq!(pts[2], (90.0, 0.0));
    }

    #[test]
    fn angled_route_trims_both_ends() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_angled_arrow((0.0, 0.0), (30.0, 40.0), 5.0, "");
        let pts = points(ctx.commands());
        assert!(close(pts[0], (3.0, 4.0)));
        assert!(close(pts[1], (27.0, 36.0)));
        // Head apex on the destination circle.
        assert!(close(pts[2], (27.0, 36.0)));
    }

    #[test]
    fn curved_route_bows_out() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_curved_arrow((0.0, 0.0), (30.0, 40.0), 5.0, "");
        let curve = ctx
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::BezierCurveTo { cp1, cp2, end } => Some((*cp1, *cp2, *end)),
                _ => None,
            })
            .unwrap();
        // Control points are offset perpendicular to the chord by 2 * radius.
        assert!(close(curve.0, (3.0 - 8.0, 4.0 + 6.0)));
        assert!(close(curve.1, (27.0 - 8.0, 36.0 + 6.0)));
        assert!(close(curve.2, (27.0, 36.0)));
    }

    /// The last filled triangle must touch `to`'s circle on the side facing
    /// `from`, with its base trailing back toward `from`.
    fn assert_head_on_target(commands: &[DrawCommand], from: (f32, f32), to: (f32, f32), radius: f32) {
        let pts = points(commands);
        let tail = &pts[pts.len() - 3..];
        let (apex, b1, b2) = (tail[0], tail[1], tail[2]);

        let (dx, dy) = (from.0 - to.0, from.1 - to.1);
        let dist = (dx * dx + dy * dy).sqrt();
        let expected = (to.0 + dx / dist * radius, to.1 + dy / dist * radius);
        assert!(close(apex, expected), "{from:?} -> {to:?}: apex {apex:?}, expected {expected:?}");

        let back = ((b1.0 + b2.0) / 2.0 - apex.0, (b1.1 + b2.1) / 2.0 - apex.1);
        assert!(back.0 * dx + back.1 * dy > 0.0, "{from:?} -> {to:?}: head points away");
        assert!((back.0 * dy - back.1 * dx).abs() < 1e-3 * dist, "{from:?} -> {to:?}: head skewed");
    }

    const CENTRE: (f32, f32) = (100.0, 100.0);
    const DIAGONALS: [(f32, f32); 4] = [(160.0, 180.0), (40.0, 180.0), (160.0, 20.0), (40.0, 20.0)];

    #[test]
    fn angled_head_lands_on_target_in_every_direction() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        for other in DIAGONALS {
            for (from, to) in [(CENTRE, other), (other, CENTRE)] {
                let mut ctx = recorder();
                Painter::new(&mut ctx, &layout, &theme).draw_angled_arrow(from, to, 20.0, "");
                assert_head_on_target(ctx.commands(), from, to, 20.0);
            }
        }
    }

    #[test]
    fn curved_head_lands_on_target_in_every_direction() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let rows = [((20.0, 20.0), (140.0, 20.0)), ((140.0, 20.0), (20.0, 20.0))];
        let pairs = DIAGONALS
            .into_iter()
            .flat_map(|other| [(CENTRE, other), (other, CENTRE)])
            .chain(rows);
        for (from, to) in pairs {
            let mut ctx = recorder();
            Painter::new(&mut ctx, &layout, &theme).draw_curved_arrow(from, to, 7.0, "");
            assert_head_on_target(ctx.commands(), from, to, 7.0);
        }
    }

    #[test]
    fn right_to_left_curve_ends_at_its_head() {
        let (layout, theme) = (LayoutConfig::default(), Theme::default());
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_curved_arrow((48.0, 0.0), (0.0, 0.0), 7.0, "");
        let pts = points(ctx.commands());
        // The curve is drawn left to right, so it starts where the head sits.
        assert_eq!(pts[0], (7.0, 0.0));
        assert!(close(pts[pts.len() - 3], (7.0, 0.0)));
    }

    #[test]
    fn edge_labels_can_be_disabled() {
        let theme = Theme::default();
        let layout = LayoutConfig {
            edge_labels: false,
            ..LayoutConfig::default()
        };
        let mut ctx = recorder();
        Painter::new(&mut ctx, &layout, &theme).draw_angled_arrow((0.0, 0.0), (30.0, 40.0), 5.0, "go");
        assert!(!ctx
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillText { .. })));
    }
}
