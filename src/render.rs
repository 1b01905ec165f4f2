use crate::canvas::{DrawCommand, Recorder, TextBaseline};
use crate::config::RenderConfig;
use crate::text_metrics::TextMeasure;
use crate::theme::Theme;
use anyhow::Result;
use std::f32::consts::{PI, TAU};
use std::fmt::Write;
use std::path::Path;

/// Canvas drawing state replayed while converting commands.
struct SvgState {
    fill: String,
    stroke: String,
    line_width: f32,
    baseline: TextBaseline,
    path: String,
    has_point: bool,
}

impl SvgState {
    fn new(theme: &Theme) -> Self {
        // Canvas defaults: black ink, alphabetic text.
        Self {
            fill: "#000".to_string(),
            stroke: "#000".to_string(),
            line_width: theme.line_width,
            baseline: TextBaseline::Alphabetic,
            path: String::new(),
            has_point: false,
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let point = |angle: f32| (x + radius * angle.cos(), y + radius * angle.sin());
        let (sx, sy) = point(start);
        let verb = if self.has_point { 'L' } else { 'M' };
        let _ = write!(self.path, "{verb} {sx:.2} {sy:.2} ");

        let sweep = (end - start).clamp(0.0, TAU);
        if sweep >= TAU - 1e-4 {
            // SVG cannot draw a closed arc in one segment.
            let (mx, my) = point(start + PI);
            let _ = write!(
                self.path,
                "A {radius:.2} {radius:.2} 0 1 1 {mx:.2} {my:.2} A {radius:.2} {radius:.2} 0 1 1 {sx:.2} {sy:.2} "
            );
        } else {
            let (ex, ey) = point(end);
            let large = if sweep > PI { 1 } else { 0 };
            let _ = write!(
                self.path,
                "A {radius:.2} {radius:.2} 0 {large} 1 {ex:.2} {ey:.2} "
            );
        }
        self.has_point = true;
    }
}

fn baseline_attr(baseline: TextBaseline) -> &'static str {
    match baseline {
        TextBaseline::Top => " dominant-baseline=\"hanging\"",
        TextBaseline::Middle => " dominant-baseline=\"middle\"",
        TextBaseline::Alphabetic => "",
    }
}

/// Replays a recorded command stream as an SVG document.
pub fn commands_to_svg(
    commands: &[DrawCommand],
    width: f32,
    height: f32,
    theme: &Theme,
    render_cfg: &RenderConfig,
) -> String {
    let mut width = width;
    let mut height = height;
    let mut state = SvgState::new(theme);
    let mut body = String::new();

    for command in commands {
        match command {
            DrawCommand::Resize {
                width: w,
                height: h,
            } => {
                width = *w;
                height = *h;
                body.clear();
                state = SvgState::new(theme);
            }
            DrawCommand::BeginPath => {
                state.path.clear();
                state.has_point = false;
            }
            DrawCommand::MoveTo { x, y } => {
                let _ = write!(state.path, "M {x:.2} {y:.2} ");
                state.has_point = true;
            }
            DrawCommand::LineTo { x, y } => {
                let verb = if state.has_point { 'L' } else { 'M' };
                let _ = write!(state.path, "{verb} {x:.2} {y:.2} ");
                state.has_point = true;
            }
            DrawCommand::BezierCurveTo { cp1, cp2, end } => {
                let _ = write!(
                    state.path,
                    "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} ",
                    cp1.0, cp1.1, cp2.0, cp2.1, end.0, end.1
                );
                state.has_point = true;
            }
            DrawCommand::Arc {
                x,
                y,
                radius,
                start_angle,
                end_angle,
            } => state.arc(*x, *y, *radius, *start_angle, *end_angle),
            DrawCommand::Stroke => {
                if !state.path.is_empty() {
                    let _ = write!(
                        body,
                        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                        state.path.trim_end(),
                        state.stroke,
                        state.line_width
                    );
                }
            }
            DrawCommand::Fill => {
                if !state.path.is_empty() {
                    let _ = write!(
                        body,
                        "<path d=\"{} Z\" fill=\"{}\" stroke=\"none\"/>",
                        state.path.trim_end(),
                        state.fill
                    );
                }
            }
            DrawCommand::FillRect {
                x,
                y,
                width: w,
                height: h,
            } => {
                let _ = write!(
                    body,
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" fill=\"{}\"/>",
                    state.fill
                );
            }
            DrawCommand::StrokeRect {
                x,
                y,
                width: w,
                height: h,
            } => {
                let _ = write!(
                    body,
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    state.stroke, state.line_width
                );
            }
            DrawCommand::FillText { text, x, y } => {
                let _ = write!(
                    body,
                    "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{}>{}</text>",
                    escape_xml(&theme.font_family),
                    theme.font_size,
                    state.fill,
                    baseline_attr(state.baseline),
                    escape_xml(text)
                );
            }
            DrawCommand::TextBaseline { baseline } => state.baseline = *baseline,
            DrawCommand::FillStyle { color } => state.fill.clone_from(color),
            DrawCommand::StrokeStyle { color } => state.stroke.clone_from(color),
            DrawCommand::LineWidth { width } => state.line_width = *width,
        }
    }

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render_cfg.background
    );
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

pub fn render_svg<M: TextMeasure>(
    recorder: &Recorder<M>,
    theme: &Theme,
    render_cfg: &RenderConfig,
) -> String {
    let (width, height) = recorder.size();
    commands_to_svg(recorder.commands(), width, height, theme, render_cfg)
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or("sans-serif")
        .to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let scale = render_cfg.png_scale.max(0.01);
    let width = (size.width() as f32 * scale).ceil() as u32;
    let height = (size.height() as f32 * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
