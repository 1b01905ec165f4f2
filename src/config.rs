use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry shared by both renderers. Values are pixels unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Border plus margin added around a label inside a box.
    pub box_padding: f32,
    /// Offset of box text from the box corner.
    pub box_inset: f32,
    pub font_size: f32,
    /// Vertical distance between successive messages.
    pub message_row_height: f32,
    /// Room left around a message label for arrowheads and margins.
    pub message_padding: f32,
    pub arrow_tip_length: f32,
    pub arrow_tip_half_width: f32,
    /// Length of the small rotated arrowhead used on node connectors.
    pub arrow_head_length: f32,
    pub arrow_head_half_width: f32,
    /// Space between neighbouring node circles.
    pub node_gap: f32,
    /// Bezier control point offset, in radii.
    pub curve_offset_factor: f32,
    /// How far a self loop bulges out, in radii.
    pub self_loop_reach: f32,
    pub self_loop_gap: f32,
    /// Gap between a split arrow segment and its label.
    pub label_gap: f32,
    /// How far message labels sit above their arrow.
    pub label_lift: f32,
    pub edge_labels: bool,
}

impl LayoutConfig {
    pub fn box_height(&self) -> f32 {
        self.box_padding + self.font_size
    }

    pub fn top_margin(&self) -> f32 {
        self.box_padding / 2.0
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_padding: 8.0,
            box_inset: 4.0,
            font_size: 10.0,
            message_row_height: 15.0,
            message_padding: 10.0 + 4.0 + 20.0,
            arrow_tip_length: 10.0,
            arrow_tip_half_width: 4.0,
            arrow_head_length: 4.0,
            arrow_head_half_width: 3.0,
            node_gap: 10.0,
            curve_offset_factor: 2.0,
            self_loop_reach: 2.0,
            self_loop_gap: 4.0,
            label_gap: 1.0,
            label_lift: 5.0,
            edge_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub png_scale: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            png_scale: 1.0,
            background: "#fff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    png_scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    box_fill: Option<String>,
    line_color: Option<String>,
    text_color: Option<String>,
    background: Option<String>,
    line_width: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    box_padding: Option<f32>,
    box_inset: Option<f32>,
    message_row_height: Option<f32>,
    message_padding: Option<f32>,
    arrow_tip_length: Option<f32>,
    arrow_tip_half_width: Option<f32>,
    arrow_head_length: Option<f32>,
    arrow_head_half_width: Option<f32>,
    node_gap: Option<f32>,
    curve_offset_factor: Option<f32>,
    self_loop_reach: Option<f32>,
    self_loop_gap: Option<f32>,
    label_gap: Option<f32>,
    label_lift: Option<f32>,
    edge_labels: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme `{theme_name}`"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.box_fill {
            config.theme.box_fill = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
    }
    // Box heights follow the font the labels are drawn with.
    config.layout.font_size = config.theme.font_size;

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.box_padding {
            target.box_padding = v;
        }
        if let Some(v) = layout.box_inset {
            target.box_inset = v;
        }
        if let Some(v) = layout.message_row_height {
            target.message_row_height = v;
        }
        if let Some(v) = layout.message_padding {
            target.message_padding = v;
        }
        if let Some(v) = layout.arrow_tip_length {
            target.arrow_tip_length = v;
        }
        if let Some(v) = layout.arrow_tip_half_width {
            target.arrow_tip_half_width = v;
        }
        if let Some(v) = layout.arrow_head_length {
            target.arrow_head_length = v;
        }
        if let Some(v) = layout.arrow_head_half_width {
            target.arrow_head_half_width = v;
        }
        if let Some(v) = layout.node_gap {
            target.node_gap = v;
        }
        if let Some(v) = layout.curve_offset_factor {
            target.curve_offset_factor = v;
        }
        if let Some(v) = layout.self_loop_reach {
            target.self_loop_reach = v;
        }
        if let Some(v) = layout.self_loop_gap {
            target.self_loop_gap = v;
        }
        if let Some(v) = layout.label_gap {
            target.label_gap = v;
        }
        if let Some(v) = layout.label_lift {
            target.label_lift = v;
        }
        if let Some(v) = layout.edge_labels {
            target.edge_labels = v;
        }
    }

    if let Some(scale) = parsed.png_scale {
        config.render.png_scale = scale;
    }
    config.render.background = config.theme.background.clone();

    Ok(config)
}
