use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub box_fill: String,
    pub line_color: String,
    pub text_color: String,
    pub background: String,
    pub line_width: f32,
}

impl Theme {
    /// Grey boxes and black ink on white, the look of the doc-gen pages.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 10.0,
            box_fill: "#ddd".to_string(),
            line_color: "#000".to_string(),
            text_color: "#000".to_string(),
            background: "#fff".to_string(),
            line_width: 1.0,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 10.0,
            box_fill: "#F8FAFF".to_string(),
            line_color: "#7A8AA6".to_string(),
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            line_width: 1.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
