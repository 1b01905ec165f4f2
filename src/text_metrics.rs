use crate::theme::Theme;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Advance used per character when no font face can be resolved.
const FALLBACK_ADVANCE_EM: f32 = 0.56;

/// Width of a string as rendered on the drawing surface.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Every character advances by the same amount. Deterministic, used by tests
/// and benches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance(pub f32);

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }
}

/// Measures with the installed system font matching `family`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMeasure {
    family: String,
    font_size: f32,
}

impl FontMeasure {
    pub fn new(family: impl Into<String>, font_size: f32) -> Self {
        Self {
            family: family.into(),
            font_size,
        }
    }

    pub fn from_theme(theme: &Theme) -> Self {
        Self::new(theme.font_family.clone(), theme.font_size)
    }
}

impl TextMeasure for FontMeasure {
    fn text_width(&self, text: &str) -> f32 {
        measure_text_width(text, self.font_size, &self.family)
            .unwrap_or_else(|| estimate_text_width(text, self.font_size))
    }
}

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().filter(|ch| *ch != '\n').count() as f32 * font_size * FALLBACK_ADVANCE_EM
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(&family_key);
            self.cache.insert(family_key.clone(), face);
        }
        let face = self.cache.get_mut(&family_key)?.as_mut()?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut families: Vec<Family<'_>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" => families.push(Family::SansSerif),
                "monospace" => families.push(Family::Monospace),
                "cursive" => families.push(Family::Cursive),
                "fantasy" => families.push(Family::Fantasy),
                _ => families.push(Family::Name(raw)),
            }
        }
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::load(data.to_vec(), index))
            .flatten()
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn load(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * FALLBACK_ADVANCE_EM;

        if text.is_ascii() {
            let width = text
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| match self.ascii_advances[byte as usize] {
                    0 => fallback,
                    advance => advance as f32 * scale,
                })
                .sum::<f32>();
            return Some(width.max(0.0));
        }

        let face = Face::parse(&self.data, self.index).ok()?;
        let mut width = 0.0f32;
        for ch in text.chars().filter(|ch| *ch != '\n') {
            let advance = *self.advance_cache.entry(ch).or_insert_with(|| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
            width += match advance {
                Some(advance) => advance as f32 * scale,
                None => fallback,
            };
        }
        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
