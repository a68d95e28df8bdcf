//! Label, tick and title text
//!
//! Text is drawn from a TrueType font when one can be loaded: glyphs are
//! triangulated with fontmesh and the front faces filled with tiny-skia. When
//! no font file is available the built-in stroke font takes over; its glyphs
//! are polylines on a 5 x 7 grid, and lowercase letters are drawn as small
//! capitals.

use std::path::Path as FilePath;
use tiny_skia::{Path, PathBuilder};

/// Cap height as a fraction of the font size (em)
const CAP_HEIGHT_RATIO: f32 = 0.72;
const SMALL_CAPS_RATIO: f32 = 0.78;
const GLYPH_WIDTH: f32 = 5.0;
const GLYPH_HEIGHT: f32 = 7.0;
const GLYPH_SPACING: f32 = 1.5;
const STROKE_RATIO: f32 = 0.09;

const CURVE_SUBDIVISIONS: u8 = 8;
/// Advance in em for characters the font has no metrics for
const FALLBACK_ADVANCE: f32 = 0.3;
const CAP_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Baseline,
    Top,
    Middle,
}

/// Offset of the first glyph's origin from the anchor point, pixel space
fn anchor_offset(width: f32, cap_height: f32, align: Align, valign: VAlign) -> (f32, f32) {
    let x = match align {
        Align::Left => 0.0,
        Align::Center => -width / 2.0,
        Align::Right => -width,
    };
    let y = match valign {
        VAlign::Baseline => 0.0,
        VAlign::Top => cap_height,
        VAlign::Middle => cap_height / 2.0,
    };
    (x, y)
}

/// How a laid-out text outline is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPaint {
    Fill,
    /// Stroke with the given width in pixels
    Stroke(f32),
}

#[derive(Debug, Clone)]
pub struct TextPath {
    pub path: Path,
    pub paint: TextPaint,
}

pub struct TtfFont {
    font_data: Vec<u8>,
    /// Font units to em, measured so the cap height of `H` is `CAP_HEIGHT_RATIO`
    unit_scale: f32,
}

impl TtfFont {
    pub fn load(font_path: &FilePath) -> Option<Self> {
        let font_data = std::fs::read(font_path).ok()?;
        let face = fontmesh::Face::parse(&font_data, 0).ok()?;

        let reference = fontmesh::char_to_mesh_3d(&face, 'H', 1.0, CURVE_SUBDIVISIONS).ok()?;
        let cap_height = reference.vertices.iter().map(|v| v[1]).fold(0.0, f32::max);
        if !cap_height.is_finite() || cap_height <= 0.0 {
            return None;
        }

        Some(Self {
            font_data,
            unit_scale: CAP_HEIGHT_RATIO / cap_height,
        })
    }

    /// Bundled font first, then the usual DejaVu Sans install locations
    pub fn load_default() -> Option<Self> {
        let default_paths = [
            FilePath::new("fonts/DejaVuSans.ttf"),
            FilePath::new("./fonts/DejaVuSans.ttf"),
            FilePath::new("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            FilePath::new("/usr/share/fonts/TTF/DejaVuSans.ttf"),
            FilePath::new("/usr/share/fonts/dejavu/DejaVuSans.ttf"),
        ];
        for path in &default_paths {
            if path.exists()
                && let Some(font) = Self::load(path)
            {
                return Some(font);
            }
        }
        None
    }

    fn face(&self) -> Option<fontmesh::Face<'_>> {
        fontmesh::Face::parse(&self.font_data, 0).ok()
    }

    /// Advance of `ch` in em
    fn advance(&self, face: &fontmesh::Face<'_>, ch: char) -> f32 {
        fontmesh::glyph_advance(face, ch).map_or(FALLBACK_ADVANCE, |a| a * self.unit_scale)
    }

    pub fn text_width(&self, text: &str, size_px: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        text.chars().map(|ch| self.advance(&face, ch) * size_px).sum()
    }

    /// Filled outline of `text` relative to its anchor point, pixel space
    /// (y down). Only the front cap of each glyph mesh is kept.
    pub fn layout(&self, text: &str, size_px: f32, align: Align, valign: VAlign) -> Option<Path> {
        let face = self.face()?;
        let width = self.text_width(text, size_px);
        let (origin_x, baseline_y) =
            anchor_offset(width, size_px * CAP_HEIGHT_RATIO, align, valign);

        let scale = size_px * self.unit_scale;
        let mut pb = PathBuilder::new();
        let mut cursor_x = origin_x;

        for ch in text.chars() {
            if !ch.is_whitespace()
                && let Ok(mesh) = fontmesh::char_to_mesh_3d(&face, ch, 1.0, CURVE_SUBDIVISIONS)
            {
                let cap_z = mesh
                    .vertices
                    .iter()
                    .map(|v| v[2])
                    .fold(f32::MIN, f32::max);

                for tri_indices in mesh.indices.chunks(3) {
                    if tri_indices.len() < 3 {
                        continue;
                    }
                    let corners: Option<Vec<_>> = tri_indices
                        .iter()
                        .map(|&i| mesh.vertices.get(i as usize).copied())
                        .collect();
                    let Some(corners) = corners else {
                        continue;
                    };
                    if corners.iter().any(|v| (v[2] - cap_z).abs() > CAP_TOLERANCE) {
                        continue;
                    }

                    for (i, v) in corners.iter().enumerate() {
                        let x = cursor_x + v[0] * scale;
                        let y = baseline_y - v[1] * scale;
                        if i == 0 {
                            pb.move_to(x, y);
                        } else {
                            pb.line_to(x, y);
                        }
                    }
                    pb.close();
                }
            }

            cursor_x += self.advance(&face, ch) * size_px;
        }

        pb.finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StrokeFont {
    /// Font size in pixels
    pub size_px: f32,
}

impl StrokeFont {
    pub fn new(size_px: f32) -> Self {
        Self { size_px }
    }

    fn unit(&self) -> f32 {
        self.size_px * CAP_HEIGHT_RATIO / GLYPH_HEIGHT
    }

    pub fn cap_height(&self) -> f32 {
        self.size_px * CAP_HEIGHT_RATIO
    }

    pub fn stroke_width(&self) -> f32 {
        (self.size_px * STROKE_RATIO).max(1.0)
    }

    pub fn text_width(&self, text: &str) -> f32 {
        let char_count = text.chars().count();
        if char_count == 0 {
            return 0.0;
        }
        let glyphs: f32 = text.chars().map(|ch| glyph_scale(ch) * GLYPH_WIDTH).sum();
        (glyphs + (char_count - 1) as f32 * GLYPH_SPACING) * self.unit()
    }

    /// Build the outline of `text` relative to its anchor point.
    ///
    /// The returned path is in pixel space (y down) with the anchor at the
    /// origin; callers translate or rotate it into place. Returns `None` for
    /// text without any visible stroke.
    pub fn layout(&self, text: &str, align: Align, valign: VAlign) -> Option<Path> {
        let unit = self.unit();
        let (origin_x, baseline_y) =
            anchor_offset(self.text_width(text), self.cap_height(), align, valign);

        let mut pb = PathBuilder::new();
        let mut cursor_x = origin_x;

        for ch in text.chars() {
            let scale = glyph_scale(ch) * unit;
            for stroke in glyph_strokes(ch) {
                if stroke.len() < 2 {
                    continue;
                }
                for (i, &(sx, sy)) in stroke.iter().enumerate() {
                    let x = cursor_x + sx * scale;
                    let y = baseline_y - sy * scale;
                    if i == 0 {
                        pb.move_to(x, y);
                    } else {
                        pb.line_to(x, y);
                    }
                }
            }
            cursor_x += glyph_scale(ch) * GLYPH_WIDTH * unit + GLYPH_SPACING * unit;
        }

        pb.finish()
    }
}

pub enum TextRenderer {
    Ttf(TtfFont),
    Stroke,
}

impl TextRenderer {
    /// Use `font_path` if it loads, then a default font, then the stroke font
    pub fn new(font_path: Option<&FilePath>) -> Self {
        if let Some(path) = font_path
            && let Some(ttf) = TtfFont::load(path)
        {
            return Self::Ttf(ttf);
        }
        if let Some(ttf) = TtfFont::load_default() {
            return Self::Ttf(ttf);
        }
        Self::Stroke
    }

    pub fn cap_height(&self, size_px: f32) -> f32 {
        size_px * CAP_HEIGHT_RATIO
    }

    pub fn text_width(&self, text: &str, size_px: f32) -> f32 {
        match self {
            Self::Ttf(ttf) => ttf.text_width(text, size_px),
            Self::Stroke => StrokeFont::new(size_px).text_width(text),
        }
    }

    pub fn layout(
        &self,
        text: &str,
        size_px: f32,
        align: Align,
        valign: VAlign,
    ) -> Option<TextPath> {
        match self {
            Self::Ttf(ttf) => ttf.layout(text, size_px, align, valign).map(|path| TextPath {
                path,
                paint: TextPaint::Fill,
            }),
            Self::Stroke => {
                let font = StrokeFont::new(size_px);
                font.layout(text, align, valign).map(|path| TextPath {
                    path,
                    paint: TextPaint::Stroke(font.stroke_width()),
                })
            }
        }
    }

    pub fn is_ttf(&self) -> bool {
        matches!(self, Self::Ttf(_))
    }
}

fn glyph_scale(ch: char) -> f32 {
    if ch.is_ascii_lowercase() {
        SMALL_CAPS_RATIO
    } else {
        1.0
    }
}

/// Glyph strokes on a 5 x 7 grid, y up, baseline at 0.
///
/// Each entry is `x,y` points separated by spaces, strokes separated by `|`.
const GLYPHS: &[(char, &str)] = &[
    ('A', "0,0 2.5,7 5,0|1,3 4,3"),
    ('B', "0,0 0,7 3.5,7 5,6 5,4.5 3.5,3.5 0,3.5|3.5,3.5 5,2.5 5,1 3.5,0 0,0"),
    ('C', "5,1 4,0 1,0 0,1 0,6 1,7 4,7 5,6"),
    ('D', "0,0 0,7 3,7 5,5.5 5,1.5 3,0 0,0"),
    ('E', "5,0 0,0 0,7 5,7|0,3.5 4,3.5"),
    ('F', "0,0 0,7 5,7|0,3.5 4,3.5"),
    ('G', "5,6 4,7 1,7 0,6 0,1 1,0 4,0 5,1 5,3.5 2.5,3.5"),
    ('H', "0,0 0,7|5,0 5,7|0,3.5 5,3.5"),
    ('I', "1,0 4,0|2.5,0 2.5,7|1,7 4,7"),
    ('J', "0,1 1,0 3,0 4,1 4,7|2,7 5,7"),
    ('K', "0,0 0,7|5,7 0,3.5 5,0"),
    ('L', "0,7 0,0 5,0"),
    ('M', "0,0 0,7 2.5,4 5,7 5,0"),
    ('N', "0,0 0,7 5,0 5,7"),
    ('O', "1,0 0,1 0,6 1,7 4,7 5,6 5,1 4,0 1,0"),
    ('P', "0,0 0,7 4,7 5,6 5,4 4,3 0,3"),
    ('Q', "1,0 0,1 0,6 1,7 4,7 5,6 5,1 4,0 1,0|3,2 5.5,-0.5"),
    ('R', "0,0 0,7 4,7 5,6 5,4 4,3 0,3|2.5,3 5,0"),
    ('S', "5,6 4,7 1,7 0,6 0,4.5 1,3.5 4,3.5 5,2.5 5,1 4,0 1,0 0,1"),
    ('T', "0,7 5,7|2.5,7 2.5,0"),
    ('U', "0,7 0,1 1,0 4,0 5,1 5,7"),
    ('V', "0,7 2.5,0 5,7"),
    ('W', "0,7 1,0 2.5,4 4,0 5,7"),
    ('X', "0,0 5,7|0,7 5,0"),
    ('Y', "0,7 2.5,3.5 5,7|2.5,3.5 2.5,0"),
    ('Z', "0,7 5,7 0,0 5,0"),
    ('0', "1,0 0,1 0,6 1,7 4,7 5,6 5,1 4,0 1,0|1,1 4,6"),
    ('1', "1,5 2.5,7 2.5,0|1,0 4,0"),
    ('2', "0,6 1,7 4,7 5,6 5,4.5 0,0 5,0"),
    ('3', "0,6 1,7 4,7 5,6 5,4.5 4,3.5 2,3.5|4,3.5 5,2.5 5,1 4,0 1,0 0,1"),
    ('4', "4,0 4,7 0,2.5 5,2.5"),
    ('5', "5,7 0,7 0,4 4,4 5,3 5,1 4,0 1,0 0,1"),
    ('6', "4,7 1,7 0,6 0,1 1,0 4,0 5,1 5,3 4,4 0,4"),
    ('7', "0,7 5,7 2,0"),
    ('8', "1,3.5 0,4.5 0,6 1,7 4,7 5,6 5,4.5 4,3.5 1,3.5|1,3.5 0,2.5 0,1 1,0 4,0 5,1 5,2.5 4,3.5"),
    ('9', "1,0 4,0 5,1 5,6 4,7 1,7 0,6 0,4 1,3 5,3"),
    ('.', "2,0 3,0 3,1 2,1 2,0"),
    (',', "2.5,1 2.5,0 1.5,-1"),
    ('-', "1,3.5 4,3.5"),
    ('/', "0,0 5,7"),
    (':', "2,2 3,2 3,3 2,3 2,2|2,5 3,5 3,6 2,6 2,5"),
    ('(', "3.5,8 2,6 1.5,3.5 2,1 3.5,-1"),
    (')', "1.5,8 3,6 3.5,3.5 3,1 1.5,-1"),
    ('+', "2.5,1.5 2.5,5.5|0.5,3.5 4.5,3.5"),
    ('_', "0,-0.5 5,-0.5"),
    ('\'', "2.5,7 2.5,5.5"),
    (' ', ""),
];

/// Drawn for characters without a glyph
const MISSING_GLYPH: &str = "0,0 5,0 5,7 0,7 0,0";

fn glyph_strokes(ch: char) -> Vec<Vec<(f32, f32)>> {
    let ch = ch.to_ascii_uppercase();
    let encoded = GLYPHS
        .iter()
        .find(|(c, _)| *c == ch)
        .map_or(MISSING_GLYPH, |(_, strokes)| *strokes);

    encoded
        .split('|')
        .filter(|stroke| !stroke.is_empty())
        .map(|stroke| {
            stroke
                .split_whitespace()
                .filter_map(|point| {
                    let (x, y) = point.split_once(',')?;
                    Some((x.parse().ok()?, y.parse().ok()?))
                })
                .collect()
        })
        .collect()
}
