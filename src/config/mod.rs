use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::domain::{Site, default_sites};
use crate::error::Error;

/// Figure defaults, matching an 8x10 inch page printed at 300 dpi.
pub mod figure {
    pub const DEFAULT_DPI: u32 = 300;
    pub const MAX_DPI: u32 = 2400;
    pub const DEFAULT_WIDTH_IN: f32 = 8.0;
    pub const DEFAULT_HEIGHT_IN: f32 = 10.0;
    /// Blank border kept around the content after cropping
    pub const CROP_PAD_IN: f32 = 0.1;

    pub const DEFAULT_INPUT: &str = "delhi-ac.geojson";
    pub const DEFAULT_OUTPUT: &str = "delhi_boundary_sites.png";
    pub const DEFAULT_TITLE: &str = "Delhi boundary (from uploaded GeoJSON) with 7 Sites";
}

fn default_fill_alpha() -> f32 {
    0.4
}
fn default_line_width() -> f32 {
    1.0
}
fn default_label_offset() -> f64 {
    0.002
}
fn default_marker_size() -> f32 {
    36.0
}
fn default_label_font_size() -> f32 {
    9.0
}
fn default_boundary_color() -> [u8; 3] {
    [0x1f, 0x77, 0xb4]
}

/// Drawing style for the boundary and the site markers.
///
/// Sizes are in points (1/72 inch) so the figure looks the same at any dpi;
/// `marker_size` is an area in square points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleConfig {
    /// Opacity of the boundary fill and outline, 0.0 - 1.0
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f32,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    /// Offset in degrees added to both lon and lat of a site to anchor its label
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
    #[serde(default = "default_marker_size")]
    pub marker_size: f32,
    #[serde(default = "default_label_font_size")]
    pub label_font_size: f32,
    #[serde(
        default = "default_boundary_color",
        deserialize_with = "deserialize_hex_color"
    )]
    pub fill_color: [u8; 3],
    #[serde(
        default = "default_boundary_color",
        deserialize_with = "deserialize_hex_color"
    )]
    pub edge_color: [u8; 3],
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill_alpha: default_fill_alpha(),
            line_width: default_line_width(),
            label_offset: default_label_offset(),
            marker_size: default_marker_size(),
            label_font_size: default_label_font_size(),
            fill_color: default_boundary_color(),
            edge_color: default_boundary_color(),
        }
    }
}

/// Everything one render run needs
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dpi: u32,
    pub width_in: f32,
    pub height_in: f32,
    pub title: String,
    /// Drawn in ascending id order
    pub sites: Vec<Site>,
    pub style: StyleConfig,
    /// Fail on geometries that cannot be drawn instead of skipping them
    pub strict: bool,
    /// TrueType font for labels; the built-in stroke font is used when unset
    /// and no default font is found
    pub font: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(figure::DEFAULT_INPUT),
            output: PathBuf::from(figure::DEFAULT_OUTPUT),
            dpi: figure::DEFAULT_DPI,
            width_in: figure::DEFAULT_WIDTH_IN,
            height_in: figure::DEFAULT_HEIGHT_IN,
            title: figure::DEFAULT_TITLE.to_string(),
            sites: default_sites(),
            style: StyleConfig::default(),
            strict: false,
            font: None,
        }
    }
}

impl RenderConfig {
    /// Reject settings that cannot produce a canvas, wherever they came from
    pub fn validate(&self) -> crate::Result<()> {
        if !(1..=figure::MAX_DPI).contains(&self.dpi) {
            return Err(Error::InvalidConfig(format!(
                "dpi must be between 1 and {}, got {}",
                figure::MAX_DPI,
                self.dpi
            )));
        }
        for (name, value) in [("width_in", self.width_in), ("height_in", self.height_in)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a positive number of inches, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.style.fill_alpha) {
            return Err(Error::InvalidConfig(format!(
                "style.fill_alpha must be between 0 and 1, got {}",
                self.style.fill_alpha
            )));
        }
        Ok(())
    }

    /// Canvas size in pixels before cropping
    pub fn canvas_size(&self) -> (u32, u32) {
        let width = (self.width_in * self.dpi as f32).round().max(1.0) as u32;
        let height = (self.height_in * self.dpi as f32).round().max(1.0) as u32;
        (width, height)
    }

    /// Convert a length in points to pixels at the configured dpi
    pub fn points_to_px(&self, points: f32) -> f32 {
        points * self.dpi as f32 / 72.0
    }

    pub fn sorted_sites(&self) -> Vec<Site> {
        let mut sites = self.sites.clone();
        sites.sort_by_key(|s| s.id);
        sites
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub dpi: Option<u32>,
    #[serde(default)]
    pub width_in: Option<f32>,
    #[serde(default)]
    pub height_in: Option<f32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub sites: Option<Vec<Site>>,
    #[serde(default)]
    pub style: StyleConfig,
}

impl FileConfig {
    /// Load the first config file found in the search paths, together with
    /// the path it came from.
    pub fn load() -> Option<(Self, PathBuf)> {
        Self::load_from_paths(&get_config_paths())
    }

    /// First file in `paths` that exists and parses.
    ///
    /// A file that exists but does not parse is reported and skipped.
    pub fn load_from_paths(paths: &[PathBuf]) -> Option<(Self, PathBuf)> {
        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some((config, path.clone())),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; any failure is fatal
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Fill a render config from this file, falling back to defaults
    pub fn into_render_config(self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            input: self.input.unwrap_or(defaults.input),
            output: self.output.unwrap_or(defaults.output),
            dpi: self.dpi.unwrap_or(defaults.dpi),
            width_in: self.width_in.unwrap_or(defaults.width_in),
            height_in: self.height_in.unwrap_or(defaults.height_in),
            title: self.title.unwrap_or(defaults.title),
            sites: self.sites.unwrap_or(defaults.sites),
            style: self.style,
            strict: self.strict,
            font: self.font,
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("boundmap.toml"));
    paths.push(PathBuf::from(".boundmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("boundmap").join("config.toml"));
        paths.push(config_dir.join("boundmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".boundmap.toml"));
        paths.push(home.join(".config").join("boundmap").join("config.toml"));
    }

    paths
}

/// Parse `#rrggbb` (the leading `#` is optional)
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> std::result::Result<[u8; 3], D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_hex_color(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{}`, expected #rrggbb", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_figure() {
        let config = RenderConfig::default();
        assert_eq!(config.canvas_size(), (2400, 3000));
        assert_eq!(config.sites.len(), 7);
        assert_eq!(config.style.fill_alpha, 0.4);
        assert_eq!(config.style.label_offset, 0.002);
        assert!(!config.strict);
    }

    #[test]
    fn test_points_to_px() {
        let config = RenderConfig::default();
        assert!((config.points_to_px(72.0) - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1f77b4"), Some([0x1f, 0x77, 0xb4]));
        assert_eq!(parse_hex_color("ff0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_file_config_partial() {
        let toml_str = r##"
            output = "out.png"
            dpi = 150

            [style]
            fill_alpha = 0.6
            edge_color = "#000000"

            [[sites]]
            id = 2
            lat = 1.5
            lon = 2.5

            [[sites]]
            id = 1
            lat = 0.5
            lon = 0.25
        "##;

        let file: FileConfig = toml::from_str(toml_str).unwrap();
        let config = file.into_render_config();

        assert_eq!(config.output, PathBuf::from("out.png"));
        assert_eq!(config.input, PathBuf::from(figure::DEFAULT_INPUT));
        assert_eq!(config.dpi, 150);
        assert_eq!(config.style.fill_alpha, 0.6);
        assert_eq!(config.style.line_width, 1.0);
        assert_eq!(config.style.edge_color, [0, 0, 0]);
        assert_eq!(config.style.fill_color, [0x1f, 0x77, 0xb4]);

        let ids: Vec<u32> = config.sorted_sites().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_file_config_rejects_bad_color() {
        let result: std::result::Result<FileConfig, _> =
            toml::from_str("[style]\nfill_color = \"blue\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "title = \"Test map\"\nstrict = true").unwrap();

        let config = FileConfig::from_path(file.path()).unwrap();
        assert_eq!(config.title.as_deref(), Some("Test map"));
        assert!(config.strict);
    }

    #[test]
    fn test_validate_default() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dpi_from_file() {
        let file: FileConfig = toml::from_str("dpi = 0\n").unwrap();
        let err = file.into_render_config().validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("dpi"));
    }

    #[test]
    fn test_validate_rejects_bad_size() {
        let file: FileConfig = toml::from_str("width_in = nan\n").unwrap();
        assert!(file.into_render_config().validate().is_err());

        let file: FileConfig = toml::from_str("height_in = -2.0\n").unwrap();
        assert!(file.into_render_config().validate().is_err());

        let config = RenderConfig {
            dpi: figure::MAX_DPI + 1,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_fill_alpha() {
        let file: FileConfig = toml::from_str("[style]\nfill_alpha = 1.5\n").unwrap();
        assert!(file.into_render_config().validate().is_err());
    }

    #[test]
    fn test_load_from_paths_skips_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "dpi = \"high\"\n").unwrap();
        std::fs::write(&good, "dpi = 72\nfont = \"fonts/Label.ttf\"\n").unwrap();

        let (config, path) =
            FileConfig::load_from_paths(&[missing, broken, good.clone()]).unwrap();
        assert_eq!(path, good);
        assert_eq!(config.dpi, Some(72));

        let render = config.into_render_config();
        assert_eq!(render.font, Some(PathBuf::from("fonts/Label.ttf")));
    }

    #[test]
    fn test_load_from_paths_none_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::load_from_paths(&[dir.path().join("a.toml")]).is_none());
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::from_path(&dir.path().join("nope.toml")).is_err());
    }
}
