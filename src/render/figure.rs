use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use super::scene::Scene;
use super::text::{Align, TextPaint, TextRenderer, VAlign};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::{PlotArea, Viewport, nice_ticks};

/// Categorical colors handed out to site markers in order
pub const MARKER_CYCLE: [[u8; 3]; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

/// Plot area position as fractions of the figure
mod layout {
    pub const LEFT: f32 = 0.125;
    pub const RIGHT: f32 = 0.9;
    pub const BOTTOM: f32 = 0.11;
    pub const TOP: f32 = 0.88;
}

// All in points
const TICK_LENGTH: f32 = 3.5;
const TICK_WIDTH: f32 = 0.8;
const TICK_PAD: f32 = 3.5;
const TICK_FONT: f32 = 10.0;
const AXIS_LABEL_FONT: f32 = 10.0;
const AXIS_LABEL_PAD: f32 = 4.0;
const TITLE_FONT: f32 = 12.0;
const TITLE_PAD: f32 = 6.0;
const FRAME_WIDTH: f32 = 0.8;
const GRID_WIDTH: f32 = 0.8;
const GRID_COLOR: [u8; 3] = [0xb0, 0xb0, 0xb0];

const TICK_TARGET: usize = 6;

/// Draws a [`Scene`] onto a fresh canvas sized by the render config
pub struct Figure<'a> {
    config: &'a RenderConfig,
    text: TextRenderer,
}

impl<'a> Figure<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            text: TextRenderer::new(config.font.as_deref()),
        }
    }

    #[cfg(test)]
    pub fn with_text(config: &'a RenderConfig, text: TextRenderer) -> Self {
        Self { config, text }
    }

    fn pt(&self, points: f32) -> f32 {
        self.config.points_to_px(points)
    }

    pub fn plot_area(&self, width: u32, height: u32) -> PlotArea {
        let (w, h) = (width as f32, height as f32);
        PlotArea {
            left: w * layout::LEFT,
            top: h * (1.0 - layout::TOP),
            width: w * (layout::RIGHT - layout::LEFT),
            height: h * (layout::TOP - layout::BOTTOM),
        }
    }

    /// Render the full figure: grid, boundary, sites, frame, ticks, labels
    pub fn draw(&self, scene: &Scene) -> Result<Pixmap> {
        let (width, height) = self.config.canvas_size();
        let canvas_error = || Error::Canvas { width, height };

        let mut pixmap = Pixmap::new(width, height).ok_or_else(canvas_error)?;
        pixmap.fill(Color::WHITE);

        let area = self.plot_area(width, height);
        let viewport = Viewport::new(scene.extent.clone(), area);

        let area_rect =
            Rect::from_xywh(area.left, area.top, area.width, area.height).ok_or_else(canvas_error)?;
        let mut clip = Mask::new(width, height).ok_or_else(canvas_error)?;
        clip.fill_path(
            &PathBuilder::from_rect(area_rect),
            FillRule::Winding,
            true,
            Transform::identity(),
        );

        self.draw_grid(&mut pixmap, &viewport, &clip);
        self.draw_shapes(&mut pixmap, scene, &viewport, &clip);
        self.draw_markers(&mut pixmap, scene, &viewport, &clip);
        self.draw_site_labels(&mut pixmap, scene, &viewport);
        self.draw_frame(&mut pixmap, area_rect);
        self.draw_axes(&mut pixmap, &viewport);

        Ok(pixmap)
    }

    fn draw_grid(&self, pixmap: &mut Pixmap, viewport: &Viewport, clip: &Mask) {
        let extent = viewport.extent();
        let area = viewport.area();
        let x_ticks = nice_ticks(extent.min_x, extent.max_x, TICK_TARGET);
        let y_ticks = nice_ticks(extent.min_y, extent.max_y, TICK_TARGET);

        let mut pb = PathBuilder::new();
        for &x in &x_ticks.values {
            let (px, _) = viewport.to_pixel(x, extent.min_y);
            pb.move_to(px, area.top);
            pb.line_to(px, area.bottom());
        }
        for &y in &y_ticks.values {
            let (_, py) = viewport.to_pixel(extent.min_x, y);
            pb.move_to(area.left, py);
            pb.line_to(area.right(), py);
        }

        if let Some(path) = pb.finish() {
            let paint = solid_paint(GRID_COLOR, 255);
            let stroke = Stroke {
                width: self.pt(GRID_WIDTH),
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(clip));
        }
    }

    fn draw_shapes(&self, pixmap: &mut Pixmap, scene: &Scene, viewport: &Viewport, clip: &Mask) {
        let style = &self.config.style;
        let alpha = (style.fill_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        let fill = solid_paint(style.fill_color, alpha);
        let edge = solid_paint(style.edge_color, alpha);
        let stroke = Stroke {
            width: self.pt(style.line_width),
            line_join: LineJoin::Round,
            ..Default::default()
        };

        for shape in &scene.shapes {
            let points = viewport.to_pixels(&shape.points());
            let Some((&(x0, y0), rest)) = points.split_first() else {
                continue;
            };

            let mut pb = PathBuilder::new();
            pb.move_to(x0, y0);
            for &(x, y) in rest {
                pb.line_to(x, y);
            }
            pb.close();

            // A single point does not produce a path
            let Some(path) = pb.finish() else {
                continue;
            };

            pixmap.fill_path(
                &path,
                &fill,
                FillRule::Winding,
                Transform::identity(),
                Some(clip),
            );
            if style.line_width > 0.0 {
                pixmap.stroke_path(&path, &edge, &stroke, Transform::identity(), Some(clip));
            }
        }
    }

    fn draw_markers(&self, pixmap: &mut Pixmap, scene: &Scene, viewport: &Viewport, clip: &Mask) {
        // marker_size is an area in pt^2, like a scatter plot's `s`
        let radius = self.pt(self.config.style.marker_size.max(0.0).sqrt() / 2.0);
        if radius <= 0.0 {
            return;
        }

        for (i, marker) in scene.markers.iter().enumerate() {
            let (x, y) = viewport.to_pixel(marker.position.0, marker.position.1);
            let Some(circle) = PathBuilder::from_circle(x, y, radius) else {
                continue;
            };
            let paint = solid_paint(MARKER_CYCLE[i % MARKER_CYCLE.len()], 255);
            pixmap.fill_path(
                &circle,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                Some(clip),
            );
        }
    }

    fn draw_site_labels(&self, pixmap: &mut Pixmap, scene: &Scene, viewport: &Viewport) {
        let size = self.pt(self.config.style.label_font_size);
        for marker in &scene.markers {
            let (x, y) = viewport.to_pixel(marker.label_anchor.0, marker.label_anchor.1);
            self.draw_text(pixmap, size, &marker.label, x, y, Align::Left, VAlign::Baseline, 0.0);
        }
    }

    fn draw_frame(&self, pixmap: &mut Pixmap, area: Rect) {
        let path = PathBuilder::from_rect(area);
        let paint = solid_paint([0, 0, 0], 255);
        let stroke = Stroke {
            width: self.pt(FRAME_WIDTH),
            line_join: LineJoin::Miter,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Tick marks, tick labels, axis titles and the figure title
    fn draw_axes(&self, pixmap: &mut Pixmap, viewport: &Viewport) {
        let extent = viewport.extent();
        let area = viewport.area();
        let x_ticks = nice_ticks(extent.min_x, extent.max_x, TICK_TARGET);
        let y_ticks = nice_ticks(extent.min_y, extent.max_y, TICK_TARGET);

        let tick_len = self.pt(TICK_LENGTH);
        let tick_pad = self.pt(TICK_PAD);
        let tick_size = self.pt(TICK_FONT);

        let mut marks = PathBuilder::new();
        for &x in &x_ticks.values {
            let (px, _) = viewport.to_pixel(x, extent.min_y);
            marks.move_to(px, area.bottom());
            marks.line_to(px, area.bottom() + tick_len);
            self.draw_text(
                pixmap,
                tick_size,
                &x_ticks.label(x),
                px,
                area.bottom() + tick_len + tick_pad,
                Align::Center,
                VAlign::Top,
                0.0,
            );
        }

        let mut widest_y_label: f32 = 0.0;
        for &y in &y_ticks.values {
            let (_, py) = viewport.to_pixel(extent.min_x, y);
            marks.move_to(area.left, py);
            marks.line_to(area.left - tick_len, py);
            let label = y_ticks.label(y);
            widest_y_label = widest_y_label.max(self.text.text_width(&label, tick_size));
            self.draw_text(
                pixmap,
                tick_size,
                &label,
                area.left - tick_len - tick_pad,
                py,
                Align::Right,
                VAlign::Middle,
                0.0,
            );
        }

        if let Some(path) = marks.finish() {
            let stroke = Stroke {
                width: self.pt(TICK_WIDTH),
                ..Default::default()
            };
            pixmap.stroke_path(
                &path,
                &solid_paint([0, 0, 0], 255),
                &stroke,
                Transform::identity(),
                None,
            );
        }

        let label_size = self.pt(AXIS_LABEL_FONT);
        let label_pad = self.pt(AXIS_LABEL_PAD);

        self.draw_text(
            pixmap,
            label_size,
            "Longitude",
            area.left + area.width / 2.0,
            area.bottom() + tick_len + tick_pad + self.text.cap_height(tick_size) + label_pad,
            Align::Center,
            VAlign::Top,
            0.0,
        );
        self.draw_text(
            pixmap,
            label_size,
            "Latitude",
            area.left - tick_len - tick_pad - widest_y_label - label_pad,
            area.top + area.height / 2.0,
            Align::Center,
            VAlign::Baseline,
            -90.0,
        );

        let title_size = self.pt(TITLE_FONT);
        self.draw_text(
            pixmap,
            title_size,
            &self.config.title,
            area.left + area.width / 2.0,
            area.top - self.pt(TITLE_PAD),
            Align::Center,
            VAlign::Baseline,
            0.0,
        );
    }

    /// Paint `text` in black with its anchor at (x, y), rotated by
    /// `rotation` degrees around the anchor
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        pixmap: &mut Pixmap,
        size_px: f32,
        text: &str,
        x: f32,
        y: f32,
        align: Align,
        valign: VAlign,
        rotation: f32,
    ) {
        let Some(laid_out) = self.text.layout(text, size_px, align, valign) else {
            return;
        };

        let paint = solid_paint([0, 0, 0], 255);
        let transform = Transform::from_rotate(rotation).post_translate(x, y);
        match laid_out.paint {
            TextPaint::Fill => {
                pixmap.fill_path(&laid_out.path, &paint, FillRule::Winding, transform, None);
            }
            TextPaint::Stroke(width) => {
                let stroke = Stroke {
                    width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Default::default()
                };
                pixmap.stroke_path(&laid_out.path, &paint, &stroke, transform, None);
            }
        }
    }
}

fn solid_paint(rgb: [u8; 3], alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], alpha);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::domain::default_sites;

    fn small_config() -> RenderConfig {
        RenderConfig {
            dpi: 40,
            ..RenderConfig::default()
        }
    }

    fn is_white(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        let p = pixmap.pixel(x, y).unwrap();
        p.red() == 255 && p.green() == 255 && p.blue() == 255 && p.alpha() == 255
    }

    #[test]
    fn test_plot_area_inside_canvas() {
        let config = small_config();
        let figure = Figure::new(&config);
        let area = figure.plot_area(320, 400);

        assert!(area.left > 0.0 && area.right() < 320.0);
        assert!(area.top > 0.0 && area.bottom() < 400.0);
    }

    #[test]
    fn test_draw_canvas_size() {
        let config = small_config();
        let scene = Scene::build(&[], &default_sites(), &StyleConfig::default()).unwrap();
        let pixmap = Figure::new(&config).draw(&scene).unwrap();

        assert_eq!((pixmap.width(), pixmap.height()), (320, 400));
        // Canvas corners stay blank
        assert!(is_white(&pixmap, 0, 0));
        assert!(is_white(&pixmap, 319, 399));
    }

    #[test]
    fn test_boundary_is_filled() {
        let config = small_config();
        let ring = vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let scene = Scene::build(&[ring], &[], &config.style).unwrap();
        let figure = Figure::new(&config);
        let pixmap = figure.draw(&scene).unwrap();

        let viewport = Viewport::new(scene.extent.clone(), figure.plot_area(320, 400));
        let (x, y) = viewport.to_pixel(0.33, 0.47);
        let p = pixmap.pixel(x as u32, y as u32).unwrap();

        // Translucent blue over white
        assert!(p.blue() > p.red());
        assert!(p.red() < 255);
    }

    #[test]
    fn test_markers_are_drawn() {
        let config = small_config();
        let scene = Scene::build(&[], &default_sites(), &config.style).unwrap();
        let figure = Figure::new(&config);
        let pixmap = figure.draw(&scene).unwrap();

        let viewport = Viewport::new(scene.extent.clone(), figure.plot_area(320, 400));
        for marker in &scene.markers {
            let (x, y) = viewport.to_pixel(marker.position.0, marker.position.1);
            assert!(!is_white(&pixmap, x.round() as u32, y.round() as u32));
        }
    }

    #[test]
    fn test_stroke_fallback_draws_title() {
        let config = small_config();
        let scene = Scene::build(&[], &default_sites(), &config.style).unwrap();
        let figure = Figure::with_text(&config, TextRenderer::Stroke);

        let pixmap = figure.draw(&scene).unwrap();
        let area = figure.plot_area(320, 400);
        // Title sits above the frame
        let title_rows = 0..(area.top as u32 - 2);
        let inked = title_rows
            .flat_map(|y| (0..320).map(move |x| (x, y)))
            .any(|(x, y)| !is_white(&pixmap, x, y));
        assert!(inked);
    }
}
