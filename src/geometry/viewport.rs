use super::DrawingExtent;

/// Pixel rectangle of the axes inside the figure (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotArea {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Maps data coordinates (lon, lat) onto the plot area
///
/// Each axis is stretched independently to fill the plot area, so the
/// horizontal and vertical scales generally differ.
#[derive(Debug, Clone)]
pub struct Viewport {
    extent: DrawingExtent,
    area: PlotArea,
    scale_x: f64,
    scale_y: f64,
}

impl Viewport {
    pub fn new(extent: DrawingExtent, area: PlotArea) -> Self {
        let scale_x = area.width as f64 / extent.width();
        let scale_y = area.height as f64 / extent.height();
        Self {
            extent,
            area,
            scale_x,
            scale_y,
        }
    }

    /// Data point to pixel position
    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let px = self.area.left as f64 + (x - self.extent.min_x) * self.scale_x;
        let py = self.area.bottom() as f64 - (y - self.extent.min_y) * self.scale_y;
        (px as f32, py as f32)
    }

    pub fn to_pixels(&self, points: &[(f64, f64)]) -> Vec<(f32, f32)> {
        points.iter().map(|&(x, y)| self.to_pixel(x, y)).collect()
    }

    pub fn extent(&self) -> &DrawingExtent {
        &self.extent
    }

    pub fn area(&self) -> PlotArea {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let extent = DrawingExtent {
            min_x: 0.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 20.0,
        };
        let area = PlotArea {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 400.0,
        };
        Viewport::new(extent, area)
    }

    #[test]
    fn test_corners() {
        let vp = viewport();
        assert_eq!(vp.to_pixel(0.0, 0.0), (100.0, 450.0));
        assert_eq!(vp.to_pixel(10.0, 20.0), (300.0, 50.0));
    }

    #[test]
    fn test_center() {
        let vp = viewport();
        let (x, y) = vp.to_pixel(5.0, 10.0);
        assert!((x - 200.0).abs() < 0.01);
        assert!((y - 250.0).abs() < 0.01);
    }
}
