pub mod extent;
pub mod ticks;
pub mod viewport;

pub use extent::{Bounds, DrawingExtent, MARGIN_RATIO, ZERO_RANGE_PADDING};
pub use ticks::{Ticks, nice_ticks};
pub use viewport::{PlotArea, Viewport};
