mod frame;
mod null_renderer;
mod primitives;

pub use crate::core::Color;
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    AreaPrimitive, LinePrimitive, LineStrokeStyle, RectPrimitive, TextHAlign, TextPrimitive,
};

use crate::error::ChartResult;

/// Contract implemented by the host's drawing layer.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from zone, truncation and hover logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
