//! Floor Plan Render Library
//!
//! Composes the editor's state into a display list and renders it.
//! The bundled backend writes SVG.

mod renderer;
mod svg;
mod view;

pub use renderer::{
    GRID_COLOR, GRID_LINE_WIDTH, GridStyle, Layer, RenderResult, Renderer, RendererError, Scene,
};
pub use svg::SvgRenderer;
pub use view::{CanvasView, grid_lines};
