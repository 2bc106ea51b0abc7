//! Renderer trait abstraction and the display list it consumes.

use floorplan_core::color::SerializableColor;
use floorplan_core::plan::ElementId;
use floorplan_core::shapes::Primitive;
use kurbo::{Affine, Line, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Write failed: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
        }
    }

    pub fn from_visible(visible: bool) -> Self {
        if visible { GridStyle::Lines } else { GridStyle::None }
    }
}

/// Grid line color.
pub const GRID_COLOR: SerializableColor = SerializableColor::rgb(0xe2, 0xe8, 0xf0);
/// Grid line width.
pub const GRID_LINE_WIDTH: f64 = 1.0;

/// One group of primitives drawn under a common transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Element the layer belongs to. `None` for decoration.
    pub element_id: Option<ElementId>,
    /// Local-to-plan transform.
    pub transform: Affine,
    /// Rotation in degrees, kept for backends that write transforms as text.
    pub rotation: i64,
    pub primitives: Vec<Primitive>,
}

/// Everything needed to draw one frame, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Size,
    pub background: SerializableColor,
    pub grid: Vec<Line>,
    pub layers: Vec<Layer>,
}

impl Scene {
    /// Layers that draw elements, in paint order.
    pub fn element_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.element_id.is_some())
    }

    /// The selection decoration layer, if any.
    pub fn selection_layer(&self) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.element_id.is_none())
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the backend output for a frame.
    fn build_scene(&mut self, scene: &Scene) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, scene: &Scene) -> Color {
        scene.background.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_style_cycles() {
        assert_eq!(GridStyle::default(), GridStyle::Lines);
        assert_eq!(GridStyle::Lines.next(), GridStyle::None);
        assert_eq!(GridStyle::None.next(), GridStyle::Lines);
        assert_eq!(GridStyle::from_visible(false).name(), "None");
    }
}
