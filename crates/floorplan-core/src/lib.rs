//! Floor Plan Core Library
//!
//! Platform-agnostic data model, interaction state machine and persistence
//! seams for the office floor-plan editor.

pub mod color;
pub mod config;
pub mod input;
pub mod interaction;
pub mod plan;
pub mod registry;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod tools;

pub use color::{ColorParseError, SerializableColor};
pub use config::{ConfigError, EditorConfig};
pub use input::{PointerButton, PointerEvent};
pub use interaction::{Editor, EditorListener, InteractionState, NoopListener, PointerCapture};
pub use plan::{
    DocumentError, Element, ElementDraft, ElementId, ElementPatch, ElementProperties, Plan,
    PlanDocument, PlanError, PlanResult, PlanSettings, Status,
};
pub use registry::{Category, ElementTypeDescriptor, ShapeKey};
pub use selection::{Handle, HandleKind, HitTarget, hit_test};
pub use session::{PendingOp, PlanSession, SyncFailure};
pub use shapes::{ElementDrawing, Geometry, Paint, Primitive, Stroke};
pub use snap::{DEFAULT_GRID_SIZE, snap, snap_size, snap_to_grid};
pub use storage::{FileStore, MemoryStore, PlanStore, StorageError, StorageResult};
pub use tools::{PanelAction, SelectionPanel, ToolButton, ToolGroup, ToolPalette};
