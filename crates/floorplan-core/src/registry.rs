//! Element type catalog.
//!
//! A fixed, process-wide table that maps an element type key to its palette
//! category, label, default footprint, color and the shape used to draw it.
//! Types missing from the table resolve to [`ElementTypeDescriptor::fallback`]
//! so plans written by a newer catalog still render and stay editable.

use crate::color::SerializableColor;
use serde::{Deserialize, Serialize};

/// Palette grouping. Carries no behavioral constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Furniture,
    Structure,
    Areas,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Furniture, Category::Structure, Category::Areas];

    /// Display label used by the tool palette.
    pub fn label(self) -> &'static str {
        match self {
            Category::Furniture => "Mobilier",
            Category::Structure => "Structure",
            Category::Areas => "Espaces",
        }
    }
}

/// Which drawing routine renders an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKey {
    Desk,
    Chair,
    MeetingTable,
    PhoneBooth,
    Lounge,
    Kitchen,
    Printer,
    Plant,
    Wall,
    Door,
    Window,
    /// Plain rounded rectangle, used for unknown types.
    Generic,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTypeDescriptor {
    pub key: &'static str,
    pub category: Category,
    pub label: &'static str,
    pub default_width: f64,
    pub default_height: f64,
    pub color: SerializableColor,
    pub shape: ShapeKey,
}

impl ElementTypeDescriptor {
    /// Descriptor used for any type the catalog does not know.
    pub const fn fallback() -> Self {
        Self {
            key: "unknown",
            category: Category::Furniture,
            label: "Élément",
            default_width: 80.0,
            default_height: 80.0,
            color: SerializableColor::rgb(0x94, 0xa3, 0xb8),
            shape: ShapeKey::Generic,
        }
    }

    pub fn default_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.default_width, self.default_height)
    }
}

const fn entry(
    key: &'static str,
    category: Category,
    label: &'static str,
    size: (f64, f64),
    color: SerializableColor,
    shape: ShapeKey,
) -> ElementTypeDescriptor {
    ElementTypeDescriptor {
        key,
        category,
        label,
        default_width: size.0,
        default_height: size.1,
        color,
        shape,
    }
}

/// The catalog, in palette order.
static ELEMENT_TYPES: [ElementTypeDescriptor; 12] = [
    entry("desk", Category::Furniture, "Bureau", (120.0, 80.0), SerializableColor::rgb(0x3b, 0x82, 0xf6), ShapeKey::Desk),
    entry("chair", Category::Furniture, "Chaise", (40.0, 40.0), SerializableColor::rgb(0x64, 0x74, 0x8b), ShapeKey::Chair),
    entry("meeting_table", Category::Furniture, "Table de réunion", (160.0, 100.0), SerializableColor::rgb(0xa7, 0x8b, 0xfa), ShapeKey::MeetingTable),
    entry("printer", Category::Furniture, "Imprimante", (60.0, 60.0), SerializableColor::rgb(0x6b, 0x72, 0x80), ShapeKey::Printer),
    entry("plant", Category::Furniture, "Plante", (40.0, 40.0), SerializableColor::rgb(0x10, 0xb9, 0x81), ShapeKey::Plant),
    entry("wall", Category::Structure, "Mur", (200.0, 20.0), SerializableColor::rgb(0x33, 0x41, 0x55), ShapeKey::Wall),
    entry("door", Category::Structure, "Porte", (40.0, 40.0), SerializableColor::rgb(0xa1, 0x62, 0x07), ShapeKey::Door),
    entry("window", Category::Structure, "Fenêtre", (80.0, 10.0), SerializableColor::rgb(0x38, 0xbd, 0xf8), ShapeKey::Window),
    entry("meeting_room", Category::Areas, "Salle de réunion", (200.0, 150.0), SerializableColor::rgb(0x8b, 0x5c, 0xf6), ShapeKey::MeetingTable),
    entry("phone_booth", Category::Areas, "Phone booth", (80.0, 80.0), SerializableColor::rgb(0xf5, 0x9e, 0x0b), ShapeKey::PhoneBooth),
    entry("lounge", Category::Areas, "Espace détente", (180.0, 120.0), SerializableColor::rgb(0x06, 0xb6, 0xd4), ShapeKey::Lounge),
    entry("kitchen", Category::Areas, "Cuisine", (150.0, 100.0), SerializableColor::rgb(0x84, 0xcc, 0x16), ShapeKey::Kitchen),
];

static FALLBACK: ElementTypeDescriptor = ElementTypeDescriptor::fallback();

/// Look up a type key. `None` means the type is unknown to this catalog.
pub fn lookup(element_type: &str) -> Option<&'static ElementTypeDescriptor> {
    ELEMENT_TYPES.iter().find(|d| d.key == element_type)
}

/// Look up a type key, falling back to the generic descriptor.
pub fn describe(element_type: &str) -> &'static ElementTypeDescriptor {
    lookup(element_type).unwrap_or_else(|| {
        log::trace!("unknown element type '{element_type}', using generic descriptor");
        &FALLBACK
    })
}

/// Whether the catalog knows this type.
pub fn is_known(element_type: &str) -> bool {
    lookup(element_type).is_some()
}

/// All catalog entries in palette order.
pub fn all() -> &'static [ElementTypeDescriptor] {
    &ELEMENT_TYPES
}

/// Catalog entries of one category, in palette order.
pub fn by_category(category: Category) -> impl Iterator<Item = &'static ElementTypeDescriptor> {
    ELEMENT_TYPES.iter().filter(move |d| d.category == category)
}
