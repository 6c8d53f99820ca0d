//! FloorGrid Core Library
//!
//! Grid annotation of floor-plan images: coordinate transforms, per-floor
//! cell painting and labeling, walkway connectivity and navigation export.

pub mod background;
pub mod cell;
pub mod config;
pub mod connectivity;
pub mod coords;
pub mod error;
pub mod export;
pub mod floor;
pub mod palette;
pub mod project;
pub mod store;
pub mod stroke;

pub use background::{BackgroundImage, ImageFormat};
pub use cell::CellKey;
pub use config::ProjectConfig;
pub use connectivity::{Connectivity, Edge, EdgeKind};
pub use coords::CoordinateSpace;
pub use error::{FloorError, FloorResult, GridError, ImportError};
pub use export::{ExportScope, ExportTables, Snapshot, ValidationReport};
pub use floor::{Floor, FloorData, FloorKey, FloorSummary};
pub use palette::{ColorKey, ColorRegistry, ConnectionKind, PaintCategory, PoiCategory};
pub use project::{Project, ViewSettings};
pub use store::FloorStore;
pub use stroke::{PaintMode, StrokeAction, StrokeState, StrokeTracker};
