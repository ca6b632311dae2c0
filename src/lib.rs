/// DataTable - In-Memory Table Widget
///
/// Renders a fixed row set as an HTML table with per-column filtering, single-column
/// sorting and pagination. The rows shown are derived from the dataset by a
/// project → filter → sort → page pipeline, and the mounted markup is kept in sync with
/// either a full draw or a rows-only redraw.

pub mod column;
pub mod config;
pub mod error;
pub mod table;
pub mod view;
pub mod render;
pub mod mount;
pub mod events;
pub mod datatable;

pub use column::{Column, ColumnDef, ColumnType, ColumnValue, TypeInference};
pub use config::{PipelineMode, TableConfig, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use error::{Result, TableError};
pub use table::{Dataset, FilterState, Record, Row, Schema, SortState, TableModel};
pub use view::{FilterView, PageTarget, PageWindow, Predicate, SortKey, SortOrder, SortedView};
pub use render::{RenderOptions, Renderer, TableMarkup};
pub use mount::{Document, DrawStats, MemoryDocument, MemoryMount, Mount};
pub use events::{parse_event_script, Bindings, DomEvent, EventBinder, EventKind, TableEvent};
pub use datatable::DataTable;

// Browser bindings - only when wasm feature is enabled
#[cfg(feature = "wasm")]
pub mod dom;
#[cfg(feature = "wasm")]
pub use dom::{DomDocument, DomMount, WasmDataTable};
