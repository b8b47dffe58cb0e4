//! Headless reference tree for the Apogee workspace panel.
//!
//! The application's reference manager owns the linked libraries; this
//! crate mirrors them into a [`TreeEntry`] hierarchy (`Libraries` → one list
//! per reference type → one row per entry) and keeps it current from
//! [`ReferenceEvent`]s. Rendering and menu execution stay with the host.

pub mod display;
pub mod entry_view;
pub mod error;
pub mod list_view;
pub mod model;
pub mod tree_entry;
pub mod view;
pub mod view_state;

pub use display::{DisplayCatalog, DisplayInfo, DisplayInfoOverride, FormField};
pub use entry_view::{ReferenceEntryView, UNNAMED_ENTRY_LABEL};
pub use error::ReferenceViewError;
pub use list_view::ReferenceListView;
pub use model::{EntryField, ReferenceEntry, ReferenceEvent, ReferenceManager, ReferenceRecord, StaticReferenceManager};
pub use tree_entry::{BannerState, MenuAction, MenuItem, TreeEntry, TreeRow, TreeState};
pub use view::{AlertSink, LIBRARIES_LABEL, LogAlertSink, ReferenceView};
pub use view_state::{ListViewState, ReferenceViewState};
