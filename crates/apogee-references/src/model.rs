//! The application's reference data as seen by the tree view.

use crate::tree_entry::BannerState;
use crate::view_state::ReferenceViewState;
use std::sync::Arc;

/// Fields of an entry that an update may have touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    /// Url, nickname and the other user-edited fields
    Data,
    State,
    StateMsg,
}

/// A linked library or stylesheet owned by the reference manager
pub trait ReferenceEntry {
    fn id(&self) -> &str;
    fn entry_type(&self) -> &str;
    fn nickname(&self) -> Option<&str>;
    fn state(&self) -> BannerState;
    fn state_msg(&self) -> Option<&str>;
    /// Whether the change that produced this entry touched `field`
    fn is_field_updated(&self, field: EntryField) -> bool;
}

pub trait ReferenceManager {
    /// Reference types in display order
    fn reference_types(&self) -> Vec<String>;
    fn cached_view_state(&self) -> Option<ReferenceViewState>;
}

pub enum ReferenceEvent<'a> {
    Created(&'a dyn ReferenceEntry),
    Updated(&'a dyn ReferenceEntry),
    Deleted(&'a dyn ReferenceEntry),
    ManagerUpdated(Arc<dyn ReferenceManager>),
}

/// Plain in-memory entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub id: String,
    pub entry_type: String,
    pub nickname: Option<String>,
    pub state: BannerState,
    pub state_msg: Option<String>,
    pub updated: Vec<EntryField>,
}

impl ReferenceRecord {
    pub fn new(id: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entry_type: entry_type.into(),
            ..Default::default()
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_state(mut self, state: BannerState, msg: Option<&str>) -> Self {
        self.state = state;
        self.state_msg = msg.map(str::to_string);
        self
    }

    pub fn with_updated(mut self, fields: &[EntryField]) -> Self {
        self.updated = fields.to_vec();
        self
    }
}

impl ReferenceEntry for ReferenceRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn entry_type(&self) -> &str {
        &self.entry_type
    }

    fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    fn state(&self) -> BannerState {
        self.state
    }

    fn state_msg(&self) -> Option<&str> {
        self.state_msg.as_deref()
    }

    fn is_field_updated(&self, field: EntryField) -> bool {
        self.updated.contains(&field)
    }
}

/// Manager with a fixed list of types
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceManager {
    pub reference_types: Vec<String>,
    pub view_state: Option<ReferenceViewState>,
}

impl StaticReferenceManager {
    pub fn new(reference_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            reference_types: reference_types.into_iter().map(Into::into).collect(),
            view_state: None,
        }
    }
}

impl ReferenceManager for StaticReferenceManager {
    fn reference_types(&self) -> Vec<String> {
        self.reference_types.clone()
    }

    fn cached_view_state(&self) -> Option<ReferenceViewState> {
        self.view_state.clone()
    }
}
