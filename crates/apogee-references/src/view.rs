use crate::display::DisplayCatalog;
use crate::error::ReferenceViewError;
use crate::list_view::ReferenceListView;
use crate::model::{ReferenceEntry, ReferenceEvent, ReferenceManager};
use crate::tree_entry::{TreeEntry, TreeState};
use crate::view_state::ReferenceViewState;
use std::sync::Arc;

pub const LIBRARIES_LABEL: &str = "Libraries";
const LIBRARIES_ICON: &str = "icons3/folderIcon.png";

/// Receives user-facing error messages
pub trait AlertSink {
    fn alert(&self, message: &str);
}

impl<F: Fn(&str)> AlertSink for F {
    fn alert(&self, message: &str) {
        self(message)
    }
}

/// Sink for hosts without a dialog layer
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// The `Libraries` branch of the workspace tree
pub struct ReferenceView {
    manager: Arc<dyn ReferenceManager>,
    tree_entry: TreeEntry,
    lists: Vec<ReferenceListView>,
    alerts: Box<dyn AlertSink>,
}

impl ReferenceView {
    pub fn new(manager: Arc<dyn ReferenceManager>, catalog: &DisplayCatalog) -> Self {
        let view_state = manager.cached_view_state().unwrap_or_default();

        let mut tree_entry = TreeEntry::new(LIBRARIES_LABEL, LIBRARIES_ICON);
        if let Some(state) = view_state.tree_state {
            tree_entry.set_state(state);
        }

        let lists = manager
            .reference_types()
            .into_iter()
            .map(|reference_type| {
                let display = catalog.lookup(&reference_type);
                let list_state = view_state.lists.get(&reference_type);
                ReferenceListView::new(reference_type, display, list_state)
            })
            .collect();

        Self {
            manager,
            tree_entry,
            lists,
            alerts: Box::new(LogAlertSink),
        }
    }

    pub fn with_alert_sink(mut self, alerts: impl AlertSink + 'static) -> Self {
        self.alerts = Box::new(alerts);
        self
    }

    pub fn manager(&self) -> &Arc<dyn ReferenceManager> {
        &self.manager
    }

    pub fn lists(&self) -> &[ReferenceListView] {
        &self.lists
    }

    pub fn lists_mut(&mut self) -> &mut [ReferenceListView] {
        &mut self.lists
    }

    pub fn list(&self, reference_type: &str) -> Option<&ReferenceListView> {
        self.lists.iter().find(|list| list.reference_type() == reference_type)
    }

    pub fn list_mut(&mut self, reference_type: &str) -> Option<&mut ReferenceListView> {
        self.lists.iter_mut().find(|list| list.reference_type() == reference_type)
    }

    pub fn set_tree_state(&mut self, state: TreeState) {
        self.tree_entry.set_state(state);
    }

    /// Root, list and entry rows assembled into one tree
    pub fn tree_entry(&self) -> TreeEntry {
        let mut root = self.tree_entry.clone();
        for list in &self.lists {
            root.add_child(list.snapshot());
        }
        root
    }

    pub fn view_state(&self) -> ReferenceViewState {
        ReferenceViewState {
            tree_state: Some(self.tree_entry.state()),
            lists: self
                .lists
                .iter()
                .map(|list| (list.reference_type().to_string(), list.view_state()))
                .collect(),
        }
    }

    /// Apply a change from the reference manager; failures go to the alert sink
    pub fn handle_event(&mut self, event: ReferenceEvent<'_>) {
        let (context, result) = match event {
            ReferenceEvent::Created(entry) => (
                "Error updating display for created reference entry: ",
                self.on_link_created(entry),
            ),
            ReferenceEvent::Updated(entry) => (
                "Error updating display for updated reference entry: ",
                self.on_link_updated(entry),
            ),
            ReferenceEvent::Deleted(entry) => (
                "Error updating display for deleted reference entry: ",
                self.on_link_deleted(entry),
            ),
            ReferenceEvent::ManagerUpdated(manager) => {
                self.manager = manager;
                return;
            }
        };

        if let Err(err) = result {
            log::error!("{context}{err}");
            self.alerts.alert(&format!("{context}{err}"));
        }
    }

    fn on_link_created(&mut self, entry: &dyn ReferenceEntry) -> Result<(), ReferenceViewError> {
        match self.list_mut(entry.entry_type()) {
            Some(list) => list.on_link_created(entry),
            None => Ok(()),
        }
    }

    fn on_link_updated(&mut self, entry: &dyn ReferenceEntry) -> Result<(), ReferenceViewError> {
        if let Some(list) = self.list_mut(entry.entry_type()) {
            list.on_link_updated(entry);
        }
        Ok(())
    }

    fn on_link_deleted(&mut self, entry: &dyn ReferenceEntry) -> Result<(), ReferenceViewError> {
        let list = self
            .list_mut(entry.entry_type())
            .ok_or_else(|| ReferenceViewError::UnknownReferenceType(entry.entry_type().to_string()))?;
        list.on_link_deleted(entry);
        Ok(())
    }
}
