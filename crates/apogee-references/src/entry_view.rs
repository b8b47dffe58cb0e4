use crate::display::DisplayInfo;
use crate::model::{EntryField, ReferenceEntry};
use crate::tree_entry::{MenuAction, MenuItem, TreeEntry};
use std::sync::Arc;

pub const UNNAMED_ENTRY_LABEL: &str = "-unnamed entry-";

/// Tree row for a single reference entry
#[derive(Debug, Clone)]
pub struct ReferenceEntryView {
    entry_id: String,
    display: Arc<DisplayInfo>,
    tree_entry: TreeEntry,
}

fn entry_label(entry: &dyn ReferenceEntry) -> &str {
    entry.nickname().filter(|name| !name.is_empty()).unwrap_or(UNNAMED_ENTRY_LABEL)
}

impl ReferenceEntryView {
    pub fn new(entry: &dyn ReferenceEntry, display: Arc<DisplayInfo>) -> Self {
        let menu = vec![
            MenuItem {
                title: format!("Update {}", display.display_name),
                action: MenuAction::UpdateReference {
                    reference_type: display.reference_type.clone(),
                    entry_id: entry.id().to_string(),
                },
            },
            MenuItem {
                title: format!("Remove {}", display.display_name),
                action: MenuAction::RemoveReference {
                    reference_type: display.reference_type.clone(),
                    entry_id: entry.id().to_string(),
                },
            },
        ];
        let mut tree_entry = TreeEntry::new(entry_label(entry), display.entry_icon.clone()).with_menu(menu);
        tree_entry.set_banner_state(entry.state(), entry.state_msg());

        Self {
            entry_id: entry.id().to_string(),
            display,
            tree_entry,
        }
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn display_info(&self) -> &DisplayInfo {
        &self.display
    }

    pub fn tree_entry(&self) -> &TreeEntry {
        &self.tree_entry
    }

    pub fn on_link_updated(&mut self, entry: &dyn ReferenceEntry) {
        if entry.id() != self.entry_id {
            return;
        }

        if entry.is_field_updated(EntryField::Data) {
            self.tree_entry.set_label(entry_label(entry));
        }
        if entry.is_field_updated(EntryField::State) || entry.is_field_updated(EntryField::StateMsg) {
            self.tree_entry.set_banner_state(entry.state(), entry.state_msg());
        }
    }
}
