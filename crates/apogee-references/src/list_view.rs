use crate::display::DisplayInfo;
use crate::entry_view::ReferenceEntryView;
use crate::error::ReferenceViewError;
use crate::model::ReferenceEntry;
use crate::tree_entry::{MenuAction, MenuItem, TreeEntry};
use crate::view_state::ListViewState;
use std::sync::Arc;

/// Folder row holding every entry of one reference type
#[derive(Debug, Clone)]
pub struct ReferenceListView {
    reference_type: String,
    display: Arc<DisplayInfo>,
    tree_entry: TreeEntry,
    /// In creation order
    child_views: Vec<ReferenceEntryView>,
}

impl ReferenceListView {
    pub fn new(reference_type: impl Into<String>, display: Arc<DisplayInfo>, view_state: Option<&ListViewState>) -> Self {
        let reference_type = reference_type.into();
        let menu = vec![MenuItem {
            title: format!("Add {}", display.display_name),
            action: MenuAction::AddReference {
                reference_type: reference_type.clone(),
            },
        }];
        let mut tree_entry = TreeEntry::new(display.list_name.clone(), display.list_icon.clone()).with_menu(menu);
        if let Some(state) = view_state.and_then(|view_state| view_state.tree_state) {
            tree_entry.set_state(state);
        }

        Self {
            reference_type,
            display,
            tree_entry,
            child_views: Vec::new(),
        }
    }

    pub fn reference_type(&self) -> &str {
        &self.reference_type
    }

    pub fn display_info(&self) -> &DisplayInfo {
        &self.display
    }

    /// The list row itself, without entry children
    pub fn tree_entry(&self) -> &TreeEntry {
        &self.tree_entry
    }

    pub fn tree_entry_mut(&mut self) -> &mut TreeEntry {
        &mut self.tree_entry
    }

    pub fn child_views(&self) -> &[ReferenceEntryView] {
        &self.child_views
    }

    pub fn child_view(&self, entry_id: &str) -> Option<&ReferenceEntryView> {
        self.child_views.iter().find(|view| view.entry_id() == entry_id)
    }

    /// The list row with one child per displayed entry
    pub fn snapshot(&self) -> TreeEntry {
        let mut entry = self.tree_entry.clone();
        for view in &self.child_views {
            entry.add_child(view.tree_entry().clone());
        }
        entry
    }

    pub fn on_link_created(&mut self, entry: &dyn ReferenceEntry) -> Result<(), ReferenceViewError> {
        if self.child_view(entry.id()).is_some() {
            return Err(ReferenceViewError::DuplicateEntry(entry.id().to_string()));
        }
        self.child_views
            .push(ReferenceEntryView::new(entry, Arc::clone(&self.display)));
        Ok(())
    }

    pub fn on_link_updated(&mut self, entry: &dyn ReferenceEntry) {
        if let Some(view) = self.child_views.iter_mut().find(|view| view.entry_id() == entry.id()) {
            view.on_link_updated(entry);
        }
    }

    pub fn on_link_deleted(&mut self, entry: &dyn ReferenceEntry) {
        self.child_views.retain(|view| view.entry_id() != entry.id());
    }

    pub fn view_state(&self) -> ListViewState {
        ListViewState {
            tree_state: Some(self.tree_entry.state()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayCatalog;
    use crate::model::{EntryField, ReferenceRecord};
    use crate::tree_entry::TreeState;
    use pretty_assertions::assert_eq;

    fn css_list(view_state: Option<&ListViewState>) -> ReferenceListView {
        ReferenceListView::new("css link", DisplayCatalog::builtin().lookup("css link"), view_state)
    }

    fn labels(list: &ReferenceListView) -> Vec<String> {
        list.snapshot()
            .children()
            .iter()
            .map(|child| child.label().to_string())
            .collect()
    }

    #[test]
    fn test_list_row() {
        let list = css_list(None);
        assert_eq!(list.tree_entry().label(), "CSS Links");
        assert_eq!(list.tree_entry().state(), TreeState::Collapsed);
        assert_eq!(list.tree_entry().menu()[0].title, "Add CSS Link");
    }

    #[test]
    fn test_restores_tree_state() {
        let state = ListViewState {
            tree_state: Some(TreeState::Expanded),
        };
        let list = css_list(Some(&state));
        assert_eq!(list.view_state(), state);
    }

    #[test]
    fn test_create_update_delete() {
        let mut list = css_list(None);
        list.on_link_created(&ReferenceRecord::new("a", "css link").with_nickname("bootstrap"))
            .unwrap();
        list.on_link_created(&ReferenceRecord::new("b", "css link").with_nickname("tailwind"))
            .unwrap();
        assert_eq!(labels(&list), vec!["bootstrap", "tailwind"]);

        list.on_link_updated(
            &ReferenceRecord::new("a", "css link")
                .with_nickname("bulma")
                .with_updated(&[EntryField::Data]),
        );
        assert_eq!(labels(&list), vec!["bulma", "tailwind"]);

        list.on_link_deleted(&ReferenceRecord::new("a", "css link"));
        assert_eq!(labels(&list), vec!["tailwind"]);
        assert!(list.child_view("a").is_none());
    }

    #[test]
    fn test_recreate_after_delete() {
        let mut list = css_list(None);
        let record = ReferenceRecord::new("a", "css link").with_nickname("bootstrap");
        list.on_link_created(&record).unwrap();
        list.on_link_deleted(&record);
        list.on_link_created(&record).unwrap();
        assert_eq!(list.child_views().len(), 1);
    }

    #[test]
    fn test_duplicate_create_is_an_error() {
        let mut list = css_list(None);
        let record = ReferenceRecord::new("a", "css link");
        list.on_link_created(&record).unwrap();
        assert!(matches!(
            list.on_link_created(&record),
            Err(ReferenceViewError::DuplicateEntry(id)) if id == "a"
        ));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut list = css_list(None);
        let ghost = ReferenceRecord::new("ghost", "css link").with_updated(&[EntryField::Data]);
        list.on_link_updated(&ghost);
        list.on_link_deleted(&ghost);
        assert!(list.child_views().is_empty());
    }
}
