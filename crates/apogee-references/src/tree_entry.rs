use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Expansion state of a tree entry, persisted in view state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeState {
    #[default]
    Collapsed,
    Expanded,
}

/// Status badge shown beside an entry label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerState {
    #[default]
    Normal,
    Pending,
    Info,
    Error,
}

impl BannerState {
    pub fn as_str(self) -> &'static str {
        match self {
            BannerState::Normal => "normal",
            BannerState::Pending => "pending",
            BannerState::Info => "info",
            BannerState::Error => "error",
        }
    }
}

/// What the application should do when a context menu item is picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MenuAction {
    AddReference { reference_type: String },
    UpdateReference { reference_type: String, entry_id: String },
    RemoveReference { reference_type: String, entry_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: String,
    pub action: MenuAction,
}

/// Headless node of the workspace tree panel
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    id: Uuid,
    label: String,
    icon: RelativePathBuf,
    banner: BannerState,
    banner_msg: Option<String>,
    state: TreeState,
    children: Vec<TreeEntry>,
    menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow<'a> {
    pub entry: &'a TreeEntry,
    pub depth: usize,
}

impl TreeEntry {
    pub fn new(label: impl Into<String>, icon: impl Into<RelativePathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            icon: icon.into(),
            banner: BannerState::Normal,
            banner_msg: None,
            state: TreeState::default(),
            children: Vec::new(),
            menu: Vec::new(),
        }
    }

    pub fn with_menu(mut self, menu: Vec<MenuItem>) -> Self {
        self.menu = menu;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn icon(&self) -> &RelativePath {
        &self.icon
    }

    /// Location of the icon under the application's resource directory
    pub fn icon_path(&self, resource_root: &Path) -> PathBuf {
        self.icon.to_path(resource_root)
    }

    pub fn banner(&self) -> BannerState {
        self.banner
    }

    pub fn banner_msg(&self) -> Option<&str> {
        self.banner_msg.as_deref()
    }

    pub fn set_banner_state(&mut self, banner: BannerState, msg: Option<&str>) {
        self.banner = banner;
        self.banner_msg = msg.map(str::to_string);
    }

    pub fn state(&self) -> TreeState {
        self.state
    }

    pub fn set_state(&mut self, state: TreeState) {
        self.state = state;
    }

    pub fn toggle_expanded(&mut self) {
        self.state = match self.state {
            TreeState::Collapsed => TreeState::Expanded,
            TreeState::Expanded => TreeState::Collapsed,
        };
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn children(&self) -> &[TreeEntry] {
        &self.children
    }

    pub fn add_child(&mut self, child: TreeEntry) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, id: Uuid) -> Option<TreeEntry> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }

    /// Visible rows in display order; children of collapsed entries are skipped
    pub fn flatten(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        self.collect_rows(0, &mut rows);
        rows
    }

    fn collect_rows<'a>(&'a self, depth: usize, rows: &mut Vec<TreeRow<'a>>) {
        rows.push(TreeRow { entry: self, depth });
        if self.state == TreeState::Expanded {
            for child in &self.children {
                child.collect_rows(depth + 1, rows);
            }
        }
    }

    /// Plain-text rendering of the visible rows
    pub fn outline(&self) -> String {
        self.flatten()
            .iter()
            .map(|row| {
                let marker = match (row.entry.children.is_empty(), row.entry.state) {
                    (true, _) => ' ',
                    (false, TreeState::Collapsed) => '+',
                    (false, TreeState::Expanded) => '-',
                };
                let mut line = format!("{}{marker} {}", "  ".repeat(row.depth), row.entry.label);
                if row.entry.banner != BannerState::Normal {
                    let msg = row.entry.banner_msg.as_deref().unwrap_or_default();
                    line.push_str(&format!(" [{}: {msg}]", row.entry.banner.as_str()));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> TreeEntry {
        let mut root = TreeEntry::new("Libraries", "icons3/folderIcon.png");
        let mut modules = TreeEntry::new("Web Modules", "icons3/folderIcon.png");
        modules.add_child(TreeEntry::new("lodash", "icons3/esModuleIcon.png"));
        modules.add_child(TreeEntry::new("d3", "icons3/esModuleIcon.png"));
        root.add_child(modules);
        root.add_child(TreeEntry::new("CSS Links", "icons3/folderIcon.png"));
        root
    }

    #[test]
    fn test_collapsed_root_shows_only_itself() {
        let root = sample_tree();
        let rows = root.flatten();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.label(), "Libraries");
        assert_eq!(rows[0].depth, 0);
    }

    #[test]
    fn test_flatten_honours_expansion() {
        let mut root = sample_tree();
        root.set_state(TreeState::Expanded);

        let labels: Vec<_> = root.flatten().iter().map(|row| (row.entry.label(), row.depth)).collect();
        assert_eq!(labels, vec![("Libraries", 0), ("Web Modules", 1), ("CSS Links", 1)]);

        root.children[0].toggle_expanded();
        let labels: Vec<_> = root.flatten().iter().map(|row| (row.entry.label(), row.depth)).collect();
        assert_eq!(
            labels,
            vec![
                ("Libraries", 0),
                ("Web Modules", 1),
                ("lodash", 2),
                ("d3", 2),
                ("CSS Links", 1)
            ]
        );
    }

    #[test]
    fn test_remove_child_by_id() {
        let mut root = sample_tree();
        let id = root.children()[1].id();

        let removed = root.remove_child(id).unwrap();
        assert_eq!(removed.label(), "CSS Links");
        assert_eq!(root.children().len(), 1);
        assert!(root.remove_child(id).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = TreeEntry::new("a", "a.png");
        let b = TreeEntry::new("a", "a.png");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_icon_path_resolves_under_resource_root() {
        let entry = TreeEntry::new("Libraries", "icons3/folderIcon.png");
        assert_eq!(
            entry.icon_path(Path::new("/opt/apogee/resources")),
            PathBuf::from("/opt/apogee/resources/icons3/folderIcon.png")
        );
    }

    #[test]
    fn test_outline_marks_banners() {
        let mut root = sample_tree();
        root.set_state(TreeState::Expanded);
        root.children[0].set_state(TreeState::Expanded);
        root.children[0].children[1].set_banner_state(BannerState::Error, Some("404"));

        insta::assert_snapshot!(root.outline(), @r"
        - Libraries
          - Web Modules
              lodash
              d3 [error: 404]
            CSS Links
        ");
    }

    #[test]
    fn test_tree_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TreeState::Expanded).unwrap(), r#""expanded""#);
        let state: TreeState = serde_json::from_str(r#""collapsed""#).unwrap();
        assert_eq!(state, TreeState::Collapsed);
    }
}
