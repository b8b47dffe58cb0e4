use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const FOLDER_ICON: &str = "icons3/folderIcon.png";
const FALLBACK_ENTRY_ICON: &str = "icons3/javascriptLink.png";

/// One input of the add/update dialog for a reference type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub label: String,
    pub key: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FormField {
    fn text(label: &str, key: &str, size: u32) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            size,
            hint: None,
            help: None,
        }
    }

    fn nickname() -> Self {
        Self::text("Display Name: ", "nickname", 50)
    }
}

/// How entries of one reference type are presented in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub reference_type: String,
    pub list_name: String,
    pub display_name: String,
    pub form_body: Vec<FormField>,
    pub list_icon: RelativePathBuf,
    pub entry_icon: RelativePathBuf,
}

impl DisplayInfo {
    fn url_entry(reference_type: &str, list_name: &str, display_name: &str, entry_icon: &str) -> Self {
        Self {
            reference_type: reference_type.to_string(),
            list_name: list_name.to_string(),
            display_name: display_name.to_string(),
            form_body: vec![FormField::text("URL: ", "url", 100), FormField::nickname()],
            list_icon: RelativePathBuf::from(FOLDER_ICON),
            entry_icon: RelativePathBuf::from(entry_icon),
        }
    }

    /// Display info for a type with no catalog entry, named after the type
    pub fn fallback(reference_type: &str) -> Self {
        Self::url_entry(reference_type, reference_type, reference_type, FALLBACK_ENTRY_ICON)
    }
}

/// Partial display info from configuration, applied over the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfoOverride {
    pub reference_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_icon: Option<RelativePathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_icon: Option<RelativePathBuf>,
}

impl DisplayInfoOverride {
    pub fn apply(&self, info: &mut DisplayInfo) {
        if let Some(list_name) = &self.list_name {
            info.list_name = list_name.clone();
        }
        if let Some(display_name) = &self.display_name {
            info.display_name = display_name.clone();
        }
        if let Some(list_icon) = &self.list_icon {
            info.list_icon = list_icon.clone();
        }
        if let Some(entry_icon) = &self.entry_icon {
            info.entry_icon = entry_icon.clone();
        }
    }
}

/// Display info per reference type
#[derive(Debug, Clone, Default)]
pub struct DisplayCatalog {
    entries: BTreeMap<String, Arc<DisplayInfo>>,
}

impl DisplayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference types the application ships with
    pub fn builtin() -> Self {
        let mut npm = DisplayInfo::url_entry("npm module", "NPM Modules", "NPM Module", "icons3/npmModuleIcon.png");
        npm.form_body = vec![
            FormField::text("NPM Module Name: ", "url", 50),
            FormField::nickname(),
            FormField {
                hint: Some("Optional".to_string()),
                help: Some(
                    "This is used if a different module should be loaded when the workspace is run on the server."
                        .to_string(),
                ),
                ..FormField::text("Server NPM Module Name: ", "serverUrl", 50)
            },
        ];

        let mut catalog = Self::new();
        catalog.insert(DisplayInfo::url_entry(
            "amd module",
            "Web Modules",
            "Web Module",
            "icons3/amdModuleIcon.png",
        ));
        catalog.insert(DisplayInfo::url_entry(
            "css link",
            "CSS Links",
            "CSS Link",
            "icons3/cssLinkIcon.png",
        ));
        catalog.insert(npm);
        catalog.insert(DisplayInfo::url_entry(
            "es module",
            "Web Modules",
            "ES Web Module",
            "icons3/esModuleIcon.png",
        ));
        catalog.insert(DisplayInfo::url_entry(
            "js link",
            "JS Scripts",
            "JS Script Link",
            "icons3/jsLinkIcon.png",
        ));
        catalog
    }

    pub fn insert(&mut self, info: DisplayInfo) {
        self.entries.insert(info.reference_type.clone(), Arc::new(info));
    }

    pub fn get(&self, reference_type: &str) -> Option<&Arc<DisplayInfo>> {
        self.entries.get(reference_type)
    }

    /// Display info for `reference_type`, falling back to one named after it
    pub fn lookup(&self, reference_type: &str) -> Arc<DisplayInfo> {
        match self.entries.get(reference_type) {
            Some(info) => Arc::clone(info),
            None => {
                log::debug!("No display info for reference type {reference_type:?}, using fallback");
                Arc::new(DisplayInfo::fallback(reference_type))
            }
        }
    }

    pub fn reference_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Patch existing entries, or add new types starting from the fallback
    pub fn apply_overrides<'a>(&mut self, overrides: impl IntoIterator<Item = &'a DisplayInfoOverride>) {
        for patch in overrides {
            let mut info = self
                .entries
                .get(&patch.reference_type)
                .map(|info| info.as_ref().clone())
                .unwrap_or_else(|| DisplayInfo::fallback(&patch.reference_type));
            patch.apply(&mut info);
            self.insert(info);
        }
    }
}
