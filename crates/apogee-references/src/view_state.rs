use crate::tree_entry::TreeState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListViewState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_state: Option<TreeState>,
}

/// Saved expansion state of the reference tree, keyed by reference type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceViewState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_state: Option<TreeState>,
    #[serde(default)]
    pub lists: BTreeMap<String, ListViewState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_view_state_json_shape() {
        let mut lists = BTreeMap::new();
        lists.insert(
            "css link".to_string(),
            ListViewState {
                tree_state: Some(TreeState::Collapsed),
            },
        );
        let state = ReferenceViewState {
            tree_state: Some(TreeState::Expanded),
            lists,
        };

        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"treeState":"expanded","lists":{"css link":{"treeState":"collapsed"}}}"#
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let state: ReferenceViewState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, ReferenceViewState::default());

        let state: ReferenceViewState = serde_json::from_str(r#"{"lists":{"js link":{}}}"#).unwrap();
        assert_eq!(state.lists["js link"].tree_state, None);
    }
}
