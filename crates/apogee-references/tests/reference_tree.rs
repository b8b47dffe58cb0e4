use apogee_references::{
    BannerState, DisplayCatalog, DisplayInfoOverride, EntryField, ReferenceEvent, ReferenceRecord,
    ReferenceView, ReferenceViewState, StaticReferenceManager, TreeState,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn load_view_state() -> ReferenceViewState {
    let json = std::fs::read_to_string(format!(
        "{}/tests/fixtures/view_state.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    serde_json::from_str(&json).unwrap()
}

fn workspace_view(catalog: &DisplayCatalog) -> ReferenceView {
    let mut manager = StaticReferenceManager::new(["amd module", "npm module", "css link"]);
    manager.view_state = Some(load_view_state());
    ReferenceView::new(Arc::new(manager), catalog)
}

#[test]
fn test_workspace_session() {
    let mut view = workspace_view(&DisplayCatalog::builtin());

    let lodash = ReferenceRecord::new("m1", "amd module")
        .with_nickname("lodash")
        .with_state(BannerState::Pending, Some("loading"));
    let express = ReferenceRecord::new("n1", "npm module").with_nickname("express");
    view.handle_event(ReferenceEvent::Created(&lodash));
    view.handle_event(ReferenceEvent::Created(&express));
    view.handle_event(ReferenceEvent::Created(&ReferenceRecord::new("m2", "amd module")));

    // lodash finished loading
    view.handle_event(ReferenceEvent::Updated(
        &ReferenceRecord::new("m1", "amd module")
            .with_nickname("lodash")
            .with_updated(&[EntryField::State]),
    ));

    insta::assert_snapshot!(view.tree_entry().outline(), @r"
    - Libraries
      - Web Modules
          lodash
          -unnamed entry-
      + NPM Modules
        CSS Links
    ");

    view.handle_event(ReferenceEvent::Deleted(&lodash));
    let tree = view.tree_entry();
    let web_modules: Vec<_> = tree.children()[0].children().iter().map(|row| row.label()).collect();
    assert_eq!(web_modules, vec!["-unnamed entry-"]);
}

#[test]
fn test_view_state_survives_reload() {
    let catalog = DisplayCatalog::builtin();
    let mut view = workspace_view(&catalog);
    view.list_mut("css link").unwrap().tree_entry_mut().toggle_expanded();
    let saved = view.view_state();

    let mut manager = StaticReferenceManager::new(["amd module", "npm module", "css link"]);
    manager.view_state = Some(saved.clone());
    let reloaded = ReferenceView::new(Arc::new(manager), &catalog);

    assert_eq!(reloaded.view_state(), saved);
    assert_eq!(saved.lists["css link"].tree_state, Some(TreeState::Expanded));
    assert_eq!(saved.lists["npm module"].tree_state, Some(TreeState::Collapsed));
}

#[test]
fn test_configured_display_names() {
    let mut catalog = DisplayCatalog::builtin();
    catalog.apply_overrides(&[DisplayInfoOverride {
        reference_type: "npm module".to_string(),
        list_name: Some("Server Packages".to_string()),
        display_name: Some("Package".to_string()),
        ..Default::default()
    }]);
    let view = workspace_view(&catalog);

    let npm = view.list("npm module").unwrap();
    assert_eq!(npm.tree_entry().label(), "Server Packages");
    assert_eq!(npm.tree_entry().menu()[0].title, "Add Package");
    assert_eq!(
        serde_json::to_string(&npm.tree_entry().menu()[0].action).unwrap(),
        r#"{"action":"addReference","referenceType":"npm module"}"#
    );
}
