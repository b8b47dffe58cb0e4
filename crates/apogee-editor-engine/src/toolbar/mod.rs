//! Selection-driven state for toolbar items.
//!
//! Every time the selection changes the toolbar builds a [`SelectionInfo`]
//! and hands it to each item so it can update itself (an active bold button,
//! a block type dropdown, ...). Block info is computed the same way for every
//! item. Mark info is produced per mark by the [`MarkSelectionGenerator`] an
//! item registers.

mod items;

use std::collections::BTreeMap;

use apogee_editor_model::{Attrs, Mark, NodeType};

use crate::state::EditorState;

pub use items::{BlockTypeItem, MarkToggleItem};

/// The distinct top-level block types touched by the selection, in
/// document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockInfo {
    pub block_types: Vec<NodeType>,
}

impl BlockInfo {
    pub fn names(&self) -> Vec<&str> {
        self.block_types.iter().map(NodeType::name).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkStatus {
    #[default]
    Absent,
    Partial,
    Full,
}

/// What the selection holds for one mark
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkInfo {
    /// Text nodes in the selection carrying the mark
    pub marked_text_nodes: usize,
    /// All text nodes in the selection
    pub text_nodes: usize,
    /// Distinct attribute sets seen on the mark
    pub attrs: Vec<Attrs>,
    pub status: MarkStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionInfo {
    pub blocks: BlockInfo,
    pub marks: BTreeMap<String, MarkInfo>,
}

/// Builds the [`MarkInfo`] entry for one mark type
pub trait MarkSelectionGenerator {
    /// Name of the mark this generator describes
    fn name(&self) -> &str;

    fn empty_info(&self) -> MarkInfo {
        MarkInfo::default()
    }

    /// Called for each occurrence of the mark on a text node in the selection
    fn update_info(&self, mark: &Mark, entry: &mut MarkInfo, _text_node_number: usize) {
        entry.marked_text_nodes += 1;
        if !mark.attrs().is_empty() && !entry.attrs.contains(mark.attrs()) {
            entry.attrs.push(mark.attrs().clone());
        }
    }

    fn on_complete(&self, entry: &mut MarkInfo, text_node_count: usize) {
        entry.text_nodes = text_node_count;
        entry.status = match entry.marked_text_nodes {
            0 => MarkStatus::Absent,
            marked if marked >= text_node_count => MarkStatus::Full,
            _ => MarkStatus::Partial,
        };
    }
}

pub trait ToolbarItem {
    fn name(&self) -> &str;

    fn mark_selection_generator(&self) -> Option<Box<dyn MarkSelectionGenerator>> {
        None
    }

    fn update(&mut self, info: &SelectionInfo);

    fn is_active(&self) -> bool {
        false
    }
}

pub struct Toolbar {
    items: Vec<Box<dyn ToolbarItem>>,
    generators: BTreeMap<String, Box<dyn MarkSelectionGenerator>>,
}

impl Toolbar {
    pub fn new(items: Vec<Box<dyn ToolbarItem>>) -> Self {
        let mut generators = BTreeMap::new();
        for item in &items {
            let Some(generator) = item.mark_selection_generator() else {
                continue;
            };
            let name = generator.name().to_string();
            if name.is_empty() {
                continue;
            }
            if generators.insert(name.clone(), generator).is_some() {
                log::debug!("toolbar item {} replaces the selection generator for {name}", item.name());
            }
        }
        Self { items, generators }
    }

    pub fn items(&self) -> impl Iterator<Item = &dyn ToolbarItem> {
        self.items.iter().map(|item| item.as_ref())
    }

    pub fn item(&self, name: &str) -> Option<&dyn ToolbarItem> {
        self.items().find(|item| item.name() == name)
    }

    /// Recompute the selection info and push it to every item
    pub fn update(&mut self, state: &EditorState) -> SelectionInfo {
        let info = self.selection_info(state);
        for item in &mut self.items {
            item.update(&info);
        }
        info
    }

    pub fn selection_info(&self, state: &EditorState) -> SelectionInfo {
        let doc = state.doc();
        let selection = state.selection();
        let (from, to) = (selection.resolved_from(), selection.resolved_to());

        let mut blocks = BlockInfo::default();
        for index in from.index(0)..=to.index(0) {
            if let Some(child) = doc.maybe_child(index)
                && !blocks.block_types.contains(child.node_type())
            {
                blocks.block_types.push(child.node_type().clone());
            }
        }

        let mut marks: BTreeMap<String, MarkInfo> = self
            .generators
            .iter()
            .map(|(name, generator)| (name.clone(), generator.empty_info()))
            .collect();

        let mut text_node_number = 0;
        doc.nodes_between(from.pos(), to.pos(), |node, _, _, _| {
            if node.is_text() {
                for mark in node.marks() {
                    let name = mark.mark_type().name();
                    if let (Some(generator), Some(entry)) = (self.generators.get(name), marks.get_mut(name)) {
                        generator.update_info(mark, entry, text_node_number);
                    }
                }
                text_node_number += 1;
            }
            true
        });

        for (name, generator) in &self.generators {
            if let Some(entry) = marks.get_mut(name) {
                generator.on_complete(entry, text_node_number);
            }
        }

        SelectionInfo { blocks, marks }
    }
}
