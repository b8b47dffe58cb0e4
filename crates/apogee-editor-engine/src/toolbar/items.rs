use super::{MarkSelectionGenerator, MarkStatus, SelectionInfo, ToolbarItem};

/// Generator with the stock counting behaviour for one mark
struct DefaultMarkGenerator {
    mark_name: String,
}

impl MarkSelectionGenerator for DefaultMarkGenerator {
    fn name(&self) -> &str {
        &self.mark_name
    }
}

/// A button toggling a mark; active when every selected text node has it
#[derive(Debug, Clone)]
pub struct MarkToggleItem {
    name: String,
    mark_name: String,
    status: MarkStatus,
}

impl MarkToggleItem {
    pub fn new(name: impl Into<String>, mark_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mark_name: mark_name.into(),
            status: MarkStatus::Absent,
        }
    }

    pub fn status(&self) -> MarkStatus {
        self.status
    }
}

impl ToolbarItem for MarkToggleItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn mark_selection_generator(&self) -> Option<Box<dyn MarkSelectionGenerator>> {
        Some(Box::new(DefaultMarkGenerator {
            mark_name: self.mark_name.clone(),
        }))
    }

    fn update(&mut self, info: &SelectionInfo) {
        self.status = info
            .marks
            .get(&self.mark_name)
            .map_or(MarkStatus::Absent, |entry| entry.status);
    }

    fn is_active(&self) -> bool {
        self.status == MarkStatus::Full
    }
}

/// A block type button; active when the selection lies in blocks of only
/// that type
#[derive(Debug, Clone)]
pub struct BlockTypeItem {
    name: String,
    block_type: String,
    active: bool,
}

impl BlockTypeItem {
    pub fn new(name: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            block_type: block_type.into(),
            active: false,
        }
    }
}

impl ToolbarItem for BlockTypeItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, info: &SelectionInfo) {
        self.active = matches!(info.blocks.names().as_slice(), [only] if *only == self.block_type);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
