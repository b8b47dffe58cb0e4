use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::schema::MarkSpec;

/// Node and mark attributes
pub type Attrs = BTreeMap<String, Value>;

#[derive(Debug)]
struct MarkTypeData {
    spec: MarkSpec,
    rank: usize,
}

/// A registered mark type. Mark sets are ordered by rank (registration order).
#[derive(Clone)]
pub struct MarkType(Arc<MarkTypeData>);

impl MarkType {
    pub(crate) fn new(spec: MarkSpec, rank: usize) -> Self {
        Self(Arc::new(MarkTypeData { spec, rank }))
    }

    pub fn name(&self) -> &str {
        &self.0.spec.name
    }

    pub fn spec(&self) -> &MarkSpec {
        &self.0.spec
    }

    pub fn rank(&self) -> usize {
        self.0.rank
    }

    pub fn inclusive(&self) -> bool {
        self.0.spec.inclusive
    }

    pub fn create(&self, attrs: Option<Attrs>) -> Mark {
        let mut merged = self.0.spec.default_attrs.clone();
        if let Some(attrs) = attrs {
            merged.extend(attrs);
        }
        Mark {
            mark_type: self.clone(),
            attrs: merged,
        }
    }
}

impl PartialEq for MarkType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.spec.name == other.0.spec.name
    }
}

impl Eq for MarkType {}

impl fmt::Debug for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkType({})", self.name())
    }
}

/// Inline formatting applied to a text or inline node
#[derive(Clone, PartialEq)]
pub struct Mark {
    mark_type: MarkType,
    attrs: Attrs,
}

impl Mark {
    pub fn mark_type(&self) -> &MarkType {
        &self.mark_type
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Add this mark to a set, replacing any mark of the same type
    pub fn add_to_set(&self, set: &[Mark]) -> Vec<Mark> {
        let mut result: Vec<Mark> = set
            .iter()
            .filter(|m| m.mark_type != self.mark_type)
            .cloned()
            .collect();
        let at = result
            .iter()
            .position(|m| m.mark_type.rank() > self.mark_type.rank())
            .unwrap_or(result.len());
        result.insert(at, self.clone());
        result
    }

    pub fn remove_from_set(&self, set: &[Mark]) -> Vec<Mark> {
        set.iter().filter(|m| *m != self).cloned().collect()
    }

    pub fn is_in_set(&self, set: &[Mark]) -> bool {
        set.iter().any(|m| m == self)
    }

    pub fn same_set(a: &[Mark], b: &[Mark]) -> bool {
        a == b
    }

    /// Sort a list of marks by rank, keeping the last mark of each type
    pub fn normalize(marks: Vec<Mark>) -> Vec<Mark> {
        marks
            .into_iter()
            .fold(Vec::new(), |set, mark| mark.add_to_set(&set))
    }
}

impl fmt::Debug for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attrs.is_empty() {
            write!(f, "{}", self.mark_type.name())
        } else {
            write!(f, "{}{:?}", self.mark_type.name(), self.attrs)
        }
    }
}
