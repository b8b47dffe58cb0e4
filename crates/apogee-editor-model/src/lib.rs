//! # apogee-editor-model
//!
//! The immutable document tree used by the Apogee rich-text editor.
//!
//! A document is a tree of [`Node`]s. Every node occupies a number of
//! *position units* ([`Node::node_size`]): a text node counts one unit per
//! character, a leaf node counts one unit, and any other node counts its
//! content plus one unit for each of its opening and closing boundaries.
//! Positions are integer offsets into that linear space, from `0` up to the
//! content size of the top-level `doc` node.
//!
//! ```text
//! doc( paragraph("ab"), horizontal_rule, paragraph("c") )
//!
//!  0   1  2  3   4                 5   6  7
//!  |<p>| a| b|</p>|<horizontal_rule>|<p>| c|</p>
//! ```
//!
//! ## Module Structure
//!
//! - **`schema`**: node and mark types, content kinds, the [`Schema`] registry
//! - **`node`** / **`fragment`**: the tree itself
//! - **`mark`**: inline formatting marks and mark-set helpers
//! - **`resolved_pos`**: [`ResolvedPos`], a position with its ancestor path
//! - **`mapping`**: [`StepMap`] / [`Mapping`] for carrying positions across edits
//! - **`replace`**: structural replacement of a range with a [`Slice`]
//! - **`json`**: the `{type, attrs, content, text, marks}` JSON form of nodes
//!
//! Nothing in this crate mutates a node in place. Every edit builds a new tree
//! that shares untouched subtrees with the old one.

pub mod error;
pub mod fragment;
pub mod json;
pub mod mapping;
pub mod mark;
pub mod node;
pub mod replace;
pub mod resolved_pos;
pub mod schema;

pub use error::ModelError;
pub use fragment::Fragment;
pub use json::{MarkJson, NodeJson};
pub use mapping::{MapResult, Mappable, Mapping, ReplacedRange, StepMap};
pub use mark::{Attrs, Mark, MarkType};
pub use node::Node;
pub use replace::Slice;
pub use resolved_pos::ResolvedPos;
pub use schema::{ContentKind, MarkSpec, NodeSpec, NodeType, Schema, SchemaBuilder, apogee_schema};

#[cfg(test)]
pub(crate) mod tests;
