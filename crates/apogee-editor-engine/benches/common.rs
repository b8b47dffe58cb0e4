// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use apogee_editor_model::{Attrs, Node, Schema};

/// A page alternating prose paragraphs with runs of component cells
#[allow(dead_code)]
pub fn generate_page(schema: &Schema, sections: usize) -> Node {
    let mut blocks = Vec::new();
    for section in 0..sections {
        let text = schema.text(&format!("Section {section} with some prose."), vec![]).unwrap();
        blocks.push(schema.node("paragraph", None, vec![text]).unwrap());
        for cell in 0..(section % 3 + 1) {
            let mut attrs = Attrs::new();
            attrs.insert("name".to_string(), format!("cell_{section}_{cell}").into());
            blocks.push(schema.node("apogee_component", Some(attrs), vec![]).unwrap());
        }
        if section % 5 == 0 {
            blocks.push(schema.node("page_break", None, vec![]).unwrap());
        }
    }
    schema.node("doc", None, blocks).unwrap()
}
