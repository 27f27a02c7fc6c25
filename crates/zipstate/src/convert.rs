//! XML tree to nested value conversion

use std::collections::HashMap;

use crate::value::{Array, Object, Value};
use crate::xml::model::{Document, Element};

/// Convert a parsed document to a value, wrapping the converted root under
/// its tag name: `<Root>...</Root>` becomes `{Root: ...}`.
pub fn document_to_value(doc: &Document) -> Value {
    let mut root = Object::new();
    root.insert(&*doc.root.name, element_to_value(&doc.root));
    Value::Object(root)
}

/// Convert a single element.
///
/// A leaf (no element children) converts to its text content verbatim; an
/// element with children converts to a mapping from child tag name to the
/// recursive conversion. Tag names repeated among siblings collect into an
/// ordered sequence in document order. Attributes are ignored, and direct
/// text is lost once an element child exists.
///
/// Conversion never fails; consumers navigate the result defensively.
pub fn element_to_value(element: &Element) -> Value {
    if element.child_elements().next().is_none() {
        return Value::String(element.text());
    }

    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for child in element.child_elements() {
        *name_counts.entry(&child.name).or_insert(0) += 1;
    }

    let mut result = Object::new();
    for child in element.child_elements() {
        let converted = element_to_value(child);
        let repeated = name_counts.get(child.name.as_str()).copied().unwrap_or(0) > 1;

        if repeated {
            match result.get_mut(&child.name).and_then(Value::as_array_mut) {
                Some(seq) => seq.push(converted),
                None => {
                    let mut seq = Array::with_capacity(
                        name_counts.get(child.name.as_str()).copied().unwrap_or(1),
                    );
                    seq.push(converted);
                    result.insert(&*child.name, Value::Array(seq));
                }
            }
        } else {
            // Unique among siblings: assign directly, last one wins.
            result.insert(&*child.name, converted);
        }
    }

    Value::Object(result)
}
