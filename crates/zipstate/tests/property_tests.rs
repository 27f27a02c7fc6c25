//! Property-based tests for the XML-to-value converter
//!
//! These verify the converter contract over generated element trees:
//! 1. Leaf elements convert to their text content unchanged
//! 2. Distinct child tags map one entry per child
//! 3. Repeated sibling tags collect into arrays in document order
//! 4. Conversion is idempotent

use proptest::prelude::*;
use zipstate::{element_to_value, is_eligible, sanitize_zip, Value, XmlContent, XmlElement};

/// Tag names drawn from a small pool so sibling collisions are common
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("City".to_string()),
        Just("State".to_string()),
        Just("ZipCode".to_string()),
        Just("Error".to_string()),
        "[a-z]{1,4}",
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    "[ \ta-zA-Z0-9.,-]{0,12}"
}

fn arb_leaf() -> impl Strategy<Value = XmlElement> {
    (arb_name(), arb_text()).prop_map(|(name, text)| {
        let mut element = XmlElement::new(name);
        element.children.push(XmlContent::Text(text));
        element
    })
}

fn arb_element() -> impl Strategy<Value = XmlElement> {
    arb_leaf().prop_recursive(4, 32, 6, |inner| {
        (arb_name(), prop::collection::vec(inner, 1..6)).prop_map(|(name, children)| {
            let mut element = XmlElement::new(name);
            element.children = children.into_iter().map(XmlContent::Element).collect();
            element
        })
    })
}

proptest! {
    #[test]
    fn leaf_converts_to_its_text(element in arb_leaf()) {
        let expected = element.text();
        prop_assert_eq!(element_to_value(&element), Value::String(expected));
    }

    #[test]
    fn children_map_per_contract(element in arb_element()) {
        let value = element_to_value(&element);
        let children: Vec<&XmlElement> = element.child_elements().collect();

        if children.is_empty() {
            prop_assert!(value.is_string());
            return Ok(());
        }

        let obj = value.as_object().cloned().unwrap_or_default();

        for child in &children {
            let same_named: Vec<&XmlElement> = children
                .iter()
                .filter(|c| c.name == child.name)
                .copied()
                .collect();

            if same_named.len() == 1 {
                prop_assert_eq!(obj.get(&child.name), Some(&element_to_value(child)));
            } else {
                let seq = obj.get(&child.name).and_then(Value::as_array);
                prop_assert!(seq.is_some());
                let seq = seq.cloned().unwrap_or_default();
                prop_assert_eq!(seq.len(), same_named.len());
                for (got, sibling) in seq.iter().zip(same_named.iter()) {
                    prop_assert_eq!(got, &element_to_value(sibling));
                }
            }
        }

        // No extra keys beyond the distinct child names.
        let mut distinct: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(obj.len(), distinct.len());
    }

    #[test]
    fn conversion_is_idempotent(element in arb_element()) {
        prop_assert_eq!(element_to_value(&element), element_to_value(&element));
    }

    #[test]
    fn sanitized_zip_is_at_most_five_digits(raw in ".{0,16}") {
        let zip = sanitize_zip(&raw);
        prop_assert!(zip.len() <= 5);
        prop_assert!(zip.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn eligibility_matches_length(raw in "[0-9]{0,8}") {
        let zip = sanitize_zip(&raw);
        prop_assert_eq!(is_eligible(&zip), raw.len() >= 5);
    }
}
