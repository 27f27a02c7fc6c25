//! zipstate - zip-code to city/state lookup
//!
//! The core of the crate is a generic XML-to-value converter: a parsed XML
//! element tree maps to a nested [`Value`] where leaves become their text
//! content, unique child tags become object entries, and repeated sibling
//! tags collect into ordered arrays. On top of it sits a small lookup
//! controller that validates zip input and folds collaborator responses
//! into display state.
//!
//! # Quick Start
//!
//! ```
//! use zipstate::{xml_to_value, Value};
//! # fn main() -> Result<(), zipstate::Error> {
//! let body = "<CityStateLookupResponse><ZipCode>\
//!             <City>Memphis</City><State>TN</State>\
//!             </ZipCode></CityStateLookupResponse>";
//! let value = xml_to_value(body)?;
//! let city = value
//!     .get("CityStateLookupResponse")
//!     .and_then(|v| v.get("ZipCode"))
//!     .and_then(|v| v.get("City"))
//!     .and_then(Value::as_string)
//!     .unwrap_or_default();
//! assert_eq!(city, "Memphis");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod value;
pub use value::{Array, Object, Value};

pub mod convert;
pub use convert::{document_to_value, element_to_value};

pub mod xml;
pub use xml::{Content as XmlContent, Document as XmlDocument, Element as XmlElement, Parser as XmlParser};

pub mod lookup;
pub use lookup::{
    is_eligible, sanitize_zip, LookupEvent, LookupOutcome, LookupRequest, LookupState, RequestSeq,
    Snapshot,
};

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Parse XML and convert it to a nested value in one step
pub fn xml_to_value(s: &str) -> Result<Value> {
    let doc = from_xml_str(s)?;
    Ok(document_to_value(&doc))
}
