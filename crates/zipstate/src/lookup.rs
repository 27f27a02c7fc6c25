//! Lookup controller: zip input validation and display state transitions
//!
//! State is held in [`LookupState`] and only changes through
//! [`LookupState::apply`], a reducer over discrete [`LookupEvent`]s. Each
//! eligible input change issues a [`LookupRequest`] carrying a sequence
//! token; responses whose token no longer matches the latest issued request
//! are discarded, so a slow stale response can never overwrite a newer one.

use tracing::{debug, warn};

use crate::convert::document_to_value;
use crate::value::Value;
use crate::xml;

/// Length of an eligible zip code
pub const ZIP_LEN: usize = 5;

const RETRY_PROMPT: &str = "Try Again";

/// Retain only digits and truncate to [`ZIP_LEN`] characters
pub fn sanitize_zip(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(ZIP_LEN)
        .collect()
}

/// Input is eligible for lookup when it is exactly five characters and
/// non-empty
pub fn is_eligible(zip: &str) -> bool {
    zip.len() == ZIP_LEN && !zip.is_empty()
}

/// Monotonic token identifying one issued lookup request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Raw token value
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// A lookup the caller should perform against the collaborator endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: RequestSeq,
    pub zipcode: String,
}

/// Discrete controller events
#[derive(Clone, Debug)]
pub enum LookupEvent {
    /// The zip input field changed; the raw value is sanitized by the reducer
    InputChanged(String),
    /// The collaborator responded; `body` is the raw XML text
    LookupSucceeded { seq: RequestSeq, body: String },
    /// The transport failed before a response body arrived
    LookupFailed { seq: RequestSeq, error: String },
}

/// What a converted response body means for the display
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupOutcome {
    /// `City`/`State` pair resolved
    Resolved { city: String, state: String },
    /// The collaborator flagged the zip as invalid
    InvalidZip,
    /// Malformed XML or an unexpected shape; nothing to display
    Unrecognized,
}

/// Display state: current input, resolved pair, loading flag
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupState {
    zipcode: String,
    city: String,
    state: String,
    loading: bool,
    latest_seq: u64,
}

/// Read-only render of the display state
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub zipcode: String,
    pub city: String,
    pub state: String,
}

impl LookupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Snapshot of the rendered `{zipcode, city, state}` display
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            zipcode: self.zipcode.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }

    /// Apply one event. Returns the lookup request to perform when an input
    /// change produced an eligible zip code; at most one per event.
    pub fn apply(&mut self, event: LookupEvent) -> Option<LookupRequest> {
        match event {
            LookupEvent::InputChanged(raw) => {
                self.zipcode = sanitize_zip(&raw);
                self.loading = true;
                self.city.clear();
                self.state.clear();

                if !is_eligible(&self.zipcode) {
                    return None;
                }

                self.latest_seq += 1;
                let seq = RequestSeq(self.latest_seq);
                debug!(zipcode = %self.zipcode, seq = seq.value(), "issuing lookup");
                Some(LookupRequest {
                    seq,
                    zipcode: self.zipcode.clone(),
                })
            }
            LookupEvent::LookupSucceeded { seq, body } => {
                if seq.value() != self.latest_seq {
                    debug!(
                        seq = seq.value(),
                        latest = self.latest_seq,
                        "discarding stale response"
                    );
                    return None;
                }

                match interpret_response(&body) {
                    LookupOutcome::Resolved { city, state } => {
                        self.city = city;
                        self.state = state;
                        self.loading = false;
                    }
                    LookupOutcome::InvalidZip => {
                        self.city = format!("Invalid Zip Code for {}", self.zipcode);
                        self.state = RETRY_PROMPT.to_string();
                        self.loading = false;
                    }
                    LookupOutcome::Unrecognized => {
                        // Unexpected shape: display untouched, loading stays set.
                        debug!(seq = seq.value(), "response shape not recognized");
                    }
                }
                None
            }
            LookupEvent::LookupFailed { seq, error } => {
                // Transport failure is logged and swallowed; state untouched.
                warn!(seq = seq.value(), %error, "lookup request failed");
                None
            }
        }
    }
}

/// Parse and convert a raw XML response body, then classify it.
///
/// Parsing failures classify as [`LookupOutcome::Unrecognized`]; this
/// function never fails.
pub fn interpret_response(body: &str) -> LookupOutcome {
    let mut parser = xml::Parser::new(body.as_bytes());
    match parser.parse() {
        Ok(doc) => interpret_value(&document_to_value(&doc)),
        Err(err) => {
            debug!(%err, "response body is not well-formed xml");
            LookupOutcome::Unrecognized
        }
    }
}

/// Classify an already-converted response value
pub fn interpret_value(value: &Value) -> LookupOutcome {
    let Some(zip) = value
        .get("CityStateLookupResponse")
        .and_then(|v| v.get("ZipCode"))
    else {
        return LookupOutcome::Unrecognized;
    };

    if let Some(city) = zip.get("City").and_then(Value::as_string) {
        let state = zip
            .get("State")
            .and_then(Value::as_string)
            .unwrap_or_default();
        return LookupOutcome::Resolved {
            city: city.to_string(),
            state: state.to_string(),
        };
    }

    if zip.get("Error").is_some() {
        return LookupOutcome::InvalidZip;
    }

    LookupOutcome::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_non_digits() {
        assert_eq!(sanitize_zip("3a8b1c03"), "38103");
        assert_eq!(sanitize_zip("381035555"), "38103");
        assert_eq!(sanitize_zip("abc"), "");
        assert_eq!(sanitize_zip(""), "");
    }

    #[test]
    fn test_eligibility() {
        assert!(is_eligible("38103"));
        assert!(!is_eligible("3810"));
        assert!(!is_eligible("381033"));
        assert!(!is_eligible(""));
    }

    #[test]
    fn test_short_input_issues_no_request() {
        let mut state = LookupState::new();
        let request = state.apply(LookupEvent::InputChanged("1234".to_string()));
        assert_eq!(request, None);
        assert!(state.is_loading());
        assert_eq!(state.zipcode(), "1234");
    }

    #[test]
    fn test_eligible_input_issues_one_request() {
        let mut state = LookupState::new();
        let request = state.apply(LookupEvent::InputChanged("38103".to_string()));
        let request = request.expect("eligible input must issue a request");
        assert_eq!(request.zipcode, "38103");
        assert!(state.is_loading());
    }

    #[test]
    fn test_input_change_clears_previous_result() {
        let mut state = LookupState::new();
        let request = state.apply(LookupEvent::InputChanged("38103".to_string()));
        if let Some(request) = request {
            state.apply(LookupEvent::LookupSucceeded {
                seq: request.seq,
                body: memphis_body(),
            });
        }
        assert_eq!(state.city(), "Memphis");

        state.apply(LookupEvent::InputChanged("3810".to_string()));
        assert_eq!(state.city(), "");
        assert_eq!(state.state(), "");
        assert!(state.is_loading());
    }

    #[test]
    fn test_interpret_value_shapes() {
        assert_eq!(
            interpret_response(&memphis_body()),
            LookupOutcome::Resolved {
                city: "Memphis".to_string(),
                state: "TN".to_string(),
            }
        );
        assert_eq!(interpret_response(&error_body()), LookupOutcome::InvalidZip);
        assert_eq!(
            interpret_response("<Weather><Sky>blue</Sky></Weather>"),
            LookupOutcome::Unrecognized
        );
        assert_eq!(interpret_response("not xml"), LookupOutcome::Unrecognized);
    }

    fn memphis_body() -> String {
        "<CityStateLookupResponse><ZipCode><City>Memphis</City><State>TN</State></ZipCode></CityStateLookupResponse>".to_string()
    }

    fn error_body() -> String {
        "<CityStateLookupResponse><ZipCode><Error>Invalid Zip Code</Error></ZipCode></CityStateLookupResponse>".to_string()
    }
}
