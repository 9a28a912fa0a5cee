//! HTTP message data model.
//!
//! A [`Message`] is built empty, populated additively by exactly one parse
//! (see [`crate::parser`]) or one builder call sequence, optionally
//! rendered once (see [`crate::serializer`]), then discarded. Nothing is
//! ever deleted from a message; failed writes leave the prior state
//! intact.

use std::collections::BTreeMap;

use thiserror::Error;

/// Default ceiling on characters pulled from a byte source for one parse.
///
/// A resource guard against misbehaving peers, not a protocol limit; it is
/// independent of any per-line bound.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 3000;

/// The fixed set of start-line pseudo-header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartField {
    Protocol,
    RequestUri,
    Method,
    StatusCode,
    Reason,
}

/// Number of start-line field slots.
pub const START_FIELD_COUNT: usize = 5;

impl StartField {
    const fn index(self) -> usize {
        match self {
            StartField::Protocol => 0,
            StartField::RequestUri => 1,
            StartField::Method => 2,
            StartField::StatusCode => 3,
            StartField::Reason => 4,
        }
    }
}

/// Error codes reported through the message's single error slot.
///
/// `Ok` is a code like any other: it is what the slot holds when nothing
/// has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("ok")]
    Ok,
    #[error("bad start field index")]
    BadStartFieldIndex,
    #[error("start field already set")]
    AlreadyStartField,
    #[error("bad request URI")]
    BadRequestUri,
    #[error("bad method")]
    BadMethod,
    #[error("bad protocol")]
    BadProtocol,
    #[error("bad status code")]
    BadStatusCode,
    #[error("missing method")]
    MissingMethod,
    #[error("missing request URI")]
    MissingRequestUri,
    #[error("missing status code")]
    MissingStatusCode,
    #[error("missing reason phrase")]
    MissingReason,
    #[error("duplicate URL argument")]
    AlreadyUrlArg,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("line too long")]
    LineTooLong,
    #[error("syntax error")]
    SyntaxError,
}

/// A structured HTTP/1.x request or response.
#[derive(Debug)]
pub struct Message {
    /// Start-line fields; a slot is written at most once.
    start_fields: [Option<String>; START_FIELD_COUNT],
    /// Header fields in insertion order. Duplicate names are retained.
    headers: Vec<(String, String)>,
    /// Decoded query arguments. `None` = flag present without `=`,
    /// `Some("")` = `=` present with empty value.
    url_args: BTreeMap<String, Option<String>>,
    /// Single error slot: every failure overwrites it, last write wins.
    error: (ErrorKind, String),
    /// Character budget handed to the tokenizer for one parse.
    max_input_chars: usize,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    pub fn new() -> Self {
        Self {
            start_fields: Default::default(),
            headers: Vec::new(),
            url_args: BTreeMap::new(),
            error: (ErrorKind::Ok, String::new()),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    /// Override the parse character budget (default
    /// [`DEFAULT_MAX_INPUT_CHARS`]).
    pub fn set_max_input_chars(&mut self, max: usize) {
        self.max_input_chars = max;
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    // ----- start-line fields -----

    /// Set a start-line field. A slot can be written exactly once: a
    /// second write records [`ErrorKind::AlreadyStartField`], keeps the
    /// first value, and returns `false`.
    pub fn set_start_field(&mut self, field: StartField, value: impl Into<String>) -> bool {
        let slot = &mut self.start_fields[field.index()];
        if slot.is_some() {
            self.set_error(
                ErrorKind::AlreadyStartField,
                format!("start field {:?} already set", field),
            );
            return false;
        }
        *slot = Some(value.into());
        true
    }

    pub fn start_field(&self, field: StartField) -> Option<&str> {
        self.start_fields[field.index()].as_deref()
    }

    // ----- headers -----

    /// Append a header field. Duplicates are kept; insertion order is
    /// preserved.
    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First header value whose name matches exactly, in insertion order.
    pub fn first_match(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    // ----- URL arguments -----

    /// Insert a query argument if the name is not already present.
    /// Returns `false` without mutating the map on a duplicate name (the
    /// caller decides whether that sets an error).
    pub fn insert_url_arg(&mut self, name: impl Into<String>, value: Option<String>) -> bool {
        let name = name.into();
        if self.url_args.contains_key(&name) {
            return false;
        }
        self.url_args.insert(name, value);
        true
    }

    /// Look up a query argument. The outer `Option` is presence; the
    /// inner is whether the argument carried an `=` value.
    pub fn url_arg(&self, name: &str) -> Option<Option<&str>> {
        self.url_args.get(name).map(|v| v.as_deref())
    }

    /// Iterate query arguments. Each pair appears exactly once; callers
    /// must not rely on a particular order.
    pub fn url_args(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.url_args.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn url_arg_count(&self) -> usize {
        self.url_args.len()
    }

    // ----- error slot -----

    /// Record a failure. The slot is overwritten unconditionally: the
    /// message never accumulates an error history, a caller sees only the
    /// most recent failure.
    pub fn set_error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        crate::log::debug!("message error: {kind}");
        self.error = (kind, message.into());
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.error.0
    }

    pub fn error_message(&self) -> &str {
        &self.error.1
    }

    /// True when no failure has been recorded since creation.
    pub fn is_ok(&self) -> bool {
        self.error.0 == ErrorKind::Ok
    }
}
