//! Role-specific parsers: bytes in, populated [`Message`] out.
//!
//! [`parse_response`] is the client role (reading a status line),
//! [`parse_request`] the server role (reading a request line). Both are
//! single-pass and synchronous. A start-line failure is fatal for the
//! parse: it records the error, resynchronizes to the next blank line so
//! the stream is left in a sane position, and returns. Header-line
//! failures are recorded but the header loop keeps going.
//!
//! The returned [`ErrorKind`] mirrors the message's error slot after the
//! call; `ErrorKind::Ok` guarantees nothing failed during the parse.

use crate::log::debug;
use crate::message::{ErrorKind, Message, StartField};
use crate::percent;
use crate::tokenizer::{ByteSource, HeaderLine, Line, Tokenizer};

/// Methods accepted on the receive path. Matching is case-sensitive:
/// `get` is not a method.
pub const SUPPORTED_METHODS: [&str; 7] =
    ["GET", "POST", "HEAD", "PUT", "DELETE", "TRACE", "OPTIONS"];

/// Protocol tokens accepted in a start line.
pub const SUPPORTED_PROTOCOLS: [&str; 2] = ["HTTP/1.1", "HTTP/1.0"];

/// Parse a response (client role) from `source` into `msg`.
pub fn parse_response<S: ByteSource>(msg: &mut Message, source: S) -> ErrorKind {
    let mut tok = Tokenizer::new(source, msg.max_input_chars());

    let protocol = match tok.get_word() {
        Some(word) => word,
        None => return fail(msg, &mut tok, ErrorKind::UnexpectedEndOfInput, "missing protocol"),
    };
    if !msg.set_start_field(StartField::Protocol, protocol.as_str()) {
        return abort(msg, &mut tok);
    }
    if !SUPPORTED_PROTOCOLS.contains(&protocol.as_str()) {
        return fail(msg, &mut tok, ErrorKind::BadProtocol, protocol);
    }

    let status = match tok.get_word() {
        Some(word) => word,
        None => {
            return fail(msg, &mut tok, ErrorKind::UnexpectedEndOfInput, "missing status code")
        }
    };
    if !msg.set_start_field(StartField::StatusCode, status.as_str()) {
        return abort(msg, &mut tok);
    }
    if !is_valid_status(&status) {
        return fail(msg, &mut tok, ErrorKind::BadStatusCode, status);
    }

    // Reason phrase is the rest of the line and may be empty.
    let reason = match tok.get_line() {
        Line::Text(text) => text,
        Line::TooLong => return fail(msg, &mut tok, ErrorKind::LineTooLong, "reason phrase"),
        Line::End => {
            return fail(msg, &mut tok, ErrorKind::UnexpectedEndOfInput, "missing reason phrase")
        }
    };
    if !msg.set_start_field(StartField::Reason, reason) {
        return abort(msg, &mut tok);
    }

    read_headers(msg, &mut tok);
    msg.error_kind()
}

/// Parse a request (server role) from `source` into `msg`.
pub fn parse_request<S: ByteSource>(msg: &mut Message, source: S) -> ErrorKind {
    let mut tok = Tokenizer::new(source, msg.max_input_chars());

    let method = match tok.get_word() {
        Some(word) => word,
        None => return fail(msg, &mut tok, ErrorKind::UnexpectedEndOfInput, "missing method"),
    };
    if !msg.set_start_field(StartField::Method, method.as_str()) {
        return abort(msg, &mut tok);
    }
    if !SUPPORTED_METHODS.contains(&method.as_str()) {
        return fail(msg, &mut tok, ErrorKind::BadMethod, method);
    }

    let target = match tok.get_word() {
        Some(word) => word,
        None => {
            return fail(msg, &mut tok, ErrorKind::UnexpectedEndOfInput, "missing request target")
        }
    };
    // Path before the first '?', query after. The decoded path is stored
    // without shape validation: the receive path accepts URIs the build
    // path would reject, so a server can still service them.
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target.as_str(), None),
    };
    if !msg.set_start_field(StartField::RequestUri, percent::decode_lossy(path)) {
        return abort(msg, &mut tok);
    }
    if let Some(query) = query {
        parse_query(msg, query);
    }

    let protocol = match tok.get_line() {
        Line::Text(text) => text,
        Line::TooLong => return fail(msg, &mut tok, ErrorKind::LineTooLong, "protocol"),
        Line::End => {
            return fail(msg, &mut tok, ErrorKind::UnexpectedEndOfInput, "missing protocol")
        }
    };
    if !msg.set_start_field(StartField::Protocol, protocol.as_str()) {
        return abort(msg, &mut tok);
    }
    if !SUPPORTED_PROTOCOLS.contains(&protocol.as_str()) {
        return fail(msg, &mut tok, ErrorKind::BadProtocol, protocol);
    }

    read_headers(msg, &mut tok);
    msg.error_kind()
}

/// Split a raw query string on `&`, each segment at its first `=`, and
/// insert the decoded pairs. A duplicate name records `AlreadyUrlArg`
/// but the remaining pairs are still processed.
fn parse_query(msg: &mut Message, query: &str) {
    for segment in query.split('&') {
        if segment.is_empty() {
            continue;
        }
        let (name, value) = match segment.split_once('=') {
            Some((name, value)) => (name, Some(percent::decode_lossy(value))),
            None => (segment, None),
        };
        let name = percent::decode_lossy(name);
        if !msg.insert_url_arg(name.clone(), value) {
            msg.set_error(ErrorKind::AlreadyUrlArg, name);
        }
    }
}

/// Shared header loop. A blank line ends it; an overlong line records
/// `LineTooLong` and the loop continues with the next line. Every pair
/// read is appended, duplicates included.
fn read_headers<S: ByteSource>(msg: &mut Message, tok: &mut Tokenizer<S>) {
    loop {
        match tok.get_header_line() {
            HeaderLine::End => return,
            HeaderLine::TooLong => {
                msg.set_error(ErrorKind::LineTooLong, "header line too long");
            }
            HeaderLine::Field(name, value) => msg.append_header(name, value),
        }
    }
}

fn is_valid_status(token: &str) -> bool {
    matches!(token.parse::<u32>(), Ok(code) if (100..=599).contains(&code))
}

/// Record a fatal start-line failure and resynchronize.
fn fail<S: ByteSource>(
    msg: &mut Message,
    tok: &mut Tokenizer<S>,
    kind: ErrorKind,
    detail: impl Into<String>,
) -> ErrorKind {
    let detail = detail.into();
    debug!("parse aborted: {kind}: {detail}");
    msg.set_error(kind, detail);
    tok.skip_to_blank_line();
    kind
}

/// Resynchronize after a failure the message has already recorded
/// (e.g. a start-field slot that was unexpectedly occupied).
fn abort<S: ByteSource>(msg: &mut Message, tok: &mut Tokenizer<S>) -> ErrorKind {
    tok.skip_to_blank_line();
    msg.error_kind()
}
