//! Role-specific serializers: populated [`Message`] in, wire bytes out.
//!
//! [`write_request`] renders a request line (client role),
//! [`write_response`] a status line (server role); both follow with the
//! headers in insertion order and a terminating blank line. Lines are
//! CRLF-terminated on the way out even though the parser tolerates bare
//! `\n` on the way in.

use crate::log::debug;
use crate::message::{ErrorKind, Message, StartField};
use crate::percent;

/// A blocking sink for wire bytes. May block; a sink has no error
/// channel, so a failing transport must surface its errors out of band.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]);
}

impl ByteSink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Sink over any blocking writer. Write errors are logged and dropped.
#[derive(Debug)]
pub struct WriteSink<W: std::io::Write> {
    writer: W,
}

impl<W: std::io::Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: std::io::Write> ByteSink for WriteSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        if let Err(err) = self.writer.write_all(bytes) {
            crate::log::warning!("byte sink write error: {err}");
        }
    }
}

/// Render `msg` as a request (client role).
///
/// Requires `Method` and `RequestUri`; the path must pass the build-side
/// shape check (the receive path deliberately performs none). `Protocol`
/// defaults to `HTTP/1.1` without being stored back into the message.
pub fn write_request(msg: &mut Message, sink: &mut impl ByteSink) -> ErrorKind {
    let method = match msg.start_field(StartField::Method) {
        Some(method) => method.to_owned(),
        None => {
            msg.set_error(ErrorKind::MissingMethod, "request has no method");
            return ErrorKind::MissingMethod;
        }
    };
    let uri = match msg.start_field(StartField::RequestUri) {
        Some(uri) => uri.to_owned(),
        None => {
            msg.set_error(ErrorKind::MissingRequestUri, "request has no URI");
            return ErrorKind::MissingRequestUri;
        }
    };
    if !is_decent_path(&uri) {
        debug!("refusing to build request for path {uri:?}");
        msg.set_error(ErrorKind::BadRequestUri, uri);
        return ErrorKind::BadRequestUri;
    }
    let protocol = msg
        .start_field(StartField::Protocol)
        .unwrap_or("HTTP/1.1")
        .to_owned();

    let mut out = String::new();
    out.push_str(&method);
    out.push(' ');
    out.push_str(&percent::encode(uri.as_bytes(), true));
    let mut lead = '?';
    for (name, value) in msg.url_args() {
        out.push(lead);
        lead = '&';
        out.push_str(&percent::encode(name.as_bytes(), false));
        if let Some(value) = value {
            out.push('=');
            out.push_str(&percent::encode(value.as_bytes(), false));
        }
    }
    out.push(' ');
    out.push_str(&protocol);
    out.push_str("\r\n");
    push_headers(msg, &mut out);

    sink.write_bytes(out.as_bytes());
    msg.error_kind()
}

/// Render `msg` as a response (server role).
///
/// Requires `StatusCode` and `Reason`; `Protocol` defaults to
/// `HTTP/1.1`.
pub fn write_response(msg: &mut Message, sink: &mut impl ByteSink) -> ErrorKind {
    let status = match msg.start_field(StartField::StatusCode) {
        Some(status) => status.to_owned(),
        None => {
            msg.set_error(ErrorKind::MissingStatusCode, "response has no status code");
            return ErrorKind::MissingStatusCode;
        }
    };
    let reason = match msg.start_field(StartField::Reason) {
        Some(reason) => reason.to_owned(),
        None => {
            msg.set_error(ErrorKind::MissingReason, "response has no reason phrase");
            return ErrorKind::MissingReason;
        }
    };
    let protocol = msg
        .start_field(StartField::Protocol)
        .unwrap_or("HTTP/1.1")
        .to_owned();

    let mut out = String::new();
    out.push_str(&protocol);
    out.push(' ');
    out.push_str(&status);
    out.push(' ');
    out.push_str(&reason);
    out.push_str("\r\n");
    push_headers(msg, &mut out);

    sink.write_bytes(out.as_bytes());
    msg.error_kind()
}

/// Headers in insertion order, then the terminating blank line.
fn push_headers(msg: &Message, out: &mut String) {
    for (name, value) in msg.headers() {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
}

/// Build-side path shape check: absolute, and no `..` segment that could
/// escape a served tree. Applied only when constructing an outgoing
/// request, never to received paths.
pub fn is_decent_path(path: &str) -> bool {
    !path.is_empty() && path.starts_with('/') && !path.split('/').any(|segment| segment == "..")
}
