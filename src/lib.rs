//! h1-sans-io: A minimal, sans-I/O HTTP/1.x message codec
//!
//! This crate turns a bounded byte stream into a structured HTTP/1
//! request or response message, and a structured message back into wire
//! bytes, acting in either the client or the server role. It is designed
//! for environments that cannot (or should not) carry an async runtime.
//!
//! # Features
//!
//! - **Sans-I/O Design**: no sockets, no async runtime; callers provide a
//!   [`ByteSource`] to parse from and a [`ByteSink`] to render into
//! - **Dual Role**: parse responses as a client or requests as a server,
//!   and build the opposite direction, from one message type
//! - **Bounded Tokenizer**: a per-parse character budget
//!   ([`DEFAULT_MAX_INPUT_CHARS`]) guards against misbehaving peers
//! - **Lenient Percent-Decoding**: invalid `%` escapes pass through
//!   literally instead of failing the parse
//! - **Single-Slot Errors**: each message carries one (code, message)
//!   error slot that is overwritten, never accumulated
//!
//! # Quick Start
//!
//! ```rust
//! use h1_sans_io::{parse_request, ErrorKind, Message, SliceSource, StartField};
//!
//! let wire = b"GET /index.html?lang=en HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! let mut msg = Message::new();
//! let result = parse_request(&mut msg, SliceSource::new(wire));
//!
//! assert_eq!(result, ErrorKind::Ok);
//! assert_eq!(msg.start_field(StartField::Method), Some("GET"));
//! assert_eq!(msg.start_field(StartField::RequestUri), Some("/index.html"));
//! assert_eq!(msg.url_arg("lang"), Some(Some("en")));
//! assert_eq!(msg.first_match("Host"), Some("example.com"));
//! ```
//!
//! # Architecture
//!
//! Byte source → tokenizer → parser → message; message → serializer →
//! byte sink. One pass, fully synchronous, no backtracking beyond a
//! bounded skip-to-blank-line resynchronization on start-line errors.
//!
//! This crate is intentionally minimal. It does NOT provide:
//! - TCP transport or connection lifecycle (you provide the bytes)
//! - Message bodies, chunked transfer-encoding, or continuation lines
//! - Retry or repair of failed parses (discard the message and re-read)

pub mod message;
pub mod parser;
pub mod percent;
pub mod serializer;
pub mod tokenizer;

mod log;

pub use message::{ErrorKind, Message, StartField, DEFAULT_MAX_INPUT_CHARS, START_FIELD_COUNT};
pub use parser::{parse_request, parse_response, SUPPORTED_METHODS, SUPPORTED_PROTOCOLS};
pub use serializer::{write_request, write_response, ByteSink, WriteSink};
pub use tokenizer::{
    ByteSource, HeaderLine, Line, ReadSource, SliceSource, Tokenizer, MAX_LINE_CHARS,
};
