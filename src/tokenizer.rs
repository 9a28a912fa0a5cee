//! Bounded character reader layered over an external byte source.
//!
//! The tokenizer owns two guards:
//!
//! - a running character budget (`max_input_chars`): once the counter is
//!   spent, every read reports end of input regardless of the underlying
//!   source, bounding what a malicious peer can make one parse consume;
//! - a fixed per-line buffer bound ([`MAX_LINE_CHARS`]): an overlong line
//!   is discarded up to its newline and reported as [`Line::TooLong`].
//!
//! Known deviation from strict CRLF handling: [`Tokenizer::next_byte`]
//! strips every `\r` wherever it appears, not only before `\n`. This is a
//! deliberate simplification and must not be corrected to
//! CRLF-pair-only stripping.

use std::io::Read;

/// Maximum characters accumulated for a single line before the rest of
/// the line is discarded. Distinct from the parse-wide character budget.
pub const MAX_LINE_CHARS: usize = 1000;

/// A blocking source of single bytes. `None` means end of input.
pub trait ByteSource {
    fn next_byte(&mut self) -> Option<u8>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }
}

/// In-memory byte source over a slice.
#[derive(Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }
}

/// Byte source over any blocking reader (e.g. a socket with its own read
/// deadline). A read error is surfaced as end of input.
#[derive(Debug)]
pub struct ReadSource<R: Read> {
    reader: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn next_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.reader.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(err) => {
                crate::log::warning!("byte source read error: {err}");
                None
            }
        }
    }
}

/// Outcome of [`Tokenizer::get_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A complete line, leading space/tab skipped, trailing spaces
    /// trimmed. May be empty (a blank line is not end of input).
    Text(String),
    /// The line exceeded [`MAX_LINE_CHARS`]; its remainder was discarded
    /// so the stream stays aligned on the next line.
    TooLong,
    /// End of input with nothing accumulated.
    End,
}

/// Outcome of [`Tokenizer::get_header_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine {
    /// A `name: value` pair. The value may be empty.
    Field(String, String),
    /// Name or value exceeded the line bound; the line was discarded.
    TooLong,
    /// Blank line or end of input: no more headers.
    End,
}

/// Bounded character reader producing words, trimmed lines, and header
/// name/value pairs.
#[derive(Debug)]
pub struct Tokenizer<S: ByteSource> {
    source: S,
    /// Characters pulled so far, carriage returns included.
    chars_read: usize,
    /// Budget: at this count the tokenizer reports end of input.
    max_input_chars: usize,
}

impl<S: ByteSource> Tokenizer<S> {
    pub fn new(source: S, max_input_chars: usize) -> Self {
        Self {
            source,
            chars_read: 0,
            max_input_chars,
        }
    }

    /// Pull one byte, counting it against the budget. Every `\r` is
    /// discarded and the byte after it returned instead.
    pub fn next_byte(&mut self) -> Option<u8> {
        loop {
            if self.chars_read >= self.max_input_chars {
                return None;
            }
            let byte = self.source.next_byte()?;
            self.chars_read += 1;
            if byte != b'\r' {
                return Some(byte);
            }
        }
    }

    /// Read one whitespace-delimited word, skipping leading whitespace.
    ///
    /// Returns `None` only when end of input occurs before any word byte
    /// is read; a returned word is never empty. The delimiter that ends
    /// the word is consumed.
    pub fn get_word(&mut self) -> Option<String> {
        let mut word = String::new();
        loop {
            match self.next_byte() {
                None => {
                    return if word.is_empty() { None } else { Some(word) };
                }
                Some(b' ') | Some(b'\t') | Some(b'\n') => {
                    if word.is_empty() {
                        continue;
                    }
                    return Some(word);
                }
                Some(byte) => word.push(byte as char),
            }
        }
    }

    /// Read the rest of the current line up to `\n` (exclusive), skipping
    /// leading space/tab and trimming trailing spaces.
    ///
    /// An empty line is `Line::Text("")`, distinct from `Line::End`,
    /// which is only returned when end of input is hit with nothing
    /// accumulated.
    pub fn get_line(&mut self) -> Line {
        let mut line = String::new();
        loop {
            match self.next_byte() {
                None => {
                    if line.is_empty() {
                        return Line::End;
                    }
                    break;
                }
                Some(b'\n') => break,
                Some(byte) => {
                    if line.is_empty() && (byte == b' ' || byte == b'\t') {
                        continue;
                    }
                    if line.len() >= MAX_LINE_CHARS {
                        self.discard_line();
                        return Line::TooLong;
                    }
                    line.push(byte as char);
                }
            }
        }
        while line.ends_with(' ') {
            line.pop();
        }
        Line::Text(line)
    }

    /// Read one header line as a `(name, value)` pair.
    ///
    /// The name runs to the first `:`, space, or newline. A zero-length
    /// name (blank line, or end of input before a name) means no more
    /// headers. A name ended by newline carries an empty value; otherwise
    /// the value is the remainder of the line via [`Self::get_line`].
    pub fn get_header_line(&mut self) -> HeaderLine {
        let mut name = String::new();
        loop {
            match self.next_byte() {
                None => {
                    // EOF inside a name still ends the header section.
                    return if name.is_empty() {
                        HeaderLine::End
                    } else {
                        HeaderLine::Field(name, String::new())
                    };
                }
                Some(b' ') => {
                    if name.is_empty() {
                        continue;
                    }
                    break;
                }
                Some(b':') => break,
                Some(b'\n') => {
                    return if name.is_empty() {
                        HeaderLine::End
                    } else {
                        HeaderLine::Field(name, String::new())
                    };
                }
                Some(byte) => {
                    if name.len() >= MAX_LINE_CHARS {
                        self.discard_line();
                        return HeaderLine::TooLong;
                    }
                    name.push(byte as char);
                }
            }
        }
        match self.get_line() {
            Line::Text(value) => HeaderLine::Field(name, value),
            Line::TooLong => HeaderLine::TooLong,
            Line::End => HeaderLine::Field(name, String::new()),
        }
    }

    /// Discard bytes until two consecutive newlines (an empty line) or
    /// end of input. Error-recovery only: keeps a later read from
    /// desynchronizing on a malformed line.
    pub fn skip_to_blank_line(&mut self) {
        let mut last_was_newline = false;
        while let Some(byte) = self.next_byte() {
            if byte == b'\n' {
                if last_was_newline {
                    return;
                }
                last_was_newline = true;
            } else {
                last_was_newline = false;
            }
        }
    }

    /// Characters pulled from the source so far.
    pub fn chars_read(&self) -> usize {
        self.chars_read
    }

    /// Consume the rest of the current line without accumulating it.
    fn discard_line(&mut self) {
        while let Some(byte) = self.next_byte() {
            if byte == b'\n' {
                return;
            }
        }
    }
}
