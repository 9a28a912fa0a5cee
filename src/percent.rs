//! Percent-encoding codec for URI components (RFC 3986 subset).
//!
//! The decoder is deliberately lenient: a `%` that is not followed by two
//! valid hex digits is passed through literally instead of raising an
//! error. That makes `decode(encode(s, true)) == s` a strict identity for
//! every byte string, while `encode(decode(s), true)` is NOT the identity
//! when `s` contains a bare `%` — an asymmetry callers depend on, so it
//! must not be "fixed" into a strict decoder.

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Bytes copied through unescaped: alphanumerics plus the RFC 3986
/// unreserved marks. `/` and `:` are safe only in path position.
fn is_safe(byte: u8, allow_slash_colon: bool) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'~')
        || (allow_slash_colon && matches!(byte, b'/' | b':'))
}

/// Percent-encode a byte string.
///
/// `allow_slash_colon` keeps `/` and `:` unescaped, which is what path
/// emission wants; query names and values encode them.
pub fn encode(raw: &[u8], allow_slash_colon: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for &byte in raw {
        if is_safe(byte, allow_slash_colon) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[(byte >> 4) as usize] as char);
            out.push(HEX_UPPER[(byte & 0x0F) as usize] as char);
        }
    }
    out
}

/// Percent-decode a byte string. Never fails.
///
/// A `%` followed by two hex digits is replaced by the decoded byte. Any
/// other `%` is emitted literally and scanning resumes at the byte after
/// it, so `"%%41"` decodes to `"%A"`.
pub fn decode(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let byte = text[pos];
        if byte == b'%' {
            if let (Some(hi), Some(lo)) = (
                text.get(pos + 1).copied().and_then(hex_value),
                text.get(pos + 2).copied().and_then(hex_value),
            ) {
                out.push((hi << 4) | lo);
                pos += 3;
                continue;
            }
        }
        out.push(byte);
        pos += 1;
    }
    out
}

/// Decode into a `String`, replacing invalid UTF-8 with U+FFFD.
pub fn decode_lossy(text: &str) -> String {
    String::from_utf8_lossy(&decode(text.as_bytes())).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
