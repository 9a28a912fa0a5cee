//! Tests for server-role parsing (reading a request)

use h1_sans_io::{parse_request, ErrorKind, Message, SliceSource, StartField};

fn parse(wire: &[u8]) -> (Message, ErrorKind) {
    let mut msg = Message::new();
    let result = parse_request(&mut msg, SliceSource::new(wire));
    (msg, result)
}

#[test]
fn test_minimal_request() {
    let (msg, result) = parse(b"GET / HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.start_field(StartField::Method), Some("GET"));
    assert_eq!(msg.start_field(StartField::RequestUri), Some("/"));
    assert_eq!(msg.start_field(StartField::Protocol), Some("HTTP/1.1"));
    assert_eq!(msg.url_arg_count(), 0);
    assert_eq!(msg.header_count(), 0);
}

#[test]
fn test_encoded_path_and_query() {
    let (msg, result) = parse(b"GET /a%20b?x=1&y HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.start_field(StartField::Method), Some("GET"));
    assert_eq!(msg.start_field(StartField::RequestUri), Some("/a b"));
    assert_eq!(msg.url_arg("x"), Some(Some("1")));
    // A name without '=' is a flag: present, no value.
    assert_eq!(msg.url_arg("y"), Some(None));
    assert_eq!(msg.url_arg("absent"), None);
}

#[test]
fn test_empty_query_value_differs_from_flag() {
    let (msg, result) = parse(b"GET /?a=&b HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.url_arg("a"), Some(Some("")));
    assert_eq!(msg.url_arg("b"), Some(None));
}

#[test]
fn test_query_names_and_values_are_decoded() {
    let (msg, result) = parse(b"GET /?user%20name=J%20Doe HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.url_arg("user name"), Some(Some("J Doe")));
}

#[test]
fn test_value_keeps_second_equals_sign() {
    // Only the first '=' splits a pair.
    let (msg, result) = parse(b"GET /?k=a=b HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.url_arg("k"), Some(Some("a=b")));
}

#[test]
fn test_duplicate_query_arg_recorded_but_not_fatal() {
    let (msg, result) = parse(b"GET /?x=1&x=2&z=3 HTTP/1.1\r\n\r\n");

    // The duplicate is reported, the first value wins, and the rest of
    // the query was still processed.
    assert_eq!(result, ErrorKind::AlreadyUrlArg);
    assert_eq!(msg.url_arg("x"), Some(Some("1")));
    assert_eq!(msg.url_arg("z"), Some(Some("3")));
}

#[test]
fn test_all_supported_methods() {
    for method in ["GET", "POST", "HEAD", "PUT", "DELETE", "TRACE", "OPTIONS"] {
        let wire = format!("{method} / HTTP/1.1\r\n\r\n");
        let (msg, result) = parse(wire.as_bytes());
        assert_eq!(result, ErrorKind::Ok, "method {method}");
        assert_eq!(msg.start_field(StartField::Method), Some(method));
    }
}

#[test]
fn test_method_set_is_case_sensitive() {
    let (msg, result) = parse(b"get / HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::BadMethod);
    // Store-then-validate: the rejected token is retained.
    assert_eq!(msg.start_field(StartField::Method), Some("get"));
}

#[test]
fn test_unknown_method_rejected() {
    let (_, result) = parse(b"PATCH / HTTP/1.1\r\n\r\n");
    assert_eq!(result, ErrorKind::BadMethod);
}

#[test]
fn test_received_path_shape_is_not_validated() {
    // The receive path accepts URIs the build path would refuse, so the
    // server can still service them. See serializing tests for the
    // build-side half of this asymmetry.
    let (msg, result) = parse(b"GET /../secret HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.start_field(StartField::RequestUri), Some("/../secret"));
}

#[test]
fn test_request_protocol_validated() {
    let (_, result) = parse(b"GET / SPDY/3\r\n\r\n");
    assert_eq!(result, ErrorKind::BadProtocol);

    let (_, result) = parse(b"GET / HTTP/1.0\r\n\r\n");
    assert_eq!(result, ErrorKind::Ok);
}

#[test]
fn test_missing_target_is_unexpected_eof() {
    let (_, result) = parse(b"GET");
    assert_eq!(result, ErrorKind::UnexpectedEndOfInput);
}

#[test]
fn test_request_with_headers() {
    let (msg, result) =
        parse(b"POST /submit HTTP/1.1\r\nHost: example.com\r\nContent-Length: 4\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.first_match("Host"), Some("example.com"));
    assert_eq!(msg.first_match("Content-Length"), Some("4"));
}

#[test]
fn test_empty_query_segments_skipped() {
    let (msg, result) = parse(b"GET /?a=1&&b=2& HTTP/1.1\r\n\r\n");

    assert_eq!(result, ErrorKind::Ok);
    assert_eq!(msg.url_arg_count(), 2);
    assert_eq!(msg.url_arg("a"), Some(Some("1")));
    assert_eq!(msg.url_arg("b"), Some(Some("2")));
}
