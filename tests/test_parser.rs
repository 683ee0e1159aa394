use hearth::http::parser::{ParseError, parse_request};
use hearth::http::request::Method;

#[tokio::test]
async fn test_parse_simple_get_request() {
    let mut req: &[u8] = b"GET /index.html HTTP/1.1\nHost: example.com\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target, "/index.html");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.body.is_empty());
}

#[tokio::test]
async fn test_parse_crlf_terminated_lines() {
    let mut req: &[u8] = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
}

#[tokio::test]
async fn test_parse_post_request_with_body() {
    let mut req: &[u8] = b"POST /x HTTP/1.1\nContent-Length: 5\nContent-Type: text/plain\n\r\nhello";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.target, "/x");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(parsed.headers.get("Content-Type").unwrap(), "text/plain");
}

#[tokio::test]
async fn test_parse_get_ignores_body_headers() {
    let mut req: &[u8] = b"GET / HTTP/1.1\nContent-Length: 5\n\r\nhello";
    let parsed = parse_request(&mut req).await.unwrap();

    assert!(parsed.body.is_empty());
    assert_eq!(req, b"hello");
}

#[tokio::test]
async fn test_parse_head_ignores_body_headers() {
    let mut req: &[u8] = b"HEAD / HTTP/1.1\nContent-Length: abc\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.method, Method::HEAD);
    assert!(parsed.body.is_empty());
}

#[tokio::test]
async fn test_parse_header_value_trimmed_and_split_on_first_colon() {
    let mut req: &[u8] = b"GET / HTTP/1.1\nHost:   localhost:3490  \n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "localhost:3490");
}

#[tokio::test]
async fn test_parse_duplicate_header_last_wins() {
    let mut req: &[u8] = b"GET / HTTP/1.1\nX-Tag: one\nX-Tag: two\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.headers.get("X-Tag").unwrap(), "two");
    assert_eq!(parsed.headers.len(), 1);
}

#[tokio::test]
async fn test_parse_header_names_case_sensitive() {
    let mut req: &[u8] = b"GET / HTTP/1.1\ncontent-type: text/plain\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert!(parsed.headers.contains_key("content-type"));
    assert!(!parsed.headers.contains_key("Content-Type"));
}

#[tokio::test]
async fn test_parse_unknown_method_passes_through() {
    let mut req: &[u8] = b"BREW /pot HTTP/1.1\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.method, Method::Other("BREW".to_string()));
}

#[tokio::test]
async fn test_parse_request_line_with_too_few_fields() {
    for line in ["GET /index.html\n\r\n", "GET\n\r\n", "\n\r\n"] {
        let mut req = line.as_bytes();
        let result = parse_request(&mut req).await;
        assert!(
            matches!(result, Err(ParseError::MalformedRequestLine(_))),
            "{line:?} gave {result:?}"
        );
    }
}

#[tokio::test]
async fn test_parse_extra_request_line_fields_ignored() {
    let mut req: &[u8] = b"GET /a HTTP/1.1 trailing\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.target, "/a");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[tokio::test]
async fn test_parse_malformed_header() {
    let mut req: &[u8] = b"GET / HTTP/1.1\nBrokenHeader\n\r\n";
    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::MalformedHeaderLine(line)) if line == "BrokenHeader"));
}

#[tokio::test]
async fn test_parse_post_missing_content_length() {
    let mut req: &[u8] = b"POST /x HTTP/1.1\nContent-Type: text/plain\n\r\nhello";
    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::MissingOrInvalidContentLength)));
}

#[tokio::test]
async fn test_parse_post_invalid_content_length() {
    let mut req: &[u8] = b"POST /x HTTP/1.1\nContent-Length: five\n\r\nhello";
    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::MissingOrInvalidContentLength)));
}

#[tokio::test]
async fn test_parse_incomplete_body() {
    let mut req: &[u8] = b"POST /x HTTP/1.1\nContent-Length: 10\n\r\nhello";
    let result = parse_request(&mut req).await;

    assert!(matches!(
        result,
        Err(ParseError::IncompleteBody { expected: 10, received: 5 })
    ));
}

#[tokio::test]
async fn test_parse_empty_post_body() {
    let mut req: &[u8] = b"POST /x HTTP/1.1\nContent-Length: 0\n\r\n";
    let parsed = parse_request(&mut req).await.unwrap();

    assert!(parsed.body.is_empty());
}

#[tokio::test]
async fn test_parse_binary_body() {
    let mut req: &[u8] = b"POST /upload HTTP/1.1\nContent-Length: 4\n\r\n\x00\x01\x02\x03";
    let parsed = parse_request(&mut req).await.unwrap();

    assert_eq!(parsed.body, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_parse_missing_header_terminator() {
    let mut req: &[u8] = b"GET / HTTP/1.1\nHost: example.com\n";
    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::ConnectionClosed)));
}

#[tokio::test]
async fn test_parse_empty_stream() {
    let mut req: &[u8] = b"";
    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::ConnectionClosed)));
}

#[tokio::test]
async fn test_parse_too_many_headers() {
    let mut raw = String::from("GET / HTTP/1.1\n");
    for i in 0..=hearth::http::parser::MAX_HEADERS {
        raw.push_str(&format!("X-H{i}: v\n"));
    }
    raw.push_str("\r\n");
    let mut req = raw.as_bytes();

    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::TooManyHeaders)));
}

#[tokio::test]
async fn test_parse_non_utf8_head() {
    let mut req: &[u8] = b"GET /\xff HTTP/1.1\n\r\n";
    let result = parse_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::InvalidEncoding)));
}
