use pct_args::{escape_form, escape_query, escape_url, FORM_CONTENT_TYPE};

const NONE: [(&str, Option<&str>); 0] = [];

#[test]
fn query() {
    assert_eq!(
        escape_query(&[("a", Some("1")), ("b", None)]).unwrap(),
        "?a=1&b"
    );
    assert_eq!(escape_query(&[("", Some(""))]).unwrap(), "?=");
    assert_eq!(escape_query(&NONE).unwrap(), "");
    assert_eq!(
        escape_query(&[("a b", Some("c&d=e")), ("?", Some("#"))]).unwrap(),
        "?a+b=c%26d%3De&%3F=%23"
    );
}

#[test]
fn form() {
    assert_eq!(FORM_CONTENT_TYPE, "application/x-www-form-urlencoded");
    assert_eq!(
        escape_form(&[("grant_type", Some("password")), ("remember", None)]).unwrap(),
        "grant_type=password&remember"
    );
    assert_eq!(escape_form(&NONE).unwrap(), "");
    assert_eq!(escape_form(&[("", None::<&str>), ("", None)]).unwrap(), "&");
}

#[test]
fn base_and_path() {
    let args = [("q", Some("x y"))];
    let cases = [
        (Some("https://h"), Some("api/v1"), "https://h/api/v1?q=x+y"),
        (Some("https://h/"), Some("api/v1"), "https://h/api/v1?q=x+y"),
        (Some("https://h"), Some("/api/v1"), "https://h/api/v1?q=x+y"),
        (Some("https://h/"), Some("/api"), "https://h//api?q=x+y"),
        (Some("https://h"), None, "https://h?q=x+y"),
        (None, Some("api"), "api?q=x+y"),
        (Some(""), Some(""), "?q=x+y"),
        (Some("https://h/s?page=2"), None, "https://h/s?page=2&q=x+y"),
        (Some("https://h"), Some("s?page=2"), "https://h/s?page=2&q=x+y"),
    ];
    for (base, path, expected) in cases {
        assert_eq!(escape_url(base, path, &args).unwrap(), expected, "{base:?} {path:?}");
    }
}

#[test]
fn base_and_path_are_verbatim() {
    assert_eq!(
        escape_url(Some("http://h/a b"), Some("é%"), &[("k", Some("é"))]).unwrap(),
        "http://h/a b/é%?k=%C3%A9"
    );
    assert_eq!(
        escape_url(Some("https://h"), Some("p"), &NONE).unwrap(),
        "https://h/p"
    );
}

#[test]
fn escaped_path_segment() {
    let segment = pct_args::escape(b"a b/\xff").unwrap();
    assert_eq!(segment, "a+b%2F%FF");
    assert_eq!(
        escape_url(Some("https://h/files"), Some(segment.as_str()), &[("v", Some("1"))]).unwrap(),
        "https://h/files/a+b%2F%FF?v=1"
    );
}

#[test]
fn byte_keys_and_values() {
    let args: Vec<(Vec<u8>, Option<Vec<u8>>)> = vec![
        (vec![0, 0xff], Some(b"+".to_vec())),
        (b"~-._".to_vec(), None),
    ];
    assert_eq!(escape_query(&args).unwrap(), "?%00%FF=%2B&~-._");
}
