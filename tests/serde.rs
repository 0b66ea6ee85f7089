#![cfg(feature = "serde")]

use pct_args::{
    pct_enc::{EStr, EString},
    Args,
};

#[test]
fn args() {
    let args = Args::parse("a=1&b&c=x+y").unwrap();
    let json = serde_json::to_string(&args).unwrap();
    assert_eq!(json, r#""a=1&b&c=x+y""#);
    assert_eq!(serde_json::from_str::<Args>(&json).unwrap(), args);

    let from_value: Args = serde_json::from_value(serde_json::json!("a=1&b")).unwrap();
    assert_eq!(from_value, [("a", Some("1")), ("b", None)]);
    let from_reader: Args = serde_json::from_reader(&br#""a=1&b""#[..]).unwrap();
    assert_eq!(from_reader, from_value);
    let escaped: Args = serde_json::from_str(r#""k=\u0041%41""#).unwrap();
    assert_eq!(escaped, [("k", Some("AA"))]);

    let e = serde_json::from_str::<Args>(r#""a=%zz""#).unwrap_err();
    assert!(e.to_string().contains("invalid percent-encoded octet at index 2"));
}

#[test]
fn estr() {
    let s = EStr::new_or_panic("a+b%2F");
    assert_eq!(serde_json::to_string(s).unwrap(), r#""a+b%2F""#);
    assert_eq!(serde_json::from_str::<&EStr>(r#""a+b%2F""#).unwrap(), s);

    let owned: EString = serde_json::from_str(r#""x%20y""#).unwrap();
    assert_eq!(owned, "x%20y");
    assert!(serde_json::from_str::<EString>(r#""x%2""#).is_err());
    assert!(serde_json::from_str::<EString>(r#""a b""#).is_err());
}
