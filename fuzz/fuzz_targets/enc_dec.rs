#![no_main]
use libfuzzer_sys::fuzz_target;
use pct_args::{
    escape,
    pct_enc::{escaped_len, unescapable_len, EStr},
    unescape, unescape_strict,
};

fuzz_target!(|data: &[u8]| {
    let escaped = escape(data).unwrap();
    assert_eq!(escaped.len(), escaped_len(data));
    assert_eq!(unescapable_len(escaped.as_bytes()), escaped.len());
    assert_eq!(EStr::new(escaped.as_str()), Some(escaped.as_estr()));

    assert_eq!(unescape(&escaped).unwrap(), data);
    assert_eq!(unescape_strict(&escaped).unwrap(), data);
    assert_eq!(&*escaped.decode().to_bytes(), data);
});
