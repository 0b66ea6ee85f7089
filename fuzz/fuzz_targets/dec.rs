#![no_main]
use libfuzzer_sys::fuzz_target;
use pct_args::{
    pct_enc::{unescapable_len, unescape_to, unescaped_len},
    unescape, unescape_strict,
};

fuzz_target!(|data: &[u8]| {
    let valid = unescapable_len(data);
    let dec = unescape(data).unwrap();
    assert_eq!(dec.len(), unescaped_len(data));
    assert_eq!(unescape(&data[..valid]).unwrap(), dec);

    match unescape_strict(data) {
        Ok(strict) => {
            assert_eq!(valid, data.len());
            assert_eq!(strict, dec);
        }
        Err(e) => assert_eq!(e.index(), valid),
    }

    let mut buf = vec![0; dec.len() / 2];
    assert_eq!(unescape_to(data, &mut buf), dec.len());
    assert_eq!(buf, dec[..buf.len()]);
});
