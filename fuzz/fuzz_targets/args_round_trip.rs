#![no_main]
use libfuzzer_sys::fuzz_target;
use pct_args::{escape_form, escape_query, Args};

fuzz_target!(|pairs: Vec<(Vec<u8>, Option<Vec<u8>>)>| {
    let query = escape_query(&pairs).unwrap();
    assert_eq!(Args::parse_strict(&query).unwrap(), pairs);
    assert_eq!(Args::parse(&query).unwrap().to_query().unwrap(), query);

    // Without the '?', a lone empty key with an absent value is
    // indistinguishable from the empty list.
    if matches!(&pairs[..], [(key, None)] if key.is_empty()) {
        return;
    }

    let form = escape_form(&pairs).unwrap();
    let args = Args::parse(&form).unwrap();
    assert_eq!(args, pairs);
    assert_eq!(args.to_form().unwrap(), form);
    assert_eq!(args.to_query().unwrap(), query);
});
