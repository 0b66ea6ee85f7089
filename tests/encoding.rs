use pct_args::{
    escape,
    pct_enc::{
        escape_to, escaped_len, hex_to_nibble, nibble_to_hex, should_escape, unescapable_len,
        unescape_to, unescaped_len, EStr, EString,
    },
    unescape, unescape_strict, ErrorKind,
};

const RAW: &[u8] = "te😃a 测1`~!@试#$%st^&+=".as_bytes();
const ESCAPED: &str = "te%F0%9F%98%83a+%E6%B5%8B1%60~%21%40%E8%AF%95%23%24%25st%5E%26%2B%3D";

#[test]
fn enc_dec() {
    let s = escape(RAW).unwrap();
    assert_eq!(s, ESCAPED);
    assert_eq!(s.len(), escaped_len(RAW));

    let mut buf = EString::new();
    buf.push_escaped(RAW);
    assert_eq!(buf, s);

    assert_eq!(unescape(ESCAPED).unwrap(), RAW);
    assert_eq!(unescape_strict(ESCAPED).unwrap(), RAW);
    assert_eq!(&*EStr::new_or_panic(ESCAPED).decode().to_bytes(), RAW);
}

#[test]
fn concrete() {
    assert_eq!(escape("a b").unwrap(), "a+b");
    assert_eq!(unescape("a+b").unwrap(), b"a b");
    assert_eq!(escape("100%").unwrap(), "100%25");
    assert_eq!(unescape("100%25").unwrap(), b"100%");
    assert_eq!(unescape("ab%2").unwrap(), b"ab");
    assert_eq!(escape("").unwrap(), "");
    assert_eq!(unescape("").unwrap(), b"");
}

#[test]
fn lowercase_hex_is_decoded() {
    assert_eq!(unescape("%c3%a9%2f").unwrap(), "é/".as_bytes());
    assert_eq!(unescape("%C3%a9").unwrap(), "é".as_bytes());
}

#[test]
fn plus_and_space() {
    assert_eq!(escape("a+b c").unwrap(), "a%2Bb+c");
    assert_eq!(unescape("a%2Bb+c").unwrap(), b"a+b c");
    assert_eq!(unescape("%20+").unwrap(), b"  ");
}

#[test]
fn tolerant_truncation() {
    let cases: &[(&str, &[u8], usize)] = &[
        ("ab%2", b"ab", 2),
        ("ab%", b"ab", 2),
        ("%", b"", 0),
        ("a%zzb", b"a", 1),
        ("a%2gb", b"a", 1),
        ("%41%4", b"A", 3),
        ("%41+%42%", b"A B", 7),
    ];
    for &(input, expected, valid) in cases {
        assert_eq!(unescapable_len(input.as_bytes()), valid, "{input}");
        assert_eq!(unescaped_len(input.as_bytes()), expected.len(), "{input}");
        assert_eq!(unescape(input).unwrap(), expected, "{input}");

        let e = unescape_strict(input).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidOctet, "{input}");
        assert_eq!(e.index(), valid, "{input}");
    }
}

#[test]
fn round_trip_all_byte_pairs() {
    let mut buf = [0; 7];
    let mut dec = [0; 3];
    for hi in 0..=255u8 {
        for lo in 0..=255u8 {
            let s = [hi, lo];
            let len = escape_to(&s, &mut buf);
            assert_eq!(len, escaped_len(&s));
            assert_eq!(buf[len], 0);

            let escaped = &buf[..len];
            assert_eq!(unescapable_len(escaped), len);
            assert_eq!(unescaped_len(escaped), 2);
            assert_eq!(unescape_to(escaped, &mut dec), 2);
            assert_eq!(dec, [hi, lo, 0]);
        }
    }
}

#[test]
fn escaped_text_alphabet() {
    let all: Vec<u8> = (0..=255).collect();
    let s = escape(&all).unwrap();
    let mut chars = s.as_str().bytes();
    while let Some(x) = chars.next() {
        match x {
            b'%' => {
                let hi = chars.next().unwrap();
                let lo = chars.next().unwrap();
                for d in [hi, lo] {
                    assert!(d.is_ascii_digit() || (b'A'..=b'F').contains(&d));
                }
            }
            b'+' => {}
            x => assert!(!should_escape(x)),
        }
    }
    assert_eq!(s.len(), 66 + 1 + 189 * 3);
}

#[test]
fn two_pass_protocol() {
    let input = "key with spaces/&=".as_bytes();
    let len = escape_to(input, &mut []);
    let mut buf = vec![0xaa; len + 1];
    assert_eq!(escape_to(input, &mut buf), len);
    assert_eq!(&buf[..len], b"key+with+spaces%2F%26%3D");
    assert_eq!(buf[len], 0);

    let mut short = [0xaa; 4];
    assert_eq!(escape_to(input, &mut short), len);
    assert_eq!(&short, b"key+");

    let len = unescape_to(&buf[..len], &mut []);
    assert_eq!(len, input.len());
}

#[test]
fn hex() {
    assert_eq!(nibble_to_hex(0xa), b'A');
    assert_eq!(nibble_to_hex(0x2a), b'A');
    assert_eq!(hex_to_nibble(b'a'), Some(10));
    assert_eq!(hex_to_nibble(b'F'), Some(15));
    assert_eq!(hex_to_nibble(b'/'), None);
    assert_eq!(hex_to_nibble(b':'), None);
    assert_eq!(hex_to_nibble(b'@'), None);
    assert_eq!(hex_to_nibble(b'`'), None);
}

#[test]
fn estr() {
    assert!(EStr::new("a-b_c.d~e+f%2F").is_some());
    assert!(EStr::new("a&b").is_none());
    assert!(EStr::new("a b").is_none());
    assert!(EStr::new("%2").is_none());

    let e = EStr::validate("ok%2Fok%").unwrap_err();
    assert_eq!(e.index(), 7);

    let s = EStr::new_or_panic("J%C3%B6rg+M");
    assert_eq!(s.decode().to_string_lossy(), "Jörg M");
    assert_eq!(s.decoded_len(), 7);
    assert_eq!(s.to_owned(), "J%C3%B6rg+M");
}

#[test]
#[should_panic = "improperly escaped string"]
fn estr_panics_on_invalid() {
    let _ = EStr::new_or_panic("50%");
}
