//! Escapes command line arguments as alternating keys and values,
//! then decodes them back.
//!
//! ```text
//! $ cargo run --example roundtrip -- q "rust & C" page 2 raw
//! q=rust+%26+C&page=2&raw
//! q%3Drust%2B%2526%2BC%26page%3D2%26raw
//! q=rust+%26+C&page=2&raw
//! q=rust & C / q=rust & C
//! page=2 / page=2
//! raw / raw
//! ```

use pct_args::{escape, escape_form, unescape, Args, Error};
use std::env;

fn show((key, value): (&[u8], Option<&[u8]>)) -> String {
    let key = String::from_utf8_lossy(key);
    match value {
        Some(value) => format!("{key}={}", String::from_utf8_lossy(value)),
        None => key.into_owned(),
    }
}

fn main() -> Result<(), Error> {
    let argv: Vec<String> = env::args().skip(1).collect();
    let pairs: Vec<(&str, Option<&str>)> = argv
        .chunks(2)
        .map(|c| (c[0].as_str(), c.get(1).map(String::as_str)))
        .collect();

    let form = escape_form(&pairs)?;
    let escaped = escape(&form)?;
    let unescaped = unescape(&escaped)?;
    println!("{form}\n{escaped}\n{}", String::from_utf8_lossy(&unescaped));

    let args = Args::parse(&form)?;
    for (&(key, value), parsed) in pairs.iter().zip(&args) {
        let given = show((key.as_bytes(), value.map(str::as_bytes)));
        println!("{given} / {}", show(parsed));
    }
    Ok(())
}
