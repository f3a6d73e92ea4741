//! Human-readable rendering of buffer contents for debugging.

use super::Asn1Buf;

const NULL: &str = "<NULL>";
const EMPTY: &str = "<EMPTY>";

fn logical(buf: &Asn1Buf<'_>) -> impl Iterator<Item = u8> {
    buf.raw().iter().rev().copied()
}

/// Contents in logical order as text; invalid UTF-8 is replaced.
pub fn unparse(buf: Option<&Asn1Buf<'_>>) -> String {
    match buf {
        None => NULL.to_string(),
        Some(buf) if !buf.has_storage() => EMPTY.to_string(),
        Some(buf) => String::from_utf8_lossy(&logical(buf).collect::<Vec<_>>()).into_owned(),
    }
}

/// Contents in logical order as upper-case hex pairs separated by spaces.
pub fn hex_unparse(buf: Option<&Asn1Buf<'_>>) -> String {
    match buf {
        None => NULL.to_string(),
        Some(buf) if !buf.has_storage() => EMPTY.to_string(),
        Some(buf) => logical(buf)
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" "),
    }
}
