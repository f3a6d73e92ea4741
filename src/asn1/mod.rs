//! Reverse-built encoding buffer used to serialize protocol messages.

mod buf;
mod unparse;

pub use buf::{Asn1Buf, STANDARD_INCREMENT};
pub use unparse::{hex_unparse, unparse};
