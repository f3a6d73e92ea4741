use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "K5CORE_PASSWORD";

pub fn read_password() -> Result<Zeroizing<String>> {
    //  K5CORE_PASSWORD="secret" k5core pbkdf2 --salt ATHENA.MIT.EDUraeburn
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  echo "secret" | k5core pbkdf2 --salt ...
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("no password provided")
}

/// Decodes a hex argument, naming it in the error.
pub fn decode_hex(what: &str, s: &str) -> Result<Zeroizing<Vec<u8>>> {
    hex::decode(s.trim())
        .map(Zeroizing::new)
        .with_context(|| format!("{what} is not valid hex"))
}

/// Message bytes from a hex argument or a raw file.
pub fn read_data(hex_arg: Option<&str>, file: Option<&Path>) -> Result<Zeroizing<Vec<u8>>> {
    match (hex_arg, file) {
        (Some(s), None) => decode_hex("data", s),
        (None, Some(path)) => fs::read(path)
            .map(Zeroizing::new)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => bail!("exactly one of DATA or --data-file is required"),
    }
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn trims_line_endings_only() {
        let mut s = String::from(" pw \r\n");
        trim_newline(&mut s);
        assert_eq!(s, " pw ");
    }

    #[test]
    fn hex_and_file_input() {
        assert_eq!(*read_data(Some("0aff"), None).unwrap(), vec![0x0a, 0xff]);
        assert!(decode_hex("key", "xyz").is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"raw bytes").unwrap();
        assert_eq!(&read_data(None, Some(file.path())).unwrap()[..], b"raw bytes");

        assert!(read_data(None, None).is_err());
    }
}
