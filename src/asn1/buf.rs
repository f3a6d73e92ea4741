use std::fmt;

use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Minimum number of bytes added when an encode buffer grows.
pub const STANDARD_INCREMENT: usize = 200;

enum Storage<'a> {
    Empty,
    Owned(Zeroizing<Vec<u8>>),
    Wrapped(&'a [u8]),
}

/// Byte buffer for building ASN.1 encodings back to front, or for reading
/// them front to back.
///
/// An encode buffer starts empty and owns its storage. Each insert writes its
/// argument reversed at the cursor, so the physical content is the encoding
/// read backwards and [`to_data`](Self::to_data) reverses it once more.
///
/// A decode buffer wraps borrowed bytes and is read in order with the
/// `remove_*` methods. Sub-buffers created by [`imbed`](Self::imbed) share
/// the same bytes through a narrower window.
///
/// Offsets always satisfy `base <= next <= end`, where `end` is one past the
/// last usable byte.
pub struct Asn1Buf<'a> {
    storage: Storage<'a>,
    base: usize,
    end: usize,
    next: usize,
}

impl fmt::Debug for Asn1Buf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.storage {
            Storage::Empty => "empty",
            Storage::Owned(_) => "owned",
            Storage::Wrapped(_) => "wrapped",
        };
        f.debug_struct("Asn1Buf")
            .field("storage", &kind)
            .field("base", &self.base)
            .field("end", &self.end)
            .field("next", &self.next)
            .finish()
    }
}

impl Default for Asn1Buf<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Asn1Buf<'a> {
    /// An empty encode buffer with no storage.
    pub fn new() -> Self {
        Self {
            storage: Storage::Empty,
            base: 0,
            end: 0,
            next: 0,
        }
    }

    /// A decode buffer over `data`.
    pub fn wrap(data: &'a [u8]) -> Self {
        Self {
            storage: Storage::Wrapped(data),
            base: 0,
            end: data.len(),
            next: 0,
        }
    }

    /// Points this buffer at `data` for decoding, dropping previous storage.
    pub fn wrap_data(&mut self, data: Option<&'a [u8]>) -> Result<()> {
        let data = data.ok_or(Error::MissingField)?;
        *self = Self::wrap(data);
        Ok(())
    }

    /// Opens a window of `length` bytes starting at the cursor.
    ///
    /// Only decode buffers can be windowed. Advancing the window does not move
    /// this buffer until [`sync`](Self::sync) is called.
    pub fn imbed(&self, length: usize) -> Result<Asn1Buf<'a>> {
        let Storage::Wrapped(data) = self.storage else {
            return Err(Error::MissingField);
        };
        let end = self.next.checked_add(length).ok_or(Error::Overrun)?;
        if end > self.end {
            return Err(Error::Overrun);
        }
        Ok(Asn1Buf {
            storage: Storage::Wrapped(data),
            base: self.next,
            end,
            next: self.next,
        })
    }

    /// Moves the cursor to where `sub` stopped.
    pub fn sync(&mut self, sub: &Asn1Buf<'_>) {
        self.next = sub.next.clamp(self.base, self.end);
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self.storage, Storage::Wrapped(_))
    }

    fn bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Empty => &[],
            Storage::Owned(v) => v.as_slice(),
            Storage::Wrapped(data) => *data,
        }
    }

    /// Bytes between the cursor and the end of the buffer.
    pub fn remains(&self) -> usize {
        match self.storage {
            Storage::Empty => 0,
            _ => self.end - self.next,
        }
    }

    /// Bytes written or consumed so far.
    pub fn len(&self) -> usize {
        self.next - self.base
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn has_storage(&self) -> bool {
        !matches!(self.storage, Storage::Empty)
    }

    /// Physical content written so far, in storage order.
    pub fn raw(&self) -> &[u8] {
        &self.bytes()[self.base..self.next]
    }

    fn ensure_space(&mut self, amount: usize) -> Result<()> {
        let free = self.remains();
        if free < amount {
            self.expand(amount - free)?;
        }
        Ok(())
    }

    fn expand(&mut self, inc: usize) -> Result<()> {
        let (old, size): (&[u8], usize) = match &self.storage {
            Storage::Empty => (&[][..], 0),
            Storage::Owned(v) => (v.as_slice(), self.end),
            Storage::Wrapped(_) => return Err(Error::Overrun),
        };
        let new_size = size
            .checked_add(inc.max(STANDARD_INCREMENT))
            .ok_or(Error::OutOfMemory)?;

        let mut grown = Zeroizing::new(Vec::new());
        grown.try_reserve_exact(new_size)?;
        grown.extend_from_slice(&old[..size]);
        grown.resize(new_size, 0);
        trace!(from = size, to = new_size, "growing encode buffer");

        // the previous allocation is wiped when it drops here
        self.storage = Storage::Owned(grown);
        self.end = new_size;
        Ok(())
    }

    fn insert_reversed(&mut self, s: &[u8]) -> Result<()> {
        if self.is_wrapped() {
            return Err(Error::Overrun);
        }
        self.ensure_space(s.len())?;
        let Storage::Owned(v) = &mut self.storage else {
            return Ok(());
        };
        for (dst, src) in v[self.next..self.next + s.len()].iter_mut().zip(s.iter().rev()) {
            *dst = *src;
        }
        self.next += s.len();
        Ok(())
    }

    pub fn insert_octet(&mut self, o: u8) -> Result<()> {
        self.insert_reversed(&[o])
    }

    pub fn insert_octetstring(&mut self, s: &[u8]) -> Result<()> {
        self.insert_reversed(s)
    }

    pub fn insert_charstring(&mut self, s: &str) -> Result<()> {
        self.insert_reversed(s.as_bytes())
    }

    fn take(&mut self, len: usize) -> Result<&[u8]> {
        if len > self.remains() {
            return Err(Error::Overrun);
        }
        let start = self.next;
        self.next += len;
        Ok(&self.bytes()[start..start + len])
    }

    pub fn remove_octet(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn remove_octetstring(&mut self, len: usize) -> Result<Vec<u8>> {
        if len > self.remains() {
            return Err(Error::Overrun);
        }
        let mut out = Vec::new();
        out.try_reserve_exact(len)?;
        out.extend_from_slice(self.take(len)?);
        Ok(out)
    }

    /// Reads `len` bytes as UTF-8; on failure the cursor does not move.
    pub fn remove_charstring(&mut self, len: usize) -> Result<String> {
        let start = self.next;
        let bytes = self.remove_octetstring(len)?;
        String::from_utf8(bytes).map_err(|_| {
            self.next = start;
            Error::BadFormat
        })
    }

    /// The encoding in logical order: written bytes reversed.
    ///
    /// Exactly `len()` bytes are returned, with no trailing NUL.
    pub fn to_data(&self) -> Result<Vec<u8>> {
        let raw = self.raw();
        let mut out = Vec::new();
        out.try_reserve_exact(raw.len())?;
        out.extend(raw.iter().rev());
        Ok(out)
    }
}
