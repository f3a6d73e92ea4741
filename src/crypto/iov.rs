//! Scattered buffers and the block iterator that walks them.
//!
//! A message handed to a provider is a list of [`CryptoIov`] segments. Only
//! [`IovRole::Data`] segments take part in the cipher transform; the iterator
//! assembles fixed-size blocks across segment boundaries so providers never
//! need a contiguous copy of the message.

use std::fmt;

/// Role of a segment within a scattered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IovRole {
    /// Transform-specific header; neither encrypted nor signed here.
    Header,
    /// Encrypted and signed.
    Data,
    /// Padding bookkeeping; neither encrypted nor signed here.
    Padding,
    /// Whole-token stream buffer; neither encrypted nor signed here.
    Stream,
    /// Signed (hashed/MACed) but never encrypted.
    SignOnly,
}

impl IovRole {
    pub fn is_encrypted(self) -> bool {
        matches!(self, IovRole::Data)
    }

    pub fn is_signed(self) -> bool {
        matches!(self, IovRole::Data | IovRole::SignOnly)
    }
}

/// One labeled span of a logically contiguous message.
pub struct CryptoIov<'a> {
    pub role: IovRole,
    pub data: &'a mut [u8],
}

impl<'a> CryptoIov<'a> {
    pub fn new(role: IovRole, data: &'a mut [u8]) -> Self {
        Self { role, data }
    }

    pub fn data(data: &'a mut [u8]) -> Self {
        Self::new(IovRole::Data, data)
    }

    pub fn sign_only(data: &'a mut [u8]) -> Self {
        Self::new(IovRole::SignOnly, data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for CryptoIov<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // contents may be plaintext
        f.debug_struct("CryptoIov")
            .field("role", &self.role)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Total length of the segments that take part in encryption.
pub fn encrypted_len(iovs: &[CryptoIov<'_>]) -> usize {
    iovs.iter()
        .filter(|iov| iov.role.is_encrypted())
        .map(CryptoIov::len)
        .sum()
}

/// Position of a block iterator within a scattered message.
///
/// `data_pos` never exceeds the length of the segment at `iov_pos`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IovCursor {
    iov_pos: usize,
    data_pos: usize,
}

impl IovCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iov_pos(&self) -> usize {
        self.iov_pos
    }

    pub fn data_pos(&self) -> usize {
        self.data_pos
    }
}

/// Copies the next `block.len()` encrypted bytes into `block`.
///
/// Returns `true` when the block was filled completely. Returns `false` once
/// the input is exhausted; if that happens part-way through a block, the
/// remainder of `block` is zeroed. If no bytes were available at all `block`
/// is left untouched. Repeated calls with the same cursor continue where the
/// previous call stopped.
pub fn get_block(block: &mut [u8], iovs: &[CryptoIov<'_>], cursor: &mut IovCursor) -> bool {
    let block_size = block.len();
    let mut filled = 0;
    let mut i = cursor.iov_pos;

    while i < iovs.len() {
        let iov = &iovs[i];
        if !iov.role.is_encrypted() {
            i += 1;
            continue;
        }

        let n = (iov.data.len() - cursor.data_pos).min(block_size - filled);
        block[filled..filled + n]
            .copy_from_slice(&iov.data[cursor.data_pos..cursor.data_pos + n]);
        cursor.data_pos += n;
        filled += n;

        if filled == block_size {
            break;
        }

        cursor.data_pos = 0;
        i += 1;
    }
    cursor.iov_pos = i;

    if filled == block_size && block_size > 0 {
        return true;
    }
    if filled > 0 {
        block[filled..].fill(0);
    }
    false
}

/// Writes `block` into the next encrypted positions of `iovs`.
///
/// Mirrors [`get_block`]: the same cursor semantics apply, so a separate
/// output cursor advancing in lockstep with the input cursor writes each
/// transformed block back over the bytes it was read from. Bytes that do not
/// fit before the end of the message are dropped.
pub fn put_block(iovs: &mut [CryptoIov<'_>], cursor: &mut IovCursor, block: &[u8]) {
    let block_size = block.len();
    let mut written = 0;
    let mut i = cursor.iov_pos;

    while i < iovs.len() {
        let iov = &mut iovs[i];
        if !iov.role.is_encrypted() {
            i += 1;
            continue;
        }

        let n = (iov.data.len() - cursor.data_pos).min(block_size - written);
        iov.data[cursor.data_pos..cursor.data_pos + n]
            .copy_from_slice(&block[written..written + n]);
        cursor.data_pos += n;
        written += n;

        if written == block_size {
            break;
        }

        cursor.data_pos = 0;
        i += 1;
    }
    cursor.iov_pos = i;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blocks_span_segment_boundaries() {
        let mut a = *b"abc";
        let mut skip = *b"XXXX";
        let mut b = *b"defgh";
        let iovs = [
            CryptoIov::data(&mut a),
            CryptoIov::sign_only(&mut skip),
            CryptoIov::data(&mut b),
        ];

        let mut cursor = IovCursor::new();
        let mut block = [0u8; 4];

        assert!(get_block(&mut block, &iovs, &mut cursor));
        assert_eq!(&block, b"abcd");
        assert!(get_block(&mut block, &iovs, &mut cursor));
        assert_eq!(&block, b"efgh");
        assert!(!get_block(&mut block, &iovs, &mut cursor));
        // exhausted with nothing copied leaves the block alone
        assert_eq!(&block, b"efgh");
    }

    #[test]
    fn partial_block_is_zero_filled_and_reports_exhaustion() {
        let mut a = *b"abcdef";
        let iovs = [CryptoIov::data(&mut a)];
        let mut cursor = IovCursor::new();
        let mut block = [0xffu8; 4];

        assert!(get_block(&mut block, &iovs, &mut cursor));
        assert!(!get_block(&mut block, &iovs, &mut cursor));
        assert_eq!(&block, b"ef\0\0");
    }

    #[test]
    fn empty_message_yields_no_blocks() {
        let iovs: [CryptoIov<'_>; 0] = [];
        let mut cursor = IovCursor::new();
        let mut block = [7u8; 8];
        assert!(!get_block(&mut block, &iovs, &mut cursor));
        assert_eq!(block, [7u8; 8]);
    }

    #[test]
    fn put_block_skips_unencrypted_segments() {
        let mut a = [0u8; 3];
        let mut header = [9u8; 2];
        let mut b = [0u8; 5];
        let mut iovs = [
            CryptoIov::data(&mut a),
            CryptoIov::new(IovRole::Header, &mut header),
            CryptoIov::data(&mut b),
        ];

        let mut cursor = IovCursor::new();
        put_block(&mut iovs, &mut cursor, b"1234");
        put_block(&mut iovs, &mut cursor, b"5678");

        assert_eq!(iovs[0].data, b"123");
        assert_eq!(iovs[1].data, &[9u8, 9]);
        assert_eq!(iovs[2].data, b"45678");
    }

    #[test]
    fn cursor_offset_stays_within_segment() {
        let mut a = [1u8; 5];
        let iovs = [CryptoIov::data(&mut a)];
        let mut cursor = IovCursor::new();
        let mut block = [0u8; 5];

        assert!(get_block(&mut block, &iovs, &mut cursor));
        assert_eq!(cursor.iov_pos(), 0);
        assert_eq!(cursor.data_pos(), 5);
    }

    fn role() -> impl Strategy<Value = IovRole> {
        prop_oneof![
            3 => Just(IovRole::Data),
            1 => Just(IovRole::SignOnly),
            1 => Just(IovRole::Header),
        ]
    }

    proptest! {
        #[test]
        fn blockwise_read_matches_concatenation(
            segments in proptest::collection::vec(
                (role(), proptest::collection::vec(any::<u8>(), 0..20)),
                0..8,
            ),
            block_size in 1usize..12,
        ) {
            let expected: Vec<u8> = segments
                .iter()
                .filter(|(role, _)| role.is_encrypted())
                .flat_map(|(_, bytes)| bytes.iter().copied())
                .collect();
            let mut owned = segments.clone();
            let iovs: Vec<CryptoIov<'_>> = owned
                .iter_mut()
                .map(|(role, bytes)| CryptoIov::new(*role, bytes))
                .collect();

            let mut cursor = IovCursor::new();
            let mut block = vec![0u8; block_size];
            let mut collected = Vec::new();
            while get_block(&mut block, &iovs, &mut cursor) {
                collected.extend_from_slice(&block);
            }
            let whole = expected.len() / block_size * block_size;
            prop_assert_eq!(&collected[..], &expected[..whole]);
        }

        #[test]
        fn blockwise_write_leaves_skipped_segments(
            segments in proptest::collection::vec(
                (role(), proptest::collection::vec(any::<u8>(), 0..20)),
                0..8,
            ),
            block_size in 1usize..12,
        ) {
            let total: usize = segments
                .iter()
                .filter(|(role, _)| role.is_encrypted())
                .map(|(_, bytes)| bytes.len())
                .sum();
            let mut owned = segments.clone();
            let mut iovs: Vec<CryptoIov<'_>> = owned
                .iter_mut()
                .map(|(role, bytes)| CryptoIov::new(*role, bytes))
                .collect();

            let mut cursor = IovCursor::new();
            for _ in 0..total / block_size {
                put_block(&mut iovs, &mut cursor, &vec![0xA5; block_size]);
            }
            let mut written = total / block_size * block_size;

            for (iov, (role, original)) in iovs.iter().zip(&segments) {
                if role.is_encrypted() {
                    let n = written.min(original.len());
                    prop_assert!(iov.data[..n].iter().all(|&b| b == 0xA5));
                    prop_assert_eq!(&iov.data[n..], &original[n..]);
                    written -= n;
                } else {
                    prop_assert_eq!(&iov.data[..], &original[..]);
                }
            }
        }
    }
}
