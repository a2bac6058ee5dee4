//! Lazy scanning of the top-level chunks in a PNG byte stream.

use crate::error::{DomainError, DomainResult};

/// Eight-byte signature that opens every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// One top-level chunk: a four-byte ASCII tag and its payload, borrowed from
/// the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub tag: [u8; 4],
    pub payload: &'a [u8],
}

/// Single-pass iterator over the chunks of a PNG buffer, in file order.
///
/// Each step reads a 4-byte big-endian payload length and the 4-byte tag,
/// borrows the payload, and skips the trailing CRC without verifying it.
/// A declared length overrunning the buffer yields
/// [`DomainError::TruncatedChunk`] and ends the iteration.
pub struct ChunkScanner<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> ChunkScanner<'a> {
    /// Fails with [`DomainError::NotAPng`] unless `buf` opens with the PNG
    /// signature.
    pub fn new(buf: &'a [u8]) -> DomainResult<Self> {
        let rest = buf
            .strip_prefix(&PNG_SIGNATURE)
            .ok_or(DomainError::NotAPng)?;
        Ok(Self {
            rest,
            failed: false,
        })
    }

    fn read_chunk(&mut self) -> DomainResult<Chunk<'a>> {
        let remaining = self.rest.len();
        let truncated = |needed: usize| DomainError::TruncatedChunk {
            needed,
            remaining,
        };

        let (length_bytes, after_length) = self
            .rest
            .split_first_chunk::<4>()
            .ok_or_else(|| truncated(8))?;
        let (tag, after_tag) = after_length
            .split_first_chunk::<4>()
            .ok_or_else(|| truncated(8))?;

        let length = u32::from_be_bytes(*length_bytes) as usize;
        let (payload, after_payload) = after_tag
            .split_at_checked(length)
            .ok_or_else(|| truncated(length + 12))?;
        // trailing CRC, skipped unverified
        let (_crc, rest) = after_payload
            .split_at_checked(4)
            .ok_or_else(|| truncated(length + 12))?;

        self.rest = rest;
        Ok(Chunk { tag: *tag, payload })
    }
}

impl<'a> Iterator for ChunkScanner<'a> {
    type Item = DomainResult<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }

        let result = self.read_chunk();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk_bytes(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(payload.len() + 12);
        bytes.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_be_bytes());
        bytes.extend_from_slice(tag);
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(&[0, 0, 0, 0]); // CRC, never checked
        bytes
    }

    fn png_with_chunks(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        for (tag, payload) in chunks {
            bytes.extend_from_slice(&chunk_bytes(tag, payload));
        }
        bytes
    }

    #[test]
    fn yields_chunks_in_file_order() {
        let buf = png_with_chunks(&[
            (b"IHDR", &[1, 2, 3]),
            (b"PLTE", &[9, 9, 9]),
            (b"IEND", &[]),
        ]);

        let tags: Vec<[u8; 4]> = ChunkScanner::new(&buf)
            .unwrap()
            .map(|chunk| chunk.unwrap().tag)
            .collect();
        assert_eq!(tags, vec![*b"IHDR", *b"PLTE", *b"IEND"]);
    }

    #[test]
    fn borrows_payload_and_skips_crc() {
        let buf = png_with_chunks(&[(b"PLTE", &[255, 0, 0]), (b"IEND", &[])]);

        let mut scanner = ChunkScanner::new(&buf).unwrap();
        let first = scanner.next().unwrap().unwrap();
        assert_eq!(first.tag, *b"PLTE");
        assert_eq!(first.payload, &[255, 0, 0]);
    }

    #[test]
    fn rejects_bad_signature() {
        let buf = b"JFIF!!!!rest-of-the-file";
        assert!(matches!(
            ChunkScanner::new(buf),
            Err(DomainError::NotAPng)
        ));
    }

    #[test]
    fn rejects_signature_shorter_than_eight_bytes() {
        assert!(matches!(
            ChunkScanner::new(&PNG_SIGNATURE[..7]),
            Err(DomainError::NotAPng)
        ));
    }

    #[test]
    fn overlong_declared_length_is_a_truncation() {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend_from_slice(&1000u32.to_be_bytes());
        buf.extend_from_slice(b"PLTE");
        buf.extend_from_slice(&[0; 10]); // far fewer than 1000 + CRC

        let mut scanner = ChunkScanner::new(&buf).unwrap();
        assert!(matches!(
            scanner.next(),
            Some(Err(DomainError::TruncatedChunk { .. }))
        ));
        // a failed scan does not resume
        assert!(scanner.next().is_none());
    }

    #[test]
    fn partial_trailing_header_is_a_truncation() {
        let mut buf = png_with_chunks(&[(b"IHDR", &[0; 4])]);
        buf.extend_from_slice(&[0, 0]); // two stray bytes

        let results: Vec<_> = ChunkScanner::new(&buf).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results.first().unwrap().is_ok());
        assert!(matches!(
            results.last(),
            Some(Err(DomainError::TruncatedChunk { .. }))
        ));
    }

    #[test]
    fn empty_body_yields_no_chunks() {
        let mut scanner = ChunkScanner::new(&PNG_SIGNATURE).unwrap();
        assert!(scanner.next().is_none());
    }
}
