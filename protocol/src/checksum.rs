//! File content checksums.
//!
//! The server computes file digests with the POSIX `cksum` algorithm:
//! CRC-32/CKSUM (polynomial 0x04c11db7, no reflection, final complement)
//! fed with the content and then with the content length, least significant
//! byte first, dropping trailing zero bytes. [`crc32`] reproduces that value
//! bit-for-bit; the reconciliation loop never converges otherwise.
//!
//! The computation consumes a byte sequence, never typed integers, so the
//! result is identical on every host architecture.

use crc::Crc;

const CKSUM: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_CKSUM);

/// Checksum of `content`, identical to `cksum(1)` over the same bytes.
pub fn crc32(content: &[u8]) -> u32 {
    let mut digest = CKSUM.digest();
    digest.update(content);

    let mut len = content.len() as u64;
    while len > 0 {
        digest.update(&[(len & 0xff) as u8]);
        len >>= 8;
    }
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_cksum_reference_vector() {
        // `printf '%s' 123456789 | cksum` -> 930766865
        assert_eq!(crc32(b"123456789"), 930_766_865);
    }

    #[test]
    fn empty_input_matches_cksum() {
        // `cksum < /dev/null` -> 4294967295
        assert_eq!(crc32(b""), 4_294_967_295);
    }

    #[test]
    fn deterministic_across_calls() {
        let content = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(crc32(content), crc32(content));
    }

    #[test]
    fn sensitive_to_single_bit_flips() {
        let mut content = vec![0x55u8; 4096];
        let before = crc32(&content);
        content[2048] ^= 0x01;
        assert_ne!(before, crc32(&content));
    }

    #[test]
    fn length_postfix_distinguishes_zero_padded_inputs() {
        // same bytes, different lengths of trailing zeros
        assert_ne!(crc32(&[0u8; 16]), crc32(&[0u8; 17]));
    }
}
