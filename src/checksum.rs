//! Keyed checksum used to fingerprint transactions
//!
//! This is a position-dependent XOR fold, not a cryptographic digest. Two
//! distinct inputs can produce the same fingerprint. The exact bit layout is
//! part of the hashed-dump file format, so it must not change.

/// Number of characters in every fingerprint.
pub const CHECKSUM_LEN: usize = 20;

const HALF_LEN: usize = CHECKSUM_LEN / 2;

/// Computes the fingerprint of `(key, first, second)`.
///
/// Only the low 8 bits of `key` take part in the fold. `first` is folded
/// into the first half of the buffer, `second` into the second half. The
/// result is always `CHECKSUM_LEN` characters from `0-9a-f`.
pub fn keyed_checksum(key: u32, first: &str, second: &str) -> String {
    let key = key as u8;
    let mut buffer = [0u8; CHECKSUM_LEN];
    for (i, cell) in buffer.iter_mut().enumerate() {
        *cell = key ^ (CHECKSUM_LEN - i) as u8;
    }

    fold(&mut buffer, first.as_bytes(), |i| i % HALF_LEN);
    // The second half advances one cell every two iterations.
    fold(&mut buffer, second.as_bytes(), |i| HALF_LEN + (i % CHECKSUM_LEN) / 2);

    buffer.iter().map(|cell| nibble_to_char(cell & 0x0f)).collect()
}

fn fold(buffer: &mut [u8; CHECKSUM_LEN], input: &[u8], cell_index: impl Fn(usize) -> usize) {
    if input.is_empty() {
        return;
    }
    for i in 0..input.len() * CHECKSUM_LEN {
        buffer[cell_index(i)] ^= input[i % input.len()] ^ i as u8;
    }
}

fn nibble_to_char(nibble: u8) -> char {
    if nibble < 10 {
        (b'0' + nibble) as char
    } else {
        (b'a' + nibble - 10) as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fingerprints() {
        assert_eq!(keyed_checksum(10, "Alice", "Bob"), "43650f21cb123cdef89a");
        assert_eq!(keyed_checksum(5, "Bob", "Alice"), "bc12f0563437864ca333");
        assert_eq!(keyed_checksum(3, "A", "B"), "dafc96b8528ba5476103");
        assert_eq!(keyed_checksum(25, "Alice", "Carol"), "70563c12f80cfcdf149a");
    }

    #[test]
    fn test_empty_inputs_keep_seed() {
        assert_eq!(keyed_checksum(0, "", ""), "43210fedcba987654321");
    }

    #[test]
    fn test_only_low_key_byte_matters() {
        assert_eq!(keyed_checksum(300, "Alice", "Bob"), keyed_checksum(44, "Alice", "Bob"));
        assert_eq!(keyed_checksum(300, "Alice", "Bob"), "25036947ad745ab89efc");
    }

    #[test]
    fn test_output_shape() {
        let names = ["", "x", "Alice", "a much longer name with spaces", "Ünïcødé"];
        for key in [0u32, 1, 255, 256, u32::MAX] {
            for first in names {
                for second in names {
                    let fingerprint = keyed_checksum(key, first, second);
                    assert_eq!(fingerprint.len(), CHECKSUM_LEN);
                    assert!(fingerprint.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(keyed_checksum(7, "Carol", "Bob"), keyed_checksum(7, "Carol", "Bob"));
        assert_eq!(keyed_checksum(7, "Carol", "Bob"), "9eb8d2fc16cfe1032547");
    }
}
