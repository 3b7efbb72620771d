//! Fixed-width text encoding
//!
//! Each UTF-16 code unit of the message becomes exactly 8 bits, most
//! significant bit first. Units above 0xFF keep only their low byte, so only
//! Latin-1 text survives a round trip.

/// Bits per encoded code unit
pub const BITS_PER_CHAR: usize = 8;

/// Encode text as a bit sequence (8 bits per UTF-16 code unit)
pub fn encode(text: &str) -> Vec<bool> {
    let mut bits = Vec::with_capacity(text.len() * BITS_PER_CHAR);
    for unit in text.encode_utf16() {
        if unit > 0xFF {
            log::debug!("Code unit {unit:#06x} truncated to its low byte");
        }
        let byte = (unit & 0xFF) as u8;
        for shift in (0..BITS_PER_CHAR).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Decode a bit sequence back to text, one Latin-1 character per 8 bits.
///
/// A trailing group shorter than 8 bits is dropped.
pub fn decode(bits: &[bool]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(|group| {
            let byte = group.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8);
            char::from(byte)
        })
        .collect()
}

/// Render bits as a contiguous string of '0' and '1'
pub fn to_bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Render bits as space-separated 8-bit groups
pub fn format_binary(bits: &[bool]) -> String {
    bits.chunks(BITS_PER_CHAR)
        .map(to_bit_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hi_example() {
        let bits = encode("Hi");
        assert_eq!(bits.len(), 16);
        assert_eq!(to_bit_string(&bits), "0100100001101001");
        assert_eq!(format_binary(&bits), "01001000 01101001");
        assert_eq!(decode(&bits), "Hi");
    }

    #[test]
    fn test_empty() {
        assert!(encode("").is_empty());
        assert_eq!(decode(&[]), "");
        assert_eq!(format_binary(&[]), "");
    }

    #[test]
    fn test_partial_group_dropped() {
        let mut bits = encode("A");
        bits.extend([true, false, true]);
        assert_eq!(decode(&bits), "A");
    }

    #[test]
    fn test_latin1_upper_half() {
        let bits = encode("é");
        assert_eq!(to_bit_string(&bits), "11101001");
        assert_eq!(decode(&bits), "é");
    }

    #[test]
    fn test_wide_char_keeps_low_byte() {
        // U+0645 ARABIC LETTER MEEM -> 0x45 'E'
        let bits = encode("\u{0645}");
        assert_eq!(bits.len(), 8);
        assert_eq!(decode(&bits), "E");
    }

    proptest! {
        #[test]
        fn prop_latin1_round_trip(text in "[ -~\u{a0}-\u{ff}]{0,64}") {
            prop_assert_eq!(decode(&encode(&text)), text);
        }

        #[test]
        fn prop_length_is_eight_per_unit(text in "\\PC{0,32}") {
            prop_assert_eq!(encode(&text).len(), 8 * text.encode_utf16().count());
        }
    }
}
