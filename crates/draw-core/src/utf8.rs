//! Incremental UTF-8 decoding for the text engine.
//!
//! Decoding never fails hard: malformed input yields the replacement
//! sentinel plus a best-effort consumed length so the caller can keep
//! scanning. The only zero-consumption case is a byte that is not a valid
//! sequence start (or empty input); the caller must advance past it itself.

/// Replacement code point reported for any malformed sequence.
pub const INVALID: u32 = 0xFFFD;

const UTF_SIZ: usize = 4;

// Length-class tables indexed 0..=4: slot 0 matches continuation bytes,
// slots 1..=4 match lead bytes of that sequence length.
const UTF_BYTE: [u8; UTF_SIZ + 1] = [0x80, 0x00, 0xC0, 0xE0, 0xF0];
const UTF_MASK: [u8; UTF_SIZ + 1] = [0xC0, 0x80, 0xE0, 0xF0, 0xF8];
const UTF_MIN: [u32; UTF_SIZ + 1] = [0, 0, 0x80, 0x800, 0x10000];
const UTF_MAX: [u32; UTF_SIZ + 1] = [0x10FFFF, 0x7F, 0x7FF, 0xFFFF, 0x10FFFF];

/// Classify one byte: returns its payload bits and its length class
/// (0 = continuation, 1..=4 = lead byte, 5 = not UTF-8 at all).
fn decode_byte(b: u8) -> (u8, usize) {
    for class in 0..=UTF_SIZ {
        if b & UTF_MASK[class] == UTF_BYTE[class] {
            return (b & !UTF_MASK[class], class);
        }
    }
    (0, UTF_SIZ + 1)
}

/// Decode one code point from the front of `bytes`.
///
/// Returns `(codepoint, consumed)`. Malformed sequences return
/// [`INVALID`] with the count of bytes validated so far; a non-start byte
/// (and empty input) returns `(INVALID, 0)`. Overlong encodings and the
/// UTF-16 surrogate range [0xD800, 0xDFFF] decode to [`INVALID`] with the
/// full sequence consumed. Never allocates, never panics.
pub fn decode(bytes: &[u8]) -> (u32, usize) {
    if bytes.is_empty() {
        return (INVALID, 0);
    }

    let (first, len) = decode_byte(bytes[0]);
    if !(1..=UTF_SIZ).contains(&len) {
        return (INVALID, 0);
    }

    let mut cp = first as u32;
    let mut got = 1;
    while got < len && got < bytes.len() {
        let (bits, class) = decode_byte(bytes[got]);
        if class != 0 {
            // Broken mid-sequence: report what was validated.
            return (INVALID, got);
        }
        cp = (cp << 6) | bits as u32;
        got += 1;
    }
    if got < len {
        // Ran out of input before the sequence completed.
        return (INVALID, got);
    }

    if cp < UTF_MIN[len] || cp > UTF_MAX[len] || (0xD800..=0xDFFF).contains(&cp) {
        cp = INVALID;
    }
    (cp, len)
}

/// Canonical encoded length of a scalar value, 1..=4 bytes.
pub fn encoded_len(cp: u32) -> usize {
    let mut len = 1;
    while len < UTF_SIZ && cp > UTF_MAX[len] {
        len += 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_scalars() {
        let mut buf = [0u8; 4];
        for cp in 0..=0x10FFFFu32 {
            let Some(ch) = char::from_u32(cp) else {
                continue; // surrogates have no encoded form
            };
            let encoded = ch.encode_utf8(&mut buf).as_bytes();
            let (decoded, consumed) = decode(encoded);
            assert_eq!(decoded, cp, "U+{cp:04X}");
            assert_eq!(consumed, encoded.len(), "U+{cp:04X}");
            assert_eq!(encoded_len(cp), encoded.len(), "U+{cp:04X}");
        }
    }

    #[test]
    fn rejects_surrogates() {
        // 0xED 0xA0 0x80 is U+D800 in raw (CESU-style) form.
        let (cp, consumed) = decode(&[0xED, 0xA0, 0x80]);
        assert_eq!(cp, INVALID);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn rejects_overlong() {
        // 2-byte encoding of NUL.
        assert_eq!(decode(&[0xC0, 0x80]), (INVALID, 2));
        // 3-byte encoding of '/'.
        assert_eq!(decode(&[0xE0, 0x80, 0xAF]), (INVALID, 3));
    }

    #[test]
    fn truncated_sequences() {
        // Lead byte of a 3-byte sequence alone.
        assert_eq!(decode(&[0xE2]), (INVALID, 1));
        // Lead plus one of two continuation bytes.
        assert_eq!(decode(&[0xE2, 0x82]), (INVALID, 2));
        // Lead of a 4-byte sequence with two continuations.
        assert_eq!(decode(&[0xF0, 0x9F, 0x98]), (INVALID, 3));
    }

    #[test]
    fn broken_continuation() {
        // ASCII where a continuation byte belongs.
        assert_eq!(decode(&[0xE2, 0x41, 0x82]), (INVALID, 1));
        assert_eq!(decode(&[0xC3, 0xC3]), (INVALID, 1));
    }

    #[test]
    fn non_start_byte_consumes_nothing() {
        assert_eq!(decode(&[0x80]), (INVALID, 0));
        assert_eq!(decode(&[0xBF, 0x41]), (INVALID, 0));
        assert_eq!(decode(&[0xFF]), (INVALID, 0));
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode(&[]), (INVALID, 0));
    }

    #[test]
    fn decodes_prefix_of_longer_buffer() {
        let (cp, consumed) = decode("é rest".as_bytes());
        assert_eq!(cp, 0xE9);
        assert_eq!(consumed, 2);
    }
}
