//! Fallback raw-word decoding.
//!
//! Message types without a structured schema carry their content as an array
//! of text tokens, one per 30-bit RTCM2 word, each of the exact form
//! `U\t0x<8 hex digits>\n`.

use crate::error::{Result, Rtcm2Error};
use crate::types::RTCM2_WORDS_MAX;
use byteorder::{BigEndian, ByteOrder};

/// Width of an RTCM2 word in bits.
pub const WORD_BITS: u32 = 30;
/// Mask retaining the low-order `WORD_BITS` of a decoded value.
pub const WORD_MASK: u32 = (1 << WORD_BITS) - 1;

const TOKEN_LEN: usize = 13;
const HEX_DIGITS: std::ops::Range<usize> = 4..12;

/// Decodes one token into a 30-bit word, or `None` if it is malformed.
pub fn decode_word(token: &str) -> Option<u32> {
    let bytes = token.as_bytes();
    if bytes.len() != TOKEN_LEN
        || bytes[0] != b'U'
        || bytes[1] != b'\t'
        || &bytes[2..4] != b"0x"
        || bytes[TOKEN_LEN - 1] != b'\n'
    {
        return None;
    }

    let mut raw = [0u8; 4];
    hex::decode_to_slice(&bytes[HEX_DIGITS], &mut raw).ok()?;
    Some(BigEndian::read_u32(&raw) & WORD_MASK)
}

/// Renders a word in the token form accepted by `decode_word`.
pub fn encode_word(word: u32) -> String {
    format!("U\t0x{}\n", hex::encode((word & WORD_MASK).to_be_bytes()))
}

/// Decodes up to `RTCM2_WORDS_MAX` tokens into a word array.
///
/// Slots past the last token are zero. A single malformed token fails the
/// whole message.
pub fn decode_words(tokens: &[String]) -> Result<[u32; RTCM2_WORDS_MAX]> {
    if tokens.len() > RTCM2_WORDS_MAX {
        return Err(Rtcm2Error::ArrayOverflow {
            field: "data",
            capacity: RTCM2_WORDS_MAX,
            found: tokens.len(),
        });
    }

    let mut words = [0u32; RTCM2_WORDS_MAX];
    for (index, (slot, token)) in words.iter_mut().zip(tokens).enumerate() {
        *slot = decode_word(token).ok_or_else(|| Rtcm2Error::MalformedRawWord {
            index,
            token: token.clone(),
        })?;
    }
    Ok(words)
}
