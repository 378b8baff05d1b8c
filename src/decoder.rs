//! Decoding of the `attributedBody` rich-text column.
//!
//! Messages stores outgoing bodies as an `NSAttributedString` archived with
//! the legacy typedstream format. The plain string lives in the first
//! `NSString` object: a `+` type tag followed by a typedstream integer length
//! and the UTF-8 bytes.

/// Extracts plain text from a rich-text-encoded message body.
pub trait BodyDecoder {
    /// Returns `None` when the blob does not contain a recognizable string.
    fn decode(&self, blob: &[u8]) -> Option<String>;
}

/// Typedstream reader for `NSAttributedString` archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypedStreamDecoder;

const STREAM_SIGNATURE: &[u8] = b"streamtyped";
const STRING_CLASS: &[u8] = b"NSString";
/// New-type tag, one-character type encoding, `+` (C string of bytes)
const STRING_TYPE_TAG: &[u8] = &[0x84, 0x01, b'+'];
/// How far past the class name the type tag may appear
const TAG_SEARCH_WINDOW: usize = 32;

const INT16_FOLLOWS: u8 = 0x81;
const INT32_FOLLOWS: u8 = 0x82;

impl BodyDecoder for TypedStreamDecoder {
    fn decode(&self, blob: &[u8]) -> Option<String> {
        if find_subsequence(blob, STREAM_SIGNATURE).is_none() {
            return None;
        }

        let class_pos = find_subsequence(blob, STRING_CLASS)?;
        let after_class = &blob[class_pos + STRING_CLASS.len()..];

        let window = &after_class[..after_class.len().min(TAG_SEARCH_WINDOW)];
        let tag_pos = find_subsequence(window, STRING_TYPE_TAG)?;
        let after_tag = &after_class[tag_pos + STRING_TYPE_TAG.len()..];

        let (len, header) = read_length(after_tag)?;
        let bytes = after_tag.get(header..header.checked_add(len)?)?;

        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Read a typedstream integer used as a byte count.
///
/// Returns the value and the number of bytes consumed.
fn read_length(data: &[u8]) -> Option<(usize, usize)> {
    match *data.first()? {
        INT16_FOLLOWS => {
            let raw = data.get(1..3)?;
            Some((u16::from_le_bytes([raw[0], raw[1]]) as usize, 3))
        }
        INT32_FOLLOWS => {
            let raw = data.get(1..5)?;
            let len = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
            Some((usize::try_from(len).ok()?, 5))
        }
        b if b < 0x80 => Some((b as usize, 1)),
        _ => None,
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
