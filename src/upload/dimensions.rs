//! Image dimension extraction
//!
//! Hand-parses just enough of each accepted format's header to read the
//! natural width and height. Truncated or malformed headers yield `None`;
//! the validator treats that as a failed check, never a crash.

/// Natural pixel dimensions of an image payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageDimensions {
    /// Width divided by height
    ///
    /// Degenerate dimensions produce a non-finite or NaN ratio, which falls
    /// outside any accepted range check.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Read the dimensions for a payload declared as `mime_type`
pub fn parse_dimensions(mime_type: &str, bytes: &[u8]) -> Option<ImageDimensions> {
    match mime_type.to_ascii_lowercase().as_str() {
        "image/png" => parse_png(bytes),
        "image/jpeg" => parse_jpeg(bytes),
        "image/gif" => parse_gif(bytes),
        "image/webp" => parse_webp(bytes),
        _ => None,
    }
}

/// PNG: eight byte signature, then the IHDR chunk with big-endian sides
fn parse_png(bytes: &[u8]) -> Option<ImageDimensions> {
    const SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    if bytes.len() < 24 || !bytes.starts_with(SIGNATURE) || &bytes[12..16] != b"IHDR" {
        return None;
    }
    Some(ImageDimensions {
        width: u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]),
        height: u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
    })
}

/// JPEG: walk the segment chain to the first frame header
fn parse_jpeg(bytes: &[u8]) -> Option<ImageDimensions> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut i = 2;
    while i + 4 <= bytes.len() {
        if bytes[i] != 0xFF {
            return None;
        }
        let marker = bytes[i + 1];
        // fill bytes and standalone markers carry no length field
        if marker == 0xFF {
            i += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            i += 2;
            continue;
        }
        let length = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if length < 2 {
            return None;
        }
        let is_frame_header = (0xC0..=0xCF).contains(&marker)
            && marker != 0xC4
            && marker != 0xC8
            && marker != 0xCC;
        if is_frame_header {
            if i + 9 > bytes.len() {
                return None;
            }
            return Some(ImageDimensions {
                width: u32::from(u16::from_be_bytes([bytes[i + 7], bytes[i + 8]])),
                height: u32::from(u16::from_be_bytes([bytes[i + 5], bytes[i + 6]])),
            });
        }
        i += 2 + length;
    }
    None
}

/// GIF: six byte version tag, then the little-endian logical screen size
fn parse_gif(bytes: &[u8]) -> Option<ImageDimensions> {
    if bytes.len() < 10 || !(bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")) {
        return None;
    }
    Some(ImageDimensions {
        width: u32::from(u16::from_le_bytes([bytes[6], bytes[7]])),
        height: u32::from(u16::from_le_bytes([bytes[8], bytes[9]])),
    })
}

/// WebP: RIFF container holding a VP8, VP8L, or VP8X first chunk
fn parse_webp(bytes: &[u8]) -> Option<ImageDimensions> {
    if bytes.len() < 30 || !bytes.starts_with(b"RIFF") || &bytes[8..12] != b"WEBP" {
        return None;
    }
    match &bytes[12..16] {
        // lossy: keyframe start code, then 14-bit sides
        b"VP8 " => {
            if bytes[23] != 0x9D || bytes[24] != 0x01 || bytes[25] != 0x2A {
                return None;
            }
            Some(ImageDimensions {
                width: u32::from(u16::from_le_bytes([bytes[26], bytes[27]]) & 0x3FFF),
                height: u32::from(u16::from_le_bytes([bytes[28], bytes[29]]) & 0x3FFF),
            })
        }
        // lossless: signature byte, then 14-bit minus-one sides
        b"VP8L" => {
            if bytes[20] != 0x2F {
                return None;
            }
            let b = [bytes[21], bytes[22], bytes[23], bytes[24]];
            let width = 1 + ((u32::from(b[1]) & 0x3F) << 8 | u32::from(b[0]));
            let height = 1
                + ((u32::from(b[3]) & 0x0F) << 10
                    | u32::from(b[2]) << 2
                    | (u32::from(b[1]) & 0xC0) >> 6);
            Some(ImageDimensions { width, height })
        }
        // extended: 24-bit minus-one canvas sides
        b"VP8X" => Some(ImageDimensions {
            width: 1 + u32::from_le_bytes([bytes[24], bytes[25], bytes[26], 0]),
            height: 1 + u32::from_le_bytes([bytes[27], bytes[28], bytes[29], 0]),
        }),
        _ => None,
    }
}
