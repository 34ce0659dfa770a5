//! Hex colour conversion
//!
//! Colours are written as `0xRRGGBB` integers in configuration and converted
//! to normalized `[f32; 3]` triples for the GPU.

/// Convert `0xRRGGBB` to normalized RGB
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Convert `0xRRGGBB` plus an alpha value to normalized RGBA
pub fn hex_to_rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let [r, g, b] = hex_to_rgb(hex);
    [r, g, b, alpha]
}

/// Parse a colour string in `#rrggbb` or `0xrrggbb` form.
///
/// Returns `None` for anything that is not six hex digits after the prefix.
pub fn parse_hex_str(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
