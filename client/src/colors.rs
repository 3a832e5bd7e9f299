/// Format RGBA as a CSS color string.
pub fn rgba_css(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({r},{g},{b},{a})")
}

/// Parse `#rrggbb` (case-insensitive).
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// A `#rrggbb` color with alpha applied; unparseable input is returned as-is.
pub fn hex_with_alpha(hex: &str, alpha: f64) -> String {
    match parse_hex(hex) {
        Some((r, g, b)) => rgba_css(r, g, b, alpha),
        None => hex.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marker_colors() {
        assert_eq!(parse_hex("#0066CC"), Some((0, 102, 204)));
        assert_eq!(parse_hex("#003d99"), Some((0, 61, 153)));
    }

    #[test]
    fn rejects_short_or_bare_hex() {
        assert_eq!(parse_hex("#06C"), None);
        assert_eq!(parse_hex("0066CC"), None);
        assert_eq!(parse_hex("#00zz00"), None);
    }

    #[test]
    fn applies_alpha() {
        assert_eq!(hex_with_alpha("#00AA66", 0.9), "rgba(0,170,102,0.9)");
        assert_eq!(hex_with_alpha("teal", 0.5), "teal");
    }
}
