/// Stable per-crew color: the top three bytes of the name's CRC32.
pub fn crew_color(name: &str) -> (u8, u8, u8) {
    let hash = crc32fast::hash(name.as_bytes());
    let bytes = hash.to_be_bytes();
    (bytes[0], bytes[1], bytes[2])
}

/// Crew color pulled into a saturation/lightness band that stays readable on
/// both light and dark card backgrounds. Hue is preserved.
pub fn crew_accent(name: &str) -> (u8, u8, u8) {
    let (r, g, b) = crew_color(name);
    let (h, s, l) = rgb_to_hsl(r, g, b);
    hsl_to_rgb(h, s.clamp(0.45, 0.75), l.clamp(0.40, 0.55))
}

/// Hue in degrees (0..360), saturation and lightness in 0..1.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let [r, g, b] = [r, g, b].map(|c| c as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;
    let l = (max + min) / 2.0;
    if chroma < f64::EPSILON {
        return (0.0, 0.0, l);
    }

    let s = chroma / (1.0 - (2.0 * l - 1.0).abs());
    let sector = if max == r {
        ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };
    (sector * 60.0, s, l)
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}
