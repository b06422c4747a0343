//! Hand-tuned color predicates over a single (r, g, b) pixel.
//!
//! All thresholds are exact contracts. Downstream ratio thresholds were
//! tuned against these boundaries, so even a one-unit change shifts alert
//! cadence observably.

/// Classic RGB skin-tone gate: warm, red-dominant, with enough channel
/// spread to reject gray surfaces.
pub fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20 && max - min > 15 && (r - g).abs() > 15 && r > g && r > b
}

/// Matches common mask fabrics: surgical blue, white, gray, black.
pub fn is_fabric_like(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let blue_dominant = b > r && b > g && b > 100;
    let near_white = r > 200 && g > 200 && b > 200;
    let near_gray = (r - g).abs() < 20 && (g - b).abs() < 20 && (r - b).abs() < 20;
    let near_black = r < 50 && g < 50 && b < 50;
    blue_dominant || near_white || near_gray || near_black
}

/// Matches the orange/red/yellow range of open flame.
pub fn is_fire_color(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let orange = r > 200 && g > 100 && g < 200 && b < 100;
    let red = r > 180 && g < 100 && b < 100;
    let yellow = r > 200 && g > 200 && b < 150;
    let bright_yellow = r > 220 && g > 220 && b < 100;
    let intense = r + g > 350 && b < 150 && r > g;
    orange || red || yellow || bright_yellow || intense
}

/// Matches low-saturation gray tones across three brightness bands.
pub fn is_smoke_color(r: u8, g: u8, b: u8) -> bool {
    let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
    let avg = (rf + gf + bf) / 3.0;
    let variation = (rf - avg).abs().max((gf - avg).abs()).max((bf - avg).abs());
    (avg > 80.0 && avg < 200.0 && variation < 30.0)
        || (r > 150 && g > 150 && b > 150 && variation < 25.0)
        || (avg > 60.0 && avg < 140.0 && variation < 20.0)
}
