//! Radiometric value to display temperature
//!
//! Radiometric samples are Kelvin scaled by 100 (high resolution) or by 10.
//! All arithmetic is integer; the result is rounded half away from zero.

/// 0 °C in centikelvin
const ZERO_CELSIUS_CK: i32 = 27_315;

/// Divide rounding half away from zero
fn round_div(n: i32, d: i32) -> i32 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}

/// Convert a raw radiometric value to whole degrees
pub fn display_temperature(raw: u16, high_res: bool, celsius: bool) -> i32 {
    let centikelvin = if high_res {
        raw as i32
    } else {
        raw as i32 * 10
    };
    let centicelsius = centikelvin - ZERO_CELSIUS_CK;

    if celsius {
        round_div(centicelsius, 100)
    } else {
        // F = C * 9/5 + 32, computed on 500x F to round once
        round_div(centicelsius * 9 + 16_000, 500)
    }
}
