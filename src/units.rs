//! Unit conversions and fixed-precision number rendering shared by the
//! analysis and presentation layers.

/// Milliseconds in one hour
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Milliseconds in one minute
pub const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

pub fn millis_to_hours(millis: f64) -> f64 {
    millis / MILLIS_PER_HOUR
}

pub fn millis_to_minutes(millis: f64) -> f64 {
    millis / MILLIS_PER_MINUTE
}

pub fn kilojoules_to_kcal(kilojoules: f64) -> f64 {
    kilojoules / KJ_PER_KCAL
}

/// Scale, round to the nearest integer with ties toward +inf, scale back.
///
/// Used for stored averages, where the scaled product is what gets rounded.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / factor
}

/// Render `value` with exactly `decimals` fractional digits.
///
/// Rounds the exact decimal value of the double, so `12.45` (stored as
/// 12.4499...) renders as `12.4`. Only exact ties differ from `{:.N}`: they
/// round away from zero, so `2.5` renders as `3` and `0.25` as `0.3`.
pub fn to_fixed(value: f64, decimals: u32) -> String {
    // no "-0.0" for negative zero
    let value = if value == 0.0 { 0.0 } else { value };
    let digits = decimals as usize;

    if is_exact_tie(value, decimals) {
        let wide = format!("{:.*}", digits + 1, value);
        let mut truncated = wide[..wide.len() - 1].to_string();
        if truncated.ends_with('.') {
            truncated.pop();
        }
        return increment_last_digit(&truncated);
    }

    format!("{:.*}", digits, value)
}

/// `to_fixed` parsed back into a number, for series that store rounded values
pub fn fixed_value(value: f64, decimals: u32) -> f64 {
    to_fixed(value, decimals).parse().unwrap_or(value)
}

/// True when `value` lies exactly halfway between two `decimals`-place numbers.
///
/// A tie needs `value * 2^(decimals + 1)` to be an integer, and then the
/// decimal expansion ends within `decimals + 1` places, so the wide
/// formatting below is exact.
fn is_exact_tie(value: f64, decimals: u32) -> bool {
    let scaled = value * 2f64.powi(decimals as i32 + 1);
    if !scaled.is_finite() || scaled.fract() != 0.0 {
        return false;
    }
    format!("{:.*}", decimals as usize + 1, value).ends_with('5')
}

/// Add one unit in the last place of a decimal string, carrying as needed
fn increment_last_digit(number: &str) -> String {
    let mut chars: Vec<char> = number.chars().collect();
    let mut carry = true;

    for c in chars.iter_mut().rev() {
        if !carry {
            break;
        }
        match *c {
            '9' => *c = '0',
            '0'..='8' => {
                *c = (*c as u8 + 1) as char;
                carry = false;
            }
            _ => {}
        }
    }

    if carry {
        let at = usize::from(chars.first() == Some(&'-'));
        chars.insert(at, '1');
    }

    chars.into_iter().collect()
}
