//! Numeral parsing and display formatting.
//!
//! Operands live as strings in the engine, so every computation goes
//! string → `f64` → string. Display strings use the shortest digits that
//! round-trip, laid out in plain notation for "human sized" magnitudes and
//! exponent notation outside of them (`1e+21`, `1e-7`).

/// Significant digits kept when formatting a computed result.
pub const RESULT_PRECISION: usize = 10;

/// Parse the leading numeral of `text`.
///
/// Accepts an optional sign followed by digits with at most one point and
/// an optional exponent, or the literal `Infinity`. Trailing garbage is
/// ignored; text with no numeral prefix yields `NaN`.
pub fn parse(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(trimmed);
    if unsigned.starts_with("Infinity") {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let candidate = &trimmed[..end];

    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Enough fractional mantissa digits to print any finite `f64` exactly.
const EXACT_DIGITS: usize = 780;

/// Round `value` to `digits` significant decimal digits.
///
/// Ties round away from zero (`12345678905` → `1.234567891e10`), unlike
/// `{:.*e}` which rounds them to even.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 || digits == 0 {
        return value;
    }

    let exact = format!("{:.*e}", EXACT_DIGITS, value.abs());
    let Some((mantissa, exponent)) = exact.split_once('e') else {
        return value;
    };
    let Ok(mut exponent) = exponent.parse::<i32>() else {
        return value;
    };
    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    if all.len() <= digits {
        return value;
    }

    let mut kept = all[..digits].to_vec();
    if all[digits] >= b'5' {
        // Carry through trailing nines; 9.99..9 becomes 1.00..0 one decade up.
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, b'1');
                kept.pop();
                exponent += 1;
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let digits = String::from_utf8_lossy(&kept);
    let rounded: f64 = format!("0.{}e{}", digits, exponent + 1)
        .parse()
        .unwrap_or(value.abs());
    rounded.copysign(value)
}

/// Stringify a computed result: round to [`RESULT_PRECISION`] significant
/// digits, then print the shortest numeral for the rounded value.
pub fn format_result(value: f64) -> String {
    to_display(round_significant(value, RESULT_PRECISION))
}

/// Shortest round-trip string for `value`.
///
/// Negative zero prints as `0`; non-finite values print as `Infinity`,
/// `-Infinity` and `NaN`.
pub fn to_display(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "3.0000000000000004e-1".
    let sci = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if n - 1 < 0 { '-' } else { '+' });
        out.push_str(&(n - 1).abs().to_string());
    }
    out
}
