//! `%g`-style number rendering for the printed summaries.

const GENERAL_PRECISION: usize = 6;

/// Render `value` the way C's `%g` (and Python's `{:g}`) does with the
/// default precision of six significant digits.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to the target precision can bump the exponent (999999.5 -> 1e+06),
    // so the exponent is read back from the rounded scientific form.
    let scientific = format!("{:.*e}", GENERAL_PRECISION - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent = exponent.parse::<i32>().unwrap_or(0);

    if (-4..GENERAL_PRECISION as i32).contains(&exponent) {
        let decimals = (GENERAL_PRECISION as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

/// `format_general` right-aligned to `width` columns (`{:13g}`).
pub fn format_general_width(value: f64, width: usize) -> String {
    format!("{:>width$}", format_general(value), width = width)
}

fn trim_fraction(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
