// src/utils/price.rs

pub const SYP_SUFFIX: &str = "ل.س";

/// Whole-pound amount with comma thousands separators; non-finite values print as `0`
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_price_syp(value: f64) -> String {
    format!("{} {}", format_price(value), SYP_SUFFIX)
}
