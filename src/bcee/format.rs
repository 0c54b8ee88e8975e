use super::CurrencyInfo;

/// Round half away from zero to the currency's minor units and render
/// with its symbol and comma thousands separators, e.g. `-₦1,234.50`.
pub fn format_amount(amount: f64, info: &CurrencyInfo) -> String {
    let digits = info.minor_units as i32;
    let scale = 10f64.powi(digits);
    // f64::round already rounds half away from zero
    let scaled = (amount.abs() * scale).round();
    let negative = amount < 0.0 && scaled > 0.0;

    let whole = (scaled / scale).trunc() as u64;
    let frac = (scaled - whole as f64 * scale).round() as u64;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(info.symbol);
    out.push_str(&group_thousands(whole));
    if digits > 0 {
        out.push('.');
        out.push_str(&format!("{:0width$}", frac, width = digits as usize));
    }
    out
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
