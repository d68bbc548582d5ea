//! Unit conversion and display formatting.
//!
//! Balances on chain are expressed in **octas**, the smallest APT unit
//! (1 APT = 10⁸ octas). Everything the dashboard shows goes through the
//! helpers in this module so the terminal views and the tests agree on a
//! single textual representation.

/// Number of octas in one APT.
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Placeholder shown when no price is known for a symbol.
pub const MISSING_PRICE: &str = "---";

/// Convert an APT amount to octas, rounding down.
///
/// Negative and NaN amounts convert to `0`.
///
/// # Examples
///
/// ```
/// use tradeapt_models::apt_to_octas;
///
/// assert_eq!(apt_to_octas(1.5), 150_000_000);
/// assert_eq!(apt_to_octas(-2.0), 0);
/// ```
pub fn apt_to_octas(apt: f64) -> u64 {
    // float -> int casts saturate and map NaN to zero
    (apt * OCTAS_PER_APT as f64).floor() as u64
}

/// Convert octas to APT.
pub fn octas_to_apt(octas: u64) -> f64 {
    octas as f64 / OCTAS_PER_APT as f64
}

/// Shorten an address for display: `0x` plus `chars` leading characters,
/// an ellipsis, then the last `chars` characters.
///
/// # Examples
///
/// ```
/// use tradeapt_models::format_address;
///
/// assert_eq!(format_address("0x1234567890abcdef", 4), "0x1234...cdef");
/// assert_eq!(format_address("", 4), "");
/// ```
pub fn format_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return String::new();
    }
    let all: Vec<char> = address.chars().collect();
    let head: String = all.iter().take(chars + 2).collect();
    let tail: String = all[all.len().saturating_sub(chars)..].iter().collect();
    format!("{head}...{tail}")
}

/// Render a USD amount the way the assistant echoes it back (`$20`, `$20.5`).
pub fn format_usd(amount: f64) -> String {
    format!("${amount}")
}

/// Render a price with a precision that depends on its magnitude.
///
/// | Range            | Example        |
/// |------------------|----------------|
/// | unknown          | `---`          |
/// | `< 0.01`         | `$0.001234`    |
/// | `< 1`            | `$0.5123`      |
/// | `< 1000`         | `$8.42`        |
/// | `>= 1000`        | `$65,432.1`    |
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price else {
        return MISSING_PRICE.to_string();
    };
    if price < 0.01 {
        format!("${price:.6}")
    } else if price < 1.0 {
        format!("${price:.4}")
    } else if price < 1000.0 {
        format!("${price:.2}")
    } else {
        format!("${}", group_thousands(price))
    }
}

/// Render a 24h change percentage with an explicit sign, e.g. `(+1.23%)`.
pub fn format_change(change_24h: f64) -> String {
    let sign = if change_24h >= 0.0 { "+" } else { "" };
    format!("({sign}{change_24h:.2}%)")
}

/// Thousands-grouped rendering with at most two fraction digits and no
/// trailing zeros.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}
