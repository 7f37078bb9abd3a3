//! Locale-agnostic parsing of marketplace price strings
//!
//! The price overview endpoint formats prices for the requested currency:
//! `$1.23`, `1,23€`, `£0.03`, `12,50 zł` and so on. Only digits and the
//! two separators carry information.

use thiserror::Error;

/// The price text held no number we could read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse price string {raw:?}")]
pub struct PriceParseError {
    pub raw: String,
}

/// Parse a formatted price into a decimal value.
///
/// # Arguments
/// * `raw` - Price text as shown on the market (e.g., "$1.23" or "1,23€")
///
/// # Returns
/// The price as f64, or an error if no number could be read.
///
/// Everything except ASCII digits, `.` and `,` is dropped. A lone `,` is read
/// as the decimal separator. Strings carrying both separators are passed
/// through unchanged and therefore fail to parse: `1.234,56` and `1,234.56`
/// cannot be told apart without knowing the currency's locale.
pub fn parse_price(raw: &str) -> Result<f64, PriceParseError> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned = cleaned.replace(',', ".");
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PriceParseError {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_price(raw: &str, expected: f64) {
        let value = parse_price(raw).unwrap();
        assert!(
            (value - expected).abs() < 1e-9,
            "{raw:?} parsed to {value}, expected {expected}"
        );
    }

    #[test]
    fn parses_dollar_prefix() {
        assert_price("$1.23", 1.23);
    }

    #[test]
    fn parses_comma_decimal_with_suffix() {
        assert_price("1,23€", 1.23);
    }

    #[test]
    fn parses_pound_and_spaces() {
        assert_price("£ 0.03", 0.03);
        assert_price("12,50 zł", 12.5);
    }

    #[test]
    fn parses_integer_prices() {
        assert_price("¥ 150", 150.0);
    }

    #[test]
    fn dual_separators_are_not_guessed() {
        assert!(parse_price("1.234,56").is_err());
        assert!(parse_price("$1,234.56").is_err());
    }

    #[test]
    fn no_digits_is_an_error() {
        let err = parse_price("--").unwrap_err();
        assert_eq!(err.raw, "--");
        assert!(parse_price("").is_err());
    }

    #[test]
    fn sign_is_dropped() {
        assert_price("-$2.00", 2.0);
    }
}
