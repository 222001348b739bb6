//! Amount text parsing
//!
//! Sheet amounts arrive as text such as `"1,234,000"`, `""` or `"  "`.
//! Parsing never fails: anything without a leading integer reads as zero.

/// Parse an amount cell into whole currency units
///
/// Thousands separators and whitespace are stripped first. An optional sign
/// is honoured, then the leading run of digits is read and anything after it
/// (decimals, a currency suffix) is ignored. Empty, non-numeric or
/// overflowing text yields 0.
pub fn parse_amount(text: &str) -> i64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let (negative, rest) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);

    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_are_zero() {
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("   "), 0);
        assert_eq!(parse_amount("\t\n"), 0);
    }

    #[test]
    fn test_non_numeric_is_zero() {
        assert_eq!(parse_amount("abc"), 0);
        assert_eq!(parse_amount("-"), 0);
        assert_eq!(parse_amount(".5"), 0);
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(parse_amount("0"), 0);
        assert_eq!(parse_amount("1,234"), 1234);
        assert_eq!(parse_amount("12,345,678"), 12_345_678);
        assert_eq!(parse_amount(" 1, 000 "), 1000);
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        assert_eq!(parse_amount("1,500원"), 1500);
        assert_eq!(parse_amount("12.9"), 12);
    }

    #[test]
    fn test_sign_is_preserved() {
        assert_eq!(parse_amount("-2,500"), -2500);
        assert_eq!(parse_amount("+300"), 300);
    }

    #[test]
    fn test_overflow_is_zero() {
        assert_eq!(parse_amount("99999999999999999999999"), 0);
    }
}
