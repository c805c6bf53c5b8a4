/// Parse a numeric cell. Surrounding whitespace is ignored; empty,
/// non-numeric and non-finite input (`NaN`, `inf`) is rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_numbers() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" 19.99 "), Some(19.99));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn rejects_malformed_cells() {
        for bad in ["", "   ", "abc", "1,000", "12$", "NaN", "inf", "-infinity"] {
            assert_eq!(parse_number(bad), None, "{bad:?} should not parse");
        }
    }
}
