//! Balance display in Korean units (만 = 10^4, 억 = 10^8).

const MAN: u64 = 10_000;
const EOK: u64 = 100_000_000;

/// Group digits in threes: `1234567` -> `"1,234,567"`.
pub fn with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a coin amount, e.g. `150000` -> `"15만 코인"`,
/// `123456789` -> `"1억 2345만 코인"`. Fractions are dropped and negative
/// amounts render as zero.
pub fn format_korean_currency(amount: f64) -> String {
    let n = if amount.is_finite() && amount > 0.0 {
        amount.trunc() as u64
    } else {
        0
    };

    let mut parts: Vec<String> = Vec::with_capacity(3);
    if n >= EOK {
        parts.push(format!("{}억", n / EOK));
        let man = (n % EOK) / MAN;
        if man > 0 {
            parts.push(format!("{man}만"));
        }
    } else if n >= MAN {
        parts.push(format!("{}만", n / MAN));
        let rest = n % MAN;
        if rest > 0 {
            parts.push(with_separators(rest));
        }
    } else {
        parts.push(with_separators(n));
    }
    parts.push("코인".to_string());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        assert_eq!(with_separators(0), "0");
        assert_eq!(with_separators(999), "999");
        assert_eq!(with_separators(1000), "1,000");
        assert_eq!(with_separators(1234567), "1,234,567");
    }

    #[test]
    fn man_boundary() {
        assert_eq!(format_korean_currency(9_999.0), "9,999 코인");
        assert_eq!(format_korean_currency(10_000.0), "1만 코인");
        assert_eq!(format_korean_currency(150_000.0), "15만 코인");
        assert_eq!(format_korean_currency(152_345.0), "15만 2,345 코인");
    }

    #[test]
    fn eok_boundary() {
        assert_eq!(format_korean_currency(100_000_000.0), "1억 코인");
        assert_eq!(format_korean_currency(123_456_789.0), "1억 2345만 코인");
    }

    #[test]
    fn odd_inputs() {
        assert_eq!(format_korean_currency(0.0), "0 코인");
        assert_eq!(format_korean_currency(-5.0), "0 코인");
        assert_eq!(format_korean_currency(12.9), "12 코인");
        assert_eq!(format_korean_currency(f64::NAN), "0 코인");
    }
}
