//! Presentation formatting for generated documents

use chrono::NaiveDate;

/// Whole-shilling amount with thousands separators: `5000000.0` → `"5,000,000"`.
///
/// Rounding here is for display only; stored values keep full precision.
pub fn format_kes_amount(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Percentage without trailing zeros: `100.0` → `"100"`, `33.5` → `"33.5"`
pub fn format_percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }
    let fixed = format!("{:.2}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `12 March 2020`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// `birth – death`, with `?` standing in for a missing end.
/// Returns `None` when neither date is known.
pub fn format_date_range(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> Option<String> {
    if birth.is_none() && death.is_none() {
        return None;
    }
    let birth = birth.map(format_date).unwrap_or_else(|| "?".to_string());
    let death = death.map(format_date).unwrap_or_else(|| "?".to_string());
    Some(format!("{} \u{2013} {}", birth, death))
}

/// Replace everything outside `[A-Za-z0-9_-]` with `_`, one for one
pub fn sanitize_filename_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn will_filename(will_id: &str) -> String {
    format!("will_{}.pdf", sanitize_filename_component(will_id))
}

pub fn memorial_filename(subject_name: &str) -> String {
    format!("memorial_{}.pdf", sanitize_filename_component(subject_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kes_grouping() {
        assert_eq!(format_kes_amount(5_000_000.0), "5,000,000");
        assert_eq!(format_kes_amount(0.0), "0");
        assert_eq!(format_kes_amount(999.0), "999");
        assert_eq!(format_kes_amount(1000.0), "1,000");
        assert_eq!(format_kes_amount(123_456.0), "123,456");
        assert_eq!(format_kes_amount(1_234_567_890.0), "1,234,567,890");
    }

    #[test]
    fn test_kes_has_no_decimals() {
        assert_eq!(format_kes_amount(2_499.49), "2,499");
        assert_eq!(format_kes_amount(2_499.5), "2,500");
        assert_eq!(format_kes_amount(0.4), "0");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(100.0), "100");
        assert_eq!(format_percentage(33.5), "33.5");
        assert_eq!(format_percentage(12.25), "12.25");
        assert_eq!(format_percentage(0.0), "0");
    }

    #[test]
    fn test_date_range() {
        let birth = NaiveDate::from_ymd_opt(1940, 1, 5);
        let death = NaiveDate::from_ymd_opt(2020, 3, 12);

        assert_eq!(format_date_range(None, None), None);
        assert_eq!(
            format_date_range(None, death).as_deref(),
            Some("? \u{2013} 12 March 2020")
        );
        assert_eq!(
            format_date_range(birth, None).as_deref(),
            Some("5 January 1940 \u{2013} ?")
        );
        assert_eq!(
            format_date_range(birth, death).as_deref(),
            Some("5 January 1940 \u{2013} 12 March 2020")
        );
    }

    #[test]
    fn test_memorial_filename() {
        let name = memorial_filename("John O'Brien / Jr.");
        assert_eq!(name, "memorial_John_O_Brien___Jr_.pdf");
        assert!(!name.contains('/'));
        assert!(!name.contains(' '));
        assert!(!name.contains('\''));
        assert!(!name.contains('"'));
    }

    #[test]
    fn test_filename_strips_non_ascii_and_quotes() {
        assert_eq!(sanitize_filename_component("Zoë \"Z\""), "Zo___Z_");
        assert_eq!(will_filename("a1b2-c3"), "will_a1b2-c3.pdf");
        assert_eq!(will_filename("../etc"), "will____etc.pdf");
    }
}
