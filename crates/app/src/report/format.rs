/// `1234567` as `1,234,567`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn percent(rate: f64) -> String {
    format!("{:.2}%", rate)
}

/// Bar width in percent of its track.
pub fn bar_width(rate: f64) -> f64 {
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, 100.0)
}

/// Rate as text next to a proportional bar.
pub fn rate_bar(rate: f64) -> String {
    format!(
        r#"<div class="rate"><div class="bar"><span style="width: {:.2}%"></span></div><span class="rate-value">{}</span></div>"#,
        bar_width(rate),
        percent(rate)
    )
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_width(-3.0), 0.0);
        assert_eq!(bar_width(42.5), 42.5);
        assert_eq!(bar_width(250.0), 100.0);
        assert_eq!(bar_width(f64::NAN), 0.0);
        assert!(rate_bar(180.0).contains("width: 100.00%"));
        assert!(rate_bar(180.0).contains("180.00%"));
    }

    #[test]
    fn escape_html_replaces_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
