use chrono::{DateTime, Utc};

/// `0` renders as "Gratis", everything else as dollars with two decimals.
pub fn price(amount: f64) -> String {
    if amount <= 0.0 {
        "Gratis".to_string()
    } else {
        money(amount)
    }
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn percent(value: f64) -> String {
    format!("{:.0}%", value.clamp(0.0, 100.0))
}

pub fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn prices_and_percentages() {
        assert_eq!(price(0.0), "Gratis");
        assert_eq!(price(19.5), "$19.50");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(percent(42.4), "42%");
        assert_eq!(percent(140.0), "100%");
    }

    #[test]
    fn dates_use_day_first() {
        let d = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(date(Some(d)), "09/03/2025");
        assert_eq!(date(None), "");
    }
}
