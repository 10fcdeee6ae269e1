// =============================================================================
// Shared types used across the ticker dashboard
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder shown for company fields the data source did not provide.
pub const UNKNOWN: &str = "Unknown";

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Descriptive company metadata as returned by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default = "unknown")]
    pub sector: String,
    #[serde(default = "unknown")]
    pub industry: String,
    /// Market capitalisation in dollars; 0 when unknown.
    #[serde(default)]
    pub market_cap: f64,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: unknown(),
            sector: unknown(),
            industry: unknown(),
            market_cap: 0.0,
        }
    }
}

impl CompanyInfo {
    /// Market cap in billions, e.g. `3,120.45B $`.
    pub fn market_cap_display(&self) -> String {
        format!("{}B $", format_thousands(self.market_cap / 1_000_000_000.0, 2))
    }
}

/// Format `value` with `decimals` fraction digits and `,` thousands separators.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0.0, 2), "0.00");
        assert_eq!(format_thousands(999.6, 0), "1,000");
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(-4321.0, 2), "-4,321.00");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn market_cap_in_billions() {
        let info = CompanyInfo {
            market_cap: 3_120_450_000_000.0,
            ..CompanyInfo::default()
        };
        assert_eq!(info.market_cap_display(), "3,120.45B $");
        assert_eq!(CompanyInfo::default().market_cap_display(), "0.00B $");
    }

    #[test]
    fn missing_company_fields_default_to_unknown() {
        let info: CompanyInfo = serde_json::from_str(r#"{ "name": "Microsoft" }"#).unwrap();
        assert_eq!(info.name, "Microsoft");
        assert_eq!(info.sector, UNKNOWN);
        assert_eq!(info.industry, UNKNOWN);
        assert_eq!(info.market_cap, 0.0);
    }
}
