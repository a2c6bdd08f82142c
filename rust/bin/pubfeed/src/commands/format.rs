//! One-shot formatting commands.
//!
//! `pubfeed ago 2024-02-15T14:30:00Z`, `pubfeed number 1234567`.

use anyhow::Result;

use pubfeed_format::{Catalog, format_number};

use crate::config::FeedConfig;

/// Print the relative label for one timestamp.
pub fn ago(timestamp: &str, now: Option<&str>, config: &FeedConfig, json: bool) -> Result<()> {
    println!("{}", render_ago(timestamp, now, config, json)?);
    Ok(())
}

/// Print a number with thousands separators.
pub fn number(n: i64, json: bool) -> Result<()> {
    println!("{}", render_number(n, json)?);
    Ok(())
}

fn render_ago(timestamp: &str, now: Option<&str>, config: &FeedConfig, json: bool) -> Result<String> {
    let now = super::resolve_now(now)?;
    let catalog = Catalog::new(&config.locale);
    let label = config.formatter()?.format_str(timestamp, now, &catalog)?;

    if !json {
        return Ok(label);
    }
    let out = serde_json::json!({
        "timestamp": timestamp,
        "now": now,
        "locale": config.locale,
        "label": label,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

fn render_number(n: i64, json: bool) -> Result<String> {
    let formatted = format_number(Some(n));
    if json {
        Ok(serde_json::json!({ "value": n, "formatted": formatted }).to_string())
    } else {
        Ok(formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2024-02-15T15:00:00Z";

    fn config(locale: &str) -> FeedConfig {
        FeedConfig {
            locale: locale.to_string(),
            ..FeedConfig::default()
        }
    }

    #[test]
    fn test_ago_table() {
        let out = render_ago("2024-02-15T14:30:00Z", Some(NOW), &config("en"), false).unwrap();
        assert_eq!(out, "30 mins ago");

        let out = render_ago("2023-02-15T15:00:00Z", Some(NOW), &config("en"), false).unwrap();
        assert_eq!(out, "15 Feb 2023");
    }

    #[test]
    fn test_ago_json() {
        let out = render_ago("2024-02-14T15:00:00Z", Some(NOW), &config("es"), true).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(v["timestamp"], "2024-02-14T15:00:00Z");
        assert_eq!(v["now"], "2024-02-15T15:00:00Z");
        assert_eq!(v["locale"], "es");
        assert_eq!(v["label"], "Ayer");
    }

    #[test]
    fn test_ago_uses_configured_offset() {
        // 23:30 UTC on the 14th is already the 15th at UTC+1.
        let config = FeedConfig {
            utc_offset_minutes: 60,
            ..FeedConfig::default()
        };
        let out = render_ago("2024-02-14T23:30:00Z", Some(NOW), &config, false).unwrap();
        assert_eq!(out, "15 hrs ago");
    }

    #[test]
    fn test_ago_invalid_timestamp() {
        let err = render_ago("yesterday", Some(NOW), &config("en"), false).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
        assert!(render_ago("2024-02-15T14:30:00Z", Some("soon"), &config("en"), false).is_err());
    }

    #[test]
    fn test_number_table() {
        assert_eq!(render_number(1234567, false).unwrap(), "1,234,567");
        assert_eq!(render_number(0, false).unwrap(), "0");
        assert_eq!(render_number(-1000, false).unwrap(), "-1,000");
    }

    #[test]
    fn test_number_json() {
        let v: serde_json::Value = serde_json::from_str(&render_number(1234567, true).unwrap()).unwrap();
        assert_eq!(v, serde_json::json!({ "value": 1234567, "formatted": "1,234,567" }));
    }
}
