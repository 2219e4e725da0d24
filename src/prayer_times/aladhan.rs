use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::models::{Location, PrayerName, PrayerTime, Schedule};
use crate::prayer_times::provider::ScheduleProvider;

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    code: u16,
    #[serde(default)]
    status: Option<String>,
    // A string on errors, an object on success.
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: HashMap<String, String>,
}

/// Client for the public Aladhan prayer-times API.
pub struct AladhanClient {
    client: reqwest::blocking::Client,
    base_url: String,
    method: u8,
    school: u8,
}

impl AladhanClient {
    pub fn new(base_url: &str, method: u8, school: u8, timeout_secs: u64) -> Result<Self> {
        if timeout_secs == 0 {
            bail!("prayer_times.timeout_secs must be at least 1");
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("miqat/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            method,
            school,
        })
    }

    pub fn timings_url(&self, date: NaiveDate) -> String {
        format!("{}/v1/timings/{}", self.base_url, date.format("%d-%m-%Y"))
    }
}

impl ScheduleProvider for AladhanClient {
    fn name(&self) -> &'static str {
        "aladhan"
    }

    fn fetch(&self, location: &Location, date: NaiveDate) -> Result<Schedule> {
        let url = self.timings_url(date);
        log::debug!("GET {} ({}, {})", url, location.latitude, location.longitude);

        let body = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("method", self.method.to_string()),
                ("school", self.school.to_string()),
            ])
            .send()
            .with_context(|| format!("Requesting {}", url))?
            .text()
            .context("Reading timings response")?;

        parse_timings(&body)
    }
}

/// Parse a `/v1/timings` body into a validated schedule.
pub fn parse_timings(body: &str) -> Result<Schedule> {
    let response: TimingsResponse =
        serde_json::from_str(body).context("Decoding timings response")?;

    if response.code != 200 {
        bail!(
            "Timings API returned code {} ({})",
            response.code,
            response.status.as_deref().unwrap_or("no status")
        );
    }

    let data: TimingsData =
        serde_json::from_value(response.data).context("Timings response has no data.timings")?;

    // Keys are matched by prayer name, so "Zuhr" or "dhuhr" count as Dhuhr.
    // Sunrise, Sunset, Midnight and the like are ignored.
    let mut by_name: HashMap<PrayerName, &str> = HashMap::new();
    for (key, raw) in &data.timings {
        if let Ok(name) = key.parse::<PrayerName>() {
            by_name.insert(name, raw.as_str());
        }
    }

    let entries = PrayerName::all()
        .into_iter()
        .map(|name| {
            let raw = by_name
                .get(&name)
                .ok_or_else(|| anyhow!("Timings response is missing {}", name))?;
            // Some formats append the zone, e.g. "05:12 (AST)".
            let hhmm = raw.split_whitespace().next().unwrap_or_default();
            PrayerTime::parse(name, hhmm)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Schedule::new(entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:12",
                "Sunrise": "06:30",
                "Dhuhr": "12:24",
                "Asr": "16:41",
                "Sunset": "18:17",
                "Maghrib": "18:17",
                "Isha": "19:47",
                "Imsak": "05:02",
                "Midnight": "00:24"
            }
        }
    }"#;

    #[test]
    fn parses_five_prayers_and_ignores_the_rest() {
        let schedule = parse_timings(OK_BODY).unwrap();
        let shown: Vec<String> = schedule.entries().iter().map(|p| p.display_time()).collect();
        assert_eq!(shown, ["05:12", "12:24", "16:41", "18:17", "19:47"]);
    }

    #[test]
    fn non_200_code_is_an_error() {
        let body = r#"{"code": 400, "status": "BAD_REQUEST", "data": "Invalid date"}"#;
        let err = parse_timings(body).unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn zone_suffix_is_tolerated() {
        let body = OK_BODY.replace("\"05:12\"", "\"05:12 (AST)\"");
        let schedule = parse_timings(&body).unwrap();
        assert_eq!(schedule.entries()[0].display_time(), "05:12");
    }

    #[test]
    fn missing_prayer_is_an_error() {
        let body = OK_BODY.replace("\"Asr\"", "\"Asr2\"");
        assert!(parse_timings(&body).is_err());
    }

    #[test]
    fn out_of_order_timings_are_an_error() {
        let body = OK_BODY.replace("\"16:41\"", "\"11:58\"");
        let err = parse_timings(&body).unwrap_err();
        assert!(err.to_string().contains("Asr"), "{err}");
    }

    #[test]
    fn alias_keys_are_accepted() {
        let body = OK_BODY.replace("\"Dhuhr\"", "\"Zuhr\"");
        let schedule = parse_timings(&body).unwrap();
        assert_eq!(schedule.entries()[1].name, PrayerName::Dhuhr);
        assert_eq!(schedule.entries()[1].display_time(), "12:24");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_timings("<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn url_uses_day_month_year() {
        let client = AladhanClient::new("http://api.aladhan.com/", 2, 1, 10).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            client.timings_url(date),
            "http://api.aladhan.com/v1/timings/07-03-2025"
        );
    }
}
