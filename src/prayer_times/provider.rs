use anyhow::Result;
use chrono::NaiveDate;

use crate::config::{AppConfig, ProviderKind};
use crate::models::{Location, Schedule};
use crate::prayer_times::aladhan::AladhanClient;
use crate::prayer_times::calculator::PrayerCalculator;

/// Produces the day's schedule for a location.
pub trait ScheduleProvider {
    fn name(&self) -> &'static str;
    fn fetch(&self, location: &Location, date: NaiveDate) -> Result<Schedule>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Provider(&'static str),
    Fallback,
}

impl ScheduleSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ScheduleSource::Fallback)
    }
}

/// Fetch from `provider`, substituting `fallback` on any failure.
pub fn fetch_or_fallback(
    provider: &dyn ScheduleProvider,
    location: &Location,
    date: NaiveDate,
    fallback: &Schedule,
) -> (Schedule, ScheduleSource) {
    match provider.fetch(location, date) {
        Ok(schedule) => {
            log::debug!("Fetched {} schedule for {} via {}", date, location.city, provider.name());
            (schedule, ScheduleSource::Provider(provider.name()))
        }
        Err(e) => {
            log::warn!("Error fetching prayer times from {}: {:#}", provider.name(), e);
            (fallback.clone(), ScheduleSource::Fallback)
        }
    }
}

pub fn from_config(config: &AppConfig) -> Result<Box<dyn ScheduleProvider>> {
    let pt = &config.prayer_times;
    Ok(match pt.provider {
        ProviderKind::Aladhan => Box::new(AladhanClient::new(
            &pt.base_url,
            pt.method,
            pt.school,
            pt.timeout_secs,
        )?),
        ProviderKind::Offline => Box::new(PrayerCalculator::new(
            &pt.calc_method,
            &pt.madhab,
            pt.timezone_offset,
        )?),
    })
}

/// Resolve today's schedule the way every screen and command does.
pub fn load_schedule(config: &AppConfig, date: NaiveDate) -> Result<(Schedule, ScheduleSource)> {
    let fallback = config.fallback.schedule()?;
    let location = config.location.to_location();
    let provider = from_config(config)?;
    Ok(fetch_or_fallback(provider.as_ref(), &location, date, &fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct Unreachable;

    impl ScheduleProvider for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }
        fn fetch(&self, _: &Location, _: NaiveDate) -> Result<Schedule> {
            Err(anyhow!("connection refused"))
        }
    }

    struct Fixed(Schedule);

    impl ScheduleProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn fetch(&self, _: &Location, _: NaiveDate) -> Result<Schedule> {
            Ok(self.0.clone())
        }
    }

    fn makkah() -> Location {
        AppConfig::default().location.to_location()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn failure_substitutes_fallback() {
        let fallback = AppConfig::default().fallback.schedule().unwrap();
        let (schedule, source) = fetch_or_fallback(&Unreachable, &makkah(), today(), &fallback);
        assert_eq!(schedule, fallback);
        assert!(source.is_fallback());
        assert_eq!(schedule.entries()[0].display_time(), "05:30");
        assert_eq!(schedule.entries()[4].display_time(), "19:45");
    }

    #[test]
    fn success_keeps_provider_schedule() {
        let fetched = Schedule::from_hhmm(["04:59", "12:01", "15:20", "17:50", "19:10"]).unwrap();
        let fallback = AppConfig::default().fallback.schedule().unwrap();
        let (schedule, source) =
            fetch_or_fallback(&Fixed(fetched.clone()), &makkah(), today(), &fallback);
        assert_eq!(schedule, fetched);
        assert_eq!(source, ScheduleSource::Provider("fixed"));
    }

    #[test]
    fn offline_provider_comes_from_config() {
        let mut config = AppConfig::default();
        config.prayer_times.provider = ProviderKind::Offline;
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "offline");
    }
}
