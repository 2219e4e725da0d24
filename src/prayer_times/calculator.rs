use anyhow::{anyhow, Result};
use chrono::{FixedOffset, NaiveDate};
use salah::prelude::*;

use crate::models::{Location, PrayerName, PrayerTime, Schedule};
use crate::prayer_times::provider::ScheduleProvider;

/// Offline provider: astronomical calculation, no network.
pub struct PrayerCalculator {
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl PrayerCalculator {
    pub fn new(method: &str, madhab: &str, tz_offset_minutes: i32) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        FixedOffset::east_opt(tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", tz_offset_minutes))?;
        Ok(Self {
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }
}

impl ScheduleProvider for PrayerCalculator {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn fetch(&self, location: &Location, date: NaiveDate) -> Result<Schedule> {
        let coords = Coordinates::new(location.latitude, location.longitude);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        let to_local = |name: PrayerName, prayer: Prayer| {
            PrayerTime::new(name, times.time(prayer).with_timezone(&offset).time())
        };

        let entries = vec![
            to_local(PrayerName::Fajr, Prayer::Fajr),
            to_local(PrayerName::Dhuhr, Prayer::Dhuhr),
            to_local(PrayerName::Asr, Prayer::Asr),
            to_local(PrayerName::Maghrib, Prayer::Maghrib),
            to_local(PrayerName::Isha, Prayer::Isha),
        ];
        Ok(Schedule::new(entries)?)
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}
