use chrono::{NaiveTime, Timelike};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::prayer_times::evaluator::{self, InvalidScheduleError, NextPrayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    /// Key used by the timings API and by `[fallback]` in config.toml.
    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn arabic(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "الفجر",
            PrayerName::Dhuhr => "الظهر",
            PrayerName::Asr => "العصر",
            PrayerName::Maghrib => "المغرب",
            PrayerName::Isha => "العشاء",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "🌅",
            PrayerName::Dhuhr => "☀️",
            PrayerName::Asr => "🌤️",
            PrayerName::Maghrib => "🌅",
            PrayerName::Isha => "🌙",
        }
    }

    /// Accent colour as an RGB triple.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            PrayerName::Fajr => (0xFF, 0x6B, 0x6B),
            PrayerName::Dhuhr => (0x4E, 0xCD, 0xC4),
            PrayerName::Asr => (0x45, 0xB7, 0xD1),
            PrayerName::Maghrib => (0x96, 0xCE, 0xB4),
            PrayerName::Isha => (0xFF, 0xEA, 0xA7),
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerTime {
    pub name: PrayerName,
    pub time: NaiveTime,
}

impl PrayerTime {
    pub fn new(name: PrayerName, time: NaiveTime) -> Self {
        Self { name, time }
    }

    /// Parse an "HH:MM" wall-clock string.
    pub fn parse(name: PrayerName, hhmm: &str) -> anyhow::Result<Self> {
        let time = NaiveTime::parse_from_str(hhmm.trim(), "%H:%M")
            .map_err(|e| anyhow::anyhow!("Bad time '{}' for {}: {}", hhmm, name, e))?;
        Ok(Self { name, time })
    }

    pub fn minutes(&self) -> u32 {
        self.time.hour() * 60 + self.time.minute()
    }

    pub fn display_time(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

// Serialized as shown to the user: `{"name": "Fajr", "time": "05:30"}`.
impl Serialize for PrayerTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("PrayerTime", 2)?;
        row.serialize_field("name", self.name.display_name())?;
        row.serialize_field("time", &self.display_time())?;
        row.end()
    }
}

/// The five prayers of one calendar day, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    entries: Vec<PrayerTime>,
}

impl Schedule {
    pub fn new(entries: Vec<PrayerTime>) -> Result<Self, InvalidScheduleError> {
        if entries.len() != 5 {
            return Err(InvalidScheduleError::WrongLength(entries.len()));
        }
        for (entry, expected) in entries.iter().zip(PrayerName::all()) {
            if entry.name != expected {
                return Err(InvalidScheduleError::OutOfOrder {
                    expected,
                    found: entry.name,
                });
            }
        }
        evaluator::check_increasing(&entries)?;
        Ok(Self { entries })
    }

    /// Build from five "HH:MM" strings in canonical order.
    pub fn from_hhmm(times: [&str; 5]) -> anyhow::Result<Self> {
        let entries = PrayerName::all()
            .into_iter()
            .zip(times)
            .map(|(name, t)| PrayerTime::parse(name, t))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(entries)?)
    }

    pub fn entries(&self) -> &[PrayerTime] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PrayerTime> {
        self.entries.get(index)
    }

    pub fn next_prayer(&self, now: NaiveTime) -> NextPrayer {
        // Construction already guarantees a non-empty, increasing schedule.
        evaluator::next_prayer(&self.entries, now).unwrap_or(NextPrayer {
            index: 0,
            remaining: chrono::Duration::zero(),
            wraps: false,
        })
    }
}
