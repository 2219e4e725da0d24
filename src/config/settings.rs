use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Location, Schedule};

fn default_city() -> String {
    "Makkah".to_string()
}
fn default_country() -> String {
    "Saudi Arabia".to_string()
}
fn default_latitude() -> f64 {
    21.3891
}
fn default_longitude() -> f64 {
    39.8579
}
fn default_provider() -> ProviderKind {
    ProviderKind::Aladhan
}
fn default_base_url() -> String {
    "http://api.aladhan.com".to_string()
}
fn default_method() -> u8 {
    2
}
fn default_school() -> u8 {
    1
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_calc_method() -> String {
    "NorthAmerica".to_string()
}
fn default_madhab() -> String {
    "Hanafi".to_string()
}
fn default_timezone_offset() -> i32 {
    180
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_fajr() -> String {
    "05:30".to_string()
}
fn default_dhuhr() -> String {
    "12:15".to_string()
}
fn default_asr() -> String {
    "15:45".to_string()
}
fn default_maghrib() -> String {
    "18:20".to_string()
}
fn default_isha() -> String {
    "19:45".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: default_country(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl LocationConfig {
    pub fn to_location(&self) -> Location {
        Location {
            city: self.city.clone(),
            country: self.country.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Aladhan,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerTimesConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Aladhan calculation method id (2 = ISNA)
    #[serde(default = "default_method")]
    pub method: u8,
    /// Aladhan school id (0 = Shafi, 1 = Hanafi)
    #[serde(default = "default_school")]
    pub school: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    // Used by the offline provider only
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for PrayerTimesConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            method: default_method(),
            school: default_school(),
            timeout_secs: default_timeout_secs(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

/// Schedule substituted when the provider fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FallbackConfig {
    #[serde(default = "default_fajr")]
    pub fajr: String,
    #[serde(default = "default_dhuhr")]
    pub dhuhr: String,
    #[serde(default = "default_asr")]
    pub asr: String,
    #[serde(default = "default_maghrib")]
    pub maghrib: String,
    #[serde(default = "default_isha")]
    pub isha: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            fajr: default_fajr(),
            dhuhr: default_dhuhr(),
            asr: default_asr(),
            maghrib: default_maghrib(),
            isha: default_isha(),
        }
    }
}

impl FallbackConfig {
    pub fn schedule(&self) -> Result<Schedule> {
        Schedule::from_hhmm([
            &self.fajr,
            &self.dhuhr,
            &self.asr,
            &self.maghrib,
            &self.isha,
        ])
        .context("Invalid [fallback] schedule in config.toml")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub prayer_times: PrayerTimesConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "miqat").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("miqat.db"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("miqat.log"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        // Reject a broken fallback up front rather than at the first network failure.
        config.fallback.schedule()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
