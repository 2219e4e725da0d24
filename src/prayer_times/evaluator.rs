use chrono::{Duration, NaiveTime, Timelike};
use thiserror::Error;

use crate::models::{PrayerName, PrayerTime};

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidScheduleError {
    #[error("Schedule has no entries")]
    Empty,

    #[error("Schedule must have 5 entries, got {0}")]
    WrongLength(usize),

    #[error("Expected {expected} but found {found}")]
    OutOfOrder {
        expected: PrayerName,
        found: PrayerName,
    },

    #[error("{later} ({later_time}) is not after {earlier} ({earlier_time})")]
    NotIncreasing {
        earlier: PrayerName,
        earlier_time: NaiveTime,
        later: PrayerName,
        later_time: NaiveTime,
    },
}

/// The upcoming prayer and how long until it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextPrayer {
    pub index: usize,
    pub remaining: Duration,
    /// True when every prayer today has passed and `index` refers to tomorrow.
    pub wraps: bool,
}

pub fn check_increasing(entries: &[PrayerTime]) -> Result<(), InvalidScheduleError> {
    if entries.is_empty() {
        return Err(InvalidScheduleError::Empty);
    }
    for pair in entries.windows(2) {
        if pair[1].minutes() <= pair[0].minutes() {
            return Err(InvalidScheduleError::NotIncreasing {
                earlier: pair[0].name,
                earlier_time: pair[0].time,
                later: pair[1].name,
                later_time: pair[1].time,
            });
        }
    }
    Ok(())
}

/// Returns the next prayer strictly after `now` (minute resolution).
///
/// A prayer whose minute equals `now` has already started and is skipped.
/// After the last entry the result wraps to the first entry of the next day.
pub fn next_prayer(
    entries: &[PrayerTime],
    now: NaiveTime,
) -> Result<NextPrayer, InvalidScheduleError> {
    check_increasing(entries)?;

    let t = now.hour() * 60 + now.minute();

    if let Some((index, entry)) = entries.iter().enumerate().find(|(_, e)| t < e.minutes()) {
        return Ok(NextPrayer {
            index,
            remaining: Duration::minutes((entry.minutes() - t) as i64),
            wraps: false,
        });
    }

    let first = entries[0].minutes() + MINUTES_PER_DAY;
    Ok(NextPrayer {
        index: 0,
        remaining: Duration::minutes((first - t) as i64),
        wraps: true,
    })
}

/// Index of the entry highlighted as current on the prayer-times screen.
pub fn current_index(entries: &[PrayerTime], now: NaiveTime) -> Result<usize, InvalidScheduleError> {
    next_prayer(entries, now).map(|next| next.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schedule;

    fn schedule() -> Schedule {
        Schedule::from_hhmm(["05:30", "12:15", "15:45", "18:20", "19:45"]).unwrap()
    }

    fn at(hhmm: &str) -> NaiveTime {
        NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap()
    }

    #[test]
    fn afternoon_points_at_asr() {
        let next = next_prayer(schedule().entries(), at("13:00")).unwrap();
        assert_eq!(next.index, 2);
        assert_eq!(next.remaining, Duration::hours(2) + Duration::minutes(45));
        assert!(!next.wraps);
    }

    #[test]
    fn exact_prayer_minute_counts_as_passed() {
        let next = next_prayer(schedule().entries(), at("12:15")).unwrap();
        assert_eq!(next.index, 2);
        assert_eq!(next.remaining, Duration::minutes(15 * 60 + 45 - (12 * 60 + 15)));
    }

    #[test]
    fn seconds_are_ignored() {
        let now = NaiveTime::from_hms_opt(12, 14, 59).unwrap();
        let next = next_prayer(schedule().entries(), now).unwrap();
        assert_eq!(next.index, 1);
        assert_eq!(next.remaining, Duration::minutes(1));
    }

    #[test]
    fn after_isha_wraps_to_fajr_tomorrow() {
        let next = next_prayer(schedule().entries(), at("20:00")).unwrap();
        assert_eq!(next.index, 0);
        assert_eq!(next.remaining, Duration::hours(9) + Duration::minutes(30));
        assert!(next.wraps);
    }

    #[test]
    fn at_isha_wraps_as_well() {
        let next = next_prayer(schedule().entries(), at("19:45")).unwrap();
        assert_eq!(next.index, 0);
        assert!(next.wraps);
    }

    #[test]
    fn before_fajr_does_not_wrap() {
        let next = next_prayer(schedule().entries(), at("00:00")).unwrap();
        assert_eq!(next.index, 0);
        assert_eq!(next.remaining, Duration::minutes(330));
        assert!(!next.wraps);
    }

    #[test]
    fn repeated_calls_agree() {
        let s = schedule();
        let now = at("16:01");
        assert_eq!(
            next_prayer(s.entries(), now).unwrap(),
            next_prayer(s.entries(), now).unwrap()
        );
        assert_eq!(s.next_prayer(now), s.next_prayer(now));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(next_prayer(&[], at("10:00")), Err(InvalidScheduleError::Empty));
    }

    #[test]
    fn single_entry_schedule_is_accepted() {
        let only = [PrayerTime::new(PrayerName::Fajr, at("05:30"))];
        let next = next_prayer(&only, at("06:00")).unwrap();
        assert_eq!(next.index, 0);
        assert_eq!(next.remaining, Duration::minutes(1440 - 30));
    }

    #[test]
    fn equal_times_are_not_increasing() {
        let entries = [
            PrayerTime::new(PrayerName::Fajr, at("05:30")),
            PrayerTime::new(PrayerName::Dhuhr, at("05:30")),
        ];
        assert!(matches!(
            next_prayer(&entries, at("04:00")),
            Err(InvalidScheduleError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn current_index_matches_next_prayer() {
        assert_eq!(current_index(schedule().entries(), at("18:19")).unwrap(), 3);
        assert_eq!(current_index(schedule().entries(), at("23:59")).unwrap(), 0);
    }
}
