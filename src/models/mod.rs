pub mod location;
pub mod prayer;
pub mod user;

pub use location::Location;
pub use prayer::{PrayerName, PrayerTime, Schedule};
pub use user::{User, UserDoc};
