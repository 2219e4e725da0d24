pub mod aladhan;
pub mod calculator;
pub mod evaluator;
pub mod provider;

pub use evaluator::{current_index, NextPrayer};
pub use provider::{load_schedule, ScheduleSource};
