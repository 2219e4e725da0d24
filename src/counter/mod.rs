pub mod store;

pub use store::{CounterStore, SqliteCounterStore};

use crate::models::User;

/// Number of accent colours the counter frame cycles through.
pub const ACCENT_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOp {
    Increment,
    Decrement,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStatus {
    Zero,
    Positive,
    Negative,
}

impl CounterStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CounterStatus::Zero => "Zero",
            CounterStatus::Positive => "Positive",
            CounterStatus::Negative => "Negative",
        }
    }
}

/// Local state applied before the store confirms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingWrite {
    pub value: i64,
    previous_value: i64,
    previous_accent: usize,
}

/// Displayed counter. Local state is authoritative; the store is a best-effort mirror.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: i64,
    accent: usize,
    user_id: Option<String>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn accent(&self) -> usize {
        self.accent
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn status(&self) -> CounterStatus {
        match self.value {
            0 => CounterStatus::Zero,
            v if v > 0 => CounterStatus::Positive,
            _ => CounterStatus::Negative,
        }
    }

    /// Follow a current-user change: load the user's value, or go local-only.
    pub fn attach(&mut self, user: Option<&User>, store: &dyn CounterStore) {
        self.accent = 0;
        self.value = 0;
        self.user_id = user.map(|u| u.id.clone());

        if let Some(id) = &self.user_id {
            match store.get(id) {
                Ok(value) => self.value = value,
                Err(e) => log::error!("Error reading counter for {}: {:#}", id, e),
            }
        }
    }

    fn begin(&mut self) -> (i64, usize) {
        (self.value, self.accent)
    }

    fn pending(&self, (previous_value, previous_accent): (i64, usize)) -> PendingWrite {
        PendingWrite {
            value: self.value,
            previous_value,
            previous_accent,
        }
    }

    pub fn increment(&mut self) -> PendingWrite {
        let before = self.begin();
        self.value += 1;
        self.accent = (self.accent + 1) % ACCENT_COUNT;
        self.pending(before)
    }

    pub fn decrement(&mut self) -> PendingWrite {
        let before = self.begin();
        self.value -= 1;
        self.pending(before)
    }

    pub fn reset(&mut self) -> PendingWrite {
        let before = self.begin();
        self.value = 0;
        self.accent = 0;
        self.pending(before)
    }

    pub fn rollback(&mut self, pending: PendingWrite) {
        self.value = pending.previous_value;
        self.accent = pending.previous_accent;
    }

    /// Mirror `pending` to the store; on failure restore the previous value.
    /// Returns false when a rollback happened.
    pub fn persist(&mut self, pending: PendingWrite, store: &dyn CounterStore) -> bool {
        let Some(id) = self.user_id.as_deref() else {
            return true;
        };
        match store.set(id, pending.value) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving counter for {}: {:#}", id, e);
                self.rollback(pending);
                false
            }
        }
    }

    pub fn apply(&mut self, op: CounterOp, store: &dyn CounterStore) -> bool {
        let pending = match op {
            CounterOp::Increment => self.increment(),
            CounterOp::Decrement => self.decrement(),
            CounterOp::Reset => self.reset(),
        };
        self.persist(pending, store)
    }
}
