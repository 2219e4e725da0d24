pub mod identity;
pub mod validation;

pub use identity::{IdentityProvider, LocalIdentity, SessionEvent};
pub use validation::SignupForm;
