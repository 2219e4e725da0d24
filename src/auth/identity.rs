use anyhow::Result;
use rusqlite::Connection;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

use crate::auth::validation::{validate_login, validate_signup, SignupForm, ValidationError};
use crate::db::repository::{MetaRepo, StoredUser, UserRepo};
use crate::models::User;

const SESSION_KEY: &str = "session_user";

#[cfg(not(test))]
const PBKDF2_ROUNDS: u32 = 100_000;
#[cfg(test)]
const PBKDF2_ROUNDS: u32 = 1_000;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("No user is signed in")]
    NotSignedIn,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    UserChanged(Option<User>),
}

/// Sign-in state plus current-user-changed notifications.
pub trait IdentityProvider {
    fn current_user(&self) -> Result<Option<User>>;
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError>;
    fn sign_up(&mut self, form: &SignupForm) -> Result<User, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
    fn subscribe(&mut self) -> Receiver<SessionEvent>;
}

/// PBKDF2-HMAC-SHA256 of `password`, hex encoded.
fn hash_password(salt: &str, password: &str) -> String {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut key);
    hex::encode(key)
}

/// Accounts and session kept in the local SQLite database.
pub struct LocalIdentity<'a> {
    conn: &'a Connection,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl<'a> LocalIdentity<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            subscribers: Vec::new(),
        }
    }

    fn notify(&mut self, user: Option<User>) {
        self.subscribers
            .retain(|tx| tx.send(SessionEvent::UserChanged(user.clone())).is_ok());
    }

    fn start_session(&mut self, user: &User) -> Result<(), AuthError> {
        MetaRepo::set(self.conn, SESSION_KEY, &user.id)?;
        log::info!("Signed in as {}", user.email);
        self.notify(Some(user.clone()));
        Ok(())
    }
}

impl IdentityProvider for LocalIdentity<'_> {
    fn current_user(&self) -> Result<Option<User>> {
        match MetaRepo::get(self.conn, SESSION_KEY)? {
            Some(id) => UserRepo::find_by_id(self.conn, &id),
            None => Ok(None),
        }
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_login(email, password)?;

        let stored = UserRepo::find_by_email(self.conn, email)?
            .ok_or(AuthError::InvalidCredentials)?;
        if hash_password(&stored.password_salt, password) != stored.password_hash {
            log::debug!("Password mismatch for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(&stored.user)?;
        Ok(stored.user)
    }

    fn sign_up(&mut self, form: &SignupForm) -> Result<User, AuthError> {
        validate_signup(form)?;

        if UserRepo::find_by_email(self.conn, &form.email)?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let phone = form.phone.trim();
        let stored = StoredUser {
            user: User {
                id: uuid::Uuid::new_v4().to_string(),
                email: form.email.clone(),
                first_name: form.first_name.clone(),
                last_name: form.last_name.clone(),
                phone: (!phone.is_empty()).then(|| phone.to_string()),
            },
            password_hash: hash_password(&salt, &form.password),
            password_salt: salt,
        };
        UserRepo::insert(self.conn, &stored)?;
        log::info!("Created account {}", stored.user.email);

        self.start_session(&stored.user)?;
        Ok(stored.user)
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        if MetaRepo::get(self.conn, SESSION_KEY)?.is_none() {
            return Err(AuthError::NotSignedIn);
        }
        MetaRepo::delete(self.conn, SESSION_KEY)?;
        log::info!("Signed out");
        self.notify(None);
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn form() -> SignupForm {
        SignupForm {
            first_name: "Khadija".into(),
            last_name: "Khuwaylid".into(),
            email: "khadija@example.com".into(),
            phone: "  ".into(),
            password: "trader1".into(),
            confirm_password: "trader1".into(),
        }
    }

    #[test]
    fn sign_up_starts_a_session_and_notifies() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        let rx = identity.subscribe();

        let user = identity.sign_up(&form()).unwrap();
        assert_eq!(user.phone, None);
        assert_eq!(identity.current_user().unwrap(), Some(user.clone()));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::UserChanged(Some(user)));
    }

    #[test]
    fn sign_in_checks_password() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        identity.sign_up(&form()).unwrap();
        identity.sign_out().unwrap();

        assert!(matches!(
            identity.sign_in("khadija@example.com", "wrong-pass"),
            Err(AuthError::InvalidCredentials)
        ));
        let user = identity.sign_in("khadija@example.com", "trader1").unwrap();
        assert_eq!(user.first_name, "Khadija");
    }

    #[test]
    fn validation_runs_before_lookup() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        assert!(matches!(
            identity.sign_in("not-an-email", "whatever"),
            Err(AuthError::Invalid(ValidationError::InvalidEmail))
        ));
    }

    #[test]
    fn duplicate_sign_up_is_rejected() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        identity.sign_up(&form()).unwrap();
        assert!(matches!(identity.sign_up(&form()), Err(AuthError::EmailTaken)));
    }

    #[test]
    fn sign_out_without_session_fails_with_message() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        let err = identity.sign_out().unwrap_err();
        assert_eq!(err.to_string(), "No user is signed in");
    }

    #[test]
    fn sign_out_notifies_with_none() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        identity.sign_up(&form()).unwrap();
        let rx = identity.subscribe();
        identity.sign_out().unwrap();
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::UserChanged(None));
        assert_eq!(identity.current_user().unwrap(), None);
    }

    #[test]
    fn password_hash_is_salted_and_stretched() {
        use sha2::Digest;

        let hash = hash_password("salt-a", "trader1");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_password("salt-a", "trader1"));
        assert_ne!(hash, hash_password("salt-b", "trader1"));

        let single_pass = hex::encode(Sha256::digest(b"salt-a:trader1"));
        assert_ne!(hash, single_pass);
    }

    #[test]
    fn stored_hash_is_not_the_password() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        identity.sign_up(&form()).unwrap();
        let stored = UserRepo::find_by_email(&conn, "khadija@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.password_hash,
            hash_password(&stored.password_salt, "trader1")
        );
        assert!(!stored.password_hash.contains("trader1"));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let conn = conn();
        let mut identity = LocalIdentity::new(&conn);
        drop(identity.subscribe());
        identity.sign_up(&form()).unwrap();
        assert!(identity.subscribers.is_empty());
    }
}
