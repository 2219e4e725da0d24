use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter email and password")]
    MissingCredentials,

    #[error("Please fill in all required fields")]
    MissingRequired,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Create-account form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// `local@domain.tld`: no whitespace, a single `@`, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_signup(form: &SignupForm) -> Result<(), ValidationError> {
    if form.first_name.is_empty()
        || form.last_name.is_empty()
        || form.email.is_empty()
        || form.password.is_empty()
    {
        return Err(ValidationError::MissingRequired);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignupForm {
        SignupForm {
            first_name: "Bilal".into(),
            last_name: "Rabah".into(),
            email: "bilal@example.org".into(),
            phone: String::new(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@co."));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b@c.de"));
    }

    #[test]
    fn login_checks_presence_before_shape() {
        assert_eq!(validate_login("", "x"), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_login("nope", "x"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_login("a@b.co", "12345"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_login("a@b.co", "123456"), Ok(()));
    }

    #[test]
    fn signup_reports_mismatch_before_email_shape() {
        let mut f = form();
        f.email = "broken".into();
        f.confirm_password = "other".into();
        assert_eq!(validate_signup(&f), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn signup_reports_short_password_before_email_shape() {
        let mut f = form();
        f.email = "broken".into();
        f.password = "abc".into();
        f.confirm_password = "abc".into();
        assert_eq!(validate_signup(&f), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn signup_phone_is_optional_but_names_are_not() {
        assert_eq!(validate_signup(&form()), Ok(()));
        let mut f = form();
        f.last_name.clear();
        assert_eq!(validate_signup(&f), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn messages_match_alert_text() {
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Password must be at least 6 characters long"
        );
    }
}
