use crossterm::event::{KeyCode, KeyEvent};

use crate::auth::SignupForm;

#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl TextField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::new(label)
        }
    }

    /// Text as rendered; secret fields are masked unless revealed.
    pub fn display(&self, reveal: bool) -> String {
        if self.secret && !reveal {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<TextField>,
    pub focus: usize,
    pub reveal: bool,
}

impl Form {
    pub fn login() -> Self {
        Self {
            fields: vec![TextField::new("📧 Email Address"), TextField::secret("🔒 Password")],
            focus: 0,
            reveal: false,
        }
    }

    pub fn signup() -> Self {
        Self {
            fields: vec![
                TextField::new("📝 First Name *"),
                TextField::new("📝 Last Name *"),
                TextField::new("📧 Email Address *"),
                TextField::new("📱 Phone Number"),
                TextField::secret("🔒 Password *"),
                TextField::secret("🔒 Confirm Password *"),
            ],
            focus: 0,
            reveal: false,
        }
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn clear(&mut self) {
        for f in &mut self.fields {
            f.value.clear();
        }
        self.focus = 0;
        self.reveal = false;
    }

    pub fn to_signup(&self) -> SignupForm {
        SignupForm {
            first_name: self.value(0).trim().to_string(),
            last_name: self.value(1).trim().to_string(),
            email: self.value(2).trim().to_string(),
            phone: self.value(3).trim().to_string(),
            password: self.value(4).to_string(),
            confirm_password: self.value(5).to_string(),
        }
    }

    fn is_last(&self) -> bool {
        self.focus + 1 >= self.fields.len()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => {
                if self.is_last() {
                    return FormAction::Submit;
                }
                self.focus += 1;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            }
            KeyCode::F(3) => {
                self.reveal = !self.reveal;
            }
            KeyCode::Backspace => {
                if let Some(f) = self.fields.get_mut(self.focus) {
                    f.value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(f) = self.fields.get_mut(self.focus) {
                    f.value.push(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }
}
