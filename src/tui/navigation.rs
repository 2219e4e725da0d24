#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    CreateAccount,
    Landing,
    PrayerTimes,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::SignIn => "Sign In",
            Route::CreateAccount => "Create Account",
            Route::Landing => "Counter",
            Route::PrayerTimes => "Prayer Times",
        }
    }
}

/// Stack navigator: `navigate` pops back to a route already on the stack.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::SignIn)
    }

    pub fn navigate(&mut self, route: Route) {
        match self.stack.iter().position(|r| *r == route) {
            Some(idx) => self.stack.truncate(idx + 1),
            None => self.stack.push(route),
        }
        log::debug!("Navigate -> {:?} (depth {})", route, self.stack.len());
    }

    /// Returns false when already at the root.
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn reset_to(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
