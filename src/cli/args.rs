use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "miqat", version, author, about = "A terminal counter and prayer-times companion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times and countdown to next prayer
    Times {
        /// Print machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create an account and sign in (password is prompted)
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign in (password is prompted)
    Login {
        /// Account email
        email: String,
    },
    /// Sign out of the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Read or change the signed-in user's counter
    Counter {
        #[command(subcommand)]
        action: CounterCommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum CounterCommands {
    /// Print the current value
    Show,
    /// Add one
    Inc,
    /// Subtract one
    Dec,
    /// Set back to zero
    Reset,
}
