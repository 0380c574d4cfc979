use clap::Parser;

use crate::rate_limit::{DEFAULT_QUOTA, DEFAULT_WINDOW_SECS};

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "boxe-survey")]
#[command(about = "Survey and feedback service for Boxe Portugal")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Public URL of the site, used to build invitation links
    #[arg(long, env = "NEXTAUTH_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    // Rate limit max registrations per email per window
    #[arg(long, default_value_t = DEFAULT_QUOTA)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = DEFAULT_WINDOW_SECS)]
    pub rate_window: u64,

    // SMTP relay used for invitations
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    // Sender account; without it invitations are only logged
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    // OAuth userinfo endpoint used to resolve bearer tokens
    #[arg(
        long,
        env = "USERINFO_URL",
        default_value = "https://openidconnect.googleapis.com/v1/userinfo"
    )]
    pub userinfo_url: String,

    // Comma-separated admin emails
    #[arg(long, env = "ADMIN_EMAILS", default_value = "admin@boxeportugal.pt")]
    pub admin_emails: String,

    // Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    pub log_json: bool,
}

impl Args {
    pub fn admin_list(&self) -> Vec<String> {
        self.admin_emails
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    // Both halves of the SMTP credentials, or nothing
    pub fn smtp_credentials(&self) -> Option<(String, String)> {
        match (&self.email_user, &self.email_password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user.clone(), pass.clone()))
            }
            _ => None,
        }
    }
}
