use reqwest::Url;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::auth::{Identity, IdentityProvider};
use crate::mailer::Mailer;
use crate::rate_limit::RateLimiter;
use crate::stats::StatsAggregator;

// app's shared state
pub struct AppState {
    pub rate_limiter: RateLimiter,
    pub stats: StatsAggregator,
    pub mailer: Arc<dyn Mailer>,
    pub identity: Arc<dyn IdentityProvider>,
    pub base_url: Url,              // where invitation links point
    pub admin_emails: Vec<String>,  // lower-cased
    pub next_submission_id: AtomicU64,
}

impl AppState {
    pub fn is_admin(&self, identity: &Identity) -> bool {
        identity
            .email
            .as_deref()
            .map(|email| self.admin_emails.contains(&email.to_lowercase()))
            .unwrap_or(false)
    }

    // Ids start at 1 and only grow for the life of the process
    pub fn submission_id(&self) -> u64 {
        self.next_submission_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}
