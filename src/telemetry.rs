use sha2::{Digest, Sha256};
use tracing_subscriber::EnvFilter;

// Set up the global subscriber; RUST_LOG overrides the default level
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// Short stable tag for an email so logs can correlate without storing it
pub fn email_fingerprint(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_case_insensitive() {
        assert_eq!(
            email_fingerprint("Atleta@Boxe.pt"),
            email_fingerprint(" atleta@boxe.pt")
        );
        assert_eq!(email_fingerprint("a@b.com").len(), 12);
    }

    #[test]
    fn test_fingerprint_hides_address() {
        let tag = email_fingerprint("segredo@boxe.pt");
        assert!(!tag.contains("segredo"));
        assert_ne!(tag, email_fingerprint("outro@boxe.pt"));
    }
}
