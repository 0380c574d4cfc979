use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use reqwest::Url;
use tracing::{info, warn};

use crate::error::AppError;
use crate::telemetry::email_fingerprint;

pub const INVITATION_SUBJECT: &str = "Participe da Pesquisa do Boxe Portugal";

// Port where SMTP speaks TLS from the first byte instead of STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

// Survey invitation ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    pub to: String,
    pub link: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl Invitation {
    pub fn new(base_url: &Url, email: &str) -> Self {
        let link = survey_link(base_url, email);

        let text_body = format!(
            "Olá!\n\nClique no link abaixo para acessar a pesquisa de avaliação:\n\n{}\n\nEquipe FP Boxe",
            link
        );
        let html_body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #3b82f6;">Pesquisa do Boxe Portugal</h2>
  <p>Olá!</p>
  <p>Clique no link abaixo para acessar a pesquisa de avaliação:</p>
  <p>
    <a href="{}" style="display: inline-block; background-color: #3b82f6; color: white; padding: 10px 20px; text-decoration: none; border-radius: 4px;">ACESSAR PESQUISA</a>
  </p>
  <p>Equipe FP Boxe</p>
</div>"#,
            link
        );

        Self {
            to: email.to_string(),
            link,
            subject: INVITATION_SUBJECT.to_string(),
            text_body,
            html_body,
        }
    }
}

// <base>/pesquisa?email=<encoded email>, keeping any path prefix of base
fn survey_link(base_url: &Url, email: &str) -> String {
    let mut url = base_url.clone();
    let path = format!("{}/pesquisa", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut().clear().append_pair("email", email);
    url.to_string()
}

/// Outbound delivery of invitations.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, invitation: &Invitation) -> Result<(), AppError>;
}

// Delivers through an authenticated SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, user: String, password: String) -> Result<Self, AppError> {
        let from: Mailbox = user
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid sender address: {}", e)))?;

        let relay = if port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        };
        let builder =
            relay.map_err(|e| AppError::Internal(format!("SMTP configuration error: {}", e)))?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(user, password))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, invitation: &Invitation) -> Result<(), AppError> {
        let to: Mailbox = invitation
            .to
            .parse()
            .map_err(|e| AppError::EmailDelivery(format!("Invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&invitation.subject)
            .multipart(MultiPart::alternative_plain_html(
                invitation.text_body.clone(),
                invitation.html_body.clone(),
            ))
            .map_err(|e| AppError::EmailDelivery(format!("Failed to build email: {}", e)))?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!(to = %email_fingerprint(&invitation.to), "Invitation sent");
                Ok(())
            }
            Err(e) => {
                warn!(to = %email_fingerprint(&invitation.to), error = %e, "SMTP send failed");
                Err(AppError::EmailDelivery(e.to_string()))
            }
        }
    }
}

// Used when no SMTP account is configured: nothing leaves the process
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, invitation: &Invitation) -> Result<(), AppError> {
        info!(
            to = %email_fingerprint(&invitation.to),
            subject = %invitation.subject,
            "SMTP not configured, invitation logged only"
        );
        Ok(())
    }
}

// Keeps every invitation in memory; can be told to fail
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<Invitation>>,
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, invitation: &Invitation) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::EmailDelivery("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(invitation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_link_encodes_email() {
        let invitation = Invitation::new(
            &base("http://localhost:3000"),
            "atleta+fp@boxeportugal.pt",
        );
        assert_eq!(
            invitation.link,
            "http://localhost:3000/pesquisa?email=atleta%2Bfp%40boxeportugal.pt"
        );
    }

    #[test]
    fn test_link_keeps_base_path() {
        let invitation = Invitation::new(&base("https://boxe.pt/app/"), "a@b.pt");
        assert_eq!(invitation.link, "https://boxe.pt/app/pesquisa?email=a%40b.pt");
    }

    #[test]
    fn test_bodies_carry_link() {
        let invitation = Invitation::new(&base("http://localhost:3000"), "a@b.pt");
        assert_eq!(invitation.subject, INVITATION_SUBJECT);
        assert!(invitation.text_body.contains(&invitation.link));
        assert!(invitation.html_body.contains(&invitation.link));
        assert!(invitation.html_body.contains("ACESSAR PESQUISA"));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let invitation = Invitation::new(&base("http://localhost:3000"), "a@b.pt");
        assert!(LogMailer.send(&invitation).await.is_ok());
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_sender() {
        let result = SmtpMailer::new("smtp.gmail.com", 587, "not an address".into(), "pw".into());
        assert!(result.is_err());
    }
}
