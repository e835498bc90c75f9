use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{Message, SmtpTransport, Transport};
use uuid::Uuid;

use crate::error::MailError;
use crate::utils::email_templates;

/// Email transport picked from environment configuration. Priority order:
/// explicit SMTP credentials, Gmail OAuth2, Gmail app password. `None` means
/// mail is not configured, which is never an error for the capture flows.
pub enum MailTransport {
    Smtp {
        host: String,
        port: u16,
        secure: bool,
        username: String,
        password: String,
    },
    GmailOauth {
        user: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    GmailAppPassword {
        user: String,
        password: String,
    },
}

impl MailTransport {
    pub fn from_env() -> Option<Self> {
        if let Ok(host) = std::env::var("SMTP_HOST") {
            let username = std::env::var("SMTP_USERNAME")
                .or_else(|_| std::env::var("SMTP_USER"))
                .unwrap_or_default();
            return Some(MailTransport::Smtp {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                secure: std::env::var("SMTP_SECURE").as_deref() == Ok("true"),
                username,
                password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            });
        }
        if let (Ok(client_id), Ok(client_secret), Ok(refresh_token)) = (
            std::env::var("GMAIL_CLIENT_ID"),
            std::env::var("GMAIL_CLIENT_SECRET"),
            std::env::var("GMAIL_REFRESH_TOKEN"),
        ) {
            return Some(MailTransport::GmailOauth {
                user: std::env::var("GMAIL_USER").unwrap_or_default(),
                client_id,
                client_secret,
                refresh_token,
            });
        }
        if let (Ok(user), Ok(password)) = (
            std::env::var("GMAIL_USER"),
            std::env::var("GMAIL_APP_PASSWORD"),
        ) {
            return Some(MailTransport::GmailAppPassword { user, password });
        }
        None
    }

    fn from_address() -> String {
        let email = std::env::var("FROM_EMAIL")
            .or_else(|_| std::env::var("EMAIL_FROM"))
            .or_else(|_| std::env::var("SMTP_USERNAME"))
            .or_else(|_| std::env::var("SMTP_USER"))
            .or_else(|_| std::env::var("GMAIL_USER"))
            .unwrap_or_else(|_| "noreply@playitloud.com".to_string());
        let name = std::env::var("FROM_NAME")
            .or_else(|_| std::env::var("EMAIL_FROM_NAME"))
            .unwrap_or_else(|_| "Play It Loud".to_string());
        format!("\"{}\" <{}>", name, email)
    }

    async fn build_mailer(&self) -> Result<SmtpTransport, MailError> {
        match self {
            MailTransport::Smtp {
                host,
                port,
                secure,
                username,
                password,
            } => {
                let creds = Credentials::new(username.clone(), password.clone());
                // secure = implicit TLS (465), otherwise STARTTLS
                let builder = if *secure {
                    SmtpTransport::relay(host)?
                } else {
                    SmtpTransport::starttls_relay(host)?
                };
                Ok(builder.port(*port).credentials(creds).build())
            }
            MailTransport::GmailOauth {
                user,
                client_id,
                client_secret,
                refresh_token,
            } => {
                let access_token =
                    refresh_access_token(client_id, client_secret, refresh_token).await?;
                Ok(SmtpTransport::starttls_relay("smtp.gmail.com")?
                    .port(587)
                    .credentials(Credentials::new(user.clone(), access_token))
                    .authentication(vec![Mechanism::Xoauth2])
                    .build())
            }
            MailTransport::GmailAppPassword { user, password } => {
                Ok(SmtpTransport::starttls_relay("smtp.gmail.com")?
                    .port(587)
                    .credentials(Credentials::new(user.clone(), password.clone()))
                    .build())
            }
        }
    }

    /// Sends one HTML email, returning the generated Message-ID.
    pub async fn send_html(
        &self,
        to: &str,
        subject: &str,
        html: String,
    ) -> Result<String, MailError> {
        let mailer = self.build_mailer().await?;
        let message_id = format!("<{}@playitloud.com>", Uuid::new_v4());
        let message = Message::builder()
            .from(Self::from_address().parse()?)
            .to(to.parse()?)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(html)?;
        mailer.send(&message)?;
        Ok(message_id)
    }
}

/// Trades the long-lived refresh token for a short-lived access token. Done
/// per send; this process keeps no token state.
async fn refresh_access_token(
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<String, MailError> {
    let response = reqwest::Client::new()
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await
        .map_err(|e| MailError::TokenRefresh(e.to_string()))?;
    if !response.status().is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(MailError::TokenRefresh(error_text));
    }
    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| MailError::TokenRefresh(e.to_string()))?;
    body["access_token"]
        .as_str()
        .map(|t| t.to_string())
        .ok_or_else(|| MailError::TokenRefresh("no access_token in response".to_string()))
}

/// Best-effort confirmation for the waitlist flows. Returns whether a message
/// actually went out; failures are logged and never propagate, the write that
/// preceded this is already considered a success.
pub async fn send_waitlist_confirmation(email: &str, full_name: &str) -> bool {
    let Some(transport) = MailTransport::from_env() else {
        tracing::info!(
            "Email service not configured, skipping waitlist confirmation to {}",
            email
        );
        return false;
    };
    match transport
        .send_html(
            email,
            "You're on the Play It Loud waitlist! 🎉",
            email_templates::waitlist_confirmation_html(full_name),
        )
        .await
    {
        Ok(_) => {
            tracing::info!("Confirmation email sent to {}", email);
            true
        }
        Err(e) => {
            tracing::error!("Failed to send confirmation email to {}: {}", email, e);
            false
        }
    }
}

/// Best-effort confirmation for the pitch flow, same contract.
pub async fn send_pitch_confirmation(email: &str, name: &str, pitch_title: &str) -> bool {
    let Some(transport) = MailTransport::from_env() else {
        tracing::info!(
            "Email service not configured, skipping pitch confirmation to {}",
            email
        );
        return false;
    };
    match transport
        .send_html(
            email,
            "Pitch Submitted Successfully! 🎬",
            email_templates::pitch_confirmation_html(name, pitch_title),
        )
        .await
    {
        Ok(_) => {
            tracing::info!("Pitch confirmation email sent to {}", email);
            true
        }
        Err(e) => {
            tracing::error!("Failed to send pitch confirmation email to {}: {}", email, e);
            false
        }
    }
}
