use std::fmt;

use tracing::warn;

pub const DEFAULT_SUPPORT_INBOX: &str = "footsteps.space@gmail.com";

/// SMTP relay settings. Present only when host, port, user and password
/// are all configured.
#[derive(Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Implicit TLS (SMTPS) when true, STARTTLS otherwise.
    pub implicit_tls: bool,
    pub from: String,
    pub inbox: String,
}

impl SmtpSettings {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let host = non_blank("SMTP_HOST")?;
        let port = non_blank("SMTP_PORT")?;
        let user = non_blank("SMTP_USER")?;
        let pass = non_blank("SMTP_PASS")?;

        let port: u16 = match port.trim().parse() {
            Ok(0) => {
                warn!("Ignoring SMTP settings, SMTP_PORT is 0");
                return None;
            }
            Ok(port) => port,
            Err(e) => {
                warn!("Ignoring SMTP settings, invalid SMTP_PORT '{}': {}", port, e);
                return None;
            }
        };

        let implicit_tls = match non_blank("SMTP_SECURE") {
            Some(secure) => secure.trim() == "true",
            None => port == 465,
        };

        // The authenticated user is the safest sender for DMARC.
        let from = non_blank("EMAIL_FROM").unwrap_or_else(|| user.clone());
        let inbox = non_blank("SUPPORT_INBOX").unwrap_or_else(|| DEFAULT_SUPPORT_INBOX.to_string());

        Some(Self {
            host,
            port,
            user,
            pass,
            implicit_tls,
            from,
            inbox,
        })
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("implicit_tls", &self.implicit_tls)
            .field("from", &self.from)
            .field("inbox", &self.inbox)
            .finish()
    }
}
