use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::BoxFuture;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use footsteps_types::api::{Delivery, EmailDelivery};

use crate::compose::{self, OutgoingEmail, Ticket};
use crate::settings::SmtpSettings;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends one composed email.
pub trait MailTransport: Send + Sync {
    fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, Result<()>>;
}

/// Transport backed by an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let builder = if settings.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        };
        let builder = builder.with_context(|| format!("invalid SMTP host {}", settings.host))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(settings.user.clone(), settings.pass.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let message = Message::builder()
                .from(email.from.parse::<Mailbox>().context("invalid from address")?)
                .to(email.to.parse::<Mailbox>().context("invalid recipient address")?)
                .subject(email.subject)
                .header(ContentType::TEXT_PLAIN)
                .body(email.body)?;

            self.transport.send(message).await?;
            Ok(())
        })
    }
}

/// Fires the two support notifications. Failures are logged and reported,
/// never propagated.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    from: String,
    inbox: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, from: impl Into<String>, inbox: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
            inbox: inbox.into(),
        }
    }

    pub fn smtp(settings: &SmtpSettings) -> Result<Self> {
        let mailer = SmtpMailer::new(settings)?;
        Ok(Self::new(Arc::new(mailer), settings.from.clone(), settings.inbox.clone()))
    }

    /// Sends the internal notification and the submitter acknowledgment
    /// concurrently and waits for both to settle.
    pub async fn notify_support(&self, ticket: &Ticket<'_>) -> EmailDelivery {
        let internal = compose::internal_notification(&self.from, &self.inbox, ticket);
        let ack = compose::acknowledgment(&self.from, &self.inbox, ticket);

        let (internal, acknowledgment) = tokio::join!(
            self.deliver("internal notification", internal),
            self.deliver("acknowledgment", ack),
        );

        EmailDelivery {
            internal,
            acknowledgment,
        }
    }

    async fn deliver(&self, kind: &str, email: OutgoingEmail) -> Delivery {
        let to = email.to.clone();
        match self.transport.send(email).await {
            Ok(()) => {
                info!("Sent support {} to {}", kind, to);
                Delivery::Sent
            }
            Err(e) => {
                warn!("Support {} to {} failed: {:#}", kind, to, e);
                Delivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use footsteps_types::models::{NewSupportMessage, SupportCategory};

    /// Records every email and fails those addressed to `reject`.
    struct Recording {
        sent: Mutex<Vec<OutgoingEmail>>,
        reject: Option<&'static str>,
    }

    impl MailTransport for Recording {
        fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                if self.reject == Some(email.to.as_str()) {
                    anyhow::bail!("550 mailbox unavailable");
                }
                self.sent.lock().unwrap().push(email);
                Ok(())
            })
        }
    }

    fn submitted() -> NewSupportMessage {
        NewSupportMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            category: SupportCategory::Account,
            message: "Cannot change my username.".into(),
            user_agent: None,
            page_url: None,
        }
    }

    #[tokio::test]
    async fn sends_both_messages() {
        let transport = Arc::new(Recording { sent: Mutex::new(vec![]), reject: None });
        let notifier = Notifier::new(transport.clone(), "bot@x.io", "inbox@x.io");
        let sub = submitted();

        let delivery = notifier.notify_support(&Ticket::new(&sub, None)).await;

        assert_eq!(delivery.internal, Delivery::Sent);
        assert_eq!(delivery.acknowledgment, Delivery::Sent);
        let mut recipients: Vec<String> =
            transport.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect();
        recipients.sort();
        assert_eq!(recipients, vec!["ada@example.com", "inbox@x.io"]);
    }

    #[tokio::test]
    async fn reports_which_message_failed() {
        let transport = Arc::new(Recording {
            sent: Mutex::new(vec![]),
            reject: Some("ada@example.com"),
        });
        let notifier = Notifier::new(transport.clone(), "bot@x.io", "inbox@x.io");
        let sub = submitted();

        let delivery = notifier.notify_support(&Ticket::new(&sub, None)).await;

        assert_eq!(delivery.internal, Delivery::Sent);
        assert_eq!(delivery.acknowledgment, Delivery::Failed);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }
}
