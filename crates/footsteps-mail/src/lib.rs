//! Best-effort support notifications over SMTP.

pub mod compose;
pub mod notifier;
pub mod settings;

pub use compose::{OutgoingEmail, Ticket};
pub use notifier::{MailTransport, Notifier, SmtpMailer};
pub use settings::SmtpSettings;
