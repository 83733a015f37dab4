use chrono::{DateTime, Utc};

use footsteps_types::models::{NewSupportMessage, SupportCategory, SupportMessageRow};

/// A plaintext email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The support ticket as the notifications describe it.
#[derive(Debug, Clone)]
pub struct Ticket<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub category: SupportCategory,
    pub message: &'a str,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl<'a> Ticket<'a> {
    /// Falls back to "now" and no reference when the store returned no row.
    pub fn new(submitted: &'a NewSupportMessage, stored: Option<&SupportMessageRow>) -> Self {
        Self {
            name: &submitted.name,
            email: &submitted.email,
            category: submitted.category,
            message: &submitted.message,
            reference: stored.and_then(|row| row.id.as_ref()).map(ToString::to_string),
            created_at: stored.map_or_else(Utc::now, |row| row.created_at),
        }
    }
}

pub fn internal_notification(from: &str, inbox: &str, ticket: &Ticket<'_>) -> OutgoingEmail {
    let subject = match &ticket.reference {
        Some(id) => format!("New Support Message (#{id})"),
        None => "New Support Message".to_string(),
    };

    let body = format!(
        "New support message\n\nName: {}\nEmail: {}\nCategory: {}\nCreated: {}\n\nMessage:\n{}",
        ticket.name,
        ticket.email,
        ticket.category,
        ticket.created_at.to_rfc3339(),
        ticket.message,
    );

    OutgoingEmail {
        from: from.to_string(),
        to: inbox.to_string(),
        subject,
        body,
    }
}

pub fn acknowledgment(from: &str, inbox: &str, ticket: &Ticket<'_>) -> OutgoingEmail {
    let reference = ticket
        .reference
        .as_ref()
        .map(|id| format!("\n- Reference: {id}"))
        .unwrap_or_default();

    let body = format!(
        "Hi {},\n\n\
         Thanks for reaching out to Footsteps. We received your message and will get back to you \
         shortly (usually within 24-48 hours).\n\n\
         Summary:\n- Category: {}\n- Submitted: {}{}\n\n\
         Your message:\n{}\n\n\
         Footsteps Team\n{}",
        ticket.name,
        ticket.category,
        ticket.created_at.format("%Y-%m-%d %H:%M UTC"),
        reference,
        ticket.message,
        inbox,
    );

    OutgoingEmail {
        from: from.to_string(),
        to: ticket.email.to_string(),
        subject: "We received your message – Footsteps".to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use footsteps_types::models::RowId;

    fn submitted() -> NewSupportMessage {
        NewSupportMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            category: SupportCategory::Feedback,
            message: "Love the journey timeline.".into(),
            user_agent: None,
            page_url: None,
        }
    }

    fn stored(submitted: &NewSupportMessage) -> SupportMessageRow {
        SupportMessageRow {
            id: Some(RowId::Int(17)),
            name: submitted.name.clone(),
            email: submitted.email.clone(),
            category: submitted.category,
            message: submitted.message.clone(),
            user_agent: None,
            page_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap(),
        }
    }

    #[test]
    fn internal_subject_carries_reference() {
        let sub = submitted();
        let row = stored(&sub);
        let mail = internal_notification("bot@x.io", "inbox@x.io", &Ticket::new(&sub, Some(&row)));

        assert_eq!(mail.to, "inbox@x.io");
        assert_eq!(mail.subject, "New Support Message (#17)");
        assert!(mail.body.contains("Category: feedback"));
        assert!(mail.body.contains("Created: 2026-10-18T09:05:00+00:00"));
        assert!(mail.body.ends_with("Love the journey timeline."));
    }

    #[test]
    fn internal_subject_without_row() {
        let sub = submitted();
        let mail = internal_notification("bot@x.io", "inbox@x.io", &Ticket::new(&sub, None));
        assert_eq!(mail.subject, "New Support Message");
    }

    #[test]
    fn acknowledgment_goes_to_submitter() {
        let sub = submitted();
        let row = stored(&sub);
        let mail = acknowledgment("bot@x.io", "inbox@x.io", &Ticket::new(&sub, Some(&row)));

        assert_eq!(mail.to, "ada@example.com");
        assert!(mail.body.starts_with("Hi Ada,"));
        assert!(mail.body.contains("- Submitted: 2026-10-18 09:05 UTC\n- Reference: 17"));

        let anonymous = acknowledgment("bot@x.io", "inbox@x.io", &Ticket::new(&sub, None));
        assert!(!anonymous.body.contains("Reference"));
    }
}
