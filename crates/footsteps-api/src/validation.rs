use std::sync::LazyLock;

use axum::http::{HeaderMap, header};
use regex::Regex;

use footsteps_types::api::{SupportRequest, WaitlistEmailRequest, WaitlistRequest};
use footsteps_types::models::{NewSupportMessage, NewWaitlistSignup, SupportCategory};

use crate::error::ApiError;

pub const NAME_MAX_CHARS: usize = 120;
pub const MESSAGE_MIN_CHARS: usize = 10;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const NAME_INVALID: &str = "Name is required (max 120 chars).";
pub const EMAIL_INVALID: &str = "A valid email is required.";
pub const CATEGORY_INVALID: &str = "Category must be one of bug, feedback, account, other.";
pub const MESSAGE_INVALID: &str = "Message is required (min 10 chars).";

/// Request headers recorded alongside a support message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl RequestMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            user_agent: get(header::USER_AGENT),
            referer: get(header::REFERER),
        }
    }
}

/// Some line contains `x@y.z` with every part non-empty. Line terminators
/// are excluded from each part.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\n\r\x{2028}\x{2029}]@[^\n\r\x{2028}\x{2029}]+\.[^\n\r\x{2028}\x{2029}]")
        .expect("email pattern is valid")
});

/// Permissive address check, linear in the input length.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn required_email(email: Option<String>) -> Result<String, ApiError> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation(EMAIL_REQUIRED))
}

pub fn waitlist_signup(req: WaitlistRequest) -> Result<NewWaitlistSignup, ApiError> {
    let email = required_email(req.email)?;

    let suggested_feature = req.selected_features.filter(|features| !features.is_empty());
    let comments = req
        .comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(NewWaitlistSignup {
        email,
        suggested_feature,
        comments,
    })
}

pub fn waitlist_email(req: WaitlistEmailRequest) -> Result<NewWaitlistSignup, ApiError> {
    Ok(NewWaitlistSignup {
        email: required_email(req.email)?,
        suggested_feature: None,
        comments: None,
    })
}

/// Checks run in form order; the first violation is reported.
pub fn support_message(req: SupportRequest, meta: RequestMeta) -> Result<NewSupportMessage, ApiError> {
    let name = req
        .name
        .filter(|n| !n.trim().is_empty() && n.chars().count() <= NAME_MAX_CHARS)
        .ok_or_else(|| ApiError::validation(NAME_INVALID))?;

    let email = req
        .email
        .filter(|e| is_valid_email(e))
        .ok_or_else(|| ApiError::validation(EMAIL_INVALID))?;

    let category = req
        .category
        .and_then(|c| c.parse::<SupportCategory>().ok())
        .ok_or_else(|| ApiError::validation(CATEGORY_INVALID))?;

    let message = req
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| m.chars().count() >= MESSAGE_MIN_CHARS)
        .ok_or_else(|| ApiError::validation(MESSAGE_INVALID))?;

    Ok(NewSupportMessage {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        category,
        message,
        user_agent: meta.user_agent,
        page_url: meta.referer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn support(name: &str, email: &str, category: &str, message: &str) -> SupportRequest {
        SupportRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            category: Some(category.into()),
            message: Some(message.into()),
        }
    }

    fn rejection(result: Result<NewSupportMessage, ApiError>) -> String {
        match result {
            Err(ApiError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_pattern_is_permissive() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("weird@@x.y"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@bco"));
        assert!(!is_valid_email("a@b\n.co"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b\u{2028}.co"));
        assert!(is_valid_email("junk\na@b.co"));
    }

    #[test]
    fn email_check_handles_body_sized_input() {
        let started = std::time::Instant::now();
        assert!(!is_valid_email(&"@".repeat(2_000_000)));
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn name_length_boundary() {
        let ok = support(&"n".repeat(120), "a@b.co", "bug", "0123456789");
        assert!(support_message(ok, RequestMeta::default()).is_ok());

        let long = support(&"n".repeat(121), "a@b.co", "bug", "0123456789");
        assert_eq!(rejection(support_message(long, RequestMeta::default())), NAME_INVALID);

        let blank = support("   ", "a@b.co", "bug", "0123456789");
        assert_eq!(rejection(support_message(blank, RequestMeta::default())), NAME_INVALID);
    }

    #[test]
    fn message_length_counts_trimmed_text() {
        let short = support("Ada", "a@b.co", "bug", "  123456789  ");
        assert_eq!(rejection(support_message(short, RequestMeta::default())), MESSAGE_INVALID);

        let exact = support("Ada", "a@b.co", "bug", "  0123456789  ");
        let msg = support_message(exact, RequestMeta::default()).unwrap();
        assert_eq!(msg.message, "0123456789");
    }

    #[test]
    fn category_outside_set_rejected() {
        let req = support("Ada", "a@b.co", "billing", "0123456789");
        assert_eq!(rejection(support_message(req, RequestMeta::default())), CATEGORY_INVALID);
    }

    #[test]
    fn first_violation_wins() {
        let req = SupportRequest::default();
        assert_eq!(rejection(support_message(req, RequestMeta::default())), NAME_INVALID);

        let req = SupportRequest {
            name: Some("Ada".into()),
            ..Default::default()
        };
        assert_eq!(rejection(support_message(req, RequestMeta::default())), EMAIL_INVALID);
    }

    #[test]
    fn support_fields_trimmed_and_meta_attached() {
        let req = support("  Ada ", " ada@example.com ", "other", "Where is my data stored?");
        let meta = RequestMeta {
            user_agent: Some("Mozilla/5.0".into()),
            referer: Some("https://footsteps.space/#support".into()),
        };
        let msg = support_message(req, meta).unwrap();

        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@example.com");
        assert_eq!(msg.category, SupportCategory::Other);
        assert_eq!(msg.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(msg.page_url.as_deref(), Some("https://footsteps.space/#support"));
    }

    #[test]
    fn meta_reads_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.4"));
        let meta = RequestMeta::from_headers(&headers);
        assert_eq!(meta.user_agent.as_deref(), Some("curl/8.4"));
        assert_eq!(meta.referer, None);
    }

    #[test]
    fn waitlist_normalizes_optional_fields() {
        let signup = waitlist_signup(WaitlistRequest {
            email: Some("a@b.co".into()),
            selected_features: Some(vec![]),
            comments: Some("   ".into()),
        })
        .unwrap();
        assert_eq!(signup.suggested_feature, None);
        assert_eq!(signup.comments, None);

        let signup = waitlist_signup(WaitlistRequest {
            email: Some("a@b.co".into()),
            selected_features: Some(vec!["Offline maps".into()]),
            comments: Some(" More trails please ".into()),
        })
        .unwrap();
        assert_eq!(signup.suggested_feature, Some(vec!["Offline maps".to_string()]));
        assert_eq!(signup.comments.as_deref(), Some("More trails please"));
    }

    #[test]
    fn waitlist_email_requires_value_only() {
        assert!(waitlist_email(WaitlistEmailRequest { email: None }).is_err());
        assert!(waitlist_email(WaitlistEmailRequest { email: Some(String::new()) }).is_err());
        assert!(waitlist_email(WaitlistEmailRequest { email: Some("  \t ".into()) }).is_err());
        // No format check on the waitlist path.
        assert_eq!(
            waitlist_email(WaitlistEmailRequest { email: Some("not-an-email".into()) })
                .unwrap()
                .email,
            "not-an-email"
        );
    }
}
