use axum::{
    extract::{Path, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

/// Characters `encodeURIComponent` leaves alone, so app-generated links keep their shape.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PLAY_STORE_URL: &str = "https://play.google.com/store/apps";
const APP_STORE_URL: &str = "https://apps.apple.com/us/genre/ios/id36";

/// Kinds of universal link the mobile app emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Story,
    Journey,
    User,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Journey => "journey",
            Self::User => "user",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "story" => Some(Self::Story),
            "journey" => Some(Self::Journey),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// Landing URL for a deep link. Only the first path segment is the id.
pub fn landing_location(kind: LinkKind, slug: &str) -> String {
    let id = slug.split('/').next().unwrap_or_default();
    format!(
        "/app-link-redirect?type={}&id={}",
        kind.as_str(),
        utf8_percent_encode(id, COMPONENT)
    )
}

fn found(location: String) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

pub async fn story(Path(slug): Path<String>) -> impl IntoResponse {
    found(landing_location(LinkKind::Story, &slug))
}

pub async fn journey(Path(slug): Path<String>) -> impl IntoResponse {
    found(landing_location(LinkKind::Journey, &slug))
}

pub async fn user(Path(slug): Path<String>) -> impl IntoResponse {
    found(landing_location(LinkKind::User, &slug))
}

#[derive(Debug, Default, Deserialize)]
pub struct LandingQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingCopy {
    pub title: &'static str,
    pub message: &'static str,
}

pub fn landing_copy(kind: Option<LinkKind>, has_id: bool) -> LandingCopy {
    let (title, with_id, without_id) = match kind {
        Some(LinkKind::Story) => (
            "View Story in Footsteps App",
            "This story is only available in the Footsteps app.",
            "You've been invited to view a story in the Footsteps app.",
        ),
        Some(LinkKind::Journey) => (
            "View Journey in Footsteps App",
            "This journey is only available in the Footsteps app.",
            "You've been invited to view a journey in the Footsteps app.",
        ),
        Some(LinkKind::User) => (
            "View Profile in Footsteps App",
            "This user profile is only available in the Footsteps app.",
            "You've been invited to view a profile in the Footsteps app.",
        ),
        None => {
            let invite = "You've been invited to view content in the Footsteps app.";
            ("Open Footsteps App", invite, invite)
        }
    };

    LandingCopy {
        title,
        message: if has_id { with_id } else { without_id },
    }
}

/// GET /app-link-redirect
pub async fn landing(Query(query): Query<LandingQuery>) -> Html<String> {
    let kind = query.kind.as_deref().and_then(LinkKind::parse);
    let has_id = query.id.as_deref().is_some_and(|id| !id.is_empty());
    let copy = landing_copy(kind, has_id);

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Open in Footsteps App | Footsteps</title>
<meta name="description" content="You've been invited to view content in the Footsteps app. Download Footsteps to explore travel stories, journeys, and connect with travelers.">
<meta property="og:title" content="Open in Footsteps App">
<meta property="og:site_name" content="Footsteps">
</head>
<body>
<main>
<img src="/mainIcon.png" alt="Footsteps Logo" width="120" height="120">
<h1>{title}</h1>
<p>{message}</p>
<p>
<a href="{play}" target="_blank" rel="noopener noreferrer">Open in Play Store</a>
<a href="{apple}" target="_blank" rel="noopener noreferrer">Open in App Store</a>
</p>
<a href="/">Back to Footsteps Home</a>
</main>
</body>
</html>
"#,
        title = copy.title,
        message = copy.message,
        play = PLAY_STORE_URL,
        apple = APP_STORE_URL,
    ))
}
