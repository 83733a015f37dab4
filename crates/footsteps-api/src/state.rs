use std::sync::Arc;

use footsteps_db::Store;
use footsteps_mail::Notifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    /// `None` when SMTP is not configured; support mail is then skipped.
    pub notifier: Option<Notifier>,
    /// Bearer token required by the analytics route, when set.
    pub analytics_token: Option<String>,
}
