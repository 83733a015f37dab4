use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

use footsteps_mail::SmtpSettings;

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Hosted {
        url: String,
        anon_key: String,
        timeout: Duration,
    },
    Local {
        path: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub smtp: Option<SmtpSettings>,
    pub analytics_token: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        // The site's frontend build exposes the same values under NEXT_PUBLIC_*.
        let either = |key: &str| var(key).or_else(|| var(&format!("NEXT_PUBLIC_{key}")));

        let host = var("FOOTSTEPS_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("FOOTSTEPS_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("invalid FOOTSTEPS_PORT")?;

        let store = match (either("SUPABASE_URL"), either("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => {
                let secs: u64 = match var("FOOTSTEPS_STORE_TIMEOUT_SECS") {
                    Some(raw) => raw.parse().context("invalid FOOTSTEPS_STORE_TIMEOUT_SECS")?,
                    None => DEFAULT_STORE_TIMEOUT_SECS,
                };
                StoreConfig::Hosted {
                    url,
                    anon_key,
                    timeout: Duration::from_secs(secs),
                }
            }
            (Some(_), None) => bail!("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing"),
            (None, Some(_)) => bail!("SUPABASE_ANON_KEY is set but SUPABASE_URL is missing"),
            (None, None) => match var("FOOTSTEPS_DB_PATH") {
                Some(path) => StoreConfig::Local { path: path.into() },
                None => bail!(
                    "no data store configured: set SUPABASE_URL and SUPABASE_ANON_KEY, \
                     or FOOTSTEPS_DB_PATH for a local SQLite file"
                ),
            },
        };

        let smtp = SmtpSettings::from_lookup(&get);
        if smtp.is_none() {
            info!("SMTP not configured, support emails will be skipped");
        }

        Ok(Self {
            host,
            port,
            store,
            smtp,
            analytics_token: var("FOOTSTEPS_ANALYTICS_TOKEN"),
            static_dir: var("FOOTSTEPS_STATIC_DIR").map(PathBuf::from),
        })
    }
}
