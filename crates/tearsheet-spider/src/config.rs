use crate::http::var;

pub const DEFAULT_FT_BASE_URL: &str = "http://markets.ft.com";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Endpoints & credentials for a run.
///
/// Every field can be overridden from the environment; a `.env` file is honoured when the
/// binary calls `dotenv::dotenv()` before [`Config::from_env`].
///
/// | variable              | default                                |
/// |-----------------------|----------------------------------------|
/// | `FT_BASE_URL`         | `http://markets.ft.com`                |
/// | `SHEETS_BASE_URL`     | `https://sheets.googleapis.com/v4`     |
/// | `DRIVE_BASE_URL`      | `https://www.googleapis.com/drive/v3`  |
/// | `USER_AGENT`          | `tearsheet/<version>`                  |
/// | `GOOGLE_ACCESS_TOKEN` | none; the CLI prompts for it           |
#[derive(Clone, Debug)]
pub struct Config {
    pub ft_base_url: String,
    pub sheets_base_url: String,
    pub drive_base_url: String,
    pub user_agent: String,
    pub access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ft_base_url: DEFAULT_FT_BASE_URL.to_string(),
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            drive_base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            user_agent: concat!("tearsheet/", env!("CARGO_PKG_VERSION")).to_string(),
            access_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            ft_base_url: var("FT_BASE_URL").unwrap_or(default.ft_base_url),
            sheets_base_url: var("SHEETS_BASE_URL").unwrap_or(default.sheets_base_url),
            drive_base_url: var("DRIVE_BASE_URL").unwrap_or(default.drive_base_url),
            user_agent: var("USER_AGENT").unwrap_or(default.user_agent),
            access_token: var("GOOGLE_ACCESS_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
        }
    }

    /// Point every endpoint at one host; used to run against a local server.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            ft_base_url: base.to_string(),
            sheets_base_url: format!("{base}/v4"),
            drive_base_url: format!("{base}/drive/v3"),
            ..Self::default()
        }
    }
}
