/// Financial categories & their marker rows.
pub mod category;

/// Runtime configuration, read from the environment (and `.env`).
pub mod config;

/// Library error type.
pub mod error;

/// Financial statement pages from [FT markets].
///
/// [FT markets]: http://markets.ft.com/research/Markets/Tearsheets/Financials
pub mod ft;

/// [Google Sheets API](https://developers.google.com/sheets/api/reference/rest), with a
/// [Drive](https://developers.google.com/drive/api/reference/rest/v3/files/list) lookup for
/// opening spreadsheets by name.
pub mod sheets;

/// HTML table parsing into an ordered [`table::Statement`].
pub mod table;

/// Progress bars.
pub mod tui;

/// Writing a [`table::Statement`] to a worksheet.
pub mod upload;

pub use category::FinancialCategory;
pub use config::Config;
pub use error::{Result, SpiderError};
pub use table::Statement;

/// Shortcut for required API elements.
pub mod http {
    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;
}

/// Build the standard HTTP client, identified by the configured user agent.
pub fn std_client_build(config: &Config) -> Result<http::HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Format the time elapsed since `time`, for log lines.
pub fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.3}s", time.elapsed().as_secs_f64())
}
