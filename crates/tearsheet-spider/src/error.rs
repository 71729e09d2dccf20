use crate::FinancialCategory;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpiderError>;

#[derive(Debug, Error)]
pub enum SpiderError {
    /// The tearsheet reported that the symbol matched nothing.
    #[error("{0}")]
    NoResults(String),

    /// None of the tables on the page carried the category's marker row.
    #[error("invalid name, no {category} table containing a \"{marker}\" row", marker = .category.marker())]
    TableNotFound { category: FinancialCategory },

    #[error("there is no spreadsheet named: {0}, please manually create it")]
    SpreadsheetNotFound(String),

    #[error("API request to {url} failed with status {status}: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    /// A 2xx response that lacked the reply the request asked for.
    #[error("response from {url} had no {reply} reply")]
    MissingReply { url: String, reply: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] indicatif::style::TemplateError),
}
