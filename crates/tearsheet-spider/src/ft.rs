use crate::http::*;
use crate::{table, Config, FinancialCategory, Result, Statement};
use tracing::{debug, error, info};
use url::Url;

const FINANCIALS_PATH: &str = "/research/Markets/Tearsheets/Financials";

/// Tearsheet page for one report of one company, e.g. `ORCL:NYQ`.
pub fn statement_url(base: &str, symbol: &str, category: FinancialCategory) -> Result<Url> {
    let url = Url::parse_with_params(
        &format!("{}{FINANCIALS_PATH}", base.trim_end_matches('/')),
        &[("s", symbol), ("subview", category.as_str())],
    )?;
    Ok(url)
}

/// Fetch the tearsheet page & extract the category's table.
pub async fn scrape(
    http_client: &HttpClient,
    config: &Config,
    symbol: &str,
    category: FinancialCategory,
) -> Result<Statement> {
    let time = std::time::Instant::now();
    let url = statement_url(&config.ft_base_url, symbol, category)?;
    info!("gathering {category} data for {symbol} from {url}");

    let html = http_client
        .get(url.clone())
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("failed to fetch {category} page for {symbol}, error({err})");
            err
        })?
        .text()
        .await
        .map_err(|err| {
            error!("failed to read {category} page for {symbol}, error({err})");
            err
        })?;

    let statement = table::extract(&html, category).map_err(|err| {
        error!("failed to extract {category} table for {symbol}, error({err})");
        err
    })?;

    debug!(
        "{category} for {symbol}: {} rows scraped. {}",
        statement.len(),
        crate::time_elapsed(time)
    );

    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_symbol_and_subview() {
        let url = statement_url(
            "http://markets.ft.com/",
            "ORCL:NYQ",
            FinancialCategory::CashFlow,
        )
        .unwrap();

        assert_eq!(url.host_str(), Some("markets.ft.com"));
        assert_eq!(url.path(), "/research/Markets/Tearsheets/Financials");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("s".to_string(), "ORCL:NYQ".to_string()),
                ("subview".to_string(), "CashFlow".to_string()),
            ]
        );
    }
}
