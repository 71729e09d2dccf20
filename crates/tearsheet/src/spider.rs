use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use tearsheet_spider::{
    self as spider, http::HttpClient, sheets::SheetsClient, upload::WriteMode, Config,
    FinancialCategory, Statement,
};
use tracing::{debug, error, info};

// Status lines go to stderr, so stdout only ever carries `show` output.

/// Scrape each category & upload it to its worksheet of `spreadsheet`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn upload(
    http_client: &HttpClient,
    config: &Config,
    access_token: &str,
    spreadsheet: &str,
    symbol: &str,
    categories: &[FinancialCategory],
    mode: WriteMode,
    tui: bool,
) -> anyhow::Result<()> {
    let sheets = SheetsClient::new(http_client.clone(), config, access_token);

    // 1. open the spreadsheet; it is never created
    let target = sheets.open(spreadsheet).await?;
    debug!("spreadsheet {} opened", target.name);

    if tui {
        eprintln!(
            "{}",
            format!("Data for company {symbol} will be downloaded").blue()
        );
    }

    // 2. scrape & upload, one category at a time
    let time = std::time::Instant::now();
    for &category in categories {
        if tui {
            eprintln!("{}", format!("Updating the {category} category").blue());
        }

        let statement = scrape(http_client, config, symbol, category, tui).await?;

        let (worksheet, created) = sheets
            .worksheet_or_create(&target, category.as_str())
            .await?;
        if created && tui {
            eprintln!(
                "{}",
                format!("There is no worksheet named: {category}, created it").yellow()
            );
        }

        let pb = spider::tui::upload_progress(statement.len(), category.as_str(), tui)?;
        spider::upload::upload_statement(&sheets, &worksheet, &statement, mode, &pb).await?;

        info!("{category} uploaded to {}", target.name);
        if tui {
            eprintln!("updating the {category} worksheet ... done");
        }
    }

    info!(
        "upload finished for {symbol}, {}",
        spider::time_elapsed(time)
    );

    Ok(())
}

/// `show --json` document: every requested statement, in request order.
#[derive(Debug, Serialize)]
struct Shown<'a> {
    symbol: &'a str,
    statements: Vec<ShownStatement>,
}

#[derive(Debug, Serialize)]
struct ShownStatement {
    category: &'static str,
    rows: Statement,
}

/// Scrape each category & write it to `out`: row labels, or one JSON document when `json`.
pub(crate) async fn show(
    http_client: &HttpClient,
    config: &Config,
    symbol: &str,
    categories: &[FinancialCategory],
    json: bool,
    tui: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut statements = Vec::with_capacity(categories.len());

    for &category in categories {
        let rows = scrape(http_client, config, symbol, category, tui).await?;

        if !json {
            writeln!(out, "{}", category.as_str().blue().bold())?;
            for label in rows.labels() {
                writeln!(out, "{label}")?;
            }
        }
        statements.push(ShownStatement {
            category: category.as_str(),
            rows,
        });
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &Shown { symbol, statements })?;
        writeln!(out)?;
    }

    Ok(())
}

async fn scrape(
    http_client: &HttpClient,
    config: &Config,
    symbol: &str,
    category: FinancialCategory,
    tui: bool,
) -> anyhow::Result<Statement> {
    if tui {
        let url = spider::ft::statement_url(&config.ft_base_url, symbol, category)?;
        eprintln!("{}", "Gathering data from URL below:".blue());
        eprintln!("{url}");
    }

    let spinner = spider::tui::fetch_spinner(format!("fetching {category} ..."), tui)?;
    let scraped = spider::ft::scrape(http_client, config, symbol, category).await;
    spinner.finish_and_clear();

    scraped.map_err(|err| {
        error!("failed to scrape {category} for {symbol}, error({err})");
        anyhow::Error::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tearsheet_spider::SpiderError;
    use tearsheet_testkit::{http_client, pages, FakeGoogle, FakeServer};

    const TOKEN: &str = "ya29.test-token";

    async fn upload_to(server: &FakeServer, categories: &[FinancialCategory]) -> anyhow::Result<()> {
        let config = Config::with_base_url(&server.base_url);
        upload(
            &http_client(),
            &config,
            TOKEN,
            "Oracle",
            "ORCL:NYQ",
            categories,
            WriteMode::Cell,
            true,
        )
        .await
    }

    #[tokio::test]
    async fn upload_writes_every_category() {
        let server = FakeGoogle::oracle().start().await;

        upload_to(
            &server,
            &[FinancialCategory::BalanceSheet, FinancialCategory::CashFlow],
        )
        .await
        .unwrap();

        // CashFlow is the only missing worksheet
        let posts = server.requests_with("POST");
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].json()["requests"][0]["addSheet"]["properties"]["title"],
            "CashFlow"
        );

        let puts = server.requests_with("PUT");
        let ranges: Vec<String> = puts
            .iter()
            .map(|r| r.json()["range"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ranges.len(), 20);
        assert_eq!(ranges[0], "'BalanceSheet'!A1");
        assert_eq!(ranges[10], "'CashFlow'!A1");
        assert_eq!(ranges[19], "'CashFlow'!C4");
        assert_eq!(puts[19].json()["values"], json!([["--"]]));
    }

    #[tokio::test]
    async fn unknown_symbol_writes_nothing() {
        let server = FakeGoogle::oracle()
            .page("BalanceSheet", pages::no_results("ORCL:NYQ"))
            .start()
            .await;

        let err = upload_to(&server, &[FinancialCategory::BalanceSheet])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpiderError>(),
            Some(SpiderError::NoResults(_))
        ));

        assert!(server.requests_with("POST").is_empty());
        assert!(server.requests_with("PUT").is_empty());
    }

    #[tokio::test]
    async fn missing_table_writes_nothing() {
        let server = FakeGoogle::oracle()
            .page("IncomeStatement", pages::cash_flow())
            .start()
            .await;

        let err = upload_to(
            &server,
            &[FinancialCategory::IncomeStatement, FinancialCategory::BalanceSheet],
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpiderError>(),
            Some(SpiderError::TableNotFound {
                category: FinancialCategory::IncomeStatement
            })
        ));

        assert!(server.requests_with("POST").is_empty());
        assert!(server.requests_with("PUT").is_empty());
        // the later category is never fetched
        assert!(!server
            .requests()
            .iter()
            .any(|r| r.query_value("subview") == Some("BalanceSheet")));
    }

    #[tokio::test]
    async fn missing_spreadsheet_is_not_created() {
        let server = FakeGoogle::new()
            .page("BalanceSheet", pages::balance_sheet())
            .start()
            .await;

        let err = upload_to(&server, &[FinancialCategory::BalanceSheet])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "there is no spreadsheet named: Oracle, please manually create it"
        );
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn show_json_is_one_document() {
        let server = FakeGoogle::oracle().start().await;
        let config = Config::with_base_url(&server.base_url);
        let mut out = Vec::new();

        show(
            &http_client(),
            &config,
            "ORCL:NYQ",
            &[FinancialCategory::BalanceSheet, FinancialCategory::CashFlow],
            true,
            true,
            &mut out,
        )
        .await
        .unwrap();

        let document: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(document["symbol"], "ORCL:NYQ");
        assert_eq!(document["statements"][0]["category"], "BalanceSheet");
        assert_eq!(document["statements"][1]["category"], "CashFlow");
        assert_eq!(document["statements"][0]["rows"]["ASSETS"], json!([]));
        assert_eq!(
            document["statements"][1]["rows"]["Depreciation"],
            json!(["2,010", "--"])
        );

        // rows keep page order
        let text = String::from_utf8(out).unwrap();
        let fiscal = text.find("Fiscal data as of May 31 2013").unwrap();
        let total = text.find("Total Assets").unwrap();
        assert!(fiscal < total);
    }

    #[tokio::test]
    async fn show_lists_labels() {
        let server = FakeGoogle::oracle().start().await;
        let config = Config::with_base_url(&server.base_url);
        let mut out = Vec::new();

        show(
            &http_client(),
            &config,
            "ORCL:NYQ",
            &[FinancialCategory::CashFlow],
            false,
            false,
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("CashFlow"));
        assert_eq!(
            lines[1..],
            ["Fiscal data as of May 31 2013", "OPERATIONS", "Net Income", "Depreciation"]
        );
    }
}
