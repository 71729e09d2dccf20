//! Tearsheet-like HTML pages.

/// A page with a navigation table, a quote table, then the report table: a fiscal-year row,
/// the marker row, then `rows`.
pub fn tearsheet(marker: &str, rows: &[&[&str]]) -> String {
    let mut report = String::from("<table class=\"mod-ui-table\">");
    report.push_str("<tr><td>Fiscal data as of May 31 2013</td><td>2013</td><td>2012</td></tr>");
    report.push_str(&format!("<tr><td>{marker}</td></tr>"));
    for row in rows {
        report.push_str("<tr>");
        for cell in row.iter() {
            report.push_str(&format!("<td>\n  {cell}\n</td>"));
        }
        report.push_str("</tr>");
    }
    report.push_str("</table>");

    format!(
        "<!DOCTYPE html><html><head><title>Financials</title></head><body>\
         <table class=\"nav\"><tr><td>Summary</td><td>Financials</td></tr></table>\
         <table class=\"quote\"><tr><th>Price</th><td>33.17</td></tr></table>\
         {report}\
         </body></html>"
    )
}

/// Four rows: fiscal year, `ASSETS`, cash, total assets.
pub fn balance_sheet() -> String {
    tearsheet(
        "ASSETS",
        &[
            &["Cash And Short Term Investments", "32,216", "30,676"],
            &["Total Assets", "81,808", "78,327"],
        ],
    )
}

pub fn cash_flow() -> String {
    tearsheet(
        "OPERATIONS",
        &[&["Net Income", "10,925", "9,981"], &["Depreciation", "2,010", "--"]],
    )
}

pub fn income_statement() -> String {
    tearsheet(
        "REVENUE AND GROSS PROFIT",
        &[&["Total Revenue", "37,180", "37,121"]],
    )
}

pub fn no_results(symbol: &str) -> String {
    format!(
        "<html><body><div class=\"error\">No results were returned for {symbol}</div>\
         <table><tr><td>Search</td></tr></table></body></html>"
    )
}
