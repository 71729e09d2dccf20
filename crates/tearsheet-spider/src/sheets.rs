use crate::http::*;
use crate::{Config, Result, SpiderError};
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};
use url::Url;

/// Size of a freshly created worksheet.
pub const DEFAULT_ROWS: u32 = 1000;
pub const DEFAULT_COLS: u32 = 26;

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// A spreadsheet found on Drive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spreadsheet {
    pub id: String,
    pub name: String,
}

/// A tab within a [`Spreadsheet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Worksheet {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
    pub title: String,
}

// a1 notation
// ----------------------------------------------------------------------------

/// Column letters for a 1-based column index: 1 -> `A`, 26 -> `Z`, 27 -> `AA`.
///
/// Column 0 has no letters, and yields an empty string.
pub fn column_letters(col: usize) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Quote a worksheet title for use in a range, e.g. `Bob's` -> `'Bob''s'`.
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 reference to a single 1-based cell.
pub fn a1_cell(title: &str, row: usize, col: usize) -> String {
    format!("{}!{}{row}", quote_title(title), column_letters(col))
}

/// A1 reference to `width` cells of one row, starting at column A.
pub fn a1_row(title: &str, row: usize, width: usize) -> String {
    format!(
        "{}!A{row}:{}{row}",
        quote_title(title),
        column_letters(width.max(1))
    )
}

fn drive_query(name: &str) -> String {
    let name = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{name}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false")
}

// client
// ----------------------------------------------------------------------------

/// Thin client over the Drive & Sheets REST APIs, authorised with an OAuth access token.
#[derive(Clone, Debug)]
pub struct SheetsClient {
    http_client: HttpClient,
    access_token: String,
    sheets_base_url: String,
    drive_base_url: String,
}

impl SheetsClient {
    pub fn new(http_client: HttpClient, config: &Config, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            sheets_base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            drive_base_url: config.drive_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Authorise & send a request, turning any non-2xx response into [`SpiderError::Api`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        error!("request to {url} failed, error({status}: {body})");
        Err(SpiderError::Api {
            url,
            status: status.as_u16(),
            body,
        })
    }

    /// Open a spreadsheet by its name; the first match on Drive wins.
    pub async fn open(&self, name: &str) -> Result<Spreadsheet> {
        trace!("searching Drive for spreadsheet {name:?}");
        let request = self
            .http_client
            .get(format!("{}/files", self.drive_base_url))
            .query(&[
                ("q", drive_query(name).as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
            ]);
        let list: FileList = self.send(request).await?.json().await?;

        match list.files.into_iter().next() {
            Some(file) => {
                debug!("spreadsheet {name:?} opened, id {}", file.id);
                Ok(Spreadsheet {
                    id: file.id,
                    name: file.name,
                })
            }
            None => {
                error!("failed to find spreadsheet {name:?}");
                Err(SpiderError::SpreadsheetNotFound(name.to_string()))
            }
        }
    }

    /// Look up a worksheet by title.
    pub async fn worksheet(
        &self,
        spreadsheet: &Spreadsheet,
        title: &str,
    ) -> Result<Option<Worksheet>> {
        let request = self
            .http_client
            .get(format!(
                "{}/spreadsheets/{}",
                self.sheets_base_url, spreadsheet.id
            ))
            .query(&[("fields", "sheets.properties(sheetId,title)")]);
        let meta: SpreadsheetMeta = self.send(request).await?.json().await?;

        Ok(meta
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .find(|properties| properties.title == title)
            .map(|properties| Worksheet {
                spreadsheet_id: spreadsheet.id.clone(),
                sheet_id: properties.sheet_id,
                title: properties.title,
            }))
    }

    /// Add a worksheet of `rows` x `cols` cells.
    pub async fn add_worksheet(
        &self,
        spreadsheet: &Spreadsheet,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet> {
        let body = BatchUpdate {
            requests: vec![UpdateRequest {
                add_sheet: AddSheet {
                    properties: NewSheetProperties {
                        title,
                        grid_properties: GridProperties {
                            row_count: rows,
                            column_count: cols,
                        },
                    },
                },
            }],
        };
        let url = format!(
            "{}/spreadsheets/{}:batchUpdate",
            self.sheets_base_url, spreadsheet.id
        );
        let request = self.http_client.post(&url).json(&body);
        let response: BatchUpdateResponse = self.send(request).await?.json().await?;

        let properties = match response.replies.into_iter().find_map(|reply| reply.add_sheet) {
            Some(added) => added.properties,
            None => {
                error!("failed to add worksheet {title:?}, no addSheet reply from {url}");
                return Err(SpiderError::MissingReply {
                    url,
                    reply: "addSheet",
                });
            }
        };

        debug!("worksheet {title:?} added to {}", spreadsheet.name);
        Ok(Worksheet {
            spreadsheet_id: spreadsheet.id.clone(),
            sheet_id: properties.sheet_id,
            title: properties.title,
        })
    }

    /// Open the worksheet titled `title`, creating a [`DEFAULT_ROWS`] x [`DEFAULT_COLS`] one
    /// if the spreadsheet has none. The flag is `true` when the worksheet was created.
    pub async fn worksheet_or_create(
        &self,
        spreadsheet: &Spreadsheet,
        title: &str,
    ) -> Result<(Worksheet, bool)> {
        match self.worksheet(spreadsheet, title).await? {
            Some(worksheet) => Ok((worksheet, false)),
            None => {
                warn!("there is no worksheet named: {title}, creating it ...");
                let worksheet = self
                    .add_worksheet(spreadsheet, title, DEFAULT_ROWS, DEFAULT_COLS)
                    .await?;
                Ok((worksheet, true))
            }
        }
    }

    fn values_url(&self, worksheet: &Worksheet, range: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/spreadsheets/{}/values",
            self.sheets_base_url, worksheet.spreadsheet_id
        ))?;
        url.path_segments_mut()
            .map_err(|_| SpiderError::Config(format!("{} is not a base URL", self.sheets_base_url)))?
            .pop_if_empty()
            .push(range);
        Ok(url)
    }

    async fn update_values(
        &self,
        worksheet: &Worksheet,
        range: String,
        values: Vec<Vec<&str>>,
    ) -> Result<()> {
        let url = self.values_url(worksheet, &range)?;
        let body = ValueRange {
            range: &range,
            major_dimension: "ROWS",
            values,
        };
        let request = self
            .http_client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        self.send(request).await?;
        trace!("updated {range}");
        Ok(())
    }

    /// Write one cell; `row` & `col` are 1-based.
    pub async fn update_cell(
        &self,
        worksheet: &Worksheet,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<()> {
        let range = a1_cell(&worksheet.title, row, col);
        self.update_values(worksheet, range, vec![vec![value]]).await
    }

    /// Write a whole row from column A in a single request; `row` is 1-based.
    pub async fn update_row(&self, worksheet: &Worksheet, row: usize, values: &[&str]) -> Result<()> {
        let range = a1_row(&worksheet.title, row, values.len());
        self.update_values(worksheet, range, vec![values.to_vec()])
            .await
    }
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Reply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reply {
    add_sheet: Option<Sheet>,
}

// ser
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct BatchUpdate<'a> {
    requests: Vec<UpdateRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    add_sheet: AddSheet<'a>,
}

#[derive(Debug, Serialize)]
struct AddSheet<'a> {
    properties: NewSheetProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewSheetProperties<'a> {
    title: &'a str,
    grid_properties: GridProperties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GridProperties {
    row_count: u32,
    column_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<&'a str>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(0), "");
    }

    #[test]
    fn ranges() {
        assert_eq!(a1_cell("BalanceSheet", 3, 2), "'BalanceSheet'!B3");
        assert_eq!(a1_cell("Bob's", 1, 1), "'Bob''s'!A1");
        assert_eq!(a1_row("CashFlow", 7, 4), "'CashFlow'!A7:D7");
        assert_eq!(a1_row("CashFlow", 7, 0), "'CashFlow'!A7:A7");
    }

    #[test]
    fn drive_query_escapes_name() {
        assert_eq!(
            drive_query("O'Reilly"),
            "name = 'O\\'Reilly' and mimeType = 'application/vnd.google-apps.spreadsheet' \
             and trashed = false"
        );
    }

    #[test]
    fn add_sheet_body() {
        let body = BatchUpdate {
            requests: vec![UpdateRequest {
                add_sheet: AddSheet {
                    properties: NewSheetProperties {
                        title: "CashFlow",
                        grid_properties: GridProperties {
                            row_count: DEFAULT_ROWS,
                            column_count: DEFAULT_COLS,
                        },
                    },
                },
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "requests": [{
                    "addSheet": {
                        "properties": {
                            "title": "CashFlow",
                            "gridProperties": { "rowCount": 1000, "columnCount": 26 }
                        }
                    }
                }]
            })
        );
    }
}
