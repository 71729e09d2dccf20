//! Local stand-ins for the FT tearsheet pages and the Drive & Sheets REST endpoints.
//!
//! ```no_run
//! # async fn demo() {
//! let server = tearsheet_testkit::FakeGoogle::oracle().start().await;
//! // point a `Config` at `server.base_url`, run, then inspect `server.requests()`
//! # }
//! ```

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;

pub mod pages;

/// First `sheetId` handed out by `addSheet`.
pub const FIRST_ADDED_SHEET_ID: i64 = 42;

/// A request as received by [`FakeServer`].
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug)]
struct Worksheet {
    spreadsheet_id: String,
    sheet_id: i64,
    title: String,
}

#[derive(Debug)]
struct Inner {
    pages: HashMap<String, String>,
    spreadsheets: Vec<(String, String)>,
    worksheets: Vec<Worksheet>,
    next_sheet_id: i64,
    values_status: Option<StatusCode>,
    add_sheet_reply: bool,
    requests: Vec<Recorded>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
            spreadsheets: Vec::new(),
            worksheets: Vec::new(),
            next_sheet_id: FIRST_ADDED_SHEET_ID,
            values_status: None,
            add_sheet_reply: true,
            requests: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Google {
    inner: Arc<Mutex<Inner>>,
}

impl Google {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("fake google state poisoned")
    }
}

// builder
// ----------------------------------------------------------------------------

/// Describes what the fake endpoints know about, before [`FakeGoogle::start`].
#[derive(Debug, Default)]
pub struct FakeGoogle {
    inner: Inner,
}

impl FakeGoogle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spreadsheet "Oracle" (`sheet-1`) with a BalanceSheet worksheet (`sheetId` 0), and
    /// tearsheet pages for BalanceSheet & CashFlow. Any other subview answers 404.
    pub fn oracle() -> Self {
        Self::new()
            .page("BalanceSheet", pages::balance_sheet())
            .page("CashFlow", pages::cash_flow())
            .spreadsheet("Oracle", "sheet-1")
            .worksheet("sheet-1", 0, "BalanceSheet")
    }

    /// Serve `html` for `?subview=<subview>`, whatever the symbol.
    pub fn page(mut self, subview: &str, html: impl Into<String>) -> Self {
        self.inner.pages.insert(subview.to_string(), html.into());
        self
    }

    pub fn spreadsheet(mut self, name: &str, id: &str) -> Self {
        self.inner
            .spreadsheets
            .push((name.to_string(), id.to_string()));
        self
    }

    pub fn worksheet(mut self, spreadsheet_id: &str, sheet_id: i64, title: &str) -> Self {
        self.inner.worksheets.push(Worksheet {
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_id,
            title: title.to_string(),
        });
        self
    }

    /// Answer every `values.update` with `status`.
    pub fn failing_values(mut self, status: u16) -> Self {
        self.inner.values_status =
            Some(StatusCode::from_u16(status).expect("valid HTTP status code"));
        self
    }

    /// Answer `batchUpdate` without an `addSheet` reply.
    pub fn without_add_sheet_reply(mut self) -> Self {
        self.inner.add_sheet_reply = false;
        self
    }

    pub async fn start(self) -> FakeServer {
        let state = Google {
            inner: Arc::new(Mutex::new(self.inner)),
        };

        let app = Router::new()
            .route("/research/Markets/Tearsheets/Financials", get(financials))
            .route("/drive/v3/files", get(files))
            .route("/v4/spreadsheets/:id", get(spreadsheet).post(batch_update))
            .route("/v4/spreadsheets/:id/values/:range", put(values))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("fake server address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("fake server stopped");
        });

        FakeServer {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}

/// A running [`FakeGoogle`].
pub struct FakeServer {
    pub base_url: String,
    state: Google,
}

impl FakeServer {
    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().requests.clone()
    }

    pub fn requests_with(&self, method: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

/// HTTP client that never goes through a proxy, whatever the environment says.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build test HTTP client")
}

// handlers
// ----------------------------------------------------------------------------

async fn record(State(google): State<Google>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default(),
        headers: parts
            .headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
        body: String::from_utf8_lossy(&bytes).to_string(),
    };
    {
        let mut inner = google.lock();
        inner.requests.push(recorded);
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[derive(Deserialize)]
struct FinancialsQuery {
    subview: Option<String>,
}

async fn financials(State(google): State<Google>, Query(query): Query<FinancialsQuery>) -> Response {
    let page = query
        .subview
        .and_then(|subview| google.lock().pages.get(&subview).cloned());
    match page {
        Some(html) => Html(html).into_response(),
        None => (StatusCode::NOT_FOUND, Html("<html>not found</html>")).into_response(),
    }
}

#[derive(Deserialize)]
struct FilesQuery {
    q: String,
}

async fn files(State(google): State<Google>, Query(query): Query<FilesQuery>) -> Json<Value> {
    let files: Vec<Value> = google
        .lock()
        .spreadsheets
        .iter()
        .filter(|(name, _)| query.q.starts_with(&format!("name = '{name}'")))
        .map(|(name, id)| json!({ "id": id, "name": name }))
        .collect();
    Json(json!({ "files": files }))
}

async fn spreadsheet(State(google): State<Google>, Path(id): Path<String>) -> Response {
    let inner = google.lock();
    if !inner.spreadsheets.iter().any(|(_, known)| *known == id) {
        return not_found();
    }

    let sheets: Vec<Value> = inner
        .worksheets
        .iter()
        .filter(|sheet| sheet.spreadsheet_id == id)
        .map(|sheet| json!({ "properties": { "sheetId": sheet.sheet_id, "title": sheet.title } }))
        .collect();
    Json(json!({ "sheets": sheets })).into_response()
}

async fn batch_update(
    State(google): State<Google>,
    Path(target): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(id) = target.strip_suffix(":batchUpdate") else {
        return not_found();
    };
    let title = body["requests"][0]["addSheet"]["properties"]["title"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let mut inner = google.lock();
    if !inner.add_sheet_reply {
        return Json(json!({ "spreadsheetId": id, "replies": [{}] })).into_response();
    }

    let sheet_id = inner.next_sheet_id;
    inner.next_sheet_id += 1;
    inner.worksheets.push(Worksheet {
        spreadsheet_id: id.to_string(),
        sheet_id,
        title: title.clone(),
    });

    Json(json!({
        "spreadsheetId": id,
        "replies": [{ "addSheet": { "properties": { "sheetId": sheet_id, "title": title } } }]
    }))
    .into_response()
}

async fn values(
    State(google): State<Google>,
    Path((id, range)): Path<(String, String)>,
) -> Response {
    match google.lock().values_status {
        Some(status) => (
            status,
            Json(json!({ "error": { "code": status.as_u16(), "message": "denied" } })),
        )
            .into_response(),
        None => Json(json!({ "spreadsheetId": id, "updatedRange": range })).into_response(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "code": 404, "message": "not found" } })),
    )
        .into_response()
}
