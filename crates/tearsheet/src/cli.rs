use clap::{Parser, Subcommand, ValueEnum};
use tearsheet_spider::{upload::WriteMode, FinancialCategory};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// Without it, progress bars are shown instead of log lines.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape FT financial statements and upload them to a Google spreadsheet.
    Upload {
        /// Name of the spreadsheet to update, e.g. the company name; it must already exist.
        #[arg(short, long)]
        spreadsheet: String,

        /// Company symbol, e.g. ORCL:NYQ; prompted for when missing.
        #[arg(long)]
        symbol: Option<String>,

        /// Specify the statements to upload.
        ///
        /// If no categories are provided, all are uploaded.
        #[arg(short, long, value_delimiter = ',')]
        categories: Option<Vec<Category>>,

        /// One API request per cell, or per row.
        #[arg(short, long, default_value = "cell")]
        mode: Mode,
    },

    /// Scrape FT financial statements and print them.
    Show {
        /// Company symbol, e.g. ORCL:NYQ; prompted for when missing.
        #[arg(long)]
        symbol: Option<String>,

        /// Specify the statements to print.
        ///
        /// If no categories are provided, all are printed.
        #[arg(short, long, value_delimiter = ',')]
        categories: Option<Vec<Category>>,

        /// Print whole rows as JSON, rather than the row labels.
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    /// Balance sheet.
    BalanceSheet,

    /// Cash flow statement.
    CashFlow,

    /// Income statement.
    IncomeStatement,
}

impl From<Category> for FinancialCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::BalanceSheet => FinancialCategory::BalanceSheet,
            Category::CashFlow => FinancialCategory::CashFlow,
            Category::IncomeStatement => FinancialCategory::IncomeStatement,
        }
    }
}

/// Requested categories, deduplicated, in upload order; all of them when none were given.
pub fn categories(requested: Option<Vec<Category>>) -> Vec<FinancialCategory> {
    match requested {
        Some(requested) => FinancialCategory::ALL
            .into_iter()
            .filter(|category| requested.iter().any(|r| FinancialCategory::from(*r) == *category))
            .collect(),
        None => FinancialCategory::ALL.to_vec(),
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Cell,
    Row,
}

impl From<Mode> for WriteMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Cell => WriteMode::Cell,
            Mode::Row => WriteMode::Row,
        }
    }
}
