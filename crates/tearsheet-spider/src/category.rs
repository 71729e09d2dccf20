use std::fmt;
use std::str::FromStr;

/// One of the three reports published on an FT tearsheet.
///
/// The name doubles as the `subview` query parameter and as the title of the worksheet the
/// report is uploaded to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinancialCategory {
    BalanceSheet,
    CashFlow,
    IncomeStatement,
}

impl FinancialCategory {
    /// Every category, in upload order.
    pub const ALL: [FinancialCategory; 3] = [
        FinancialCategory::BalanceSheet,
        FinancialCategory::CashFlow,
        FinancialCategory::IncomeStatement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialCategory::BalanceSheet => "BalanceSheet",
            FinancialCategory::CashFlow => "CashFlow",
            FinancialCategory::IncomeStatement => "IncomeStatement",
        }
    }

    /// The text of the row that singles out the report table among the others on the page.
    pub fn marker(&self) -> &'static str {
        match self {
            FinancialCategory::BalanceSheet => "ASSETS",
            FinancialCategory::CashFlow => "OPERATIONS",
            FinancialCategory::IncomeStatement => "REVENUE AND GROSS PROFIT",
        }
    }
}

impl fmt::Display for FinancialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FinancialCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown financial category: {s}"))
    }
}
