use crate::sheets::{SheetsClient, Worksheet};
use crate::{Result, Statement};
use indicatif::ProgressBar;
use tracing::{debug, error, trace};

/// How rows reach the worksheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// One request per cell.
    #[default]
    Cell,

    /// One request per row.
    Row,
}

/// Write a [`Statement`] to `worksheet`, one row per label: the label in column A, its values
/// from column B onwards, in statement order starting at row 1.
pub async fn upload_statement(
    sheets: &SheetsClient,
    worksheet: &Worksheet,
    statement: &Statement,
    mode: WriteMode,
    pb: &ProgressBar,
) -> Result<()> {
    let time = std::time::Instant::now();
    let title = &worksheet.title;

    for (i, (label, values)) in statement.iter().enumerate() {
        let row = i + 1;
        trace!("{title}: writing row {row} {label:?} ({} values)", values.len());

        let written = match mode {
            WriteMode::Cell => write_cells(sheets, worksheet, row, label, values).await,
            WriteMode::Row => {
                let cells: Vec<&str> = std::iter::once(label)
                    .chain(values.iter().map(String::as_str))
                    .collect();
                sheets.update_row(worksheet, row, &cells).await
            }
        };
        written.map_err(|err| {
            error!("failed to write row {row} of {title}, error({err})");
            err
        })?;

        pb.inc(1);
    }

    pb.finish_and_clear();
    debug!(
        "{title}: {} rows uploaded. {}",
        statement.len(),
        crate::time_elapsed(time)
    );

    Ok(())
}

async fn write_cells(
    sheets: &SheetsClient,
    worksheet: &Worksheet,
    row: usize,
    label: &str,
    values: &[String],
) -> Result<()> {
    sheets.update_cell(worksheet, row, 1, label).await?;
    for (col, value) in values.iter().enumerate() {
        sheets.update_cell(worksheet, row, col + 2, value).await?;
    }
    Ok(())
}
