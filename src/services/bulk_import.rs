use std::io::Cursor;
use std::sync::Arc;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::errors::InternalError;
use crate::errors::internal::ImportError;
use crate::stores::{ImportRow, ReportStore};
use crate::types::internal::ReportFields;

/// Report field a spreadsheet column feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Province,
    UnitName,
    Month,
    Year,
    StaffPayment,
    FacultyPayment,
    ArrearsPayment,
}

/// Accepted header labels, Persian first
const HEADERS: &[(Column, &[&str])] = &[
    (Column::Province, &["استان", "province"]),
    (Column::UnitName, &["نام واحد", "unit_name"]),
    (Column::Month, &["ماه", "month"]),
    (Column::Year, &["سال", "year"]),
    (Column::StaffPayment, &["پرداخت کارکنان", "staff_payment"]),
    (Column::FacultyPayment, &["پرداخت هیئت علمی", "faculty_payment"]),
    (Column::ArrearsPayment, &["پرداخت معوقات", "arrears_payment"]),
];

const REQUIRED: [Column; 4] = [Column::Province, Column::UnitName, Column::Month, Column::Year];

impl Column {
    fn from_header(label: &str) -> Option<Self> {
        let label = label.trim();
        HEADERS
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| alias.eq_ignore_ascii_case(label)))
            .map(|(column, _)| *column)
    }

    fn is_payment(self) -> bool {
        matches!(self, Column::StaffPayment | Column::FacultyPayment | Column::ArrearsPayment)
    }

    fn label(self) -> &'static str {
        HEADERS
            .iter()
            .find(|(column, _)| *column == self)
            .map(|(_, aliases)| aliases[0])
            .unwrap_or_default()
    }
}

/// Spreadsheet upload → report rows → Report Store
///
/// Parsing happens on a blocking thread; insertion is delegated to
/// `ReportStore::bulk_import`, which runs the whole batch in one transaction.
pub struct BulkImporter {
    report_store: Arc<ReportStore>,
}

impl BulkImporter {
    pub fn new(report_store: Arc<ReportStore>) -> Self {
        Self { report_store }
    }

    /// Parse `bytes` and insert every row attributed to `submitter`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of reports imported
    /// * `Err(InternalError)` - `ImportError` for unreadable or malformed sheets and
    ///   for the first row the store rejects; nothing is persisted in that case
    pub async fn import<C>(&self, conn: &C, bytes: Vec<u8>, submitter: &str) -> Result<usize, InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let rows = tokio::task::spawn_blocking(move || parse_workbook(bytes))
            .await
            .map_err(|e| ImportError::Unreadable(format!("Task join error: {e}")))??;

        tracing::debug!("Parsed {} spreadsheet rows", rows.len());

        let imported = self.report_store.bulk_import(conn, &rows, submitter).await?;

        tracing::info!("Imported {} reports submitted by {}", imported, submitter);

        Ok(imported)
    }
}

/// Read the first worksheet of any format calamine recognizes
pub fn parse_workbook(bytes: Vec<u8>) -> Result<Vec<ImportRow>, ImportError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| ImportError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)?
        .map_err(|e| ImportError::Unreadable(e.to_string()))?;

    rows_from_table(range_to_table(&range))
}

/// Render the sheet as text, reading numeric payment cells as percentages
fn range_to_table(range: &Range<Data>) -> Vec<Vec<String>> {
    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Vec::new();
    };

    let payment_columns: Vec<bool> = header
        .iter()
        .map(|cell| Column::from_header(&cell_to_string(cell)).is_some_and(Column::is_payment))
        .collect();

    let mut table = vec![header.iter().map(cell_to_string).collect::<Vec<_>>()];
    for row in lines {
        let cells = row
            .iter()
            .enumerate()
            .map(|(index, cell)| match payment_columns.get(index) {
                Some(true) => payment_cell_to_string(cell),
                _ => cell_to_string(cell),
            })
            .collect();
        table.push(cells);
    }
    table
}

/// A percent-formatted cell holds a fraction: 100% is stored as 1.0
fn payment_cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Float(f) if (0.0..=1.0).contains(f) => {
            let percent = (f * 10_000.0).round() / 100.0;
            format!("{}%", cell_to_string(&Data::Float(percent)))
        }
        other => cell_to_string(other),
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // 1404.0 must read back as the year label "1404"
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                format!("{f}")
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
        Data::DateTime(dt) => format!("{dt}"),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}

/// Map a header row plus data rows onto report fields
///
/// The first row is the header. Rows whose cells are all blank are skipped.
/// Row numbers in the result are 1-based spreadsheet rows, header included.
pub fn rows_from_table(table: Vec<Vec<String>>) -> Result<Vec<ImportRow>, ImportError> {
    let mut lines = table.into_iter();
    let header = lines.next().ok_or(ImportError::Empty)?;

    let columns: Vec<Option<Column>> = header.iter().map(|label| Column::from_header(label)).collect();

    for required in REQUIRED {
        if !columns.contains(&Some(required)) {
            return Err(ImportError::MissingColumn(required.label().to_string()));
        }
    }

    let mut rows = Vec::new();
    for (index, cells) in lines.enumerate() {
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut fields = ReportFields::default();
        for (column, value) in columns.iter().zip(cells) {
            let Some(column) = column else { continue };
            match column {
                Column::Province => fields.province = value,
                Column::UnitName => fields.unit_name = value,
                Column::Month => fields.month = value,
                Column::Year => fields.year = value,
                Column::StaffPayment => fields.staff_payment = Some(value),
                Column::FacultyPayment => fields.faculty_payment = Some(value),
                Column::ArrearsPayment => fields.arrears_payment = Some(value),
            }
        }

        rows.push(ImportRow { row_number: index + 2, fields: fields.normalized() });
    }

    Ok(rows)
}
