//! Raw row access for provider exports: `.xlsx` workbooks (first worksheet) or `.csv` files.
//!
//! Cells come back as trimmed text, blank cells as `None`, so both formats feed the same
//! header repair and coercion.

use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::{DataLoadError, Result};

pub const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];
pub const CSV_EXTENSION: &str = "csv";

pub type RawRow = Vec<Option<String>>;

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_workbook(path: &Path) -> bool {
    extension(path).is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_supported(path: &Path) -> bool {
    is_workbook(path) || extension(path).is_some_and(|ext| ext == CSV_EXTENSION)
}

/// Every row of the file, header included. Workbooks are read from their first worksheet.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    if is_workbook(path) {
        return read_workbook_rows(path);
    }
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_rows(file).map_err(|source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_csv_rows<R: Read>(rdr: R) -> std::result::Result<Vec<RawRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(text_cell).collect());
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path) -> Result<Vec<RawRow>> {
    let workbook_err = |source| DataLoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataLoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_err)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect())
}

fn text_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn workbook_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Some(dt.as_f64().to_string()),
        },
        other => text_cell(&other.to_string()),
    }
}

pub fn is_blank_row(row: &[Option<String>]) -> bool {
    row.iter().all(Option::is_none)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_are_trimmed_and_blanks_dropped() {
        let rows = read_csv_rows("Match, Goals ,\n a , 1,\n".as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Some("Match".to_string()), Some("Goals".to_string()), None],
                vec![Some("a".to_string()), Some("1".to_string()), None],
            ]
        );
        assert!(is_blank_row(&[None, None]));
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(is_workbook(Path::new("logs/Player_stats_A.XLSX")));
        assert!(is_supported(Path::new("season.csv")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_workbook(Path::new("season.csv")));
    }

    #[test]
    fn workbook_numbers_render_like_csv_text() {
        assert_eq!(workbook_cell(&Data::Float(90.0)), Some("90".to_string()));
        assert_eq!(workbook_cell(&Data::Float(0.85)), Some("0.85".to_string()));
        assert_eq!(workbook_cell(&Data::String(" CF ".into())), Some("CF".to_string()));
        assert_eq!(workbook_cell(&Data::Empty), None);
    }
}
