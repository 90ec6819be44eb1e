//! In-memory tabular frame
//!
//! Uploaded files are parsed into a `Frame` (column names, inferred dtypes,
//! string cells) before any analysis runs. CSV goes through the csv crate,
//! Excel workbooks through calamine (first worksheet only).

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// Per-column descriptive statistics, numeric columns only.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub columns: Vec<String>,
    pub dtypes: Vec<ColumnType>,
    pub rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let dtypes = infer_dtypes(&columns, &rows);
        Self {
            columns,
            dtypes,
            rows,
        }
    }

    /// Load a single file, dispatching on extension.
    pub fn load_path(path: &Path) -> AppResult<Frame> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            Self::from_csv_path(path)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Self::from_excel_path(path)
        } else {
            Err(AppError::Parse(format!("Unsupported file type: {}", name)))
        }
    }

    pub fn from_csv_path(path: &Path) -> AppResult<Frame> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| AppError::Parse(format!("Failed to open {}: {}", path.display(), e)))?;
        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| AppError::Parse(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| AppError::Parse(e.to_string()))?;
            let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
            // Flexible records may be short; pad to the header width.
            row.resize(columns.len(), String::new());
            row.truncate(columns.len());
            rows.push(row);
        }
        Ok(Frame::new(columns, rows))
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> AppResult<Frame> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| AppError::Parse(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| AppError::Parse(e.to_string()))?;
            let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
            row.resize(columns.len(), String::new());
            row.truncate(columns.len());
            rows.push(row);
        }
        Ok(Frame::new(columns, rows))
    }

    /// First worksheet of an Excel workbook, first row taken as headers.
    pub fn from_excel_path(path: &Path) -> AppResult<Frame> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| AppError::Parse(format!("Failed to open {}: {}", path.display(), e)))?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::Parse("Workbook has no sheets".to_string()))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| AppError::Parse(format!("Failed to read sheet {}: {}", sheet_name, e)))?;

        let mut cell_rows = range.rows();
        let columns: Vec<String> = match cell_rows.next() {
            Some(header) => header.iter().map(cell_to_string).collect(),
            None => return Err(AppError::Parse("Worksheet is empty".to_string())),
        };

        let mut rows = Vec::new();
        for cells in cell_rows {
            let mut row: Vec<String> = cells.iter().map(cell_to_string).collect();
            row.resize(columns.len(), String::new());
            row.truncate(columns.len());
            rows.push(row);
        }
        Ok(Frame::new(columns, rows))
    }

    /// Combine frames by union of column names; missing cells stay empty.
    /// Mirrors what a row-wise dataframe concat does with mismatched columns.
    pub fn concat(frames: Vec<Frame>) -> AppResult<Frame> {
        let mut iter = frames.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| AppError::Parse("Could not load data files".to_string()))?;

        let mut columns = first.columns.clone();
        let mut parts = vec![first];
        for frame in iter {
            for col in &frame.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
            parts.push(frame);
        }

        let mut rows = Vec::new();
        for frame in &parts {
            let mapping: Vec<Option<usize>> = columns
                .iter()
                .map(|c| frame.columns.iter().position(|fc| fc == c))
                .collect();
            for row in &frame.rows {
                let combined: Vec<String> = mapping
                    .iter()
                    .map(|m| match m {
                        Some(idx) => row.get(*idx).cloned().unwrap_or_default(),
                        None => String::new(),
                    })
                    .collect();
                rows.push(combined);
            }
        }
        Ok(Frame::new(columns, rows))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Non-empty values of a column parsed as f64.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|v| !v.trim().is_empty())
            .filter_map(|v| v.trim().parse::<f64>().ok())
            .collect()
    }

    pub fn numeric_columns(&self) -> Vec<usize> {
        self.dtypes
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == ColumnType::Numeric)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn text_columns(&self) -> Vec<usize> {
        self.dtypes
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == ColumnType::Text)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Descriptive statistics for every numeric column.
    pub fn describe(&self) -> Vec<ColumnStats> {
        let mut stats = Vec::new();
        for idx in self.numeric_columns() {
            let mut values = self.numeric_values(idx);
            if values.is_empty() {
                continue;
            }
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let median = if count % 2 == 0 {
                (values[count / 2 - 1] + values[count / 2]) / 2.0
            } else {
                values[count / 2]
            };
            stats.push(ColumnStats {
                column: self.columns[idx].clone(),
                count,
                mean,
                std_dev: std_dev(&values, mean),
                min: values[0],
                median,
                max: values[count - 1],
            });
        }
        stats
    }

    /// The prompt context string: shape, columns, dtypes, a sample of rows and
    /// numeric statistics. This is what gets pasted into the LLM prompt.
    pub fn context(&self, max_rows: usize) -> String {
        let mut out = format!(
            "Dataset has {} rows and {} columns.\n\n",
            self.row_count(),
            self.column_count()
        );
        out.push_str(&format!("Columns: {}\n\n", self.columns.join(", ")));

        out.push_str("Data types:\n");
        for (col, dtype) in self.columns.iter().zip(self.dtypes.iter()) {
            out.push_str(&format!("{}: {}\n", col, dtype));
        }
        out.push('\n');

        let shown = max_rows.min(self.row_count());
        out.push_str(&format!("Sample data (first {} rows):\n", shown));
        out.push_str(&self.columns.join(" | "));
        out.push('\n');
        for row in self.rows.iter().take(shown) {
            out.push_str(&row.join(" | "));
            out.push('\n');
        }

        let stats = self.describe();
        if !stats.is_empty() {
            out.push_str("\nNumeric column statistics:\n");
            out.push_str("column | count | mean | std | min | median | max\n");
            for s in &stats {
                out.push_str(&format!(
                    "{} | {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4}\n",
                    s.column, s.count, s.mean, s.std_dev, s.min, s.median, s.max
                ));
            }
        }
        out
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A column is numeric when every non-empty cell parses as f64 and at least
/// one cell is non-empty.
fn infer_dtypes(columns: &[String], rows: &[Vec<String>]) -> Vec<ColumnType> {
    (0..columns.len())
        .map(|idx| {
            let mut non_empty = 0usize;
            for row in rows {
                if let Some(val) = row.get(idx) {
                    let trimmed = val.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    non_empty += 1;
                    if trimmed.parse::<f64>().is_err() {
                        return ColumnType::Text;
                    }
                }
            }
            if non_empty > 0 {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    variance.sqrt()
}
