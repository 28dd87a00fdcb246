//! CSV table discovery and parsing.

use almanac_core::Table;
use almanac_error::{AlmanacResult, ExtractionError, ExtractionErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A directory tree of CSV summaries.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    root: PathBuf,
}

impl TableDirectory {
    /// Wraps a directory path. Nothing is read until [`scan`](Self::scan).
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every `*.csv` file under the root, recursively, in sorted path
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a readable directory.
    pub fn scan(&self) -> AlmanacResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ExtractionError::new(ExtractionErrorKind::TableRead {
                table: self.root.display().to_string(),
                message: "not a directory".to_string(),
            })
            .into());
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        files.sort();

        info!(
            "Found {} CSV files in {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }
}

/// Table name used for a CSV file: its file stem.
pub(crate) fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads one CSV file with a header row into a [`Table`].
///
/// Short rows are padded with empty cells so that every row has one cell per
/// column. Cells beyond the header width are dropped.
///
/// # Errors
///
/// Returns [`ExtractionErrorKind::TableRead`] if the file cannot be opened or
/// is not valid CSV.
pub fn read_table(path: &Path) -> Result<Table, ExtractionError> {
    read_table_with_warnings(path).map(|(table, _)| table)
}

/// Like [`read_table`], also returning a data-quality warning for every
/// reshaping applied to the file.
///
/// # Errors
///
/// Returns [`ExtractionErrorKind::TableRead`] if the file cannot be opened or
/// is not valid CSV.
pub fn read_table_with_warnings(path: &Path) -> Result<(Table, Vec<String>), ExtractionError> {
    let name = table_name(path);
    let read_error = |message: String| {
        ExtractionError::new(ExtractionErrorKind::TableRead {
            table: name.clone(),
            message,
        })
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| read_error(e.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| read_error(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    let mut overlong = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| read_error(e.to_string()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() > columns.len() {
            // Data rows are numbered from 1, after the header.
            debug!(table = %name, row = index + 1, cells = row.len(), "Dropping cells beyond the header");
            overlong.push(index + 1);
        }
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    let mut warnings = Vec::new();
    if !overlong.is_empty() {
        let listed: Vec<String> = overlong.iter().map(usize::to_string).collect();
        warnings.push(format!(
            "WARNING: {} has rows wider than its {} columns (rows {}); extra cells were ignored",
            name,
            columns.len(),
            listed.join(", ")
        ));
    }

    debug!(table = %name, columns = columns.len(), rows = rows.len(), "Loaded table");
    Ok((Table::new(name, columns, rows), warnings))
}
