//! Numeric helpers over string tables.

use almanac_core::Table;
use almanac_error::{ExtractionError, ExtractionErrorKind};

/// Parses a cell as a number. Booleans read as 1 and 0.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    match cell {
        "True" | "true" | "TRUE" => Some(1.0),
        "False" | "false" | "FALSE" => Some(0.0),
        _ => cell.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Whether a cell reads as true.
pub(crate) fn is_truthy(cell: Option<&str>) -> bool {
    cell.and_then(parse_number).is_some_and(|v| v != 0.0)
}

pub(crate) fn missing_column(table: &Table, column: &str) -> ExtractionError {
    ExtractionError::new(ExtractionErrorKind::MissingColumn {
        table: table.name().clone(),
        column: column.to_string(),
    })
}

/// Numeric values of a column in row order; `None` marks a missing cell.
///
/// Fails on the first present cell that is not a number.
pub(crate) fn numbers(table: &Table, column: &str) -> Result<Vec<Option<f64>>, ExtractionError> {
    let cells = table
        .column(column)
        .ok_or_else(|| missing_column(table, column))?;
    cells
        .into_iter()
        .map(|cell| match cell {
            None => Ok(None),
            Some(text) => parse_number(text).map(Some).ok_or_else(|| {
                ExtractionError::new(ExtractionErrorKind::InvalidNumber {
                    table: table.name().clone(),
                    column: column.to_string(),
                    value: text.to_string(),
                })
            }),
        })
        .collect()
}

/// Mean of the present values, `None` when there are none.
pub(crate) fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Sum of the present values.
pub(crate) fn sum(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().sum()
}

/// Row index of the first largest present value.
pub(crate) fn arg_max(values: &[Option<f64>]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Row index of the first smallest present value.
pub(crate) fn arg_min(values: &[Option<f64>]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// A fraction rendered as a percentage with two decimals.
pub(crate) fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Share of the total held by the top fifth of rows ranked by `values`.
///
/// Returns `None` when the total is not positive.
pub(crate) fn top_fifth_share(values: &[Option<f64>]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().map(|v| v.unwrap_or(0.0)).collect();
    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return None;
    }
    sorted.sort_by(|a, b| b.total_cmp(a));
    let top = sorted.len() / 5;
    Some(sorted.iter().take(top).sum::<f64>() / total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0.25"), Some(0.25));
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number("True"), Some(1.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("twelve"), None);
    }

    #[test]
    fn test_arg_extremes_pick_first_occurrence() {
        let values = [Some(0.2), None, Some(0.9), Some(0.9), Some(0.1), Some(0.1)];
        assert_eq!(arg_max(&values), Some(2));
        assert_eq!(arg_min(&values), Some(4));
        assert_eq!(arg_max(&[None, None]), None);
    }

    #[test]
    fn test_mean_skips_missing() {
        assert_eq!(mean(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean(&[None]), None);
    }

    #[test]
    fn test_percent_format() {
        assert_eq!(percent(0.8234), "82.34%");
        assert_eq!(percent(1.0), "100.00%");
    }

    #[test]
    fn test_top_fifth_share() {
        let values: Vec<Option<f64>> = [50.0, 10.0, 10.0, 10.0, 10.0, 5.0, 5.0, 0.0, 0.0, 0.0]
            .into_iter()
            .map(Some)
            .collect();
        // Top two of ten rows hold 60 of 100.
        assert_eq!(top_fifth_share(&values), Some(0.6));
        assert_eq!(top_fifth_share(&[Some(0.0)]), None);
    }
}
