// Remote workbook port.
//
// Purpose
// - Describe the row-shaped access the registry needs from the hosted spreadsheet.
//
// Boundaries
// - Request construction, sessions and authentication belong to adapters. The core only consumes
//   the header row + data rows shape and hands back header-keyed values for writes.

pub mod in_memory;

use crate::modules::registry::core::normalize::cell_to_string;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Cell values for one row, keyed by the sheet's header label.
pub type RowValues = BTreeMap<String, Value>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkbookError {
    #[error("workbook unavailable: {0}")]
    Unavailable(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("unknown column {column} on sheet {sheet}")]
    UnknownColumn { sheet: String, column: String },

    #[error("no row on sheet {sheet} matches {matcher}")]
    RowNotFound { sheet: String, matcher: String },
}

/// Selects rows whose cells equal the given values, compared trimmed and case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowMatcher {
    pub criteria: Vec<(String, String)>,
}

impl RowMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.criteria.push((column.into(), value.into()));
        self
    }

    pub fn matches(&self, headers: &[Value], row: &[Value]) -> bool {
        self.criteria.iter().all(|(column, expected)| {
            headers
                .iter()
                .position(|header| header_eq(header, column))
                .and_then(|index| row.get(index))
                .map(|cell| cell_to_string(cell).trim().eq_ignore_ascii_case(expected.trim()))
                .unwrap_or(false)
        })
    }
}

impl std::fmt::Display for RowMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .criteria
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

pub(crate) fn header_eq(header: &Value, label: &str) -> bool {
    header
        .as_str()
        .map(|h| h.trim().eq_ignore_ascii_case(label.trim()))
        .unwrap_or(false)
}

#[async_trait]
pub trait RemoteWorkbook: Send + Sync {
    /// Header row followed by data rows, as the remote range read returns them.
    async fn fetch_range(&self, sheet: &str) -> Result<Value, WorkbookError>;
    async fn append_row(&self, sheet: &str, row: RowValues) -> Result<(), WorkbookError>;
    async fn update_row(
        &self,
        sheet: &str,
        matcher: &RowMatcher,
        patch: RowValues,
    ) -> Result<(), WorkbookError>;
}
