// In memory implementation of the RemoteWorkbook port.
//
// Purpose
// - Support coordinator and handler tests and local development without the hosted workbook.
//
// Responsibilities
// - Store each sheet as a header row plus data rows.
// - Count range reads so tests can assert how often the remote source was hit.
// - Simulate outages, slow reads and writes, and sheets that reject writes.

use crate::shared::infrastructure::workbook::{
    RemoteWorkbook, RowMatcher, RowValues, WorkbookError, header_eq,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryWorkbook {
    sheets: RwLock<HashMap<String, Vec<Vec<Value>>>>,
    is_offline: AtomicBool,
    delay_fetch_ms: AtomicU64,
    delay_write_ms: AtomicU64,
    fetch_count: AtomicUsize,
    read_only_sheets: RwLock<HashSet<String>>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, sheet: &str, rows: Vec<Vec<Value>>) {
        self.sheets.write().await.insert(sheet.to_string(), rows);
    }

    /// Loads sheets from a `{"Sheet": [[header..], [row..]]}` document and returns how many were
    /// loaded. Sheets not named in the document are left as they are.
    pub async fn seed_from_json(&self, raw: &str) -> Result<usize, serde_json::Error> {
        let document: HashMap<String, Vec<Vec<Value>>> = serde_json::from_str(raw)?;
        let loaded = document.len();
        self.sheets.write().await.extend(document);
        Ok(loaded)
    }

    pub async fn rows(&self, sheet: &str) -> Option<Vec<Vec<Value>>> {
        self.sheets.read().await.get(sheet).cloned()
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_delay_fetch_ms(&self, ms: u64) {
        self.delay_fetch_ms.store(ms, Ordering::SeqCst);
    }

    pub fn set_delay_write_ms(&self, ms: u64) {
        self.delay_write_ms.store(ms, Ordering::SeqCst);
    }

    /// Appends and updates on `sheet` fail as unavailable while the sheet stays readable.
    pub async fn toggle_read_only(&self, sheet: &str) {
        let mut sheets = self.read_only_sheets.write().await;
        if !sheets.remove(sheet) {
            sheets.insert(sheet.to_string());
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), WorkbookError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(WorkbookError::Unavailable("Workbook offline".into()));
        }
        Ok(())
    }

    async fn ensure_writable(&self, sheet: &str) -> Result<(), WorkbookError> {
        let delay = self.delay_write_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.ensure_online()?;
        if self.read_only_sheets.read().await.contains(sheet) {
            return Err(WorkbookError::Unavailable(format!("{sheet} is read only")));
        }
        Ok(())
    }
}

fn column_index(sheet: &str, headers: &[Value], column: &str) -> Result<usize, WorkbookError> {
    headers
        .iter()
        .position(|header| header_eq(header, column))
        .ok_or_else(|| WorkbookError::UnknownColumn {
            sheet: sheet.to_string(),
            column: column.to_string(),
        })
}

#[async_trait::async_trait]
impl RemoteWorkbook for InMemoryWorkbook {
    async fn fetch_range(&self, sheet: &str) -> Result<Value, WorkbookError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_fetch_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.ensure_online()?;

        let guard = self.sheets.read().await;
        let rows = guard
            .get(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        Ok(Value::Array(
            rows.iter().map(|row| Value::Array(row.clone())).collect(),
        ))
    }

    async fn append_row(&self, sheet: &str, row: RowValues) -> Result<(), WorkbookError> {
        self.ensure_writable(sheet).await?;
        let mut guard = self.sheets.write().await;
        let rows = guard
            .get_mut(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        let headers = rows.first().cloned().unwrap_or_default();

        let mut cells = vec![Value::Null; headers.len()];
        for (column, value) in row {
            let index = column_index(sheet, &headers, &column)?;
            cells[index] = value;
        }
        rows.push(cells);
        Ok(())
    }

    async fn update_row(
        &self,
        sheet: &str,
        matcher: &RowMatcher,
        patch: RowValues,
    ) -> Result<(), WorkbookError> {
        self.ensure_writable(sheet).await?;
        let mut guard = self.sheets.write().await;
        let rows = guard
            .get_mut(sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;
        let headers = rows.first().cloned().unwrap_or_default();

        let mut indexed = Vec::with_capacity(patch.len());
        for (column, value) in patch {
            indexed.push((column_index(sheet, &headers, &column)?, value));
        }

        let target = rows
            .iter_mut()
            .skip(1)
            .find(|row| matcher.matches(&headers, row))
            .ok_or_else(|| WorkbookError::RowNotFound {
                sheet: sheet.to_string(),
                matcher: matcher.to_string(),
            })?;
        if target.len() < headers.len() {
            target.resize(headers.len(), Value::Null);
        }
        for (index, value) in indexed {
            target[index] = value;
        }
        Ok(())
    }
}
