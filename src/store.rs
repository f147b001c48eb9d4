// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const ID_COLUMN: &str = "ID";
pub const RATING_COLUMN: &str = "Rating";
pub const PROMPT_CATEGORY_COLUMN: &str = "Prompt Category";
pub const PROMPT_COLUMN: &str = "Prompt";
pub const CHATGPT_COLUMN: &str = "ChatGPT";
pub const BARD_COLUMN: &str = "Bard";
pub const EXPLANATION_COLUMN: &str = "Explanation";
pub const TAGS_CHATGPT_COLUMN: &str = "Tags - ChatGPT";
pub const TAGS_BARD_COLUMN: &str = "Tags - Bard";

const KNOWN_COLUMNS: [&str; 9] = [
    ID_COLUMN,
    RATING_COLUMN,
    PROMPT_CATEGORY_COLUMN,
    PROMPT_COLUMN,
    CHATGPT_COLUMN,
    BARD_COLUMN,
    EXPLANATION_COLUMN,
    TAGS_CHATGPT_COLUMN,
    TAGS_BARD_COLUMN,
];

// Columns appended to the header row when the source file lacks them.
const SYNTHESIZED_COLUMNS: [&str; 3] = [ID_COLUMN, TAGS_CHATGPT_COLUMN, TAGS_BARD_COLUMN];

#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
    RecordNotFound(i64),
    Persist(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "{}", msg),
            StoreError::RecordNotFound(id) => write!(f, "Record id {} not found.", id),
            StoreError::Persist(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// One row of the explanations table. All columns except `id` are opaque
/// text; the tag columns hold comma-delimited tag lists owned by the tag
/// algebra in `crate::tags`.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: i64,
    pub rating: String,
    pub prompt_category: String,
    pub prompt: String,
    pub chatgpt: String,
    pub bard: String,
    pub explanation: String,
    pub tags_chatgpt: String,
    pub tags_bard: String,
    /// Values of source columns this service does not interpret, in header
    /// order. Never serialized to the API; written back verbatim on save.
    #[serde(skip)]
    pub extra: Vec<String>,
}

/// The full ordered table, alive only for the span of one request cycle.
/// `headers` is the output header order: the source order with any
/// synthesized columns appended, matching what the save path writes.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// File-backed record store. Every operation performs a full
/// load-modify-save cycle against the CSV file; `file_lock` serializes
/// those cycles across actix workers so interleaved rewrites cannot lose
/// updates, and readers always observe a complete snapshot.
pub struct ExplanationStore {
    csv_path: PathBuf,
    file_lock: Mutex<()>,
}

impl ExplanationStore {
    pub fn new(csv_path: PathBuf) -> Self {
        Self {
            csv_path,
            file_lock: Mutex::new(()),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Loads the table from disk. Holds the file lock so a concurrent
    /// rewrite cannot expose a torn file.
    pub fn read(&self) -> Result<Table, StoreError> {
        let _guard = self.lock();
        load_table(&self.csv_path)
    }

    /// Load-modify-save cycle under the file lock. The table is persisted
    /// only when `apply` succeeds; a failing transform leaves the file
    /// untouched.
    pub fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Table) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock();
        let mut table = load_table(&self.csv_path)?;
        let outcome = apply(&mut table)?;
        save_table(&self.csv_path, &table)?;
        Ok(outcome)
    }

    /// Replaces both tag fields of one record verbatim. Tag syntax is not
    /// validated here; that belongs to the callers composing the tag
    /// algebra.
    pub fn update_tags(
        &self,
        id: i64,
        tags_chatgpt: &str,
        tags_bard: &str,
    ) -> Result<(), StoreError> {
        self.mutate(|table| {
            let row = resolve_row(table, id)?;
            let record = &mut table.records[row];
            record.tags_chatgpt = tags_chatgpt.to_string();
            record.tags_bard = tags_bard.to_string();
            Ok(())
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.file_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Locates a record by its `ID` value. When no record matches and the
/// identifier is a valid 0-based row offset, the offset is used instead.
///
/// The positional path is a compatibility shim for legacy callers that
/// still send row offsets rather than ids; it is an explicit second
/// lookup, so out-of-range identifiers fail with `RecordNotFound` instead
/// of being misrouted.
pub fn resolve_row(table: &Table, id: i64) -> Result<usize, StoreError> {
    if let Some(row) = table.records.iter().position(|record| record.id == id) {
        return Ok(row);
    }
    if id >= 0 && (id as usize) < table.records.len() {
        return Ok(id as usize);
    }
    Err(StoreError::RecordNotFound(id))
}

fn load_table(path: &Path) -> Result<Table, StoreError> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| {
        StoreError::Unavailable(format!("Failed to open {}: {}", path.display(), err))
    })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| {
            StoreError::Unavailable(format!("Failed to parse {}: {}", path.display(), err))
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let column = |name: &str| headers.iter().position(|header| header == name);
    let id_col = column(ID_COLUMN);
    let rating_col = column(RATING_COLUMN);
    let prompt_category_col = column(PROMPT_CATEGORY_COLUMN);
    let prompt_col = column(PROMPT_COLUMN);
    let chatgpt_col = column(CHATGPT_COLUMN);
    let bard_col = column(BARD_COLUMN);
    let explanation_col = column(EXPLANATION_COLUMN);
    let tags_chatgpt_col = column(TAGS_CHATGPT_COLUMN);
    let tags_bard_col = column(TAGS_BARD_COLUMN);

    let extra_cols: Vec<usize> = (0..headers.len())
        .filter(|&idx| !KNOWN_COLUMNS.contains(&headers[idx].as_str()))
        .collect();

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row.map_err(|err| {
            StoreError::Unavailable(format!("Failed to parse {}: {}", path.display(), err))
        })?;
        let cell =
            |col: Option<usize>| normalize_cell(col.and_then(|idx| row.get(idx)).unwrap_or(""));

        let id_text = cell(id_col);
        let id = if id_text.is_empty() {
            (row_idx + 1) as i64
        } else {
            id_text.parse::<i64>().map_err(|_| {
                StoreError::Unavailable(format!(
                    "Invalid id '{}' in row {} of {}",
                    id_text,
                    row_idx + 1,
                    path.display()
                ))
            })?
        };

        records.push(Record {
            id,
            rating: cell(rating_col),
            prompt_category: cell(prompt_category_col),
            prompt: cell(prompt_col),
            chatgpt: cell(chatgpt_col),
            bard: cell(bard_col),
            explanation: cell(explanation_col),
            tags_chatgpt: cell(tags_chatgpt_col),
            tags_bard: cell(tags_bard_col),
            extra: extra_cols
                .iter()
                .map(|&idx| row.get(idx).unwrap_or("").to_string())
                .collect(),
        });
    }

    // Schema is additive on write: missing required columns are appended
    // after the source columns, preserving the original header order.
    let mut out_headers = headers;
    for name in SYNTHESIZED_COLUMNS {
        if !out_headers.iter().any(|header| header == name) {
            out_headers.push(name.to_string());
        }
    }

    Ok(Table {
        headers: out_headers,
        records,
    })
}

/// Full rewrite via write-to-temp-then-rename, so a concurrent reader
/// never sees a half-written file.
fn save_table(path: &Path, table: &Table) -> Result<(), StoreError> {
    let mut temp_path = path.to_path_buf();
    let temp_name = match path.file_name() {
        Some(name) => format!("{}.tmp", name.to_string_lossy()),
        None => {
            return Err(StoreError::Persist(format!(
                "Data file path {} has no file name",
                path.display()
            )));
        }
    };
    temp_path.set_file_name(temp_name);

    let persist_err = |err: csv::Error| {
        StoreError::Persist(format!("Failed to write {}: {}", temp_path.display(), err))
    };

    let mut writer = csv::Writer::from_path(&temp_path).map_err(persist_err)?;
    writer.write_record(&table.headers).map_err(persist_err)?;

    for record in &table.records {
        let mut extras = record.extra.iter();
        let mut row: Vec<String> = Vec::with_capacity(table.headers.len());
        for header in &table.headers {
            row.push(match header.as_str() {
                ID_COLUMN => record.id.to_string(),
                RATING_COLUMN => record.rating.clone(),
                PROMPT_CATEGORY_COLUMN => record.prompt_category.clone(),
                PROMPT_COLUMN => record.prompt.clone(),
                CHATGPT_COLUMN => record.chatgpt.clone(),
                BARD_COLUMN => record.bard.clone(),
                EXPLANATION_COLUMN => record.explanation.clone(),
                TAGS_CHATGPT_COLUMN => record.tags_chatgpt.clone(),
                TAGS_BARD_COLUMN => record.tags_bard.clone(),
                _ => extras.next().cloned().unwrap_or_default(),
            });
        }
        writer.write_record(&row).map_err(persist_err)?;
    }

    writer.flush().map_err(|err| {
        StoreError::Persist(format!("Failed to write {}: {}", temp_path.display(), err))
    })?;
    drop(writer);

    fs::rename(&temp_path, path).map_err(|err| {
        let _ = fs::remove_file(&temp_path);
        StoreError::Persist(format!("Failed to replace {}: {}", path.display(), err))
    })
}

/// The upstream export writes a textual `NaN` into cells that were empty
/// at extraction time; those sentinels are never real data and are read
/// back as empty strings.
fn normalize_cell(raw: &str) -> String {
    if raw.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        raw.to_string()
    }
}
