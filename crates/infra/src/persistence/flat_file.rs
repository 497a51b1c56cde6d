//! Line-oriented snapshot file: `id|name|quantity|threshold`, one item per line.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use stockroom_core::DomainError;
use stockroom_inventory::{InventoryStore, StockItem, StockLevel};

/// Field separator; reserved, never written inside a field.
pub const DELIMITER: char = '|';

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a load did with each record.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Wrong field count, non-integer numbers, or failed item validation.
    pub skipped_malformed: usize,
    /// Identity already present in the store.
    pub skipped_duplicate: usize,
}

/// What a save wrote.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: usize,
    /// Items whose id cannot be represented in the format.
    pub skipped: usize,
}

/// Flat-file persistence for an [`InventoryStore`].
///
/// Saves are whole-file, last-write-wins snapshots. Loads are additive: each
/// record goes through `add_product`, so a record never replaces an item that
/// is already stocked.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, store: &InventoryStore) -> Result<SaveReport, PersistenceError> {
        let mut report = SaveReport::default();
        let mut lines = Vec::new();

        for level in store.snapshot() {
            match encode_record(&level) {
                Some(line) => {
                    lines.push(line);
                    report.written += 1;
                }
                None => {
                    warn!(item_id = %level.id, "id contains a reserved character; not saved");
                    report.skipped += 1;
                }
            }
        }

        fs::write(&self.path, lines.join("\n")).map_err(|source| self.io_error(source))?;
        info!(
            path = %self.path.display(),
            written = report.written,
            skipped = report.skipped,
            "inventory saved"
        );
        Ok(report)
    }

    /// Load records into `store`. A missing file is an empty load.
    pub fn load(&self, store: &InventoryStore) -> Result<LoadReport, PersistenceError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no inventory file; starting empty");
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut report = LoadReport::default();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| self.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }

            let item = match decode_record(&line) {
                Ok(item) => item,
                Err(reason) => {
                    warn!(line = index + 1, %reason, "skipping malformed inventory record");
                    report.skipped_malformed += 1;
                    continue;
                }
            };

            match store.add_product(item) {
                Ok(_) => report.loaded += 1,
                Err(DomainError::DuplicateProduct(id)) => {
                    warn!(line = index + 1, item_id = %id, "skipping duplicate inventory record");
                    report.skipped_duplicate += 1;
                }
                Err(other) => {
                    warn!(line = index + 1, error = %other, "skipping inventory record");
                    report.skipped_malformed += 1;
                }
            }
        }

        info!(
            path = %self.path.display(),
            loaded = report.loaded,
            malformed = report.skipped_malformed,
            duplicates = report.skipped_duplicate,
            "inventory loaded"
        );
        Ok(report)
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Replace characters that would break the record structure.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == DELIMITER || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

fn encode_record(level: &StockLevel) -> Option<String> {
    let id = level.id.as_str();
    if id.contains([DELIMITER, '\n', '\r']) {
        return None;
    }
    Some(format!(
        "{}{d}{}{d}{}{d}{}",
        id,
        sanitize_name(&level.name),
        level.quantity,
        level.reorder_threshold,
        d = DELIMITER
    ))
}

fn decode_record(line: &str) -> Result<StockItem, String> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    let [id, name, quantity, threshold] = parts.as_slice() else {
        return Err(format!("expected 4 fields, found {}", parts.len()));
    };

    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|e| format!("quantity {quantity:?}: {e}"))?;
    let threshold: i64 = threshold
        .trim()
        .parse()
        .map_err(|e| format!("threshold {threshold:?}: {e}"))?;

    StockItem::new(*id, *name, quantity, threshold).map_err(|e| e.to_string())
}
