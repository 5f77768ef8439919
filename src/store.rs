//! Tab-separated product stores.
//!
//! A store is a header row followed by one row per product. The file is
//! created lazily on the first append; a missing or header-only file is an
//! empty store.
//!
//! Appends only ever add a line at the end of the file and are not
//! crash-safe against a partially written line. Merges rewrite the whole file
//! into a temporary sibling which then replaces the original by rename, so an
//! interrupted merge never leaves a truncated store behind.

use crate::error::{InventoryError, Result};
use crate::record::{
    depleted, parse_quantity, restocked, Field, Product, ProductRow, CANONICAL_HEADER,
};
use csv::StringRecord;
use log::{debug, info, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DELIMITER: u8 = b'\t';

/// How an incoming quantity combines with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Restock: stored + incoming
    Add,
    /// Sale: stored - incoming, dropping the row once stock is exhausted
    Subtract,
}

/// What a merge did to the matching row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Whether a row with the product's key was found
    pub matched: bool,
    /// Quantity before the merge
    pub previous: Option<u32>,
    /// Quantity after the merge, `None` if the row was dropped or not found
    pub current: Option<u32>,
}

impl MergeOutcome {
    pub fn is_dropped(&self) -> bool {
        self.matched && self.current.is_none()
    }
}

/// A fully written rewrite that has not replaced the store yet.
///
/// Dropping it without calling [`PendingRewrite::commit`] deletes the
/// temporary file and leaves the store untouched.
#[derive(Debug)]
pub struct PendingRewrite {
    temp: NamedTempFile,
    target: PathBuf,
    outcome: MergeOutcome,
}

impl PendingRewrite {
    pub fn outcome(&self) -> MergeOutcome {
        self.outcome
    }

    /// Location of the staged file
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically replaces the store with the staged file.
    pub fn commit(self) -> Result<MergeOutcome> {
        self.temp
            .persist(&self.target)
            .map_err(|e| InventoryError::Io(e.error))?;
        info!("Rewrote {}", self.target.display());
        Ok(self.outcome)
    }
}

/// Handle to one store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader_from(file: File) -> csv::Reader<File> {
        csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .from_reader(file)
    }

    fn writer_to<W: Write>(writer: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(writer)
    }

    /// Opens the store for reading, `None` if the file does not exist.
    fn open_reader(&self) -> Result<Option<csv::Reader<File>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(Self::reader_from(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Store {} does not exist yet", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn schema_error(&self, column: &str) -> InventoryError {
        warn!(
            "Column '{}' missing from header of {}",
            column,
            self.path.display()
        );
        InventoryError::SchemaKey {
            column: column.to_string(),
            context: format!("the header of {}", self.path.display()),
        }
    }

    fn column_index(&self, headers: &StringRecord, column: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| self.schema_error(column))
    }

    fn require_columns(&self, headers: &StringRecord) -> Result<()> {
        for column in CANONICAL_HEADER {
            self.column_index(headers, column)?;
        }
        Ok(())
    }

    /// Reads the header row. `None` for a missing or zero-length file.
    pub fn header(&self) -> Result<Option<Vec<String>>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(None);
        };
        let headers = reader.headers()?;
        if headers.is_empty() {
            return Ok(None);
        }
        Ok(Some(headers.iter().map(str::to_string).collect()))
    }

    /// True if the store holds no product rows.
    ///
    /// A missing file is an empty store, not an error.
    pub fn is_empty(&self) -> Result<bool> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(true);
        };
        match reader.records().next() {
            None => Ok(true),
            Some(record) => {
                record?;
                Ok(false)
            }
        }
    }

    /// Number of product rows
    #[cfg(test)]
    pub(crate) fn len(&self) -> Result<usize> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(0);
        };
        let mut count = 0;
        for record in reader.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    /// Checks whether a product key is present in the `PRODUCT` column.
    pub fn contains(&self, key: &str) -> Result<bool> {
        self.contains_in(Field::Product.column(), key)
    }

    /// Checks whether `key` appears in `column`. Exact match, no normalization.
    pub fn contains_in(&self, column: &str, key: &str) -> Result<bool> {
        if self.is_empty()? {
            return Ok(false);
        }
        let Some(mut reader) = self.open_reader()? else {
            return Ok(false);
        };
        let headers = reader.headers()?.clone();
        let index = self.column_index(&headers, column)?;

        for record in reader.records() {
            if record?.get(index) == Some(key) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Fetches the stored record for a product key.
    pub fn find(&self, key: &str) -> Result<Option<Product>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(None);
        };
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(None);
        }
        self.require_columns(&headers)?;

        for row in reader.deserialize::<ProductRow>() {
            let row = row?;
            if row.product == key {
                return Product::try_from(row).map(Some);
            }
        }
        Ok(None)
    }

    /// All rows as typed records, in file order.
    pub fn products(&self) -> Result<Vec<Product>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(Vec::new());
        };
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        self.require_columns(&headers)?;

        reader
            .deserialize::<ProductRow>()
            .map(|row| Product::try_from(row?))
            .collect()
    }

    /// Appends one row.
    ///
    /// A new or zero-length file first receives the canonical header.
    /// Otherwise the existing header decides the column order; columns the
    /// record does not know are left empty.
    pub fn append(&self, product: &Product) -> Result<()> {
        let existing = self.header()?;
        let columns: Vec<String> = match &existing {
            Some(header) => {
                self.require_columns(&StringRecord::from(header.clone()))?;
                header.clone()
            }
            None => CANONICAL_HEADER.iter().map(|c| c.to_string()).collect(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        if existing.is_some() && !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = Self::writer_to(file);
        if existing.is_none() {
            debug!("Writing header to {}", self.path.display());
            writer.write_record(&columns)?;
        }

        let row: Vec<String> = columns
            .iter()
            .map(|column| {
                Field::from_column(column)
                    .map(|field| product.cell(field))
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&row)?;
        writer.flush()?;

        info!(
            "Appended {} X {} to {}",
            product.quantity(),
            product.name(),
            self.path.display()
        );
        Ok(())
    }

    /// Merges the product's quantity into its row and replaces the store.
    pub fn merge_or_subtract(
        &self,
        product: &Product,
        adjustment: Adjustment,
    ) -> Result<MergeOutcome> {
        self.stage_merge(product, adjustment)?.commit()
    }

    /// Writes the merged store to a temporary file next to the original
    /// without replacing it.
    ///
    /// Any error leaves the original untouched and removes the temporary file.
    pub fn stage_merge(&self, product: &Product, adjustment: Adjustment) -> Result<PendingRewrite> {
        let mut reader = Self::reader_from(File::open(&self.path)?);
        let headers = reader.headers()?.clone();
        let key_index = self.column_index(&headers, Field::Product.column())?;
        let quantity_index = self.column_index(&headers, Field::Quantity.column())?;

        let mut temp = NamedTempFile::new_in(self.directory())?;
        let mut outcome = MergeOutcome::default();
        {
            let mut writer = Self::writer_to(&mut temp);
            writer.write_record(&headers)?;

            for record in reader.records() {
                let record = record?;
                if record.get(key_index) != Some(product.name()) {
                    writer.write_record(&record)?;
                    continue;
                }

                let existing = parse_quantity(&record[quantity_index])?;
                let updated = match adjustment {
                    Adjustment::Add => Some(
                        restocked(existing, product.quantity()).ok_or_else(|| {
                            InventoryError::QuantityOverflow(product.name().to_string())
                        })?,
                    ),
                    Adjustment::Subtract => depleted(existing, product.quantity()),
                };
                outcome = MergeOutcome {
                    matched: true,
                    previous: Some(existing),
                    current: updated,
                };

                match updated {
                    Some(quantity) => {
                        let quantity = quantity.to_string();
                        let cells: Vec<&str> = record
                            .iter()
                            .enumerate()
                            .map(|(i, cell)| {
                                if i == quantity_index {
                                    quantity.as_str()
                                } else {
                                    cell
                                }
                            })
                            .collect();
                        writer.write_record(&cells)?;
                    }
                    None => warn!(
                        "Stock of '{}' exhausted, dropping it from {}",
                        product.name(),
                        self.path.display()
                    ),
                }
            }
            writer.flush()?;
        }

        if !outcome.matched {
            debug!("'{}' not found in {}", product.name(), self.path.display());
        }
        Ok(PendingRewrite {
            temp,
            target: self.path.clone(),
            outcome,
        })
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(matches!(last[0], b'\n' | b'\r'))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
