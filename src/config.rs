//! Store locations.

use std::path::{Path, PathBuf};

/// File name of the warehouse store
pub const DEFAULT_WAREHOUSE_FILE: &str = "warehouse.tsv";
/// File name of the sales store
pub const DEFAULT_SALES_FILE: &str = "sales_file.tsv";

/// Where the warehouse and sales stores live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub warehouse: PathBuf,
    pub sales: PathBuf,
}

impl StorePaths {
    pub fn new(data_dir: &Path, warehouse_file: &str, sales_file: &str) -> Self {
        Self {
            warehouse: data_dir.join(warehouse_file),
            sales: data_dir.join(sales_file),
        }
    }

    /// Default file names inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir, DEFAULT_WAREHOUSE_FILE, DEFAULT_SALES_FILE)
    }

    /// Creates the parent directories of both stores if needed.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for path in [&self.warehouse, &self.sales] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                    log::info!("Created directory: {}", parent.display());
                }
            }
        }
        Ok(())
    }
}
