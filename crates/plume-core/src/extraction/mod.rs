pub mod json;
pub mod table;
pub mod xlsx;

use crate::error::PlumeError;
pub use table::Table;

/// Trait for table ingestion backends.
pub trait TableReader: Send + Sync {
    /// Read raw file bytes into a single table.
    fn read_table(&self, bytes: &[u8]) -> Result<Table, PlumeError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
