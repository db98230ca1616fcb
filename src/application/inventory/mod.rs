mod errors;
mod inventory_service;
pub mod operation_result;

pub use errors::{InventoryApplicationError, Result};
pub use inventory_service::{
    AddedEntry, ServiceDependencies, add_or_merge, catalog_size, delete, find_entry, lend,
    list_all, list_available, list_unavailable, return_copy, search, update,
};
pub use operation_result::{ErrorKind, OperationResult};
