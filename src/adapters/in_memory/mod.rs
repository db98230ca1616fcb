pub mod inventory_store;

pub use inventory_store::InventoryStore as InMemoryInventoryStore;
