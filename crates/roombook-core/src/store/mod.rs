mod collection;
mod data_store;

pub use collection::Keyed;
pub use data_store::DataStore;
