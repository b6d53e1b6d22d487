//! In-memory repository implementations

mod memory;

pub use memory::{
    InMemoryRepositoryProvider, MemoryAccounts, MemoryBills, MemoryReadings, MemoryTariffs,
};
