//! Storage abstraction and ledger services for Saldo.
//!
//! This crate sits between the pure domain logic in `saldo-core` and
//! whatever actually persists the data. The [`repo::LedgerRepository`]
//! trait is the seam: services orchestrate domain logic through it and
//! never touch storage directly. [`memory::MemoryRepository`] is the
//! bundled implementation, sharded per tenant schema so cross-tenant
//! isolation is structural rather than filtered.

pub mod memory;
pub mod repo;
pub mod services;

pub use memory::MemoryRepository;
pub use repo::LedgerRepository;
