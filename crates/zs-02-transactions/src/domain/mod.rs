//! Domain layer for transaction correlation.

pub mod id_provider;
pub mod transaction;

pub use id_provider::TransactionIdProvider;
pub use transaction::Transaction;
