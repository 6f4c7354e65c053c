//! Business rules layered over the ledger models.

pub mod services;
pub mod utils;
