pub mod json_backend;

use crate::{errors::Result, ledger::Wallet};

/// Abstraction over where the wallet collection is kept between sessions.
///
/// Loading is infallible from the caller's point of view: a missing or unreadable
/// store yields an empty collection. Saving reports failure so the caller can log it.
pub trait WalletStore {
    fn load(&self) -> Vec<Wallet>;
    fn save(&self, wallets: &[Wallet]) -> Result<()>;
    fn has_saved_data(&self) -> bool;
}

pub use json_backend::{load_wallets_from_path, save_wallets_to_path, wallet_warnings, JsonFileStore};
