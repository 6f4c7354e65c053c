use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;

use crate::{
    core::utils::{data_file_in, write_atomic},
    errors::Result,
    ledger::Wallet,
};

use super::WalletStore;

/// Stores the whole wallet collection as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted in the default data file under `base`.
    pub fn in_dir(base: &Path) -> Self {
        Self::new(data_file_in(base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WalletStore for JsonFileStore {
    fn load(&self) -> Vec<Wallet> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no saved data, starting empty");
            return Vec::new();
        }
        match load_wallets_from_path(&self.path) {
            Ok(wallets) => {
                for warning in wallet_warnings(&wallets) {
                    tracing::warn!(path = %self.path.display(), "{warning}");
                }
                tracing::info!(
                    path = %self.path.display(),
                    wallets = wallets.len(),
                    "data loaded"
                );
                wallets
            }
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "failed to load data");
                Vec::new()
            }
        }
    }

    fn save(&self, wallets: &[Wallet]) -> Result<()> {
        save_wallets_to_path(wallets, &self.path)?;
        tracing::info!(path = %self.path.display(), wallets = wallets.len(), "data saved");
        Ok(())
    }

    fn has_saved_data(&self) -> bool {
        self.path.exists()
    }
}

pub fn save_wallets_to_path(wallets: &[Wallet], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(wallets)?;
    write_atomic(path, &json)
}

pub fn load_wallets_from_path(path: &Path) -> Result<Vec<Wallet>> {
    let data = fs::read_to_string(path)?;
    // An explicit `null` document is treated like an empty store.
    let wallets: Option<Vec<Wallet>> = serde_json::from_str(&data)?;
    Ok(wallets.unwrap_or_default())
}

/// Describes suspicious but tolerated states in a loaded collection. Never alters data.
pub fn wallet_warnings(wallets: &[Wallet]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();

    for wallet in wallets {
        if !seen_ids.insert(wallet.id) {
            warnings.push(format!(
                "wallet id {} is used more than once; lookups resolve to the first",
                wallet.id
            ));
        }
        if !seen_names.insert(wallet.name_key()) {
            warnings.push(format!(
                "wallet name `{}` is used more than once; top expenses keep the last",
                wallet.name
            ));
        }
        for txn in wallet.transactions() {
            if txn.wallet_id != wallet.id {
                warnings.push(format!(
                    "transaction {} in wallet {} references wallet {}",
                    txn.id, wallet.id, txn.wallet_id
                ));
            }
        }
        let balance = wallet.current_balance();
        if balance < Decimal::ZERO {
            warnings.push(format!(
                "wallet {} has a negative balance of {}",
                wallet.id, balance
            ));
        }
    }
    warnings
}
