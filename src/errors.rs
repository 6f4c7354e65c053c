use thiserror::Error;

/// Error type shared by the storage, configuration, and validation layers.
///
/// Overdraft rejections are not errors: they are reported through the `bool`
/// returned by [`crate::ledger::Wallet::add_transaction`].
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Wallet {0} not found")]
    WalletNotFound(u32),
    #[error("Wallet `{0}` already exists")]
    DuplicateWallet(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FinanceError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
