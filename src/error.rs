// The Serialize and Deserialize traits are derived so Errors can live inside reactive resources.
#[derive(thiserror::Error, serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Generic(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("FHE error: {0}")]
    Fhevm(String),

    #[error("FHE instance is not initialized yet!")]
    FhevmNotReady,

    #[error("Multicall error: {0}")]
    Multicall(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Serde Error: {0}")]
    Serde(String),
}

impl Error {
    pub fn generic(message: impl ToString) -> Self {
        Error::Generic(message.to_string())
    }
    pub fn invalid_amount(message: impl ToString) -> Self {
        Error::InvalidAmount(message.to_string())
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Generic(value.to_string())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

impl From<eip1193::Error> for Error {
    fn from(error: eip1193::Error) -> Self {
        Error::Wallet(error.to_string())
    }
}

impl From<fhevm::Error> for Error {
    fn from(error: fhevm::Error) -> Self {
        Error::Fhevm(error.to_string())
    }
}

impl From<multicall::Error> for Error {
    fn from(error: multicall::Error) -> Self {
        Error::Multicall(error.to_string())
    }
}

impl From<alloy_sol_types::Error> for Error {
    fn from(error: alloy_sol_types::Error) -> Self {
        Error::Abi(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serde(error.to_string())
    }
}
