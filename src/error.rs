use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or training data that does not fit the network.
    #[error("bad network parameter: {0}")]
    BadNetworkParameter(String),

    /// The scratch buffer could not be created, written or read back.
    #[error("critical training error: {0}")]
    CriticalTraining(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn bad_param(msg: impl Into<String>) -> Self {
        Error::BadNetworkParameter(msg.into())
    }

    pub(crate) fn critical(msg: impl Into<String>) -> Self {
        Error::CriticalTraining(msg.into())
    }
}
