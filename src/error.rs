use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlicemateError {
    #[error("Rule table error: {0}")]
    Rules(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Klipper data error: {0}")]
    Klipper(String),
}

impl From<SlicemateError> for String {
    fn from(err: SlicemateError) -> Self {
        err.to_string()
    }
}
