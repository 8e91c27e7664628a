use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid horizon key: {0}")]
    InvalidHorizon(String),
}
