use thiserror::Error;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Wheel has no outcomes")]
    NoOutcomes,

    #[error("Wheel has no outcome with a positive weight")]
    ZeroTotalWeight,

    #[error("Sector {index} out of range for a wheel of {count} sectors")]
    SectorOutOfRange { index: usize, count: usize },

    #[error("Invalid spin config: {0}")]
    InvalidSpinConfig(String),

    #[error("Planned rotation {target} does not move forward from {current}")]
    BackwardSpin { current: f64, target: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WheelResult<T> = Result<T, WheelError>;
