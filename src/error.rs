use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuiverError {
    #[error("invalid target geometry: {0}")]
    InvalidGeometry(String),

    #[error("score {score} is outside 1..={ring_count}")]
    InvalidScore { score: u32, ring_count: u32 },

    #[error("select a target first: {0}")]
    SelectionRequired(String),

    #[error("score submission failed for item {item_id}: {reason}")]
    Submission { item_id: String, reason: String },

    #[error("unknown quiver: {0}")]
    UnknownContainer(String),

    #[error("unknown arrow: {0}")]
    UnknownItem(String),

    #[error("unknown score: {0}")]
    UnknownScore(u64),

    #[error("{0} name is required")]
    MissingName(&'static str),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuiverError>;
