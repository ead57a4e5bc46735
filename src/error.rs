use thiserror::Error;

#[derive(Error, Debug)]
pub enum HipassError {
    #[error("Invalid filter specification: {0}")]
    InvalidSpec(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid stream configuration: {0}")]
    InvalidStream(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HipassError>;
