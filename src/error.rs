#[derive(Debug, thiserror::Error)]
pub enum IfwatchError {
    #[error("no active interfaces; check their status or the /proc filesystem")]
    NoInterfaces,

    #[error("facility '{0}' already active in another process")]
    FacilityActive(String),

    #[error("unable to obtain monitoring socket: {0}")]
    Socket(std::io::Error),

    #[error("no name for interface index {0}")]
    NameResolution(u32),

    #[error("unable to open log file '{path}': {source}")]
    LogOpen {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, IfwatchError>;
