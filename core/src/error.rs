use thiserror::Error;

/// Feil som kan nå verten. Selve estimatoren feiler aldri: dårlige samples
/// droppes og manglende historikk gir fart 0.
#[derive(Debug, Error)]
pub enum PaceError {
    /// Fin posisjonstilgang mangler – input-strømmen starter aldri.
    #[error("fine location permission not granted")]
    MissingPermission,

    #[error("location provider unavailable: {0}")]
    SourceUnavailable(String),

    #[error("config io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in {path} at {at}: {message}")]
    ConfigParse {
        path: String,
        at: String,
        message: String,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Metrics(#[from] prometheus::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PaceError>;
