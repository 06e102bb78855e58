use thiserror::Error;

/// Everything that can go wrong below the UI.
///
/// `Acquisition` and `Parse` are tick-local: the sampling loop logs them
/// and skips the tick without mutating any state. `Export` is surfaced to
/// the operator because it means the session CSV may be lost.
#[derive(Debug, Error)]
pub enum SenseError {
    /// The external wdutil command failed, timed out, or is missing.
    #[error("wdutil acquisition failed: {0}")]
    Acquisition(String),

    /// A required field was absent from the WIFI section of the output.
    #[error("could not parse {0} from wdutil output")]
    Parse(&'static str),

    /// Writing the session CSV failed.
    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),
}
