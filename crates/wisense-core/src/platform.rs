use std::path::PathBuf;

/// Data directory for the log file.
///
/// Uses ~/.local/share/wisense on unix (XDG layout, same on macOS for
/// consistency) rather than Application Support.
pub fn data_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".local")
            .join("share")
            .join("wisense")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("wisense")
    }
}
