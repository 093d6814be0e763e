use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Retinal Screening";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that relocates the data directory (tests, portable installs)
pub const HOME_ENV: &str = "RETINAL_SCREEN_HOME";

/// Get the application data directory.
/// `$RETINAL_SCREEN_HOME` when set, otherwise ~/RetinalScreening/.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("RetinalScreening")
}

/// On-disk layout under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Layout rooted at [`app_data_dir`].
    pub fn from_env() -> Self {
        Self::new(app_data_dir())
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    /// Accounts database path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("database").join("screening.db")
    }

    /// Directory exported PDF reports are written to
    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

/// Default `EnvFilter` directive when `RUST_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "info,retinal_screen_lib=debug"
}

/// Suggested file name for a patient's exported report
pub fn report_filename(patient_id: &str) -> String {
    let safe: String = patient_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("Retinal_Report_{safe}.pdf")
}
