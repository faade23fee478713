use std::env;

/// 1980-01-01T00:00:00Z, the earliest timestamp a zip member can carry (§6). `SOURCE_DATE_EPOCH`
/// values below this floor are clamped rather than rejected, matching the reference tool's
/// reproducible-build behavior.
pub const EARLIEST_ZIP_TIMESTAMP: i64 = 315532800;

/// The resolved, immutable configuration for a single pipeline invocation.
///
/// Threaded explicitly through the dispatcher and each stage rather than read ad hoc from the
/// environment at the point of use, so that every stage sees a single consistent snapshot.
#[derive(Debug, Clone)]
pub struct Options {
    pub allow_prereleases: bool,
    pub allow_wheels: bool,
    pub allow_builds: bool,
    pub transitive: bool,
    pub indexes: Vec<String>,
    pub find_links: Vec<String>,
    pub max_jobs: usize,
    pub compile: bool,
    pub source_date_epoch: i64,
    pub resolver_command: Vec<String>,
    pub builder_command: Vec<String>,
    pub installer_command: Vec<String>,
    pub introspector_command: Vec<String>,
}

impl Options {
    /// Build options from defaults plus `SOURCE_DATE_EPOCH`, matching how reproducible build
    /// tools pick it up (see §6). External commands are left empty; the CLI layer fills them in
    /// from its own flags.
    pub fn from_env() -> Self {
        Self {
            allow_prereleases: false,
            allow_wheels: true,
            allow_builds: true,
            transitive: true,
            indexes: Vec::new(),
            find_links: Vec::new(),
            max_jobs: available_parallelism(),
            compile: false,
            source_date_epoch: source_date_epoch_from_env(),
            resolver_command: Vec::new(),
            builder_command: Vec::new(),
            installer_command: Vec::new(),
            introspector_command: Vec::new(),
        }
    }

    /// The configured timestamp, floored at [`EARLIEST_ZIP_TIMESTAMP`].
    pub fn timestamp(&self) -> i64 {
        self.source_date_epoch.max(EARLIEST_ZIP_TIMESTAMP)
    }
}

fn source_date_epoch_from_env() -> i64 {
    env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(EARLIEST_ZIP_TIMESTAMP)
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_floors_at_earliest_zip_timestamp() {
        let mut options = Options::from_env();
        options.source_date_epoch = 0;
        assert_eq!(options.timestamp(), EARLIEST_ZIP_TIMESTAMP);
    }

    #[test]
    fn timestamp_passes_through_above_floor() {
        let mut options = Options::from_env();
        options.source_date_epoch = EARLIEST_ZIP_TIMESTAMP + 1000;
        assert_eq!(options.timestamp(), EARLIEST_ZIP_TIMESTAMP + 1000);
    }
}
