/// The version of px embedded in emitted `INSTALLER` markers and lockfile
/// `px_version` fields.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
