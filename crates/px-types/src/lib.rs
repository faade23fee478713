mod artifact;
mod error;
mod options;
mod request;

pub use artifact::{Artifact, ArtifactKind};
pub use error::Error;
pub use options::{Options, EARLIEST_ZIP_TIMESTAMP};
pub use request::{BuildRequest, InstallRequest, ResolvedDistribution};

pub type Result<T> = std::result::Result<T, Error>;
