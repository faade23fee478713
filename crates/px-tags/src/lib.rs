mod tag;
mod target;

pub use tag::{Tag, TagSet};
pub use target::{PlatformTriple, Target};
