/// What an [`Artifact`] expands to once translated: a prebuilt wheel goes straight to stage 3,
/// anything else is a source that stage 2 must build first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Wheel,
    Source,
}

/// A single resolved download named by the resolver subprocess (§4.1/§4.2): a URL plus the
/// integrity hash the resolver already verified against the index metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub url: String,
    pub algorithm: Option<String>,
    pub hash: Option<String>,
}

impl Artifact {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            algorithm: None,
            hash: None,
        }
    }

    pub fn with_hash(mut self, algorithm: impl Into<String>, hash: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self.hash = Some(hash.into());
        self
    }

    /// The basename of the URL, stripped of any query string or fragment.
    pub fn filename(&self) -> &str {
        let without_fragment = self.url.split('#').next().unwrap_or(&self.url);
        let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
        without_query
            .rsplit('/')
            .next()
            .unwrap_or(without_query)
    }

    /// Classify by the recognized wheel/sdist filename suffixes.
    pub fn kind(&self) -> ArtifactKind {
        let name = self.filename();
        if name.ends_with(".whl") {
            ArtifactKind::Wheel
        } else {
            ArtifactKind::Source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_strips_query_and_fragment() {
        let artifact = Artifact::new("https://example.com/pkg/foo-1.0-py3-none-any.whl?x=1#sha256=abc");
        assert_eq!(artifact.filename(), "foo-1.0-py3-none-any.whl");
    }

    #[test]
    fn kind_classifies_wheel_vs_source() {
        assert_eq!(
            Artifact::new("https://example.com/foo-1.0-py3-none-any.whl").kind(),
            ArtifactKind::Wheel
        );
        for suffix in [".tar.gz", ".tgz", ".tar.bz2", ".tbz2", ".zip", ".sdist"] {
            let artifact = Artifact::new(format!("https://example.com/foo-1.0{suffix}"));
            assert_eq!(artifact.kind(), ArtifactKind::Source, "suffix {suffix}");
        }
    }
}
