use serde::{Deserialize, Serialize};

/// An artifact entry as it appears inside a [`LockedRequirement`]: the integrity data the
/// resolver already recorded, without the `px_types::Artifact` convenience methods this crate
/// doesn't need on its own data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl ArtifactRecord {
    /// The basename of `url`, ignoring any query string or fragment, mirroring
    /// `px_types::Artifact::filename`.
    pub fn filename(&self) -> &str {
        let without_fragment = self.url.split('#').next().unwrap_or(&self.url);
        let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
        without_query.rsplit('/').next().unwrap_or(without_query)
    }

    pub fn is_wheel(&self) -> bool {
        self.filename().ends_with(".whl")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedRequirement {
    pub project_name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_python: Option<String>,
    #[serde(default)]
    pub requires_dists: Vec<String>,
    pub artifacts: Vec<ArtifactRecord>,
}

/// A fully-pinned solution for one platform family. `platform_tag` names the `(python_tag,
/// abi_tag, platform_tag)` triple the resolve was generated for; it is metadata only — actual
/// ranking against a [`px_tags::Target`] is done per-artifact, not by comparing this triple
/// directly (§4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedResolve {
    pub platform_tag: [String; 3],
    pub locked_requirements: Vec<LockedRequirement>,
}

impl LockedResolve {
    /// A single string key for stable sort ordering on write (§6): the platform tag components
    /// joined, which is unique per [`Lockfile`] invariant.
    fn sort_key(&self) -> String {
        self.platform_tag.join("-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolverVersion {
    #[serde(rename = "pip-legacy-resolver")]
    PipLegacy,
    #[serde(rename = "pip-2020-resolver")]
    Pip2020,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    pub pex_version: String,
    pub resolver_version: ResolverVersion,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    pub allow_prereleases: bool,
    pub allow_wheels: bool,
    pub allow_builds: bool,
    pub transitive: bool,
    pub locked_resolves: Vec<LockedResolve>,
}

impl Lockfile {
    /// Parse a lockfile document. Input ordering of `requirements`/`constraints`/`locked_resolves`
    /// is not assumed; [`Lockfile::to_json`] re-sorts on write.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize with `requirements`, `constraints`, and `locked_resolves` sorted by string key
    /// (§6), so that two semantically-equal lockfiles always serialize byte-identically.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut sorted = self.clone();
        sorted.requirements.sort();
        sorted.constraints.sort();
        sorted
            .locked_resolves
            .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        serde_json::to_string_pretty(&sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lockfile {
        Lockfile {
            pex_version: "1.0.0".into(),
            resolver_version: ResolverVersion::Pip2020,
            requirements: vec!["requests>=2".into(), "attrs".into()],
            constraints: Vec::new(),
            allow_prereleases: false,
            allow_wheels: true,
            allow_builds: true,
            transitive: true,
            locked_resolves: vec![
                LockedResolve {
                    platform_tag: ["cp39".into(), "cp39".into(), "manylinux_2_33_x86_64".into()],
                    locked_requirements: Vec::new(),
                },
                LockedResolve {
                    platform_tag: ["cp37".into(), "cp37m".into(), "manylinux_2_33_x86_64".into()],
                    locked_requirements: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn round_trip_preserves_semantic_equality() {
        let original = sample();
        let json = original.to_json().unwrap();
        let reparsed = Lockfile::from_json(&json).unwrap();
        let rejson = reparsed.to_json().unwrap();
        assert_eq!(json, rejson);
    }

    #[test]
    fn write_sorts_locked_resolves_by_platform_tag() {
        let json = sample().to_json().unwrap();
        let cp37_pos = json.find("cp37").unwrap();
        let cp39_pos = json.find("cp39").unwrap();
        assert!(cp37_pos < cp39_pos);
    }

    #[test]
    fn write_sorts_requirements() {
        let json = sample().to_json().unwrap();
        let attrs_pos = json.find("attrs").unwrap();
        let requests_pos = json.find("requests").unwrap();
        assert!(attrs_pos < requests_pos);
    }

    #[test]
    fn artifact_record_filename_strips_query() {
        let artifact = ArtifactRecord {
            url: "https://example.com/foo-1.0-py3-none-any.whl?x=1".into(),
            algorithm: None,
            hash: None,
        };
        assert_eq!(artifact.filename(), "foo-1.0-py3-none-any.whl");
        assert!(artifact.is_wheel());
    }
}
