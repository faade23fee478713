use std::fmt;

/// A PEP 425 compatibility tag: `{python_tag}-{abi_tag}-{platform_tag}`.
///
/// This is the unit wheel filenames are tagged with and the unit a [`Target`](crate::Target)
/// declares support for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub python_tag: String,
    pub abi_tag: String,
    pub platform_tag: String,
}

impl Tag {
    pub fn new(
        python_tag: impl Into<String>,
        abi_tag: impl Into<String>,
        platform_tag: impl Into<String>,
    ) -> Self {
        Self {
            python_tag: python_tag.into(),
            abi_tag: abi_tag.into(),
            platform_tag: platform_tag.into(),
        }
    }

    /// Parse a wheel filename's tag stem (everything after the second `-` and before
    /// `.whl`), expanding any compressed tag sets joined by `.` in each position.
    ///
    /// For example `py2.py3-none-any` expands to `[py2-none-any, py3-none-any]`.
    pub fn expand_from_wheel_stem(tag_stem: &str) -> Vec<Tag> {
        let mut parts = tag_stem.splitn(3, '-');
        let (Some(pys), Some(abis), Some(plats)) = (parts.next(), parts.next(), parts.next())
        else {
            return Vec::new();
        };

        let mut tags = Vec::new();
        for py in pys.split('.') {
            for abi in abis.split('.') {
                for plat in plats.split('.') {
                    tags.push(Tag::new(py, abi, plat));
                }
            }
        }
        tags
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.python_tag, self.abi_tag, self.platform_tag)
    }
}

/// An ordered set of compatibility tags a target accepts, most-specific first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self(tags)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The rank of `tag` within this set: lower is more specific, `None` if unsupported.
    pub fn rank(&self, tag: &Tag) -> Option<usize> {
        self.0.iter().position(|candidate| candidate == tag)
    }

    /// Derive the full ordered compatibility tag set implied by a single, most-specific
    /// `(python_tag, abi_tag, platform_tag)` triple.
    ///
    /// This implements the core of PEP 425 tag compatibility: the exact tag, the `abi3`
    /// stable-ABI fallback for CPython, the interpreter-specific `none` ABI fallback, and the
    /// universal `py*-none-any` fallbacks. It does not expand platform aliases (e.g. the
    /// `manylinux`/`musllinux` family tree); see `DESIGN.md` for the rationale.
    pub fn from_triple(python_tag: &str, abi_tag: &str, platform_tag: &str) -> Self {
        let mut tags = Vec::new();
        let exact = Tag::new(python_tag, abi_tag, platform_tag);
        tags.push(exact);

        // The CPython stable ABI: a `cp3XY` wheel built against `abi3` runs on any CPython
        // `>= 3.XY`. We only know our own interpreter tag here, so we emit the `abi3` variant
        // for this exact interpreter tag; the resolver's own version skew handling (external
        // to this crate) is responsible for broader `cp3Y` compatibility.
        if abi_tag != "abi3" && python_tag.starts_with("cp3") {
            tags.push(Tag::new(python_tag, "abi3", platform_tag));
        }

        // Pure-C-extension wheels with no ABI constraint still declare `none` as their ABI.
        if abi_tag != "none" {
            tags.push(Tag::new(python_tag, "none", platform_tag));
        }

        // Universal (pure Python) wheels: `pyX-none-any`, then the looser `py3-none-any` /
        // `py2.py3-none-any` families, least specific last.
        if let Some(major) = python_tag.strip_prefix("cp").and_then(|v| v.chars().next()) {
            let py_major = format!("py{major}");
            tags.push(Tag::new(&py_major, "none", platform_tag));
            tags.push(Tag::new(&py_major, "none", "any"));
        }
        tags.push(Tag::new(python_tag, "none", "any"));

        tags.dedup();
        Self(tags)
    }
}
