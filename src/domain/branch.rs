use super::version::Version;

/// A branch of interest to the release, with its current tag description.
///
/// Constructed once per run from the live state of the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    /// Current `git describe` output for the branch; possibly empty.
    pub tag: String,
    /// Version fields parsed from `tag`.
    pub version: Version,
}

impl Branch {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let version = Version::parse(&tag);

        Branch {
            name: name.into(),
            tag,
            version,
        }
    }
}
