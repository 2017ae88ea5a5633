use std::fmt;

use regex::Regex;

/// Prerelease classifier embedded in a release tag's metadata segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Alpha,
    Beta,
    Jira,
    Rc,
}

impl ReleaseType {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "alpha" => Some(ReleaseType::Alpha),
            "beta" => Some(ReleaseType::Beta),
            "jira" => Some(ReleaseType::Jira),
            "rc" => Some(ReleaseType::Rc),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Alpha => write!(f, "alpha"),
            ReleaseType::Beta => write!(f, "beta"),
            ReleaseType::Jira => write!(f, "jira"),
            ReleaseType::Rc => write!(f, "rc"),
        }
    }
}

/// Structured form of a release tag.
///
/// Tags follow `MAJOR.MINOR.PATCH[-TYPE[-DESCRIPTOR].REVISION]`, e.g.
/// `2.4.0-rc.3` or `1.0.0-beta-hotfix.2`. A tag without a prerelease suffix
/// is a final release tag. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub release_type: Option<ReleaseType>,
    /// Free-text qualifier from the metadata segment; may be empty.
    pub descriptor: String,
    /// Prerelease counter, kept as the raw tag text. A malformed tag can
    /// carry a non-numeric revision segment, which is preserved verbatim.
    pub revision: String,
}

impl Version {
    /// Parses a release tag into its version fields.
    ///
    /// Never fails: absent or unparseable components default to `0` or
    /// empty. The tag splits at the first `-` into the numeric core and the
    /// metadata segment; the metadata splits at its last `.` into the
    /// type/descriptor body and the revision.
    pub fn parse(tag: &str) -> Self {
        let (core, metadata) = match tag.find('-') {
            Some(position) => (&tag[..position], Some(&tag[position + 1..])),
            None => (tag, None),
        };

        let mut numbers = core.split('.');
        let mut next_number = || {
            numbers
                .next()
                .and_then(|part| part.parse::<u32>().ok())
                .unwrap_or(0)
        };
        let major = next_number();
        let minor = next_number();
        let patch = next_number();

        let mut release_type = None;
        let mut descriptor = String::new();
        let mut revision = "0".to_string();

        if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
            let (body, candidate) = match metadata.rsplit_once('.') {
                Some((body, candidate)) => (body, Some(candidate)),
                None => (metadata, None),
            };

            if let Ok(pattern) = Regex::new(r"^(alpha|beta|jira|rc)?-?(.*)\.?([0-9]{0,3})$") {
                if let Some(captures) = pattern.captures(body) {
                    release_type = captures
                        .get(1)
                        .and_then(|m| ReleaseType::from_token(m.as_str()));
                    descriptor = captures
                        .get(2)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                }
            }

            if let Some(candidate) = candidate.filter(|c| !c.is_empty()) {
                if candidate.chars().all(|c| c.is_ascii_digit()) {
                    revision = candidate.to_string();
                } else {
                    // A revision segment that is not purely numeric: its
                    // leading dash-separated piece becomes the revision
                    // verbatim and the remainder folds into the descriptor.
                    let mut segments = candidate.split('-');
                    if let Some(first) = segments.next() {
                        revision = first.to_string();
                    }
                    let rest: Vec<&str> = segments.collect();
                    if !rest.is_empty() {
                        descriptor.push_str(&rest.join("-"));
                    }
                }
            }
        }

        Version {
            major,
            minor,
            patch,
            release_type,
            descriptor,
            revision,
        }
    }

    /// True for a final release tag (no prerelease suffix).
    pub fn is_final(&self) -> bool {
        self.release_type.is_none()
    }

    /// The revision as a number, zero when empty or non-numeric.
    pub fn revision_number(&self) -> u32 {
        self.revision.parse().unwrap_or(0)
    }

    /// Suggested tag for the next release candidate.
    ///
    /// A final release opens the next minor line (`MAJOR.(MINOR+1).PATCH-rc.1`);
    /// a prerelease advances its candidate counter
    /// (`MAJOR.MINOR.PATCH-rc.(REVISION+1)`).
    pub fn release_candidate_suggestion(&self) -> String {
        if self.release_type.is_none() {
            format!("{}.{}.{}-rc.1", self.major, self.minor + 1, self.patch)
        } else {
            format!(
                "{}.{}.{}-rc.{}",
                self.major,
                self.minor,
                self.patch,
                self.revision_number() + 1
            )
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if let Some(release_type) = self.release_type {
            write!(f, "-{}", release_type)?;
            if !self.descriptor.is_empty() {
                write!(f, "-{}", self.descriptor)?;
            }
            write!(f, ".{}", self.revision)?;
        }

        Ok(())
    }
}
