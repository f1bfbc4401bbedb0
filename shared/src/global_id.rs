use std::fmt;

use serde::{Deserialize, Serialize};

const SEPARATOR: char = '/';

/// Slash-delimited path uniquely locating a component within its tree,
/// e.g. `/root/Dev/dev1/FB/fb0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct GlobalId(String);

impl GlobalId {
    /// Builds a GlobalId from a raw path. A missing leading slash is added and
    /// trailing slashes are stripped.
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        let trimmed = path.trim_matches(SEPARATOR);
        Self(format!("{}{}", SEPARATOR, trimmed))
    }

    pub fn root(local_id: &str) -> Self {
        Self::new(local_id)
    }

    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = segments.into_iter().collect::<Vec<_>>().join("/");
        Self::new(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn child(&self, local_id: &str) -> Self {
        if self.is_empty() {
            return Self::new(local_id);
        }
        Self(format!("{}{}{}", self.0, SEPARATOR, local_id))
    }

    /// Appends a relative path (sequence of local ids) to this id.
    pub fn join<'a>(&self, relative: impl IntoIterator<Item = &'a str>) -> Self {
        let mut output = self.clone();
        for segment in relative {
            output = output.child(segment);
        }
        output
    }

    pub fn parent(&self) -> Option<Self> {
        let index = self.0.rfind(SEPARATOR)?;
        if index == 0 {
            return None;
        }
        Some(Self(self.0[..index].to_string()))
    }

    pub fn local_id(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|segment| !segment.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.len() <= 1
    }

    /// True if `other` lies strictly below this id.
    pub fn is_ancestor_of(&self, other: &GlobalId) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0[self.0.len()..].starts_with(SEPARATOR)
    }

    pub fn is_ancestor_or_self_of(&self, other: &GlobalId) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// Returns the segments leading from `prefix` down to this id, or None if
    /// `prefix` is not an ancestor-or-self of this id.
    pub fn relative_to(&self, prefix: &GlobalId) -> Option<Vec<&str>> {
        if self == prefix {
            return Some(Vec::new());
        }
        if !prefix.is_ancestor_of(self) {
            return None;
        }
        Some(
            self.0[prefix.0.len()..]
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .collect(),
        )
    }

    /// Re-roots this id from `from` onto `to`.
    pub fn rebase(&self, from: &GlobalId, to: &GlobalId) -> Option<Self> {
        let relative = self.relative_to(from)?;
        Some(to.join(relative))
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlobalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GlobalId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<GlobalId> for String {
    fn from(id: GlobalId) -> Self {
        id.0
    }
}
