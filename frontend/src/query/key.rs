use std::fmt;

/// Identifies one cached server-state fetch: an ordered tuple of parts such
/// as `["topics", "<course id>"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The empty key. Every key starts with it.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` matches this key part-by-part. Invalidating
    /// `["notifications"]` therefore reaches every notification filter.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QueryKey {
    fn from(parts: [S; N]) -> Self {
        Self::new(parts)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_is_per_part() {
        let key = QueryKey::from(["topics", "c1"]);
        assert!(key.starts_with(&QueryKey::from(["topics"])));
        assert!(key.starts_with(&key));
        assert!(!key.starts_with(&QueryKey::from(["topic"])));
        assert!(!key.starts_with(&QueryKey::from(["topics", "c1", "x"])));
        // Part boundaries matter: "c" is not a prefix of "c1".
        assert!(!key.starts_with(&QueryKey::from(["topics", "c"])));
        assert!(key.starts_with(&QueryKey::root()));
    }

    #[test]
    fn display_lists_parts() {
        assert_eq!(QueryKey::from(["course", "42"]).to_string(), "[course, 42]");
    }
}
