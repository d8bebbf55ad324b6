use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
};

use indexmap::IndexMap;
use non_empty_string::NonEmptyString;

/// The raw first line of a requirement entry, terminator included.
///
/// Identifiers are compared by their exact text. `Django==5.0` and
/// `django==5.0` are different identifiers, as are lines that differ only in
/// an extras annotation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Identifier(NonEmptyString);

impl Identifier {
    /// Creates an identifier from a raw line.
    #[must_use]
    pub const fn new(line: NonEmptyString) -> Self {
        Self(line)
    }

    /// The raw line, exactly as read.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Shows the line without its terminator.
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().trim_end_matches(['\r', '\n']))
    }
}

/// The entries of one flat requirement file.
///
/// Maps each [`Identifier`] to its full text block: the identifier line
/// followed by any indented continuation lines (hashes, `# via` notes).
/// Iteration follows insertion order, which is also the order entries are
/// written back out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    entries: IndexMap<Identifier, String>,
}

impl Requirements {
    /// An empty set of requirements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` to the block of `identifier`, creating the entry at
    /// the end if it is new.
    ///
    /// An identifier seen a second time keeps its original position; the
    /// later text is added to the end of its existing block.
    pub fn append(&mut self, identifier: Identifier, text: &str) {
        self.entries.entry(identifier).or_default().push_str(text);
    }

    /// Whether an entry with this exact identifier line exists.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// The text block of an entry.
    #[must_use]
    pub fn block(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over identifiers and their blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &str)> {
        self.entries.iter().map(|(id, block)| (id, block.as_str()))
    }

    /// Iterates over the identifiers in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.keys()
    }

    /// The entries whose identifier appears in none of `excluded`.
    ///
    /// Order is preserved.
    #[must_use]
    pub fn without(&self, excluded: &[&Self]) -> Self {
        self.iter()
            .filter(|(id, _)| !excluded.iter().any(|other| other.contains(id.as_str())))
            .map(|(id, block)| (id.clone(), block.to_string()))
            .collect()
    }
}

impl FromIterator<(Identifier, String)> for Requirements {
    fn from_iter<T: IntoIterator<Item = (Identifier, String)>>(iter: T) -> Self {
        let mut requirements = Self::new();
        for (identifier, text) in iter {
            requirements.append(identifier, &text);
        }
        requirements
    }
}

impl<'a> IntoIterator for &'a Requirements {
    type Item = (&'a Identifier, &'a String);
    type IntoIter = indexmap::map::Iter<'a, Identifier, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
