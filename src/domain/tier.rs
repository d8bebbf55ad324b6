use std::fmt;

use serde::Serialize;

/// One of the five flat requirement files generated from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Dependencies declared without any extra.
    Base,
    /// The `production` extra.
    Production,
    /// The `development` extra.
    Development,
    /// The `testing` extra.
    Testing,
    /// Every extra at once.
    All,
}

/// How the resolver is told which dependency group to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// No extras, just the core dependencies.
    Core,
    /// A single named extra (`--extra <name>`).
    Extra(&'static str),
    /// Every extra (`--all-extras`).
    AllExtras,
}

impl Tier {
    /// All tiers, in the order the resolver generates them.
    pub const ALL: [Self; 5] = [
        Self::Base,
        Self::Production,
        Self::Development,
        Self::Testing,
        Self::All,
    ];

    /// The tier's name, which is also the name of its extra.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Production => "production",
            Self::Development => "development",
            Self::Testing => "testing",
            Self::All => "all",
        }
    }

    /// File name of the tier inside the requirements directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.txt", self.name())
    }

    /// The resolver selector that produces this tier.
    #[must_use]
    pub const fn selector(self) -> Selector {
        match self {
            Self::Base => Selector::Core,
            Self::Production | Self::Development | Self::Testing => Selector::Extra(self.name()),
            Self::All => Selector::AllExtras,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl Selector {
    /// Command-line arguments passed to the resolver for this selector.
    #[must_use]
    pub fn args(self) -> Vec<String> {
        match self {
            Self::Core => Vec::new(),
            Self::Extra(name) => vec!["--extra".to_string(), name.to_string()],
            Self::AllExtras => vec!["--all-extras".to_string()],
        }
    }
}
