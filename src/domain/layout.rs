use std::{
    io,
    path::{Path, PathBuf},
};

use super::{Config, Tier};

/// The resolved file layout of one project.
///
/// Built once at startup from the project root and its [`Config`], then
/// handed to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    manifest: PathBuf,
    requirements_dir: PathBuf,
    resolver: String,
    generator: String,
}

impl Layout {
    /// Resolves the configured paths against `root`.
    ///
    /// A relative `root` is made absolute against the current directory, so
    /// every path in the layout is absolute. Symlinks are not resolved and the
    /// root does not need to exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is empty or the current directory cannot be
    /// determined.
    pub fn new(root: impl AsRef<Path>, config: &Config) -> io::Result<Self> {
        let root = std::path::absolute(root)?;
        Ok(Self {
            manifest: root.join(&config.manifest),
            requirements_dir: root.join(&config.requirements_dir),
            resolver: config.resolver.clone(),
            generator: config.generator.clone(),
            root,
        })
    }

    /// The project root. External commands run from here.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The dependency manifest.
    #[must_use]
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// The directory holding the flat requirement files.
    #[must_use]
    pub fn requirements_dir(&self) -> &Path {
        &self.requirements_dir
    }

    /// Path of the requirement file for `tier`.
    #[must_use]
    pub fn path(&self, tier: Tier) -> PathBuf {
        self.requirements_dir.join(tier.file_name())
    }

    /// Program name of the external resolver.
    #[must_use]
    pub fn resolver(&self) -> &str {
        &self.resolver
    }

    /// Label written into generated file headers.
    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }
}
