//! Removes packages from derived requirement files that a parent file
//! already pins, replacing them with an `-r` include of the parent.
//!
//! The tiers form a fixed hierarchy:
//!
//! ```text
//! base <- production
//! base <- development <- testing
//! development, production, testing <- all
//! ```
//!
//! Files are rewritten in that order. A failure part-way leaves the files
//! already rewritten in place.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    domain::{Layout, Requirements, Tier},
    storage::requirements_txt::{self, LoadError, SaveError},
};

/// What happened to one requirements file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Which file.
    pub tier: Tier,
    /// Entries parsed from the resolver's output. Always zero for
    /// [`Tier::All`], which is rewritten without being read.
    pub read: usize,
    /// Entries written back.
    pub kept: usize,
    /// Tiers referenced with `-r`.
    pub includes: Vec<Tier>,
}

impl FileReport {
    /// Entries removed because a parent already pins them.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.read.saturating_sub(self.kept)
    }
}

/// The outcome of a deduplication pass, one report per tier in the order the
/// files were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Per-file reports.
    pub files: Vec<FileReport>,
}

/// Rewrites the five requirement files of `layout`.
///
/// 1. `base` is rewritten as-is, normalising its header.
/// 2. `production` keeps only entries missing from `base`, and includes it.
/// 3. `development` keeps only entries missing from `base`, and includes it.
/// 4. `testing` keeps only entries missing from both `base` and the
///    unfiltered `development`, and includes `development`.
/// 5. `all` is reduced to includes of `development`, `production` and
///    `testing`.
///
/// # Errors
///
/// Returns the first load or save failure. Files rewritten before the
/// failure are not restored.
#[tracing::instrument(level = "debug", skip(layout), fields(dir = %layout.requirements_dir().display()))]
pub fn deduplicate(layout: &Layout) -> Result<Summary, DedupError> {
    let mut summary = Summary::default();
    let mut writer = Writer {
        layout,
        summary: &mut summary,
    };

    let base = load(layout, Tier::Base)?;
    writer.write(Tier::Base, base.len(), &base, &[])?;

    let production = load(layout, Tier::Production)?;
    writer.write(
        Tier::Production,
        production.len(),
        &production.without(&[&base]),
        &[Tier::Base],
    )?;

    let development = load(layout, Tier::Development)?;
    writer.write(
        Tier::Development,
        development.len(),
        &development.without(&[&base]),
        &[Tier::Base],
    )?;

    let testing = load(layout, Tier::Testing)?;
    writer.write(
        Tier::Testing,
        testing.len(),
        &testing.without(&[&base, &development]),
        &[Tier::Development],
    )?;

    // Not parsed: everything it held is reachable through the includes.
    writer.write(
        Tier::All,
        0,
        &Requirements::new(),
        &[Tier::Development, Tier::Production, Tier::Testing],
    )?;

    Ok(summary)
}

fn load(layout: &Layout, tier: Tier) -> Result<Requirements, DedupError> {
    let path = layout.path(tier);
    tracing::debug!("Reading {}", path.display());
    Ok(requirements_txt::load(&path)?)
}

struct Writer<'a> {
    layout: &'a Layout,
    summary: &'a mut Summary,
}

impl Writer<'_> {
    fn write(
        &mut self,
        tier: Tier,
        read: usize,
        requirements: &Requirements,
        includes: &[Tier],
    ) -> Result<(), DedupError> {
        let path = self.layout.path(tier);
        let parents: Vec<PathBuf> = includes.iter().map(|t| self.layout.path(*t)).collect();
        let parents: Vec<&Path> = parents.iter().map(PathBuf::as_path).collect();

        requirements_txt::save(&path, self.layout.generator(), &parents, requirements)?;

        let report = FileReport {
            tier,
            read,
            kept: requirements.len(),
            includes: includes.to_vec(),
        };
        tracing::info!(
            "Wrote {}: kept {} of {} entries",
            path.display(),
            report.kept,
            report.read
        );
        self.summary.files.push(report);
        Ok(())
    }
}

/// Deduplication stopped before every file was rewritten.
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// A requirements file could not be read or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A requirements file could not be written.
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{domain::Config, storage::requirements_txt::ParseError};

    const HEADER: &str = "# This file was autogenerated via make-requirements\n";

    struct Project {
        _tmp: TempDir,
        layout: Layout,
    }

    impl Project {
        fn new(files: [(Tier, &str); 5]) -> Self {
            let tmp = TempDir::new().unwrap();
            let layout = Layout::new(tmp.path(), &Config::default()).unwrap();
            fs::create_dir_all(layout.requirements_dir()).unwrap();
            for (tier, content) in files {
                fs::write(layout.path(tier), content).unwrap();
            }
            Self { _tmp: tmp, layout }
        }

        fn read(&self, tier: Tier) -> String {
            fs::read_to_string(self.layout.path(tier)).unwrap()
        }

        fn read_all(&self) -> Vec<String> {
            Tier::ALL.iter().map(|tier| self.read(*tier)).collect()
        }

        fn entries(&self, tier: Tier) -> Vec<String> {
            requirements_txt::load(&self.layout.path(tier))
                .unwrap()
                .identifiers()
                .map(ToString::to_string)
                .collect()
        }
    }

    fn resolver_output(lines: &[&str]) -> String {
        let mut out = String::from(
            "# This file was autogenerated by uv via the following command:\n\
             #    uv pip compile pyproject.toml\n",
        );
        for line in lines {
            out.push_str(line);
            out.push('\n');
            out.push_str("    # via project\n");
        }
        out
    }

    fn sample_project() -> Project {
        let base = resolver_output(&["django==4.2", "attrs==24.2"]);
        let production = resolver_output(&["attrs==24.2", "django==4.2", "gunicorn==23.0"]);
        let development =
            resolver_output(&["attrs==24.2", "django==4.2", "pylint==3.3", "coverage==7.6"]);
        let testing = resolver_output(&["coverage==7.6", "django==4.2", "pytest==8.3"]);
        let all = resolver_output(&[
            "attrs==24.2",
            "coverage==7.6",
            "django==4.2",
            "gunicorn==23.0",
            "pylint==3.3",
            "pytest==8.3",
        ]);

        Project::new([
            (Tier::Base, base.as_str()),
            (Tier::Production, production.as_str()),
            (Tier::Development, development.as_str()),
            (Tier::Testing, testing.as_str()),
            (Tier::All, all.as_str()),
        ])
    }

    #[test]
    fn minimal_production_includes_base() {
        let project = Project::new([
            (Tier::Base, "foo==1.0\n"),
            (Tier::Production, "foo==1.0\nbar==2.0\n"),
            (Tier::Development, ""),
            (Tier::Testing, ""),
            (Tier::All, ""),
        ]);

        deduplicate(&project.layout).unwrap();

        assert_eq!(project.read(Tier::Base), format!("{HEADER}\nfoo==1.0\n"));
        assert_eq!(
            project.read(Tier::Production),
            format!("{HEADER}-r base.txt\n\nbar==2.0\n")
        );
    }

    #[test]
    fn base_packages_only_reachable_through_include() {
        let project = sample_project();

        deduplicate(&project.layout).unwrap();

        let base = project.entries(Tier::Base);
        assert_eq!(base, ["django==4.2", "attrs==24.2"]);
        for tier in [Tier::Production, Tier::Development, Tier::Testing] {
            let entries = project.entries(tier);
            assert!(
                base.iter().all(|package| !entries.contains(package)),
                "{tier} still pins a base package: {entries:?}"
            );
        }
        assert_eq!(project.entries(Tier::Production), ["gunicorn==23.0"]);
        assert_eq!(project.entries(Tier::Development), ["pylint==3.3", "coverage==7.6"]);
    }

    #[test]
    fn development_packages_are_not_repeated_in_testing() {
        let project = sample_project();

        deduplicate(&project.layout).unwrap();

        assert!(project.entries(Tier::Development).contains(&"coverage==7.6".to_string()));
        assert_eq!(project.entries(Tier::Testing), ["pytest==8.3"]);
        assert!(project.read(Tier::Testing).starts_with(&format!("{HEADER}-r development.txt\n\n")));
    }

    #[test]
    fn all_is_a_pure_aggregator() {
        let project = sample_project();

        deduplicate(&project.layout).unwrap();

        assert_eq!(
            project.read(Tier::All),
            format!("{HEADER}-r development.txt\n-r production.txt\n-r testing.txt\n\n")
        );
    }

    #[test]
    fn malformed_all_is_still_rewritten() {
        let project = Project::new([
            (Tier::Base, "foo==1.0\n"),
            (Tier::Production, ""),
            (Tier::Development, ""),
            (Tier::Testing, ""),
            (Tier::All, "    --hash=sha256:abc\nfoo==1.0\n"),
        ]);

        let summary = deduplicate(&project.layout).unwrap();

        assert_eq!(
            project.read(Tier::All),
            format!("{HEADER}-r development.txt\n-r production.txt\n-r testing.txt\n\n")
        );
        assert_eq!(summary.files[4].read, 0);
    }

    #[test]
    fn missing_all_is_created() {
        let project = Project::new([
            (Tier::Base, "foo==1.0\n"),
            (Tier::Production, ""),
            (Tier::Development, ""),
            (Tier::Testing, ""),
            (Tier::All, ""),
        ]);
        fs::remove_file(project.layout.path(Tier::All)).unwrap();

        deduplicate(&project.layout).unwrap();

        assert_eq!(
            project.read(Tier::All),
            format!("{HEADER}-r development.txt\n-r production.txt\n-r testing.txt\n\n")
        );
    }

    #[test]
    fn blocks_are_preserved_verbatim() {
        let project = Project::new([
            (Tier::Base, "foo==1.0\n"),
            (
                Tier::Production,
                "bar==2.0 \\\n    --hash=sha256:aaa \\\n    --hash=sha256:bbb\n    # via project\n",
            ),
            (Tier::Development, ""),
            (Tier::Testing, ""),
            (Tier::All, ""),
        ]);

        deduplicate(&project.layout).unwrap();

        assert_eq!(
            project.read(Tier::Production),
            format!(
                "{HEADER}-r base.txt\n\nbar==2.0 \\\n    --hash=sha256:aaa \\\n    --hash=sha256:bbb\n    # via project\n"
            )
        );
    }

    #[test]
    fn textual_variants_are_not_deduplicated() {
        let project = Project::new([
            (Tier::Base, "Django==4.2\n"),
            (Tier::Production, "django==4.2\n"),
            (Tier::Development, ""),
            (Tier::Testing, ""),
            (Tier::All, ""),
        ]);

        deduplicate(&project.layout).unwrap();

        assert_eq!(project.entries(Tier::Production), ["django==4.2"]);
    }

    #[test]
    fn same_input_gives_same_output() {
        let first = sample_project();
        let second = sample_project();

        deduplicate(&first.layout).unwrap();
        deduplicate(&second.layout).unwrap();

        assert_eq!(first.read_all(), second.read_all());
    }

    #[test]
    fn rerunning_on_own_output_changes_nothing() {
        let project = sample_project();

        deduplicate(&project.layout).unwrap();
        let first = project.read_all();
        deduplicate(&project.layout).unwrap();

        assert_eq!(project.read_all(), first);
    }

    #[test]
    fn summary_counts_entries() {
        let project = sample_project();

        let summary = deduplicate(&project.layout).unwrap();

        let counts: Vec<(Tier, usize, usize)> = summary
            .files
            .iter()
            .map(|file| (file.tier, file.kept, file.dropped()))
            .collect();
        assert_eq!(
            counts,
            [
                (Tier::Base, 2, 0),
                (Tier::Production, 1, 2),
                (Tier::Development, 2, 2),
                (Tier::Testing, 1, 2),
                (Tier::All, 0, 0),
            ]
        );
        assert_eq!(summary.files[3].includes, [Tier::Development]);
    }

    #[test]
    fn malformed_file_aborts_without_writing_it() {
        let malformed = "    --hash=sha256:abc\nfoo==1.0\n";
        let project = Project::new([
            (Tier::Base, "foo==1.0\n"),
            (Tier::Production, "bar==2.0\n"),
            (Tier::Development, malformed),
            (Tier::Testing, "baz==3.0\n"),
            (Tier::All, ""),
        ]);

        let error = deduplicate(&project.layout).unwrap_err();

        assert!(matches!(
            error,
            DedupError::Load(LoadError::Parse {
                source: ParseError::UnexpectedIndentation { line: 1 },
                ..
            })
        ));
        // Earlier steps have already been rewritten; the failing file and
        // everything after it are untouched.
        assert!(project.read(Tier::Production).starts_with(HEADER));
        assert_eq!(project.read(Tier::Development), malformed);
        assert_eq!(project.read(Tier::Testing), "baz==3.0\n");
    }

    #[test]
    fn missing_file_is_reported() {
        let project = Project::new([
            (Tier::Base, "foo==1.0\n"),
            (Tier::Production, ""),
            (Tier::Development, ""),
            (Tier::Testing, ""),
            (Tier::All, ""),
        ]);
        fs::remove_file(project.layout.path(Tier::Testing)).unwrap();

        let error = deduplicate(&project.layout).unwrap_err();

        assert!(matches!(error, DedupError::Load(LoadError::NotFound(path)) if path.ends_with(Path::new("testing.txt"))));
    }
}
