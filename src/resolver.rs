//! Invokes the external resolver that (re)generates the lock file and the
//! flat requirement files.
//!
//! The resolver itself is opaque: this module only knows the fixed command
//! table and how to stop at the first failing command.

use std::{
    ffi::OsString,
    fmt, io,
    path::{Path, PathBuf},
    process::{self, ExitStatus},
};

use crate::domain::{Layout, Tier};

/// One external command of the resolution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    output: Option<PathBuf>,
}

impl Invocation {
    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The requirements file this command writes, if any.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Renders the command line, for logs and dry runs.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Builds the fixed command table for a project.
///
/// The first command refreshes the lock file; the rest compile the manifest
/// once per [`Tier`], writing to the tier's absolute path.
#[must_use]
pub fn plan(layout: &Layout) -> Vec<Invocation> {
    let lock = Invocation {
        program: layout.resolver().to_string(),
        args: vec!["lock".into()],
        output: None,
    };

    let compile = Tier::ALL.into_iter().map(|tier| {
        let output = layout.path(tier);
        let mut args: Vec<OsString> = vec![
            "pip".into(),
            "compile".into(),
            layout.manifest().as_os_str().to_owned(),
        ];
        args.extend(tier.selector().args().into_iter().map(OsString::from));
        args.push("-o".into());
        args.push(output.as_os_str().to_owned());

        Invocation {
            program: layout.resolver().to_string(),
            args,
            output: Some(output),
        }
    });

    std::iter::once(lock).chain(compile).collect()
}

/// Executes external commands.
pub trait Runner {
    /// Runs `invocation` from `cwd`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits
    /// unsuccessfully.
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<(), ResolveError>;
}

/// Runs commands as child processes, sharing this process's stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<(), ResolveError> {
        let status = process::Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(cwd)
            .status()
            .map_err(|source| ResolveError::Spawn {
                command: invocation.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ResolveError::Failed {
                command: invocation.to_string(),
                status,
            })
        }
    }
}

/// Runs the whole plan in order, stopping at the first failure.
///
/// The requirements directory is created first so the resolver can write
/// into it.
///
/// # Errors
///
/// Returns the error of the first command that fails; later commands are not
/// run.
pub fn resolve<R: Runner>(layout: &Layout, runner: &mut R) -> Result<(), ResolveError> {
    std::fs::create_dir_all(layout.requirements_dir()).map_err(|source| {
        ResolveError::CreateDir {
            path: layout.requirements_dir().to_path_buf(),
            source,
        }
    })?;

    for invocation in plan(layout) {
        tracing::info!("Running {invocation}");
        runner.run(&invocation, layout.root())?;
    }
    Ok(())
}

/// An external resolver command did not complete successfully.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The requirements directory could not be created.
    #[error("failed to create {}", .path.display())]
    CreateDir {
        /// The directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The command could not be started.
    #[error("failed to run `{command}`")]
    Spawn {
        /// The command line.
        command: String,
        /// Why it could not be started.
        source: io::Error,
    },
    /// The command exited with a non-zero status.
    #[error("`{command}` failed with {status}")]
    Failed {
        /// The command line.
        command: String,
        /// Its exit status.
        status: ExitStatus,
    },
}
