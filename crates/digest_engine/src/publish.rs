use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use digest_logging::{digest_info, digest_warn};

const NOTHING_TO_COMMIT: &str = "nothing to commit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    fn mentions(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }
}

/// Seam over process execution so publishing can be exercised without git.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> io::Result<CommandOutput> {
        (**self).run(program, args, dir)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> io::Result<CommandOutput> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        let output = command.output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Pushed,
    /// The report was unchanged since the last commit.
    NothingToCommit,
    /// Some step failed; each entry is `"<step>: <stderr>"`.
    CompletedWithWarnings(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("could not run `git {step}`: {source}")]
    Spawn {
        step: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Stages, commits and pushes the report with the local `git` CLI.
///
/// Failing steps are logged and never abort the remaining steps; only being
/// unable to start `git` at all is an error.
pub struct GitPublisher<R: CommandRunner = SystemCommandRunner> {
    runner: R,
    repo_dir: Option<PathBuf>,
}

impl GitPublisher<SystemCommandRunner> {
    pub fn new(repo_dir: Option<PathBuf>) -> Self {
        Self::with_runner(SystemCommandRunner, repo_dir)
    }
}

impl<R: CommandRunner> GitPublisher<R> {
    pub fn with_runner(runner: R, repo_dir: Option<PathBuf>) -> Self {
        Self { runner, repo_dir }
    }

    pub fn publish(
        &self,
        report: &Path,
        commit_message: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let report = report.to_string_lossy().into_owned();
        let mut warnings = Vec::new();
        let mut nothing_to_commit = false;

        digest_info!("git add {}", report);
        let add = self.step("add", &["add", report.as_str()])?;
        note_failure("add", &add, &mut warnings);

        digest_info!("git commit -m \"{}\"", commit_message);
        let commit = self.step("commit", &["commit", "-m", commit_message])?;
        if !commit.success && commit.mentions(NOTHING_TO_COMMIT) {
            digest_info!("No changes to commit");
            nothing_to_commit = true;
        } else {
            note_failure("commit", &commit, &mut warnings);
        }

        digest_info!("git push");
        let push = self.step("push", &["push"])?;
        note_failure("push", &push, &mut warnings);

        Ok(if !warnings.is_empty() {
            PublishOutcome::CompletedWithWarnings(warnings)
        } else if nothing_to_commit {
            PublishOutcome::NothingToCommit
        } else {
            PublishOutcome::Pushed
        })
    }

    fn step(&self, step: &'static str, args: &[&str]) -> Result<CommandOutput, PublishError> {
        self.runner
            .run("git", args, self.repo_dir.as_deref())
            .map_err(|source| PublishError::Spawn { step, source })
    }
}

fn note_failure(step: &str, output: &CommandOutput, warnings: &mut Vec<String>) {
    if output.success {
        return;
    }
    let detail = if output.stderr.is_empty() {
        &output.stdout
    } else {
        &output.stderr
    };
    digest_warn!("git {} failed: {}", step, detail);
    warnings.push(format!("{step}: {detail}"));
}
