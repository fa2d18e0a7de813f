use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use digest_engine::{CommandOutput, CommandRunner, GitPublisher, PublishError, PublishOutcome};

/// Replays scripted results per git subcommand and records every call.
struct ScriptedRunner {
    calls: Mutex<Vec<Vec<String>>>,
    respond: fn(&str) -> io::Result<CommandOutput>,
}

impl ScriptedRunner {
    fn new(respond: fn(&str) -> io::Result<CommandOutput>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond,
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], _dir: Option<&Path>) -> io::Result<CommandOutput> {
        assert_eq!(program, "git");
        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|a| a.to_string()).collect());
        (self.respond)(args[0])
    }
}

fn ok() -> io::Result<CommandOutput> {
    Ok(CommandOutput {
        success: true,
        stdout: String::new(),
        stderr: String::new(),
    })
}

fn failed(stdout: &str, stderr: &str) -> io::Result<CommandOutput> {
    Ok(CommandOutput {
        success: false,
        stdout: stdout.into(),
        stderr: stderr.into(),
    })
}

#[test]
fn successful_run_adds_commits_and_pushes() {
    let publisher = GitPublisher::with_runner(ScriptedRunner::new(|_| ok()), None);

    let outcome = publisher
        .publish(Path::new("README.md"), "Daily News Update: 2024-05-01")
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Pushed);
}

#[test]
fn steps_run_in_order_with_commit_message() {
    let runner = ScriptedRunner::new(|_| ok());
    GitPublisher::with_runner(&runner, Some(PathBuf::from(".")))
        .publish(Path::new("gamer_news.md"), "Daily News Update: 2024-05-01")
        .unwrap();

    let calls = runner.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            vec!["add".to_string(), "gamer_news.md".to_string()],
            vec![
                "commit".to_string(),
                "-m".to_string(),
                "Daily News Update: 2024-05-01".to_string()
            ],
            vec!["push".to_string()],
        ]
    );
}

#[test]
fn nothing_to_commit_is_not_a_warning() {
    let runner = ScriptedRunner::new(|step| match step {
        "commit" => failed("On branch main\nnothing to commit, working tree clean", ""),
        _ => ok(),
    });
    let publisher = GitPublisher::with_runner(runner, None);

    let outcome = publisher.publish(Path::new("README.md"), "msg").unwrap();
    assert_eq!(outcome, PublishOutcome::NothingToCommit);
}

#[test]
fn failed_push_is_reported_not_raised() {
    let runner = ScriptedRunner::new(|step| match step {
        "push" => failed("", "fatal: could not read from remote repository"),
        _ => ok(),
    });
    let publisher = GitPublisher::with_runner(runner, None);

    let outcome = publisher.publish(Path::new("README.md"), "msg").unwrap();
    assert_eq!(
        outcome,
        PublishOutcome::CompletedWithWarnings(vec![
            "push: fatal: could not read from remote repository".into()
        ])
    );
}

#[test]
fn missing_git_binary_is_an_error() {
    let runner = ScriptedRunner::new(|_| Err(io::Error::new(io::ErrorKind::NotFound, "git")));
    let publisher = GitPublisher::with_runner(runner, None);

    let err = publisher.publish(Path::new("README.md"), "msg").unwrap_err();
    assert!(matches!(err, PublishError::Spawn { step: "add", .. }));
}
