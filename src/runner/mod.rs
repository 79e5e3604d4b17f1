mod outcome;

pub use outcome::TestOutcome;

use crate::config::{SetupConfig, TestConfig};
use std::{
    env, io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No command configured")]
    EmptyCommand,
    #[error("Cannot find `{program}`")]
    MissingProgram {
        program: String,
        #[source]
        cause: which::Error,
    },
    #[error("Failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        cause: io::Error,
    },
    #[error("Test directory {} does not exist", .0.display())]
    MissingWorkingDir(PathBuf),
}

pub struct TestRun {
    pub outcome: TestOutcome,
    pub report_dir: PathBuf,
}

pub async fn run(test: &TestConfig, checkout: &Path) -> Result<TestRun, Error> {
    let working_dir = checkout.join(&test.working_dir);

    if !working_dir.is_dir() {
        return Err(Error::MissingWorkingDir(working_dir));
    }

    let timeout = test.timeout_secs.map(Duration::from_secs);

    let outcome = match setup(test.setup.as_ref(), checkout).await? {
        Some(failed) => failed,
        None => {
            log::info!("Running tests in {}", working_dir.display());
            execute(&test.command, &working_dir, timeout).await?
        }
    };

    match &outcome {
        TestOutcome::Passed => log::info!("Tests passed"),
        failed => log::warn!("Tests {}", failed),
    }

    if let Some(report_command) = &test.report_command {
        log::info!("Generating coverage report");
        let report = execute(report_command, &working_dir, None).await?;
        if !report.passed() {
            log::warn!("Report command {}", report);
        }
    }

    Ok(TestRun {
        outcome,
        report_dir: working_dir.join(&test.report_dir),
    })
}

async fn setup(
    setup: Option<&SetupConfig>,
    checkout: &Path,
) -> Result<Option<TestOutcome>, Error> {
    let Some(setup) = setup else {
        return Ok(None);
    };

    if !checkout.join(&setup.when_exists).exists() {
        log::info!("{} not found, skipping setup", setup.when_exists.display());
        return Ok(None);
    }

    log::info!("Running setup");
    let outcome = execute(&setup.command, checkout, None).await?;

    if outcome.passed() {
        Ok(None)
    } else {
        log::warn!("Setup {}", outcome);
        Ok(Some(outcome))
    }
}

async fn execute(
    command: &[String],
    dir: &Path,
    timeout: Option<Duration>,
) -> Result<TestOutcome, Error> {
    let (program, args) = command.split_first().ok_or(Error::EmptyCommand)?;

    let binary = which::which_in(program, env::var_os("PATH"), dir).map_err(|cause| {
        Error::MissingProgram {
            program: program.to_owned(),
            cause,
        }
    })?;

    log::debug!("{} {:?} in {}", binary.display(), args, dir.display());

    let spawn_error = |cause| Error::Spawn {
        program: program.to_owned(),
        cause,
    };

    let mut child = Command::new(&binary)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error)?;

    let status = match timeout {
        Some(limit) => {
            let waited = tokio::time::timeout(limit, child.wait()).await;
            match waited {
                Ok(status) => status.map_err(spawn_error)?,
                Err(_) => {
                    log::error!("`{}` did not finish within {:?}", program, limit);
                    if let Err(err) = child.kill().await {
                        log::warn!("Failed to kill `{}`: {}", program, err);
                    }
                    return Ok(TestOutcome::TimedOut);
                }
            }
        }
        None => child.wait().await.map_err(spawn_error)?,
    };

    if status.success() {
        Ok(TestOutcome::Passed)
    } else {
        Ok(TestOutcome::Failed {
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_owned(), "-c".to_owned(), script.to_owned()]
    }

    fn test_config(command: Vec<String>) -> TestConfig {
        TestConfig {
            working_dir: PathBuf::from("app"),
            command,
            report_command: None,
            ..TestConfig::default()
        }
    }

    #[tokio::test]
    async fn should_report_passing_command() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;

        let outcome = execute(&sh("exit 0"), dir.path(), None).await?;

        assert_eq!(outcome, TestOutcome::Passed);

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_report_exit_code_of_failing_command() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = TempDir::new("runner")?;

        let outcome = execute(&sh("exit 3"), dir.path(), None).await?;

        assert_eq!(outcome, TestOutcome::Failed { code: Some(3) });

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_time_out_hung_command() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;

        let outcome = execute(
            &sh("sleep 5"),
            dir.path(),
            Some(Duration::from_millis(100)),
        )
        .await?;

        assert_eq!(outcome, TestOutcome::TimedOut);

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_fail_on_unknown_program() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;
        let command = vec!["definitely-not-a-test-runner".to_owned()];

        let result = execute(&command, dir.path(), None).await;

        assert!(matches!(result, Err(Error::MissingProgram { .. })));

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_fail_on_empty_command() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;

        let result = execute(&[], dir.path(), None).await;

        assert!(matches!(result, Err(Error::EmptyCommand)));

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_generate_report_after_failing_tests() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = TempDir::new("runner")?;
        fs::create_dir_all(dir.path().join("app"))?;

        let test = TestConfig {
            report_command: Some(sh("mkdir -p htmlcov && echo report > htmlcov/index.html")),
            ..test_config(sh("exit 1"))
        };

        let run = run(&test, dir.path()).await?;

        assert_eq!(run.outcome, TestOutcome::Failed { code: Some(1) });
        assert_eq!(run.report_dir, dir.path().join("app/htmlcov"));
        assert!(run.report_dir.join("index.html").is_file());

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_run_setup_only_when_marker_exists() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;
        fs::create_dir_all(dir.path().join("app"))?;

        let test = TestConfig {
            setup: Some(SetupConfig {
                command: sh("touch setup-ran"),
                when_exists: PathBuf::from("requirements.txt"),
            }),
            ..test_config(sh("exit 0"))
        };

        run(&test, dir.path()).await?;
        assert!(!dir.path().join("setup-ran").exists());

        fs::write(dir.path().join("requirements.txt"), "coverage\n")?;
        run(&test, dir.path()).await?;
        assert!(dir.path().join("setup-ran").exists());

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_skip_tests_when_setup_fails() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;
        fs::create_dir_all(dir.path().join("app"))?;
        fs::write(dir.path().join("requirements.txt"), "coverage\n")?;

        let test = TestConfig {
            setup: Some(SetupConfig {
                command: sh("exit 2"),
                when_exists: PathBuf::from("requirements.txt"),
            }),
            ..test_config(sh("touch tests-ran"))
        };

        let run = run(&test, dir.path()).await?;

        assert_eq!(run.outcome, TestOutcome::Failed { code: Some(2) });
        assert!(!dir.path().join("app/tests-ran").exists());

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_fail_without_working_dir() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("runner")?;

        let result = run(&test_config(sh("exit 0")), dir.path()).await;

        assert!(matches!(result, Err(Error::MissingWorkingDir(_))));

        dir.close()?;
        Ok(())
    }
}
