use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    /// `code` is `None` when the process was terminated by a signal.
    Failed { code: Option<i32> },
    TimedOut,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => write!(f, "passed"),
            TestOutcome::Failed { code: Some(code) } => {
                write!(f, "failed with exit code {}", code)
            }
            TestOutcome::Failed { code: None } => write!(f, "were terminated by a signal"),
            TestOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_describe_outcomes() {
        assert_eq!(TestOutcome::Passed.to_string(), "passed");
        assert_eq!(
            TestOutcome::Failed { code: Some(1) }.to_string(),
            "failed with exit code 1"
        );
        assert_eq!(TestOutcome::TimedOut.to_string(), "timed out");
    }
}
