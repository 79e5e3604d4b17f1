use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

const DEFAULT_CONFIG_FILE_NAME: &str = "coverage-relay.yaml";
const CONFIG_PATH_ENV: &str = "COVERAGE_RELAY_CONFIG";

const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
const RESULTS_TOKEN_ENV: &str = "RESULTS_TOKEN";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SCRATCH_DIR: &str = "/tmp/coverage-relay";
const DEFAULT_API_URL: &str = "https://api.github.com";

const TARGET_OWNER: &str = "rtiwari13";
const TARGET_REPO: &str = "inventory-management-application";
const RESULTS_OWNER: &str = "kartikvermaa";
const RESULTS_REPO: &str = "tests-repo";

const DEFAULT_COMMIT_MESSAGE: &str = "Add coverage report for PR #{{number}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub log_level: String,
    pub scratch_dir: PathBuf,
    pub keep_workspace: bool,
    pub github: GithubConfig,
    pub committer: CommitterConfig,
    pub target: TargetConfig,
    pub test: TestConfig,
    pub results: ResultsConfig,
    #[serde(skip)]
    pub secrets: Secrets,
}

impl Config {
    pub async fn load() -> Result<Config> {
        let path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE_NAME));

        let mut config = Config::from_file(&path).await?;
        config.secrets = Secrets::from_env()?;

        Ok(config)
    }

    pub async fn from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_string = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read config file {}", path.display()))?;

        Config::parse(&config_string)
            .with_context(|| format!("Cannot parse config file {}", path.display()))
    }

    pub fn parse(config_string: &str) -> Result<Config> {
        let config = serde_yaml::from_str::<Config>(config_string)?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            keep_workspace: false,
            github: GithubConfig::default(),
            committer: CommitterConfig::default(),
            target: TargetConfig::default(),
            test: TestConfig::default(),
            results: ResultsConfig::default(),
            secrets: Secrets::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: DEFAULT_API_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitterConfig {
    pub name: String,
    pub email: String,
}

impl Default for CommitterConfig {
    fn default() -> Self {
        CommitterConfig {
            name: "coverage-relay".to_owned(),
            email: "coverage-relay@users.noreply.github.com".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub owner: String,
    pub repo: String,
    /// Overrides the `https://github.com/<owner>/<repo>.git` clone url.
    pub url: Option<String>,
    pub branch: Option<String>,
}

impl TargetConfig {
    pub fn clone_url(&self) -> String {
        self.url
            .to_owned()
            .unwrap_or_else(|| github_clone_url(&self.owner, &self.repo))
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            owner: TARGET_OWNER.to_owned(),
            repo: TARGET_REPO.to_owned(),
            url: None,
            branch: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub working_dir: PathBuf,
    pub setup: Option<SetupConfig>,
    pub command: Vec<String>,
    pub report_command: Option<Vec<String>>,
    /// Report directory, relative to `working_dir`.
    pub report_dir: PathBuf,
    pub report_entry: String,
    pub timeout_secs: Option<u64>,
    pub on_failure: OnFailure,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            working_dir: PathBuf::from("inventory"),
            setup: None,
            command: strings(&["coverage", "run", "manage.py", "test"]),
            report_command: Some(strings(&["coverage", "html"])),
            report_dir: PathBuf::from("htmlcov"),
            report_entry: "index.html".to_owned(),
            timeout_secs: None,
            on_failure: OnFailure::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    pub command: Vec<String>,
    /// Setup only runs when this file, relative to the checkout root, exists.
    pub when_exists: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnFailure {
    #[default]
    Continue,
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStrategy {
    #[default]
    GitPush,
    Upload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub owner: String,
    pub repo: String,
    pub url: Option<String>,
    pub branch: Option<String>,
    pub strategy: PublishStrategy,
    pub pages_url: Option<String>,
    pub commit_message: String,
}

impl ResultsConfig {
    pub fn clone_url(&self) -> String {
        self.url
            .to_owned()
            .unwrap_or_else(|| github_clone_url(&self.owner, &self.repo))
    }

    pub fn pages_url(&self) -> String {
        self.pages_url
            .to_owned()
            .unwrap_or_else(|| format!("https://{}.github.io/{}", self.owner, self.repo))
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        ResultsConfig {
            owner: RESULTS_OWNER.to_owned(),
            repo: RESULTS_REPO.to_owned(),
            url: None,
            branch: None,
            strategy: PublishStrategy::default(),
            pages_url: None,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_owned(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Secrets {
    pub github_token: String,
    pub results_token: String,
}

impl Secrets {
    pub fn new(github_token: impl Into<String>, results_token: impl Into<String>) -> Self {
        Secrets {
            github_token: github_token.into(),
            results_token: results_token.into(),
        }
    }

    fn from_env() -> Result<Secrets> {
        let github_token = env::var(GITHUB_TOKEN_ENV)
            .with_context(|| format!("{} must be set", GITHUB_TOKEN_ENV))?;

        let results_token =
            env::var(RESULTS_TOKEN_ENV).unwrap_or_else(|_| github_token.to_owned());

        Ok(Secrets::new(github_token, results_token))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("github_token", &"***")
            .field("results_token", &"***")
            .finish()
    }
}

fn github_clone_url(owner: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}.git", owner, repo)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_missing_fields_with_defaults() -> Result<()> {
        let config = Config::parse(
            r#"
server:
  port: 9000
results:
  strategy: upload
  branch: gh-pages
"#,
        )?;

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.results.strategy, PublishStrategy::Upload);
        assert_eq!(config.results.branch.as_deref(), Some("gh-pages"));
        assert_eq!(config.results.owner, "kartikvermaa");
        assert_eq!(config.test.working_dir, PathBuf::from("inventory"));
        assert_eq!(config.test.on_failure, OnFailure::Continue);

        Ok(())
    }

    #[test]
    fn should_derive_urls_from_owner_and_repo() {
        let config = Config::default();

        assert_eq!(
            config.target.clone_url(),
            "https://github.com/rtiwari13/inventory-management-application.git"
        );
        assert_eq!(
            config.results.pages_url(),
            "https://kartikvermaa.github.io/tests-repo"
        );
    }

    #[test]
    fn should_prefer_explicit_urls() -> Result<()> {
        let config = Config::parse(
            r#"
target:
  url: /srv/git/app.git
results:
  pages_url: https://reports.example.com
"#,
        )?;

        assert_eq!(config.target.clone_url(), "/srv/git/app.git");
        assert_eq!(config.results.pages_url(), "https://reports.example.com");

        Ok(())
    }

    #[test]
    fn should_parse_test_section() -> Result<()> {
        let config = Config::parse(
            r#"
test:
  working_dir: .
  command: [pytest, --cov-report=html, --cov=inventory]
  setup:
    command: [pip, install, -r, requirements.txt]
    when_exists: requirements.txt
  timeout_secs: 600
  on_failure: abort
"#,
        )?;

        assert_eq!(config.test.command[0], "pytest");
        assert_eq!(config.test.timeout_secs, Some(600));
        assert_eq!(config.test.on_failure, OnFailure::Abort);
        assert_eq!(
            config.test.setup.map(|setup| setup.when_exists),
            Some(PathBuf::from("requirements.txt"))
        );

        Ok(())
    }

    #[test]
    fn should_not_print_tokens() {
        let secrets = Secrets::new("ghp_secret", "ghp_other");

        let printed = format!("{:?}", secrets);

        assert!(!printed.contains("ghp_secret"));
        assert!(!printed.contains("ghp_other"));
    }

    #[tokio::test]
    async fn should_use_defaults_without_config_file() -> Result<()> {
        let config = Config::from_file(Path::new("/nonexistent/coverage-relay.yaml")).await?;

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.results.repo, "tests-repo");

        Ok(())
    }
}
