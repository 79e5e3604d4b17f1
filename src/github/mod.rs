pub mod dto;
pub mod github_client;
pub mod handler;

pub use github_client::GithubClient;
pub use handler::BuilderExecutor;
