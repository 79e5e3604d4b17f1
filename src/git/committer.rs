use crate::config::CommitterConfig;

#[derive(Debug, Clone)]
pub struct Committer {
    pub author: String,
    pub email: String,
}

impl Default for Committer {
    fn default() -> Self {
        Committer::from(&CommitterConfig::default())
    }
}

impl From<&CommitterConfig> for Committer {
    fn from(value: &CommitterConfig) -> Self {
        Committer {
            author: value.name.to_owned(),
            email: value.email.to_owned(),
        }
    }
}
