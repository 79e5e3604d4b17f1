use std::fmt;

const REPORT_DIR_PREFIX: &str = "pr-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLocation {
    dir: String,
    entry: String,
}

impl ReportLocation {
    pub fn for_pull_request(number: u64, entry: impl Into<String>) -> Self {
        ReportLocation {
            dir: format!("{}{}", REPORT_DIR_PREFIX, number),
            entry: entry.into(),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Repository path of a report file given its path relative to the report root.
    pub fn path_of(&self, relative: &str) -> String {
        format!("{}/{}", self.dir, relative.trim_start_matches('/'))
    }

    pub fn entry_path(&self) -> String {
        self.path_of(&self.entry)
    }
}

impl fmt::Display for ReportLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entry_path())
    }
}

#[derive(Debug, Clone)]
pub struct PagesSite {
    base_url: String,
}

impl PagesSite {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        PagesSite {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn url_for(&self, location: &ReportLocation) -> String {
        format!("{}/{}", self.base_url, location.entry_path())
    }
}
