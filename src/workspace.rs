use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

const CHECKOUT_DIR_NAME: &str = "checkout";
const RESULTS_DIR_NAME: &str = "results";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to clear {}", .path.display())]
    Clear {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
    #[error("{} still exists after removal", .path.display())]
    Residue { path: PathBuf },
    #[error("Failed to create {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
}

#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub async fn prepare(scratch_dir: &Path, name: &str) -> Result<Workspace, Error> {
        let root = scratch_dir.join(name);

        clear(&root).await?;

        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|cause| Error::Create {
                path: root.to_owned(),
                cause,
            })?;

        Ok(Workspace { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn checkout(&self) -> PathBuf {
        self.root.join(CHECKOUT_DIR_NAME)
    }

    pub fn results(&self) -> PathBuf {
        self.root.join(RESULTS_DIR_NAME)
    }

    pub async fn remove(self) -> Result<(), Error> {
        clear(&self.root).await
    }
}

async fn clear(path: &Path) -> Result<(), Error> {
    if !path.exists() {
        return Ok(());
    }

    log::debug!("Removing {}", path.display());
    tokio::fs::remove_dir_all(path)
        .await
        .map_err(|cause| Error::Clear {
            path: path.to_owned(),
            cause,
        })?;

    if path.exists() {
        return Err(Error::Residue {
            path: path.to_owned(),
        });
    }

    Ok(())
}
