//! `req init`: lays out a fresh project.

use super::REQ_DIR;
use crate::config::CONFIG_FILE;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_TEMPLATE: &str = "# Your req config goes here, as ini\n[variables]\n";

const SAMPLE_REQUEST: &str = r#"# Sample req file
POST https://reqres.in/api/users HTTP/1.1
Content-Type: application/json

{
	"name": "morpheus",
	"job": "mentor",
	"location": "zion",
	"salary": "freedom"
}
"#;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Found existing {} in {}. Looks like you already initialized req in this directory.", entry, root.display())]
    AlreadyInitialized { root: PathBuf, entry: &'static str },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Creates `.reqrc` and `.req/sample.http` under `root`.
///
/// Nothing is written when either `.reqrc` or `.req/` already exists.
pub fn init(root: &Path) -> Result<(), InitError> {
    if root.join(CONFIG_FILE).exists() {
        return Err(InitError::AlreadyInitialized {
            root: root.to_path_buf(),
            entry: CONFIG_FILE,
        });
    }

    let req_dir = root.join(REQ_DIR);
    if req_dir.exists() {
        return Err(InitError::AlreadyInitialized {
            root: root.to_path_buf(),
            entry: REQ_DIR,
        });
    }

    std::fs::create_dir(&req_dir).map_err(|source| InitError::Write {
        path: req_dir.clone(),
        source,
    })?;
    // `.reqrc` goes last: it is what marks the project as initialized
    let written = write(&req_dir.join("sample.http"), SAMPLE_REQUEST)
        .and_then(|_| write(&root.join(CONFIG_FILE), CONFIG_TEMPLATE));
    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_dir_all(&req_dir) {
            log::warn!("Failed to remove {}: {}", req_dir.display(), cleanup);
        }
        return Err(e);
    }

    log::info!("Initialized req in {}", root.display());
    Ok(())
}

fn write(path: &Path, content: &str) -> Result<(), InitError> {
    std::fs::write(path, content).map_err(|source| InitError::Write {
        path: path.to_path_buf(),
        source,
    })
}
