//! Integration tests module for req
//!
//! Shared helpers: on-disk projects in temp directories and an orchestrator
//! wired to the real reqwest transport.

pub mod end_to_end_test;
pub mod flow_test;
pub mod round_trip_test;

use req::config::{load_config, ReqConfig, CONFIG_FILE};
use req::executor::{ExecutionConfig, ReqwestTransport};
use req::workspace::{Workspace, REQ_DIR};
use std::fs;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// An initialized project living in a temp directory.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Creates `.reqrc` with the given content and an empty `.req/`.
    pub fn new(reqrc: &str) -> Self {
        init_test_env();
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join(CONFIG_FILE), reqrc).expect("Failed to write .reqrc");
        fs::create_dir(dir.path().join(REQ_DIR)).expect("Failed to create .req");
        Self { dir }
    }

    /// Writes `.req/<file_name>`.
    pub fn with_file(self, file_name: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(REQ_DIR).join(file_name), content)
            .expect("Failed to write request file");
        self
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::open(self.dir.path()).expect("Failed to open workspace")
    }

    pub fn config(&self) -> ReqConfig {
        load_config(self.dir.path()).expect("Failed to load .reqrc")
    }

    /// A transport configured from the project's `[settings]`.
    pub fn transport(&self) -> ReqwestTransport {
        ReqwestTransport::new(&ExecutionConfig::from(&self.config().settings))
            .expect("Failed to build transport")
    }
}
