//! Shared utilities for integration testing.

use std::path::{Path, PathBuf};

use spectool::config::loader::load_config;
use spectool::config::ToolkitConfig;

/// Write a TOML config into `dir` and load it through the real loader.
pub fn load_from_str(dir: &Path, content: &str) -> ToolkitConfig {
    let path = write_config(dir, content);
    load_config(&path).expect("config should load")
}

/// Write a TOML config file into `dir` and return its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("spectool.toml");
    std::fs::write(&path, content).expect("config should be writable");
    path
}

/// A pipeline config whose cells append "<os>-<runtime>" to `marker`.
pub fn marker_pipeline_toml(marker: &Path) -> String {
    format!(
        r#"
        [pipeline]
        install = ["true"]
        test = ["echo \"$PIPELINE_OS-$PIPELINE_RUNTIME\" >> {marker}"]

        [pipeline.matrix]
        os = ["linux", "osx"]
        versions = ["3.5", "3.6"]
        "#,
        marker = marker.display()
    )
}
