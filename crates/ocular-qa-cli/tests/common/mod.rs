//! Shared fixtures for CLI integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Raw results that normalize to good for every check.
pub const GOOD: &[(&str, &str)] = &[
    ("presence", r#"{"has_eye": true, "confidence": 0.97}"#),
    ("focus", r#"{"prediction": "Sharp", "confidence": 0.81}"#),
    ("illumination", r#"{"lighting_correct": true}"#),
    ("reflection", r#"{"quality_state": "Y", "confidence": 0.9}"#),
    ("completeness", r#"{"quality_state": "Y", "confidence": 0.88}"#),
    ("resolution", r#"{"quality_state": "Y", "confidence": 0.93}"#),
];

/// A project directory with a `.ocular-qa.toml` wiring one `sh` detector
/// per check, an isolated XDG config home and an `images/` folder.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    /// Detectors print the given JSON, overriding entries of [`GOOD`].
    pub fn new(overrides: &[(&str, &str)]) -> Self {
        Self::with_sections(overrides, &[])
    }

    /// Like [`Project::new`], replacing the whole `[checks.<name>]` body for
    /// the checks listed in `sections`.
    pub fn with_sections(overrides: &[(&str, &str)], sections: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::create_dir_all(dir.path().join("xdg")).unwrap();
        fs::create_dir_all(dir.path().join("detectors")).unwrap();

        let mut config = String::new();
        for (check, json) in GOOD {
            if let Some((_, body)) = sections.iter().find(|(c, _)| c == check) {
                writeln!(config, "[checks.{check}]\n{body}\n").unwrap();
                continue;
            }
            let json = overrides
                .iter()
                .find(|(c, _)| c == check)
                .map_or(*json, |(_, j)| *j);
            let output = dir.path().join("detectors").join(format!("{check}.json"));
            fs::write(&output, json).unwrap();
            writeln!(
                config,
                "[checks.{check}]\ncommand = [\"sh\", \"-c\", 'cat {}']\n",
                output.display()
            )
            .unwrap();
        }
        fs::write(dir.path().join(".ocular-qa.toml"), config).unwrap();

        Self { dir }
    }

    /// Appends raw TOML to the project config.
    pub fn append_config(&self, extra: &str) {
        let path = self.path().join(".ocular-qa.toml");
        let mut config = fs::read_to_string(&path).unwrap();
        config.push_str(extra);
        fs::write(path, config).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a fake image under `images/`.
    pub fn image(&self, name: &str) -> PathBuf {
        let path = self.path().join("images").join(name);
        fs::write(&path, b"\xff\xd8\xff\xe0 not really a jpeg").unwrap();
        path
    }

    pub fn results_dir(&self) -> PathBuf {
        self.path().join("saved_results")
    }

    /// Retained image names, sorted.
    pub fn retained(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.results_dir()) else {
            return vec![];
        };
        let mut names: Vec<_> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("quality_results_"))
            .collect();
        names.sort();
        names
    }

    /// Audit log lines.
    pub fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(self.results_dir().join("results_log.csv"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    /// `ocular-qa` running inside the project with an isolated config home.
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("ocular-qa").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("HOME", self.path());
        cmd
    }
}
