use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;
mod init;
mod resolve;
mod update;

const BIN_NAME: &str = "lingcat";

/// Brazilian Portuguese catalog as left by a previous update.
pub const PT_BR_CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="pt_BR" sourcelanguage="en">
<context>
    <name>Call</name>
    <message>
        <location filename="../src/call.cpp" line="10"/>
        <source>New</source>
        <translation>Novo</translation>
    </message>
    <message>
        <location filename="../src/call.cpp" line="20"/>
        <source>Busy</source>
        <translation>Ocupado</translation>
    </message>
    <message>
        <location filename="../src/call.cpp" line="30"/>
        <source>Hold</source>
        <translation type="unfinished">Em espera</translation>
    </message>
    <message numerus="yes">
        <location filename="../src/call.cpp" line="40"/>
        <source>%n call(s)</source>
        <translation>
            <numerusform>%n chamada</numerusform>
            <numerusform>%n chamadas</numerusform>
        </translation>
    </message>
</context>
</TS>
"#;

/// Scanner output matching [`PT_BR_CATALOG`] after `Busy` was removed from
/// the source and `Hold (new)` was added.
pub const EXTRACTION: &str = r#"[
    {"context": "Call", "source": "New", "locations": [{"file": "../src/call.cpp", "line": 12}]},
    {"context": "Call", "source": "Hold", "locations": [{"file": "../src/call.cpp", "line": 32}]},
    {"context": "Call", "source": "%n call(s)", "plural": true, "locations": [{"file": "../src/call.cpp", "line": 42}]},
    {"context": "Call", "source": "Hold (new)", "locations": [{"file": "../src/call.cpp", "line": 50}]}
]"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stops the config file search at the project directory.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    /// Project with the pt_BR catalog and the scanner output in place.
    pub fn with_catalog() -> Result<Self> {
        let test = Self::with_file("translations/lrc_pt_BR.ts", PT_BR_CATALOG)?;
        test.write_file("extraction.json", EXTRACTION)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn update_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("update");
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check");
        cmd
    }

    pub fn resolve_command(&self, context: &str, source: &str, locale: &str) -> Command {
        let mut cmd = self.command();
        cmd.args(["resolve", context, source, "--locale", locale]);
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Stdout and stderr of a finished command, lossily decoded.
pub fn output_text(output: &Output) -> (String, String) {
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}
