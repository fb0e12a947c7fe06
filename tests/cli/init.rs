use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, output_text};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    let (stdout, _) = output_text(&output);
    assert!(output.status.success());
    assert!(stdout.contains("Created .lingcatrc.json"));

    let content = test.read_file(".lingcatrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["catalogsRoot"], "./translations");
    assert_eq!(parsed["extraction"], "./extraction.json");
    assert_eq!(parsed["sourceLanguage"], "en");
    assert_eq!(parsed["prune"], false);
    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".lingcatrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    let (_, stderr) = output_text(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Error: .lingcatrc.json already exists"));
    assert_eq!(test.read_file(".lingcatrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file("extraction.json", crate::EXTRACTION)?;

    let output = test.update_command().args(["--locale", "pt_BR"]).output()?;
    let (_, stderr) = output_text(&output);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(test.root().join("translations/pt_BR.ts").exists());

    let output = test.check_command().output()?;
    assert!(output.status.success());
    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    let (stdout, _) = output_text(&output);
    assert!(output.status.success());
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("update"));
    Ok(())
}
