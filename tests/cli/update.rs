use anyhow::Result;
use lingcat::core::{Catalog, Location, MessageStatus, parsers::ts::decode};
use pretty_assertions::assert_eq;

use crate::{CliTest, PT_BR_CATALOG, output_text};

fn read_catalog(test: &CliTest, path: &str) -> Result<Catalog> {
    Ok(decode(&test.read_file(path)?)?)
}

fn sources(catalog: &Catalog) -> Vec<&str> {
    catalog
        .messages()
        .map(|(_, message)| message.source_text.as_str())
        .collect()
}

#[test]
fn test_update_merges_extraction() -> Result<()> {
    let test = CliTest::with_catalog()?;

    let output = test.update_command().output()?;
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains(
        "Updated translations/lrc_pt_BR.ts (pt_BR): 3 matched, 1 added, 1 obsolete"
    ));
    assert!(stdout.contains("Updated 1 of 1 catalog(s) from 4 extracted message(s)"));

    let catalog = read_catalog(&test, "translations/lrc_pt_BR.ts")?;
    assert_eq!(
        sources(&catalog),
        vec!["New", "Busy", "Hold", "%n call(s)", "Hold (new)"]
    );

    let new = catalog.find("Call", "New", None).unwrap();
    assert_eq!(new.translation, "Novo");
    assert_eq!(new.status, MessageStatus::Finished);
    assert_eq!(new.locations, vec![Location::new("../src/call.cpp", 12)]);

    let busy = catalog.find("Call", "Busy", None).unwrap();
    assert_eq!(busy.translation, "Ocupado");
    assert_eq!(busy.status, MessageStatus::Obsolete);
    assert_eq!(busy.locations, vec![Location::new("../src/call.cpp", 20)]);

    let hold = catalog.find("Call", "Hold", None).unwrap();
    assert_eq!(hold.status, MessageStatus::Unfinished);
    assert_eq!(hold.translation, "Em espera");

    let added = catalog.find("Call", "Hold (new)", None).unwrap();
    assert_eq!(added.status, MessageStatus::Unfinished);
    assert!(added.translation.is_empty());

    Ok(())
}

#[test]
fn test_update_dry_run_leaves_catalog_untouched() -> Result<()> {
    let test = CliTest::with_catalog()?;

    let output = test.update_command().arg("--dry-run").output()?;
    let (stdout, _) = output_text(&output);
    assert!(output.status.success());
    assert!(stdout.contains("Would update translations/lrc_pt_BR.ts (pt_BR)"));
    assert!(stdout.contains("Run without --dry-run to write them."));

    assert_eq!(test.read_file("translations/lrc_pt_BR.ts")?, PT_BR_CATALOG);
    Ok(())
}

#[test]
fn test_update_vanish_then_prune() -> Result<()> {
    let test = CliTest::with_catalog()?;

    test.update_command().output()?;

    let output = test.update_command().output()?;
    let (stdout, _) = output_text(&output);
    assert!(stdout.contains("(pt_BR): 4 matched, 1 vanished"));
    let busy_status = read_catalog(&test, "translations/lrc_pt_BR.ts")?
        .find("Call", "Busy", None)
        .map(|m| m.status);
    assert_eq!(busy_status, Some(MessageStatus::Vanished));

    let output = test.update_command().arg("--prune").output()?;
    let (stdout, _) = output_text(&output);
    assert!(stdout.contains("(pt_BR): 4 matched, 1 pruned"));
    let catalog = read_catalog(&test, "translations/lrc_pt_BR.ts")?;
    assert!(catalog.find("Call", "Busy", None).is_none());

    let output = test.update_command().output()?;
    let (stdout, _) = output_text(&output);
    assert!(stdout.contains("Unchanged translations/lrc_pt_BR.ts (pt_BR): 4 matched"));
    assert!(stdout.contains("Updated 0 of 1 catalog(s)"));

    Ok(())
}

#[test]
fn test_update_is_idempotent_for_extracted_messages() -> Result<()> {
    let test = CliTest::with_catalog()?;

    test.update_command().output()?;
    let first = read_catalog(&test, "translations/lrc_pt_BR.ts")?;
    test.update_command().output()?;
    let second = read_catalog(&test, "translations/lrc_pt_BR.ts")?;

    for source in ["New", "Hold", "%n call(s)", "Hold (new)"] {
        let before = first.find("Call", source, None).unwrap();
        let after = second.find("Call", source, None).unwrap();
        assert_eq!(before.status, after.status, "{}", source);
        assert_eq!(before.locations, after.locations, "{}", source);
    }
    Ok(())
}

#[test]
fn test_update_creates_catalog_for_requested_locale() -> Result<()> {
    let test = CliTest::with_catalog()?;
    test.write_file(".lingcatrc.json", r#"{ "catalogPrefix": "lrc" }"#)?;

    let output = test.update_command().args(["--locale", "de"]).output()?;
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("Created translations/lrc_de.ts (de): 0 matched, 4 added"));

    let catalog = read_catalog(&test, "translations/lrc_de.ts")?;
    assert_eq!(catalog.language.as_deref(), Some("de"));
    assert_eq!(catalog.source_language.as_deref(), Some("en"));
    assert_eq!(catalog.message_count(), 4);
    assert!(
        catalog
            .messages()
            .all(|(_, message)| message.status == MessageStatus::Unfinished)
    );

    // Only the requested locale is touched.
    assert_eq!(test.read_file("translations/lrc_pt_BR.ts")?, PT_BR_CATALOG);
    Ok(())
}

#[test]
fn test_update_reports_extraction_issues() -> Result<()> {
    let test = CliTest::with_catalog()?;
    test.write_file(
        "extraction.json",
        r#"[
            {"context": "Call", "source": "New"},
            {"context": "Call", "source": ""},
            {"context": "Call", "source": "New", "locations": [{"file": "", "line": 3}]}
        ]"#,
    )?;

    let output = test.update_command().output()?;
    let (stdout, _) = output_text(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("error: entry #1 rejected: empty source text  invalid-source"));
    assert!(stdout.contains("warning: entry #2 has invalid location ':3'  invalid-location"));
    assert!(stdout.contains("warning: entry #2 duplicates entry #0  duplicate-extraction"));
    assert!(stdout.contains("  --> extraction.json"));
    assert!(stdout.contains("3 problems (1 error, 2 warnings)"));

    // Issues never block the merge.
    let catalog = read_catalog(&test, "translations/lrc_pt_BR.ts")?;
    assert_eq!(
        catalog.find("Call", "Busy", None).map(|m| m.status),
        Some(MessageStatus::Obsolete)
    );
    Ok(())
}

#[test]
fn test_update_skips_unparsable_catalog() -> Result<()> {
    let test = CliTest::with_catalog()?;
    let broken = "<TS><context><name>Call</name><message><translation/></message></context></TS>";
    test.write_file("translations/lrc_de.ts", broken)?;

    let output = test.update_command().output()?;
    let (stdout, _) = output_text(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("<message> without <source>  parse-error"));
    assert!(stdout.contains("  --> translations/lrc_de.ts:1:"));
    assert!(stdout.contains("Updated translations/lrc_pt_BR.ts (pt_BR)"));

    assert_eq!(test.read_file("translations/lrc_de.ts")?, broken);
    Ok(())
}

#[test]
fn test_update_without_extraction_fails() -> Result<()> {
    let test = CliTest::with_file("translations/lrc_pt_BR.ts", PT_BR_CATALOG)?;

    let output = test.update_command().output()?;
    let (_, stderr) = output_text(&output);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.starts_with("Error: Failed to read extraction file"));
    Ok(())
}

#[test]
fn test_update_with_extraction_argument() -> Result<()> {
    let test = CliTest::with_file("translations/lrc_pt_BR.ts", PT_BR_CATALOG)?;
    test.write_file("build/strings.json", crate::EXTRACTION)?;

    let output = test
        .update_command()
        .args(["--extraction", "build/strings.json"])
        .output()?;
    assert!(output.status.success());
    assert!(test.root().join("translations/lrc_pt_BR.ts").exists());
    let catalog = read_catalog(&test, "translations/lrc_pt_BR.ts")?;
    assert!(catalog.find("Call", "Hold (new)", None).is_some());
    Ok(())
}
