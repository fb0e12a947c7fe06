use anyhow::Result;

use crate::{CliTest, PT_BR_CATALOG, output_text};

#[test]
fn test_check_prints_statistics() -> Result<()> {
    let test = CliTest::with_catalog()?;

    let output = test.check_command().output()?;
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stderr: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "Locale  Finished  Unfinished  Obsolete  Vanished  Done  Catalog"
    );
    assert_eq!(
        lines[1],
        "pt_BR          3           1         0         0   75%  translations/lrc_pt_BR.ts"
    );
    assert!(stdout.contains("Checked 1 catalog - no issues found"));
    assert!(stderr.contains("note: 1 unfinished message(s) (use -v for details)"));
    Ok(())
}

#[test]
fn test_check_verbose_lists_unfinished_messages() -> Result<()> {
    let test = CliTest::with_catalog()?;

    let output = test.check_command().arg("-v").output()?;
    let (stdout, stderr) = output_text(&output);
    // Unfinished messages are warnings only.
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("warning: \"Hold\"  unfinished"));
    assert!(stdout.contains("  --> ../src/call.cpp:30"));
    assert!(stdout.contains("= note: pt_BR in context 'Call' (translations/lrc_pt_BR.ts)"));
    assert!(stdout.contains("1 problem (0 errors, 1 warning)"));
    assert!(!stderr.contains("use -v for details"));
    Ok(())
}

#[test]
fn test_check_reports_parse_errors() -> Result<()> {
    let test = CliTest::with_catalog()?;
    test.write_file(
        "translations/lrc_de.ts",
        "<TS>\n<context>\n  <message><source>New</source></message>\n</context>\n</TS>\n",
    )?;

    let output = test.check_command().output()?;
    let (stdout, _) = output_text(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("error: <context> without <name>  parse-error"));
    assert!(stdout.contains("  --> translations/lrc_de.ts:"));
    // The other catalog is still checked.
    assert!(stdout.contains("translations/lrc_pt_BR.ts"));
    assert!(!stdout.contains("no issues found"));
    Ok(())
}

#[test]
fn test_check_requested_locale_without_catalog() -> Result<()> {
    let test = CliTest::with_catalog()?;

    let output = test
        .check_command()
        .args(["--locale", "pt-BR", "--locale", "fr"])
        .output()?;
    let (stdout, _) = output_text(&output);
    assert!(output.status.success());
    assert!(stdout.contains("warning: no catalog available for locale 'fr'  locale-unavailable"));
    assert!(stdout.contains("pt_BR "));
    Ok(())
}

#[test]
fn test_check_without_catalogs() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_command().output()?;
    let (stdout, _) = output_text(&output);
    assert!(output.status.success());
    assert!(stdout.contains("Checked 0 catalogs - no issues found"));
    Ok(())
}

#[test]
fn test_check_catalogs_root_argument_and_ignores() -> Result<()> {
    let test = CliTest::with_file("i18n/lrc_pt_BR.ts", PT_BR_CATALOG)?;
    test.write_file("i18n/old/lrc_de.ts", "not a catalog")?;
    test.write_file(".lingcatrc.json", r#"{ "ignores": ["old/**"] }"#)?;

    let output = test
        .check_command()
        .args(["--catalogs-root", "i18n"])
        .output()?;
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("i18n/lrc_pt_BR.ts"));
    assert!(!stdout.contains("lrc_de.ts"));
    Ok(())
}

#[test]
fn test_check_invalid_config_fails() -> Result<()> {
    let test = CliTest::with_file(".lingcatrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.check_command().output()?;
    let (_, stderr) = output_text(&output);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Invalid glob pattern in 'ignores'"));
    Ok(())
}
