use anyhow::Result;

use crate::{CliTest, output_text};

const PT_CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="pt" sourcelanguage="en">
<context>
    <name>Call</name>
    <message>
        <source>Hold</source>
        <translation>Aguarde</translation>
    </message>
    <message>
        <source>Default</source>
        <comment>TLS version</comment>
        <translation>Padrão</translation>
    </message>
    <message>
        <source>Old</source>
        <translation type="vanished">Velho</translation>
    </message>
</context>
</TS>
"#;

const ES_CATALOG: &str = r#"<TS version="2.1" language="es">
<context>
    <name>Call</name>
    <message>
        <source>Hold</source>
        <translation>En espera</translation>
    </message>
</context>
</TS>
"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_catalog()?;
    test.write_file("translations/lrc_pt.ts", PT_CATALOG)?;
    test.write_file("translations/lrc_es.ts", ES_CATALOG)?;
    Ok(test)
}

fn resolve(
    test: &CliTest,
    context: &str,
    source: &str,
    locale: &str,
    extra: &[&str],
) -> Result<String> {
    let output = test
        .resolve_command(context, source, locale)
        .args(extra)
        .output()?;
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stderr: {}", stderr);
    Ok(stdout)
}

#[test]
fn test_resolve_exact_match() -> Result<()> {
    let test = project()?;
    assert_eq!(resolve(&test, "Call", "New", "pt_BR", &[])?, "Novo\n");
    Ok(())
}

#[test]
fn test_resolve_unfinished_falls_back_to_base_language() -> Result<()> {
    let test = project()?;
    // pt_BR has "Hold" unfinished, so pt answers.
    assert_eq!(resolve(&test, "Call", "Hold", "pt_BR", &[])?, "Aguarde\n");
    Ok(())
}

#[test]
fn test_resolve_plural_forms() -> Result<()> {
    let test = project()?;
    assert_eq!(
        resolve(&test, "Call", "%n call(s)", "pt_BR", &["--count", "1"])?,
        "%n chamada\n"
    );
    assert_eq!(
        resolve(&test, "Call", "%n call(s)", "pt_BR", &["--count", "0"])?,
        "%n chamada\n"
    );
    assert_eq!(
        resolve(&test, "Call", "%n call(s)", "pt_BR", &["--count", "5"])?,
        "%n chamadas\n"
    );
    Ok(())
}

#[test]
fn test_resolve_disambiguation() -> Result<()> {
    let test = project()?;
    assert_eq!(
        resolve(&test, "Call", "Default", "pt", &["--disambiguation", "TLS version"])?,
        "Padrão\n"
    );
    assert_eq!(resolve(&test, "Call", "Default", "pt", &[])?, "Default\n");
    Ok(())
}

#[test]
fn test_resolve_serves_retired_translations() -> Result<()> {
    let test = project()?;
    assert_eq!(resolve(&test, "Call", "Old", "pt_BR", &[])?, "Velho\n");
    Ok(())
}

#[test]
fn test_resolve_unknown_message_returns_source() -> Result<()> {
    let test = project()?;
    assert_eq!(resolve(&test, "Dialog", "Cancel", "pt_BR", &[])?, "Cancel\n");
    Ok(())
}

#[test]
fn test_resolve_configured_fallbacks() -> Result<()> {
    let test = project()?;
    test.write_file(".lingcatrc.json", r#"{ "fallbacks": { "pt_BR": ["es"] } }"#)?;

    assert_eq!(resolve(&test, "Call", "Hold", "pt_BR", &[])?, "En espera\n");
    Ok(())
}

#[test]
fn test_resolve_unavailable_locale() -> Result<()> {
    let test = project()?;

    let output = test.resolve_command("Call", "New", "fr").output()?;
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success());
    assert_eq!(stdout, "New\n");
    assert!(stderr.contains("warning: no catalog available for locale 'fr'  locale-unavailable"));
    assert!(stderr.contains("= hint: falling back to the source text"));
    Ok(())
}
