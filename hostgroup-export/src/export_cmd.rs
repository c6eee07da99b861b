use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use hostgroup_export::archive::{find_source_archive, load_document, write_archive};
use hostgroup_export::catalog::GroupCatalog;
use hostgroup_export::config::ExportConfig;
use hostgroup_export::error::ExportError;
use hostgroup_export::extract::extract_groups;
use hostgroup_export::schema::{detect_schema, Schema};
use hostgroup_export::selection::parse_selection;
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::console::{is_affirmative, Console};
use crate::path_guard;

const SELECTION_PROMPT: &str = "Select groups (e.g. 1,3,5 / 1-5 / name): ";
const NAME_PROMPT: &str = "Export name: ";

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Catalog printed, nothing exported.
    Listed,
    /// Output archive written.
    Exported(PathBuf),
    /// Operator declined to overwrite an existing archive.
    Declined(PathBuf),
}

#[derive(Debug, Serialize)]
struct CatalogReport<'a> {
    archive: String,
    member: &'a str,
    schema: Schema,
    groups: Vec<CatalogEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct CatalogEntry<'a> {
    index: usize,
    name: &'a str,
}

pub fn run_export<R: BufRead, W: Write>(
    cli: &Cli,
    config: &ExportConfig,
    console: &mut Console<R, W>,
) -> Result<ExportOutcome> {
    let json_listing = cli.list && cli.format == OutputFormat::Json;
    let source = find_source_archive(config.source_dir(), &config.archive_marker)?;
    if !json_listing {
        console.blank()?;
        console.say(format!("Source archive: {}", display_name(&source)))?;
    }
    let loaded = load_document(&source)?;
    let schema = detect_schema(&loaded.document)?;
    let catalog = GroupCatalog::enumerate(&loaded.document, schema);

    if json_listing {
        if catalog.is_empty() {
            return Err(ExportError::EmptyCatalog.into());
        }
        let report = CatalogReport {
            archive: display_name(&source),
            member: &loaded.member_name,
            schema,
            groups: catalog
                .names()
                .iter()
                .enumerate()
                .map(|(i, name)| CatalogEntry {
                    index: i + 1,
                    name,
                })
                .collect(),
        };
        console.say(serde_json::to_string_pretty(&report)?)?;
        return Ok(ExportOutcome::Listed);
    }

    console.blank()?;
    console.say(format!("Detected schema: {schema} hosts"))?;

    if catalog.is_empty() {
        return Err(ExportError::EmptyCatalog.into());
    }
    console.blank()?;
    console.say(format!("Available groups ({}):", catalog.len()))?;
    console.say(catalog.render_listing())?;
    console.blank()?;

    if cli.list {
        return Ok(ExportOutcome::Listed);
    }

    let text = match &cli.select {
        Some(text) => text.clone(),
        None => console.ask(SELECTION_PROMPT)?,
    };
    let selection = parse_selection(&text, &catalog);
    if !selection.is_valid() {
        console.blank()?;
        console.say(format!("Invalid entries: {}", selection.invalid.join(", ")))?;
        return Err(ExportError::InvalidSelection {
            tokens: selection.invalid,
        }
        .into());
    }
    if selection.matched.is_empty() {
        return Err(ExportError::EmptySelection.into());
    }

    console.blank()?;
    console.say(format!("Selected groups ({}):", selection.matched.len()))?;
    for name in &selection.matched {
        console.say(format!("  - {name}"))?;
    }

    let raw_name = match &cli.name {
        Some(name) => name.clone(),
        None => {
            console.blank()?;
            console.ask(NAME_PROMPT)?
        }
    };
    let export_name = sanitize_export_name(&raw_name);
    if export_name.is_empty() {
        return Err(ExportError::EmptyExportName.into());
    }

    let output_path = config.output_path(&export_name);
    path_guard::ensure_output_not_source(&output_path, &source)?;
    if output_path.exists() && !cli.overwrite {
        console.blank()?;
        let answer = console.ask(&format!(
            "File {} already exists. Overwrite? (y/n): ",
            output_path.display()
        ))?;
        if !is_affirmative(&answer) {
            console.blank()?;
            console.say("Export cancelled: file already exists.".yellow())?;
            info!(output = %output_path.display(), "overwrite declined");
            return Ok(ExportOutcome::Declined(output_path));
        }
    }

    let extraction = extract_groups(&loaded.document, schema, &selection.matched);
    write_archive(&output_path, &loaded.member_name, &extraction.document)?;

    console.blank()?;
    console.say(
        format!(
            "Export successful: {} (hosts: {}, groups: {})",
            output_path.display(),
            extraction.host_count,
            extraction.group_count
        )
        .green(),
    )?;
    Ok(ExportOutcome::Exported(output_path))
}

/// Trim the operator's export name and replace spaces with underscores.
pub fn sanitize_export_name(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    use clap::Parser;
    use hostgroup_export::archive::{load_document, write_archive};
    use hostgroup_export::config::ExportConfig;
    use hostgroup_export::error::ExportError;
    use tempfile::{tempdir, TempDir};
    use xml_tree_core::parse_file;

    use super::{run_export, sanitize_export_name, ExportOutcome};
    use crate::cli::Cli;
    use crate::console::Console;

    fn fixture(path: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join(path)
    }

    fn workspace(fixture_name: &str) -> (TempDir, ExportConfig) {
        let dir = tempdir().expect("tempdir");
        let doc = parse_file(&fixture(fixture_name)).expect("fixture parse");
        write_archive(&dir.path().join("Backup_API-fw01.tar"), "Entities.xml", &doc)
            .expect("write source archive");
        let config = ExportConfig {
            source_dir: Some(dir.path().to_path_buf()),
            output_dir: Some(dir.path().to_path_buf()),
            ..ExportConfig::default()
        };
        (dir, config)
    }

    fn run(
        args: &[&str],
        config: &ExportConfig,
        input: &str,
    ) -> (anyhow::Result<ExportOutcome>, String) {
        let argv = std::iter::once("hostgroup-export").chain(args.iter().copied());
        let cli = Cli::parse_from(argv);
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let result = run_export(&cli, config, &mut console);
        let output = String::from_utf8(console.into_output()).expect("utf8 output");
        (result, output)
    }

    fn export_error(result: &anyhow::Result<ExportOutcome>) -> &ExportError {
        result
            .as_ref()
            .expect_err("run should fail")
            .downcast_ref::<ExportError>()
            .expect("export error")
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_export_name("  web servers q1 "), "web_servers_q1");
        assert_eq!(sanitize_export_name("   "), "");
    }

    #[test]
    fn interactive_run_writes_selected_groups() {
        let (dir, config) = workspace("fixtures/ip_hosts.xml");
        let (result, output) = run(&[], &config, "web\nweb only\n");

        let expected = dir.path().join("web_only.tar");
        assert_eq!(result.expect("run"), ExportOutcome::Exported(expected.clone()));
        assert!(output.contains("Source archive: Backup_API-fw01.tar"), "{output}");
        assert!(output.contains("Detected schema: IP hosts"), "{output}");
        assert!(output.contains("  4: Web Servers"), "{output}");
        assert!(output.contains("  - Web Servers"), "{output}");
        assert!(
            output.contains("web_only.tar (hosts: 2, groups: 1)"),
            "{output}"
        );

        let loaded = load_document(&expected).expect("load output");
        assert_eq!(loaded.member_name, "Entities.xml");
        assert_eq!(loaded.document.get_children("IPHost").len(), 2);
        assert_eq!(loaded.document.get_children("IPHostGroup").len(), 1);
    }

    #[test]
    fn invalid_tokens_are_listed_and_fatal() {
        let (dir, config) = workspace("fixtures/ip_hosts.xml");
        let (result, output) = run(&["--select", "1,9,nothing"], &config, "");

        assert!(matches!(
            export_error(&result),
            ExportError::InvalidSelection { tokens } if tokens == &["9", "nothing"]
        ));
        assert!(output.contains("Invalid entries: 9, nothing"), "{output}");
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 1);
    }

    #[test]
    fn blank_selection_is_fatal() {
        let (_dir, config) = workspace("fixtures/ip_hosts.xml");
        let (result, _) = run(&[], &config, "\n");
        assert!(matches!(export_error(&result), ExportError::EmptySelection));
    }

    #[test]
    fn blank_export_name_is_fatal() {
        let (_dir, config) = workspace("fixtures/fqdn_hosts.xml");
        let (result, output) = run(&["--select", "1"], &config, "   \n");
        assert!(output.contains("Detected schema: FQDN hosts"), "{output}");
        assert!(matches!(export_error(&result), ExportError::EmptyExportName));
    }

    #[test]
    fn declined_overwrite_keeps_existing_file() {
        let (dir, config) = workspace("fixtures/ip_hosts.xml");
        let existing = dir.path().join("keep.tar");
        fs::write(&existing, b"original bytes").expect("write existing");

        let (result, output) = run(&["--select", "2", "--name", "keep"], &config, "n\n");

        assert_eq!(result.expect("run"), ExportOutcome::Declined(existing.clone()));
        assert!(output.contains("already exists"), "{output}");
        assert_eq!(fs::read(&existing).expect("read"), b"original bytes");
    }

    #[test]
    fn confirmed_overwrite_replaces_file() {
        let (dir, config) = workspace("fixtures/ip_hosts.xml");
        let existing = dir.path().join("db.tar");
        fs::write(&existing, b"stale").expect("write existing");

        let (result, _) = run(&["--select", "Databases", "--name", "db"], &config, "Ja\n");

        assert_eq!(result.expect("run"), ExportOutcome::Exported(existing.clone()));
        let loaded = load_document(&existing).expect("load output");
        assert_eq!(loaded.document.get_children("IPHostGroup").len(), 1);
    }

    #[test]
    fn end_of_input_interrupts_without_writing() {
        let (dir, config) = workspace("fixtures/ip_hosts.xml");
        let (result, _) = run(&["--select", "1"], &config, "");
        assert!(matches!(export_error(&result), ExportError::Interrupted));
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 1);
    }

    #[test]
    fn list_mode_prints_catalog_only() {
        let (_dir, config) = workspace("fixtures/ip_hosts.xml");
        let (result, output) = run(&["--list"], &config, "");
        assert_eq!(result.expect("run"), ExportOutcome::Listed);
        assert!(output.contains("Available groups (4):"), "{output}");
        assert!(output.contains("  1: Backup"), "{output}");
    }

    #[test]
    fn json_list_is_machine_readable() {
        let (_dir, config) = workspace("fixtures/fqdn_hosts.xml");
        let (result, output) = run(&["--list", "--format", "json"], &config, "");
        assert_eq!(result.expect("run"), ExportOutcome::Listed);

        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["schema"], "FQDN");
        assert_eq!(value["member"], "Entities.xml");
        assert_eq!(value["groups"][0]["index"], 1);
        assert_eq!(value["groups"][0]["name"], "Time Sources");
    }

    #[test]
    fn missing_archive_is_reported() {
        let dir = tempdir().expect("tempdir");
        let config = ExportConfig {
            source_dir: Some(dir.path().to_path_buf()),
            ..ExportConfig::default()
        };
        let (result, _) = run(&[], &config, "");
        assert!(matches!(
            export_error(&result),
            ExportError::NoSourceArchive { .. }
        ));
    }

    #[test]
    fn refuses_to_overwrite_source_archive() {
        let (dir, config) = workspace("fixtures/ip_hosts.xml");
        let (result, _) = run(
            &["--select", "1", "--name", "Backup_API-fw01", "--overwrite"],
            &config,
            "",
        );
        let err = result.expect_err("guarded");
        assert!(err.to_string().contains("refusing to overwrite"), "{err}");
        assert!(dir.path().join("Backup_API-fw01.tar").exists());
    }
}
