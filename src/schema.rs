//! Editor-integration output: a JSON Schema for `*.enum.yaml` documents
//! plus the VS Code settings wiring it up. Advisory only; resolution never
//! validates against this schema.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::caser;

const SCHEMA_FILE: &str = "enum.schema.json";
const SETTINGS_FILE: &str = "settings.json";
const VSCODE_SETTINGS: &str = include_str!("../assets/settings.json");

pub fn json_schema() -> serde_json::Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema",
        "title": "enumgen enumeration spec",
        "type": "object",
        "version": env!("CARGO_PKG_VERSION"),
        "properties": {
            "type": { "type": "string" },
            "package": { "type": "string" },
            "output-path": { "type": "string" },
            "desc": { "type": "string" },
            "header": { "type": "string" },
            "header-from": { "type": "string" },
            "serialize": {
                "type": "object",
                "properties": {
                    "type": { "type": "string", "enum": caser::combinations() },
                    "value": { "type": "string", "enum": caser::combinations() },
                },
            },
            "skip-format": { "type": "boolean" },
            "debug": { "type": "boolean" },
            "values": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "serialized": { "type": "string" },
                        "parse-from": {
                            "type": "array",
                            "items": { "type": "string" },
                        },
                    },
                },
            },
        },
    })
}

/// Install the schema and settings into `<project>/.vscode/`. An existing
/// settings file is never clobbered; the payload lands next to it under a
/// prefixed name with a merge hint instead.
pub fn install_vscode(project: &Path) -> Result<()> {
    let vscode_dir = project.join(".vscode");
    fs::create_dir_all(&vscode_dir)
        .with_context(|| format!("can't create {}", vscode_dir.display()))?;

    let settings_path = vscode_dir.join(SETTINGS_FILE);
    if settings_path.exists() {
        let fallback = vscode_dir.join(format!("enumgen-schema-{SETTINGS_FILE}"));
        fs::write(&fallback, VSCODE_SETTINGS)
            .with_context(|| format!("can't write {}", fallback.display()))?;
        println!(
            "{} already exists; add the contents of {} to it.",
            settings_path.display(),
            fallback.display()
        );
    } else {
        fs::write(&settings_path, VSCODE_SETTINGS)
            .with_context(|| format!("can't write {}", settings_path.display()))?;
        println!("Installed {}", settings_path.display());
    }

    let schema_path = vscode_dir.join(SCHEMA_FILE);
    let schema = serde_json::to_string_pretty(&json_schema())?;
    fs::write(&schema_path, schema)
        .with_context(|| format!("can't write {}", schema_path.display()))?;
    println!("Installed {}", schema_path.display());

    Ok(())
}
