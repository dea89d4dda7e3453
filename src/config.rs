use serde::Deserialize;
use std::path::{Path, PathBuf};

/// An enumeration specification document (`*.enum.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnumSpec {
    /// Generated enum type name; derived from the output path if absent.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Package (module) the generated file belongs to; derived from the
    /// output path if absent.
    pub package: Option<String>,
    pub output_path: Option<PathBuf>,
    /// Doc comment attached to the generated type.
    pub desc: Option<String>,
    /// Inline header text; wins over `header-from`.
    pub header: Option<String>,
    /// Path to a file whose contents become the header text.
    pub header_from: Option<PathBuf>,
    #[serde(default)]
    pub serialize: SerializeSpec,
    #[serde(default)]
    pub skip_format: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub values: Vec<EnumValueSpec>,
}

/// Converter strategy selection. `type` derives a missing serialized form
/// from a supplied name; `value` derives a missing name from a supplied
/// serialized form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SerializeSpec {
    #[serde(rename = "type")]
    pub type_strategy: Option<String>,
    #[serde(rename = "value")]
    pub value_strategy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnumValueSpec {
    pub name: Option<String>,
    pub serialized: Option<String>,
    #[serde(default)]
    pub parse_from: Vec<String>,
}

impl EnumSpec {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: EnumSpec = serde_yaml::from_str(&content)?;
        Ok(spec)
    }
}
