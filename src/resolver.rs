use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::banner;
use crate::caser::{self, Converter, UnknownConverter};
use crate::config::{EnumSpec, EnumValueSpec, SerializeSpec};

/// Converters used to fill in the missing half of a value entry.
#[derive(Debug, Clone)]
pub struct CaseConversionConfig {
    /// Derives a missing serialized form from a supplied name.
    pub type_converter: Converter,
    /// Derives a missing name from a supplied serialized form.
    pub value_converter: Converter,
}

impl Default for CaseConversionConfig {
    fn default() -> Self {
        Self {
            type_converter: Converter::phrase_to_pascal(),
            value_converter: Converter::passthrough(),
        }
    }
}

impl CaseConversionConfig {
    /// Build the config from the spec's `serialize` section. An unknown
    /// strategy name is a configuration error, reported before any value
    /// is resolved.
    pub fn from_spec(serialize: &SerializeSpec) -> Result<Self, UnknownConverter> {
        let defaults = Self::default();

        let type_converter = match &serialize.type_strategy {
            Some(name) => caser::lookup(name)?,
            None => defaults.type_converter,
        };
        let value_converter = match &serialize.value_strategy {
            Some(name) => caser::lookup(name)?,
            None => defaults.value_converter,
        };

        Ok(Self {
            type_converter,
            value_converter,
        })
    }
}

/// A fully resolved enumeration value.
///
/// `aliases` holds every text the value matches at parse time: the
/// serialized form, the identifier name, then the `parse-from` entries,
/// in that order, deduplicated case-insensitively. Original casing is
/// kept for display; matching lower-cases both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnumValue {
    pub name: String,
    pub serialized: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub package_name: String,
    pub type_name: String,
    pub companion_name: String,
    pub desc: Option<String>,
    pub values: Vec<ResolvedEnumValue>,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("values[{index}] must supply a name or a serialized form")]
    InvalidValueSpec { index: usize },
    #[error("enum values '{a}' and '{b}' are ambiguous under case-insensitive matching")]
    AmbiguousEnumValue { a: String, b: String },
    #[error("duplicate enum name '{name}'")]
    DuplicateEnumName { name: String },
}

/// Resolve a single value entry. Derivation rules, first match wins:
///
/// 1. neither field supplied: invalid.
/// 2. only `serialized`: the name is derived through the value converter
///    and then stripped of symbols and whitespace; the serialized form is
///    kept exactly as supplied.
/// 3. only `name`: the serialized form is the type converter applied to
///    the name as supplied; the name itself is then normalized.
/// 4. both supplied: the name is normalized, the serialized form passes
///    through untouched.
pub fn resolve_value(
    spec: &EnumValueSpec,
    cfg: &CaseConversionConfig,
    index: usize,
) -> Result<ResolvedEnumValue, ResolveError> {
    let supplied_name = spec.name.as_deref().filter(|s| !s.trim().is_empty());
    let supplied_serialized = spec.serialized.as_deref().filter(|s| !s.trim().is_empty());

    let (name, serialized) = match (supplied_name, supplied_serialized) {
        (None, None) => return Err(ResolveError::InvalidValueSpec { index }),
        (None, Some(serialized)) => (
            caser::strip_symbols(&cfg.value_converter.apply(serialized)),
            serialized.to_string(),
        ),
        (Some(name), None) => (
            caser::strip_symbols(name),
            cfg.type_converter.apply(name),
        ),
        (Some(name), Some(serialized)) => (caser::strip_symbols(name), serialized.to_string()),
    };

    if name.is_empty() || serialized.is_empty() {
        return Err(ResolveError::InvalidValueSpec { index });
    }

    let mut aliases = Vec::with_capacity(2 + spec.parse_from.len());
    let mut seen = HashSet::new();
    for alias in std::iter::once(serialized.as_str())
        .chain(std::iter::once(name.as_str()))
        .chain(spec.parse_from.iter().map(String::as_str))
    {
        if seen.insert(alias.to_lowercase()) {
            aliases.push(alias.to_string());
        }
    }

    Ok(ResolvedEnumValue {
        name,
        serialized,
        aliases,
    })
}

/// Resolve a whole specification into an `EnumDefinition`.
///
/// Missing enumeration-level names are derived from the output path, every
/// value entry is resolved in input order (aborting on the first invalid
/// entry), and the resolved set is checked for case-insensitive serialized
/// collisions and exact name collisions. Failure produces no partial
/// definition.
pub fn resolve(
    spec: &EnumSpec,
    output_path: &Path,
    header_lines: &[String],
    cfg: &CaseConversionConfig,
) -> Result<EnumDefinition, ResolveError> {
    let package_name = match &spec.package {
        Some(package) => package.clone(),
        None => derive_package_name(output_path),
    };

    let type_name = match &spec.type_name {
        Some(type_name) => type_name.clone(),
        None => derive_type_name(output_path),
    };

    let companion_name = caser::pluralize(&type_name);

    let mut values = Vec::with_capacity(spec.values.len());
    for (index, value) in spec.values.iter().enumerate() {
        values.push(resolve_value(value, cfg, index)?);
    }

    check_uniqueness(&values)?;

    Ok(EnumDefinition {
        package_name,
        type_name,
        companion_name,
        desc: spec.desc.clone(),
        values,
        header: banner::box_text(header_lines, banner::BOX_WIDTH),
    })
}

/// Package name: basename of the output directory, `-` and spaces mapped
/// to `_`.
fn derive_package_name(output_path: &Path) -> String {
    output_path
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("enums")
        .replace(['-', ' '], "_")
}

/// Type name: output file basename minus the `.rs` and `.enum` extensions,
/// converted to pascal case.
fn derive_type_name(output_path: &Path) -> String {
    let stem = output_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("enum");
    let stem = stem.strip_suffix(".enum").unwrap_or(stem);
    caser::to_pascal(stem)
}

fn check_uniqueness(values: &[ResolvedEnumValue]) -> Result<(), ResolveError> {
    // Exact name collisions are checked first: names are part of the alias
    // sets, so the ambiguity check below would otherwise swallow them.
    let mut names = HashSet::new();
    for value in values {
        if !names.insert(value.name.as_str()) {
            return Err(ResolveError::DuplicateEnumName {
                name: value.name.clone(),
            });
        }
    }

    // Serialized forms and aliases collide case-insensitively across
    // distinct values; a value colliding with itself is fine (its alias
    // list is already deduplicated). Detection order follows input order,
    // never map iteration order.
    let mut seen: HashMap<String, (usize, String)> = HashMap::new();
    for (index, value) in values.iter().enumerate() {
        for alias in &value.aliases {
            let key = alias.to_lowercase();
            match seen.get(&key) {
                Some((other, first)) if *other != index => {
                    return Err(ResolveError::AmbiguousEnumValue {
                        a: first.clone(),
                        b: alias.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(key, (index, alias.clone()));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializeSpec;
    use std::path::PathBuf;

    fn value(name: Option<&str>, serialized: Option<&str>, parse_from: &[&str]) -> EnumValueSpec {
        EnumValueSpec {
            name: name.map(str::to_string),
            serialized: serialized.map(str::to_string),
            parse_from: parse_from.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn resolve_spec(values: Vec<EnumValueSpec>) -> Result<EnumDefinition, ResolveError> {
        let spec = EnumSpec {
            values,
            ..EnumSpec::default()
        };
        resolve(
            &spec,
            &PathBuf::from("src/status/status.enum.rs"),
            &["test".to_string()],
            &CaseConversionConfig::default(),
        )
    }

    #[test]
    fn test_name_only_uses_type_converter_exactly() {
        let cfg = CaseConversionConfig::default();
        let resolved = resolve_value(&value(Some("InProgress"), None, &[]), &cfg, 0).unwrap();
        assert_eq!(resolved.name, "InProgress");
        assert_eq!(resolved.serialized, "InProgress");
    }

    #[test]
    fn test_name_only_with_kebab_type_converter() {
        let serialize = SerializeSpec {
            type_strategy: Some("pascal-to-kebab-lower".to_string()),
            value_strategy: None,
        };
        let cfg = CaseConversionConfig::from_spec(&serialize).unwrap();
        let resolved = resolve_value(&value(Some("InProgress"), None, &[]), &cfg, 0).unwrap();
        assert_eq!(resolved.serialized, "in-progress");
        assert_eq!(resolved.name, "InProgress");
    }

    #[test]
    fn test_serialized_only_uses_value_converter_and_strips() {
        let cfg = CaseConversionConfig::default();
        let resolved =
            resolve_value(&value(None, Some("done"), &["complete", "finished"]), &cfg, 0).unwrap();
        assert_eq!(resolved.name, "done");
        assert_eq!(resolved.serialized, "done");
        assert_eq!(resolved.aliases, vec!["done", "complete", "finished"]);
    }

    #[test]
    fn test_serialized_only_with_pascal_value_converter() {
        let serialize = SerializeSpec {
            type_strategy: None,
            value_strategy: Some("kebab-to-pascal".to_string()),
        };
        let cfg = CaseConversionConfig::from_spec(&serialize).unwrap();
        let resolved = resolve_value(&value(None, Some("in-progress"), &[]), &cfg, 0).unwrap();
        assert_eq!(resolved.name, "InProgress");
        // the supplied serialized form is never modified
        assert_eq!(resolved.serialized, "in-progress");
    }

    #[test]
    fn test_serialized_only_ignores_type_converter() {
        let serialize = SerializeSpec {
            type_strategy: Some("kebab-to-snake-upper".to_string()),
            value_strategy: None,
        };
        let cfg = CaseConversionConfig::from_spec(&serialize).unwrap();
        let resolved = resolve_value(&value(None, Some("in-progress"), &[]), &cfg, 0).unwrap();
        assert_eq!(resolved.serialized, "in-progress");
        assert_eq!(resolved.name, "inprogress");
    }

    #[test]
    fn test_both_supplied_keeps_author_intent() {
        let cfg = CaseConversionConfig::default();
        let resolved = resolve_value(&value(Some("In Progress"), Some("WIP"), &[]), &cfg, 0).unwrap();
        assert_eq!(resolved.name, "InProgress");
        assert_eq!(resolved.serialized, "WIP");
    }

    #[test]
    fn test_neither_supplied_is_invalid() {
        let err = resolve_spec(vec![
            value(Some("A"), None, &[]),
            value(Some("B"), None, &[]),
            value(None, None, &[]),
        ])
        .unwrap_err();
        assert_eq!(err, ResolveError::InvalidValueSpec { index: 2 });
    }

    #[test]
    fn test_all_symbol_serialized_is_invalid() {
        let cfg = CaseConversionConfig::default();
        let err = resolve_value(&value(None, Some("--!--"), &[]), &cfg, 4).unwrap_err();
        assert_eq!(err, ResolveError::InvalidValueSpec { index: 4 });
    }

    #[test]
    fn test_alias_dedup_is_case_insensitive_within_value() {
        let cfg = CaseConversionConfig::default();
        let resolved =
            resolve_value(&value(Some("Done"), Some("done"), &["DONE", "finished"]), &cfg, 0)
                .unwrap();
        assert_eq!(resolved.aliases, vec!["done", "finished"]);
    }

    #[test]
    fn test_case_colliding_serialized_forms_are_ambiguous() {
        let err = resolve_spec(vec![
            value(None, Some("Active"), &[]),
            value(None, Some("active"), &[]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::AmbiguousEnumValue {
                a: "Active".to_string(),
                b: "active".to_string(),
            }
        );
    }

    #[test]
    fn test_shared_alias_is_ambiguous() {
        let err = resolve_spec(vec![
            value(None, Some("done"), &["complete"]),
            value(None, Some("closed"), &["COMPLETE"]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::AmbiguousEnumValue {
                a: "complete".to_string(),
                b: "COMPLETE".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = resolve_spec(vec![
            value(Some("Same"), Some("one"), &[]),
            value(Some("Same"), Some("two"), &[]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::DuplicateEnumName {
                name: "Same".to_string(),
            }
        );
    }

    #[test]
    fn test_defaults_derived_from_output_path() {
        let spec = EnumSpec {
            values: vec![value(Some("Ok"), None, &[])],
            ..EnumSpec::default()
        };
        let definition = resolve(
            &spec,
            &PathBuf::from("src/status-codes/status-code.enum.rs"),
            &["h".to_string()],
            &CaseConversionConfig::default(),
        )
        .unwrap();
        assert_eq!(definition.package_name, "status_codes");
        assert_eq!(definition.type_name, "StatusCode");
        assert_eq!(definition.companion_name, "StatusCodes");
    }

    #[test]
    fn test_supplied_names_win_over_derivation() {
        let spec = EnumSpec {
            type_name: Some("Phase".to_string()),
            package: Some("workflow".to_string()),
            values: vec![value(Some("Ok"), None, &[])],
            ..EnumSpec::default()
        };
        let definition = resolve(
            &spec,
            &PathBuf::from("src/other/thing.enum.rs"),
            &["h".to_string()],
            &CaseConversionConfig::default(),
        )
        .unwrap();
        assert_eq!(definition.type_name, "Phase");
        assert_eq!(definition.companion_name, "Phases");
        assert_eq!(definition.package_name, "workflow");
    }

    #[test]
    fn test_input_order_is_preserved() {
        let definition = resolve_spec(vec![
            value(None, Some("zulu"), &[]),
            value(None, Some("alpha"), &[]),
            value(None, Some("mike"), &[]),
        ])
        .unwrap();
        let order: Vec<&str> = definition
            .values
            .iter()
            .map(|v| v.serialized.as_str())
            .collect();
        assert_eq!(order, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_unknown_strategy_is_a_config_error() {
        let serialize = SerializeSpec {
            type_strategy: Some("pascal-to-nowhere".to_string()),
            value_strategy: None,
        };
        assert!(CaseConversionConfig::from_spec(&serialize).is_err());
    }
}
