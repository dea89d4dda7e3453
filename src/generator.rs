use crate::caser;
use crate::resolver::{EnumDefinition, ResolvedEnumValue};

/// Emits the Rust source for a resolved enumeration: the enum type, its
/// `Enumeration` impl, the companion accessor, and the codec impls, all
/// delegating to `enumgen::runtime`. Pure substitution over the resolved
/// definition; no further validation happens here.
pub struct RustGenerator<'a> {
    definition: &'a EnumDefinition,
}

impl<'a> RustGenerator<'a> {
    pub fn new(definition: &'a EnumDefinition) -> Self {
        Self { definition }
    }

    pub fn generate(&self) -> String {
        let mut lines = Vec::new();

        self.emit_header(&mut lines);
        self.emit_type(&mut lines);
        self.emit_values(&mut lines);
        self.emit_companion(&mut lines);
        self.emit_display(&mut lines);
        self.emit_serde(&mut lines);
        self.emit_xml(&mut lines);
        self.emit_sql(&mut lines);

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let mut source = lines.join("\n");
        source.push('\n');
        source
    }

    fn type_name(&self) -> &str {
        &self.definition.type_name
    }

    fn accessor(&self) -> String {
        caser::to_snake(&self.definition.companion_name)
    }

    fn values(&self) -> &[ResolvedEnumValue] {
        &self.definition.values
    }

    /// Author-supplied names are emitted verbatim, so silence the variant
    /// naming lint when any of them stray from pascal case.
    fn needs_case_allowance(&self) -> bool {
        self.values().iter().any(|value| {
            value.name.contains('_')
                || value
                    .name
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_lowercase())
        })
    }

    fn emit_header(&self, lines: &mut Vec<String>) {
        for line in self.definition.header.lines() {
            lines.push(format!("// {line}"));
        }
        lines.push(String::new());

        lines.push(format!(
            "//! Package `{}`: the `{}` enumeration and its `{}` companion.",
            self.definition.package_name, self.definition.type_name, self.definition.companion_name
        ));
        lines.push(String::new());

        if self.needs_case_allowance() {
            lines.push("#![allow(non_camel_case_types)]".to_string());
            lines.push(String::new());
        }

        lines.push("use enumgen::runtime::codec::{self, CodecError};".to_string());
        lines.push("use enumgen::runtime::{Companion, Enumeration, UnrecognizedValue};".to_string());
        lines.push("use std::sync::OnceLock;".to_string());
        lines.push(String::new());
    }

    fn emit_type(&self, lines: &mut Vec<String>) {
        separator(lines, "type");

        if let Some(desc) = &self.definition.desc {
            for line in desc.lines() {
                lines.push(format!("/// {line}"));
            }
        }
        lines.push("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]".to_string());
        lines.push(format!("pub enum {} {{", self.type_name()));
        for value in self.values() {
            lines.push(format!("    {},", value.name));
        }
        lines.push("}".to_string());
        lines.push(String::new());
    }

    fn emit_values(&self, lines: &mut Vec<String>) {
        separator(lines, "values");

        lines.push(format!("impl Enumeration for {} {{", self.type_name()));

        lines.push("    fn identifier(&self) -> &'static str {".to_string());
        lines.push("        match self {".to_string());
        for value in self.values() {
            lines.push(format!(
                "            {}::{} => \"{}\",",
                self.type_name(),
                value.name,
                escape_rust(&value.name)
            ));
        }
        lines.push("        }".to_string());
        lines.push("    }".to_string());
        lines.push(String::new());

        lines.push("    fn serialized(&self) -> &'static str {".to_string());
        lines.push("        match self {".to_string());
        for value in self.values() {
            lines.push(format!(
                "            {}::{} => \"{}\",",
                self.type_name(),
                value.name,
                escape_rust(&value.serialized)
            ));
        }
        lines.push("        }".to_string());
        lines.push("    }".to_string());
        lines.push(String::new());

        lines.push("    fn aliases(&self) -> &'static [&'static str] {".to_string());
        lines.push("        match self {".to_string());
        for value in self.values() {
            let aliases = value
                .aliases
                .iter()
                .map(|alias| format!("\"{}\"", escape_rust(alias)))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!(
                "            {}::{} => &[{}],",
                self.type_name(),
                value.name,
                aliases
            ));
        }
        lines.push("        }".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }

    fn emit_companion(&self, lines: &mut Vec<String>) {
        separator(lines, "companion");

        let accessor = self.accessor();
        let static_name = accessor.to_uppercase();

        lines.push(format!(
            "/// Matcher over every declared `{}` value, built once on first use.",
            self.type_name()
        ));
        lines.push(format!(
            "pub fn {}() -> &'static Companion<{}> {{",
            accessor,
            self.type_name()
        ));
        lines.push(format!(
            "    static {}: OnceLock<Companion<{}>> = OnceLock::new();",
            static_name,
            self.type_name()
        ));
        lines.push(format!("    {}.get_or_init(|| {{", static_name));
        lines.push("        Companion::new(vec![".to_string());
        for value in self.values() {
            lines.push(format!("            {}::{},", self.type_name(), value.name));
        }
        lines.push("        ])".to_string());
        lines.push("    })".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }

    fn emit_display(&self, lines: &mut Vec<String>) {
        separator(lines, "display");

        lines.push(format!("impl std::fmt::Display for {} {{", self.type_name()));
        lines.push(
            "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {".to_string(),
        );
        lines.push("        f.write_str(self.serialized())".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!("impl std::str::FromStr for {} {{", self.type_name()));
        lines.push("    type Err = UnrecognizedValue;".to_string());
        lines.push(String::new());
        lines.push("    fn from_str(s: &str) -> Result<Self, Self::Err> {".to_string());
        lines.push(format!("        {}().parse(s)", self.accessor()));
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }

    fn emit_serde(&self, lines: &mut Vec<String>) {
        separator(lines, "json / yaml");

        lines.push(format!("impl serde::Serialize for {} {{", self.type_name()));
        lines.push(
            "    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {"
                .to_string(),
        );
        lines.push("        codec::serialize(self, serializer)".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!(
            "impl<'de> serde::Deserialize<'de> for {} {{",
            self.type_name()
        ));
        lines.push(
            "    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {"
                .to_string(),
        );
        lines.push(format!(
            "        codec::deserialize({}(), deserializer)",
            self.accessor()
        ));
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }

    fn emit_xml(&self, lines: &mut Vec<String>) {
        separator(lines, "xml");

        lines.push(format!("impl {} {{", self.type_name()));
        lines.push(
            "    pub fn to_xml_element(&self, tag: &str) -> Result<String, CodecError> {"
                .to_string(),
        );
        lines.push("        codec::to_xml_element(self, tag)".to_string());
        lines.push("    }".to_string());
        lines.push(String::new());
        lines.push(
            "    pub fn from_xml_element(xml: &str) -> Result<Self, CodecError> {".to_string(),
        );
        lines.push(format!(
            "        codec::from_xml_element({}(), xml)",
            self.accessor()
        ));
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }

    fn emit_sql(&self, lines: &mut Vec<String>) {
        separator(lines, "sql");

        lines.push(format!(
            "impl rusqlite::types::ToSql for {} {{",
            self.type_name()
        ));
        lines.push(
            "    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {"
                .to_string(),
        );
        lines.push("        Ok(codec::to_sql_value(self))".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!(
            "impl rusqlite::types::FromSql for {} {{",
            self.type_name()
        ));
        lines.push(
            "    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {"
                .to_string(),
        );
        lines.push(format!(
            "        codec::column_result({}(), value)",
            self.accessor()
        ));
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }
}

fn separator(lines: &mut Vec<String>, title: &str) {
    let width = 68usize.saturating_sub(4 + title.len());
    lines.push(format!("// {} {}", "-".repeat(width), title));
    lines.push(String::new());
}

fn escape_rust(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner;
    use crate::resolver::EnumDefinition;

    fn definition() -> EnumDefinition {
        EnumDefinition {
            package_name: "colors".to_string(),
            type_name: "Color".to_string(),
            companion_name: "Colors".to_string(),
            desc: Some("Supported palette colors.".to_string()),
            values: vec![
                ResolvedEnumValue {
                    name: "Red".to_string(),
                    serialized: "red".to_string(),
                    aliases: vec![
                        "red".to_string(),
                        "Red".to_string(),
                        "crimson".to_string(),
                    ],
                },
                ResolvedEnumValue {
                    name: "Green".to_string(),
                    serialized: "green".to_string(),
                    aliases: vec!["green".to_string(), "Green".to_string()],
                },
            ],
            header: banner::box_text(&["DO NOT EDIT".to_string()], banner::BOX_WIDTH),
        }
    }

    #[test]
    fn test_generates_type_and_variants() {
        let definition = definition();
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains("/// Supported palette colors."));
        assert!(source.contains("pub enum Color {"));
        assert!(source.contains("    Red,"));
        assert!(source.contains("    Green,"));
        assert!(!source.contains("#![allow(non_camel_case_types)]"));
    }

    #[test]
    fn test_generates_enumeration_impl() {
        let definition = definition();
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains("impl Enumeration for Color {"));
        assert!(source.contains(r#"            Color::Red => "red","#));
        assert!(source.contains(r#"            Color::Red => &["red", "Red", "crimson"],"#));
    }

    #[test]
    fn test_generates_companion_accessor() {
        let definition = definition();
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains("pub fn colors() -> &'static Companion<Color> {"));
        assert!(source.contains("    static COLORS: OnceLock<Companion<Color>> = OnceLock::new();"));
        assert!(source.contains("            Color::Red,"));
    }

    #[test]
    fn test_generates_codec_impls() {
        let definition = definition();
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains("impl std::str::FromStr for Color {"));
        assert!(source.contains("impl serde::Serialize for Color {"));
        assert!(source.contains("impl<'de> serde::Deserialize<'de> for Color {"));
        assert!(source.contains("codec::deserialize(colors(), deserializer)"));
        assert!(source.contains("impl rusqlite::types::ToSql for Color {"));
        assert!(source.contains("impl rusqlite::types::FromSql for Color {"));
        assert!(source.contains("pub fn to_xml_element(&self, tag: &str)"));
    }

    #[test]
    fn test_header_banner_is_commented() {
        let definition = definition();
        let source = RustGenerator::new(&definition).generate();

        let first = source.lines().next().unwrap();
        assert!(first.starts_with("// *"));
        assert!(source.contains("// *"));
        assert!(source.contains("//! Package `colors`: the `Color` enumeration"));
    }

    #[test]
    fn test_lowercase_names_get_case_allowance() {
        let mut definition = definition();
        definition.values[0].name = "red".to_string();
        definition.values[0].aliases = vec!["red".to_string()];
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains("#![allow(non_camel_case_types)]"));
        assert!(source.contains("    red,"));
    }

    #[test]
    fn test_multi_word_companion_uses_snake_accessor() {
        let mut definition = definition();
        definition.type_name = "StatusCode".to_string();
        definition.companion_name = "StatusCodes".to_string();
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains("pub fn status_codes() -> &'static Companion<StatusCode> {"));
        assert!(source.contains("    static STATUS_CODES: OnceLock<Companion<StatusCode>>"));
    }

    #[test]
    fn test_escapes_alias_literals() {
        let mut definition = definition();
        definition.values[1].aliases = vec!["green".to_string(), "say \"go\"".to_string()];
        let source = RustGenerator::new(&definition).generate();

        assert!(source.contains(r#"&["green", "say \"go\""],"#));
    }
}
