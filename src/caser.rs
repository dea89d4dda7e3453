use convert_case::{Case, Casing};

/// Case kinds addressable in a converter strategy name. The `-lower`/`-upper`
/// suffixed spellings exist so strategy names can be explicit about letter
/// case where the delimiter alone is ambiguous.
const KINDS: &[(&str, Case)] = &[
    ("camel", Case::Camel),
    ("pascal", Case::Pascal),
    ("phrase", Case::Lower),
    ("phrase-upper", Case::Upper),
    ("title", Case::Title),
    ("kebab", Case::Kebab),
    ("kebab-lower", Case::Kebab),
    ("kebab-upper", Case::Cobol),
    ("snake", Case::Snake),
    ("snake-lower", Case::Snake),
    ("snake-upper", Case::UpperSnake),
    ("flat", Case::Flat),
];

/// Canonical kind names used when enumerating strategy combinations for the
/// editor schema (aliases like plain `kebab` are accepted but not listed).
const CANONICAL_KINDS: &[&str] = &[
    "camel",
    "pascal",
    "phrase",
    "phrase-upper",
    "title",
    "kebab-lower",
    "kebab-upper",
    "snake-lower",
    "snake-upper",
    "flat",
];

pub const PASSTHROUGH: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown case converter '{0}' (expected '<kind>-to-<kind>' or 'none')")]
pub struct UnknownConverter(pub String);

/// A named, pure text-casing transform.
///
/// Strategy names take the form `<kind>-to-<kind>`, e.g. `phrase-to-pascal`
/// or `pascal-to-kebab-lower`. Word boundaries are inferred from the input,
/// so only the target side selects behavior; the source side is validated so
/// the advertised combinations stay honest.
#[derive(Debug, Clone)]
pub struct Converter {
    name: String,
    target: Option<Case>,
}

impl Converter {
    pub fn passthrough() -> Self {
        Self {
            name: PASSTHROUGH.to_string(),
            target: None,
        }
    }

    pub fn phrase_to_pascal() -> Self {
        Self {
            name: "phrase-to-pascal".to_string(),
            target: Some(Case::Pascal),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, input: &str) -> String {
        match self.target {
            Some(case) => input.to_case(case),
            None => input.to_string(),
        }
    }
}

fn kind(name: &str) -> Option<Case> {
    KINDS
        .iter()
        .find(|(kind, _)| *kind == name)
        .map(|(_, case)| *case)
}

/// Look up a converter strategy by name.
pub fn lookup(name: &str) -> Result<Converter, UnknownConverter> {
    if name == PASSTHROUGH || name == "passthrough" {
        return Ok(Converter::passthrough());
    }

    let (from, to) = name
        .split_once("-to-")
        .ok_or_else(|| UnknownConverter(name.to_string()))?;

    if kind(from).is_none() {
        return Err(UnknownConverter(name.to_string()));
    }

    let target = kind(to).ok_or_else(|| UnknownConverter(name.to_string()))?;

    Ok(Converter {
        name: name.to_string(),
        target: Some(target),
    })
}

/// Every valid strategy name, for the editor-integration schema.
pub fn combinations() -> Vec<String> {
    let mut names = vec![PASSTHROUGH.to_string()];

    for from in CANONICAL_KINDS {
        for to in CANONICAL_KINDS {
            if from != to {
                names.push(format!("{from}-to-{to}"));
            }
        }
    }

    names
}

/// Strip everything that cannot appear in an identifier: keeps letters,
/// digits and underscores, drops symbols and whitespace.
pub fn strip_symbols(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

pub fn to_pascal(input: &str) -> String {
    input.to_case(Case::Pascal)
}

pub fn to_snake(input: &str) -> String {
    input.to_case(Case::Snake)
}

/// English pluralization for companion collection names. Covers the regular
/// suffix rules; irregular nouns are rare in type names and can always be
/// supplied explicitly in the spec.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }

    if lower.ends_with('y') {
        let before = lower.chars().rev().nth(1);
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    format!("{word}s")
}
