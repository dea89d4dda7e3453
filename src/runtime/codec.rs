//! Codec adapters bridging the companion matcher to the wire formats the
//! generated code supports. Every decode path extracts a bare string from
//! the format's envelope and defers matching to [`Companion::parse`];
//! matcher errors pass through verbatim.

use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use rusqlite::types::{FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serializer};
use std::io::Cursor;

use super::{Companion, Enumeration, UnrecognizedValue};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Unrecognized(#[from] UnrecognizedValue),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("markup document has no element content")]
    MissingElement,
    #[error("cannot decode an enumeration from a null driver value")]
    NullValue,
    #[error("driver value is not text")]
    NotAString,
}

// ------------------------------------------------------------------ serde

/// Serialize glue for generated `serde::Serialize` impls.
pub fn serialize<E, S>(value: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: Enumeration,
    S: Serializer,
{
    serializer.serialize_str(value.serialized())
}

/// Deserialize glue for generated `serde::Deserialize` impls.
pub fn deserialize<'de, E, D>(companion: &Companion<E>, deserializer: D) -> Result<E, D::Error>
where
    E: Enumeration,
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    companion.parse(&text).map_err(serde::de::Error::custom)
}

// ------------------------------------------------------------------- json

pub fn to_json<E: Enumeration>(value: &E) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value.serialized())?)
}

pub fn from_json<E: Enumeration>(companion: &Companion<E>, data: &str) -> Result<E, CodecError> {
    let text: String = serde_json::from_str(data)?;
    Ok(companion.parse(&text)?)
}

// ------------------------------------------------------------------- yaml

pub fn to_yaml<E: Enumeration>(value: &E) -> Result<String, CodecError> {
    Ok(serde_yaml::to_string(value.serialized())?)
}

pub fn from_yaml<E: Enumeration>(companion: &Companion<E>, data: &str) -> Result<E, CodecError> {
    let text: String = serde_yaml::from_str(data)?;
    Ok(companion.parse(&text)?)
}

// -------------------------------------------------------------------- xml

/// Encode the value as `<tag>serialized</tag>`.
pub fn to_xml_element<E: Enumeration>(value: &E, tag: &str) -> Result<String, CodecError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(value.serialized()))
        .map_err(quick_xml::Error::from)?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode from the character data of the document's first element.
pub fn from_xml_element<E: Enumeration>(
    companion: &Companion<E>,
    xml: &str,
) -> Result<E, CodecError> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let text = reader.read_text(start.name())?;
                return Ok(companion.parse(text.trim())?);
            }
            Event::Eof => return Err(CodecError::MissingElement),
            _ => {}
        }
    }
}

// -------------------------------------------------------------------- sql

/// Encode as the driver's native text value.
pub fn to_sql_value<E: Enumeration>(value: &E) -> ToSqlOutput<'static> {
    ToSqlOutput::from(value.serialized())
}

pub fn from_sql_value<E: Enumeration>(
    companion: &Companion<E>,
    value: ValueRef<'_>,
) -> Result<E, CodecError> {
    match value {
        ValueRef::Null => Err(CodecError::NullValue),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|_| CodecError::NotAString)?;
            Ok(companion.parse(text)?)
        }
        _ => Err(CodecError::NotAString),
    }
}

/// `FromSql` glue for generated impls.
pub fn column_result<E: Enumeration>(
    companion: &Companion<E>,
    value: ValueRef<'_>,
) -> FromSqlResult<E> {
    from_sql_value(companion, value).map_err(|err| FromSqlError::Other(Box::new(err)))
}
