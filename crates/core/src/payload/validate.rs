use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::fmt;
use thiserror::Error;

use super::{text, Ticket, TicketError};

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPayload {
    pub ticket: Ticket,
    /// The whole payload as sent, minus whitespace outside strings
    pub compact: String,
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("Value for {} is required.", field),
        }
    }

    fn needs(field: &'static str, value: &str, rule: &str) -> Self {
        Self {
            field,
            message: format!("Value for {} ({}) needs to be {}.", field, value, rule),
        }
    }
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Could not convert POST data to JSON")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Validation error. {}", join_messages(.0))]
    Validation(Vec<FieldViolation>),
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check the raw request body and the required fields.
///
/// The body is syntax-checked, never decoded into a value, so the compacted
/// form keeps the client's exact number spelling, escapes and keys.
pub fn validate(body: &[u8]) -> Result<ValidatedPayload, PayloadError> {
    let raw = text::parse_raw(body).map_err(PayloadError::MalformedJson)?;
    let compact = text::compact(raw.get());

    let ticket = check_ticket(raw).map_err(|v| PayloadError::Validation(vec![v]))?;

    Ok(ValidatedPayload { ticket, compact })
}

fn check_ticket(raw: &RawValue) -> Result<Ticket, FieldViolation> {
    let value = read_ticket(raw.get()).unwrap_or_default();

    Ticket::parse(value).map_err(|e| match e {
        TicketError::Empty => FieldViolation::required("ticket"),
        TicketError::NotAlphanumeric(v) => FieldViolation::needs("ticket", &v, "alphanum"),
    })
}

/// Pull the `ticket` string out of an object without decoding its siblings.
///
/// Key matching ignores ASCII case and the last string value wins. Values
/// of other types leave the ticket untouched, and non-object payloads have
/// no ticket at all.
fn read_ticket(json: &str) -> Option<String> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    TicketField::deserialize(&mut de).ok()?.0
}

struct TicketField(Option<String>);

impl<'de> Deserialize<'de> for TicketField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TicketFieldVisitor)
    }
}

struct TicketFieldVisitor;

impl<'de> Visitor<'de> for TicketFieldVisitor {
    type Value = TicketField;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TicketField, A::Error> {
        let mut ticket = None;
        while let Some(key) = map.next_key::<String>()? {
            let value: &'de RawValue = map.next_value()?;
            if !key.eq_ignore_ascii_case("ticket") {
                continue;
            }
            if let Ok(s) = serde_json::from_str::<String>(value.get()) {
                ticket = Some(s);
            }
        }
        Ok(TicketField(ticket))
    }
}
