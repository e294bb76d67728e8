//! The claim set carried by a token.
//!
//! [`ClaimSet`] holds the seven registered claims this tool understands
//! plus an insertion-ordered list of custom claims. Unset fields never
//! reach the wire, and a field absent on the wire decodes as unset.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::JwtCodecError;

/// Registered claim names handled as typed fields of [`ClaimSet`].
pub const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "iat", "exp", "nbf", "jti"];

/// The value of a custom claim, keeping its JSON type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Text(String),
    Number(Number),
    Boolean(bool),
    /// Arrays, objects and `null`.
    Structured(Value),
}

impl ClaimValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Number(number) => Self::Number(number),
            Value::Bool(flag) => Self::Boolean(flag),
            other => Self::Structured(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Structured(value) => value.clone(),
        }
    }
}

/// String representation: text as-is, numbers and booleans bare, and
/// structured values as compact JSON.
impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Boolean(flag) => write!(f, "{flag}"),
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

/// Serializes as the bare JSON value.
impl Serialize for ClaimValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(number) => number.serialize(serializer),
            Self::Boolean(flag) => serializer.serialize_bool(*flag),
            Self::Structured(value) => value.serialize(serializer),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for ClaimValue {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<bool> for ClaimValue {
    fn from(flag: bool) -> Self {
        Self::Boolean(flag)
    }
}

/// A custom claim. Two claims are equal when their keys are equal,
/// whatever their values.
#[derive(Debug, Clone)]
pub struct Claim {
    key: String,
    value: ClaimValue,
}

impl Claim {
    /// Create a custom claim.
    ///
    /// # Errors
    ///
    /// Returns [`JwtCodecError::InvalidClaim`] for an empty key and
    /// [`JwtCodecError::ReservedClaimName`] for a registered claim name.
    pub fn new(key: impl Into<String>, value: impl Into<ClaimValue>) -> Result<Self, JwtCodecError> {
        let key = key.into();
        if key.is_empty() {
            return Err(JwtCodecError::InvalidClaim {
                key,
                reason: "claim names cannot be empty".to_string(),
            });
        }
        if REGISTERED_CLAIMS.contains(&key.as_str()) {
            return Err(JwtCodecError::ReservedClaimName { key });
        }

        Ok(Self {
            key,
            value: value.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &ClaimValue {
        &self.value
    }
}

impl PartialEq for Claim {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Claim {}

impl Hash for Claim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// The `aud` claim: one audience or a list of them.
///
/// Keeps the wire shape, so a one-element array decodes as
/// [`Audience::Multiple`] and encodes back as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// Every audience, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Multiple(items) => items,
        };
        items.iter().map(String::as_str)
    }

    /// The audience when there is exactly one.
    pub fn as_single(&self) -> Option<&str> {
        let mut items = self.iter();
        match (items.next(), items.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn contains(&self, audience: &str) -> bool {
        self.iter().any(|item| item == audience)
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Single(text) => Value::String(text.clone()),
            Self::Multiple(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(text) => f.write_str(text),
            Self::Multiple(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for Audience {
    fn from(items: Vec<String>) -> Self {
        Self::Multiple(items)
    }
}

/// The claims of a token.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    /// `iss`
    pub issuer: Option<String>,
    /// `sub`
    pub subject: Option<String>,
    /// `aud`
    pub audience: Option<Audience>,
    /// `iat`
    pub issued_at: Option<DateTime<Utc>>,
    /// `exp`
    pub expiration: Option<DateTime<Utc>>,
    /// `nbf`
    pub not_before: Option<DateTime<Utc>>,
    /// `jti`
    pub unique_id: Option<String>,
    other_claims: Vec<Claim>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<Audience>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_issued_at<Tz: TimeZone>(mut self, at: DateTime<Tz>) -> Self {
        self.issued_at = Some(at.with_timezone(&Utc));
        self
    }

    pub fn with_expiration<Tz: TimeZone>(mut self, at: DateTime<Tz>) -> Self {
        self.expiration = Some(at.with_timezone(&Utc));
        self
    }

    pub fn with_not_before<Tz: TimeZone>(mut self, at: DateTime<Tz>) -> Self {
        self.not_before = Some(at.with_timezone(&Utc));
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Builder form of [`ClaimSet::insert_claim`].
    ///
    /// # Errors
    ///
    /// Same as [`ClaimSet::insert_claim`].
    pub fn with_claim(
        mut self,
        key: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Result<Self, JwtCodecError> {
        self.insert_claim(key, value)?;
        Ok(self)
    }

    /// Append a custom claim.
    ///
    /// # Errors
    ///
    /// Returns [`JwtCodecError::DuplicateClaim`] if a claim with the same
    /// key is already present, plus the errors of [`Claim::new`].
    pub fn insert_claim(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Result<(), JwtCodecError> {
        let claim = Claim::new(key, value)?;
        if self.other_claims.contains(&claim) {
            return Err(JwtCodecError::DuplicateClaim { key: claim.key });
        }
        self.other_claims.push(claim);
        Ok(())
    }

    /// Remove a custom claim, returning its value.
    pub fn remove_claim(&mut self, key: &str) -> Option<ClaimValue> {
        let index = self.other_claims.iter().position(|c| c.key == key)?;
        Some(self.other_claims.remove(index).value)
    }

    /// Look up a custom claim.
    pub fn claim(&self, key: &str) -> Option<&ClaimValue> {
        self.other_claims
            .iter()
            .find(|c| c.key == key)
            .map(|c| &c.value)
    }

    /// Custom claims in insertion order.
    pub fn other_claims(&self) -> &[Claim] {
        &self.other_claims
    }

    /// A copy with every timestamp truncated to whole seconds, which is
    /// what survives an encode/decode round-trip.
    pub fn truncated_to_seconds(&self) -> Self {
        let truncate = |at: Option<DateTime<Utc>>| {
            at.and_then(|at| DateTime::from_timestamp(at.timestamp(), 0))
        };
        Self {
            issued_at: truncate(self.issued_at),
            expiration: truncate(self.expiration),
            not_before: truncate(self.not_before),
            ..self.clone()
        }
    }

    /// Build the JSON payload object: registered claims first, then custom
    /// claims in insertion order.
    pub(crate) fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        let mut put_text = |name: &str, value: &Option<String>| {
            if let Some(value) = value {
                payload.insert(name.to_string(), Value::String(value.clone()));
            }
        };
        put_text("iss", &self.issuer);
        put_text("sub", &self.subject);
        if let Some(audience) = &self.audience {
            payload.insert("aud".to_string(), audience.to_json());
        }

        for (name, at) in [
            ("exp", self.expiration),
            ("nbf", self.not_before),
            ("iat", self.issued_at),
        ] {
            if let Some(at) = at {
                payload.insert(name.to_string(), Value::from(at.timestamp()));
            }
        }
        if let Some(unique_id) = &self.unique_id {
            payload.insert("jti".to_string(), Value::String(unique_id.clone()));
        }

        for claim in &self.other_claims {
            payload.insert(claim.key.clone(), claim.value.to_json());
        }
        payload
    }

    /// Rehydrate a claim set from a verified JSON payload object.
    ///
    /// # Errors
    ///
    /// Returns [`JwtCodecError::MalformedToken`] when a registered claim
    /// has the wrong JSON type or a timestamp is out of range.
    pub(crate) fn from_payload(payload: Map<String, Value>) -> Result<Self, JwtCodecError> {
        let mut claims = Self::new();

        for (name, value) in payload {
            match name.as_str() {
                "iss" => claims.issuer = Some(expect_string(&name, value)?),
                "sub" => claims.subject = Some(expect_string(&name, value)?),
                "jti" => claims.unique_id = Some(expect_string(&name, value)?),
                "aud" => claims.audience = Some(expect_audience(value)?),
                "iat" => claims.issued_at = Some(expect_numeric_date(&name, &value)?),
                "exp" => claims.expiration = Some(expect_numeric_date(&name, &value)?),
                "nbf" => claims.not_before = Some(expect_numeric_date(&name, &value)?),
                _ => claims.other_claims.push(Claim {
                    key: name,
                    value: ClaimValue::from_json(value),
                }),
            }
        }

        Ok(claims)
    }
}

/// Serializes as the JWT payload object.
impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

/// Field-by-field equality, comparing custom claims by key and value.
impl PartialEq for ClaimSet {
    fn eq(&self, other: &Self) -> bool {
        self.issuer == other.issuer
            && self.subject == other.subject
            && self.audience == other.audience
            && self.issued_at == other.issued_at
            && self.expiration == other.expiration
            && self.not_before == other.not_before
            && self.unique_id == other.unique_id
            && self.other_claims.len() == other.other_claims.len()
            && self
                .other_claims
                .iter()
                .zip(&other.other_claims)
                .all(|(a, b)| a.key == b.key && a.value == b.value)
    }
}

fn expect_string(name: &str, value: Value) -> Result<String, JwtCodecError> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(JwtCodecError::malformed(format!(
            "claim '{name}' must be a string, found {}",
            json_type(&other)
        ))),
    }
}

/// `aud` may be a string or an array of strings.
fn expect_audience(value: Value) -> Result<Audience, JwtCodecError> {
    match value {
        Value::String(text) => Ok(Audience::Single(text)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                other => Err(JwtCodecError::malformed(format!(
                    "claim 'aud' must contain strings, found {}",
                    json_type(&other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Audience::Multiple),
        other => Err(JwtCodecError::malformed(format!(
            "claim 'aud' must be a string or an array of strings, found {}",
            json_type(&other)
        ))),
    }
}

/// Seconds since the Unix epoch; fractional seconds are truncated.
fn expect_numeric_date(name: &str, value: &Value) -> Result<DateTime<Utc>, JwtCodecError> {
    let seconds = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .map(f64::trunc)
                    .filter(|s| s.is_finite() && s.abs() < i64::MAX as f64)
                    .map(|s| s as i64)
            }),
        other => {
            return Err(JwtCodecError::malformed(format!(
                "claim '{name}' must be a numeric date, found {}",
                json_type(other)
            )));
        }
    };

    seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .ok_or_else(|| JwtCodecError::malformed(format!("claim '{name}' is out of range")))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
