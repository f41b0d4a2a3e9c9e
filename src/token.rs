//! Player tokens and the JSON boundary that produces them.
//!
//! Requests arrive as loosely typed records such as
//! `{"num": 1, "pos": 15, "color": "#FF0000"}`. Every field is optional and
//! has a documented default; a record whose fields have the wrong shape is
//! dropped with a warning instead of failing the whole request.

use crate::color::parse_color;
use crate::{Error, Result};
use image::Rgb;
use log::warn;
use serde_json::{Map, Value};

/// Label drawn when a record has none.
pub const DEFAULT_LABEL: &str = "?";

/// Token color when a record has none.
pub const DEFAULT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// A color as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    /// `#RRGGBB`, `#RGB`, `rgb(r, g, b)` or a color name; parsed at draw time
    Text(String),
    /// Already-resolved RGB triple
    Rgb([u8; 3]),
}

impl ColorSpec {
    pub fn resolve(&self) -> Result<Rgb<u8>> {
        match self {
            ColorSpec::Text(s) => parse_color(s),
            ColorSpec::Rgb(rgb) => Ok(Rgb(*rgb)),
        }
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec::Text(s.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(s: String) -> Self {
        ColorSpec::Text(s)
    }
}

impl From<[u8; 3]> for ColorSpec {
    fn from(rgb: [u8; 3]) -> Self {
        ColorSpec::Rgb(rgb)
    }
}

/// One player's marker. All fields are optional:
/// - `label` defaults to [`DEFAULT_LABEL`]
/// - `position` absent or outside 1..=100 means "not on the board"
/// - `color` defaults to black
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerToken {
    pub label: Option<String>,
    pub position: Option<i64>,
    pub color: Option<ColorSpec>,
}

impl PlayerToken {
    pub fn new(label: impl Into<String>, position: i64, color: impl Into<ColorSpec>) -> Self {
        Self {
            label: Some(label.into()),
            position: Some(position),
            color: Some(color.into()),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// Position, with absent treated as 0 (off the board).
    pub fn position(&self) -> i64 {
        self.position.unwrap_or(0)
    }

    pub fn resolve_color(&self) -> Result<Rgb<u8>> {
        match &self.color {
            Some(spec) => spec.resolve(),
            None => Ok(DEFAULT_COLOR),
        }
    }

    /// Validate one loosely typed record.
    ///
    /// `num` wins over `number` and `pos` over `position` when a record
    /// carries both spellings.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut record = match value {
            Value::Object(record) => record,
            other => {
                return Err(Error::InvalidTokenField {
                    field: "player",
                    reason: format!("expected an object, got {}", other),
                })
            }
        };
        Ok(Self {
            label: label_field(take_field(&mut record, &["num", "number"]))?,
            position: position_field(take_field(&mut record, &["pos", "position"]))?,
            color: color_field(take_field(&mut record, &["color"]))?,
        })
    }
}

// First non-null value among `keys`, in order of preference.
fn take_field(record: &mut Map<String, Value>, keys: &[&str]) -> Value {
    keys.iter()
        .find_map(|key| record.remove(*key).filter(|v| !v.is_null()))
        .unwrap_or(Value::Null)
}

fn label_field(v: Value) -> Result<Option<String>> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(Error::InvalidTokenField {
            field: "num",
            reason: format!("expected a string or number, got {}", other),
        }),
    }
}

fn position_field(v: Value) -> Result<Option<i64>> {
    match &v {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i));
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(f as i64)),
                _ => Err(Error::InvalidTokenField {
                    field: "pos",
                    reason: format!("expected an integer, got {}", n),
                }),
            }
        }
        other => Err(Error::InvalidTokenField {
            field: "pos",
            reason: format!("expected an integer, got {}", other),
        }),
    }
}

fn color_field(v: Value) -> Result<Option<ColorSpec>> {
    let invalid = |v: &Value| Error::InvalidTokenField {
        field: "color",
        reason: format!("expected a color string or [r, g, b], got {}", v),
    };
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(ColorSpec::Text(s))),
        Value::Array(ref items) if items.len() == 3 => {
            let mut rgb = [0u8; 3];
            for (slot, item) in rgb.iter_mut().zip(items) {
                *slot = item
                    .as_u64()
                    .and_then(|c| u8::try_from(c).ok())
                    .ok_or_else(|| invalid(&v))?;
            }
            Ok(Some(ColorSpec::Rgb(rgb)))
        }
        other => Err(invalid(&other)),
    }
}

/// Parse a request body into tokens, in order.
///
/// Accepts `{"players": [...]}` (a missing `players` key is an empty list) or
/// a bare list. Records with malformed fields are skipped.
pub fn parse_players(body: &[u8]) -> Result<Vec<PlayerToken>> {
    let value: Value = serde_json::from_slice(body)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("players") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::RequestError(format!(
                    "`players` must be a list, got {}",
                    other
                )))
            }
        },
        other => {
            return Err(Error::RequestError(format!(
                "expected a JSON object or list, got {}",
                other
            )))
        }
    };

    let mut players = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match PlayerToken::from_value(record) {
            Ok(token) => players.push(token),
            Err(e) if e.is_token_local() => warn!("Skipping player #{}: {}", index, e),
            Err(e) => return Err(e),
        }
    }
    Ok(players)
}
