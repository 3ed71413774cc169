//! Validation & sanitization gate for incoming memos.
//!
//! Checks run in a fixed order:
//! 1. structural check against the memo shape (reports every field error at once),
//! 2. markup stripping of `content`,
//! 3. hex color format of `styles.color` and `bgColor`,
//! 4. font size range,
//! 5. `fontWeight` / `fontStyle` values.
//!
//! Everything after step 1 stops at the first failure.

pub mod sanitize;

use crate::domain::memo::{FontStyle, FontWeight, InsertMemo, MemoStyle};
use crate::error::{FieldError, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};

pub use sanitize::sanitize_content;

pub const MIN_FONT_SIZE: i64 = 16;
pub const MAX_FONT_SIZE: i64 = 72;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// String fields of a candidate that passed the structural check.
#[derive(Debug)]
struct Candidate {
    content: String,
    color: String,
    font_size: String,
    font_weight: String,
    font_style: String,
    bg_color: String,
}

fn json_type_name(v: Option<&JsonValue>) -> &'static str {
    match v {
        None => "undefined",
        Some(JsonValue::Null) => "null",
        Some(JsonValue::Bool(_)) => "boolean",
        Some(JsonValue::Number(_)) => "number",
        Some(JsonValue::String(_)) => "string",
        Some(JsonValue::Array(_)) => "array",
        Some(JsonValue::Object(_)) => "object",
    }
}

fn take_string(
    obj: &Map<String, JsonValue>,
    key: &str,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(key) {
        Some(JsonValue::String(s)) => Some(s.clone()),
        other => {
            errors.push(FieldError::new(path, "string", json_type_name(other)));
            None
        }
    }
}

fn check_shape(candidate: &JsonValue) -> Result<Candidate, ValidationError> {
    let obj = match candidate.as_object() {
        Some(o) => o,
        None => {
            return Err(ValidationError::SchemaInvalid(vec![FieldError::new(
                "",
                "object",
                json_type_name(Some(candidate)),
            )]));
        }
    };

    let mut errors: Vec<FieldError> = Vec::new();

    let content = take_string(obj, "content", "content", &mut errors);

    let mut style_fields = (None, None, None, None);
    match obj.get("styles") {
        Some(JsonValue::Object(styles)) => {
            style_fields = (
                take_string(styles, "color", "styles.color", &mut errors),
                take_string(styles, "fontSize", "styles.fontSize", &mut errors),
                take_string(styles, "fontWeight", "styles.fontWeight", &mut errors),
                take_string(styles, "fontStyle", "styles.fontStyle", &mut errors),
            );
        }
        other => errors.push(FieldError::new("styles", "object", json_type_name(other))),
    }

    let bg_color = take_string(obj, "bgColor", "bgColor", &mut errors);

    match (content, style_fields, bg_color) {
        (
            Some(content),
            (Some(color), Some(font_size), Some(font_weight), Some(font_style)),
            Some(bg_color),
        ) if errors.is_empty() => Ok(Candidate {
            content,
            color,
            font_size,
            font_weight,
            font_style,
            bg_color,
        }),
        _ => Err(ValidationError::SchemaInvalid(errors)),
    }
}

pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR_RE.is_match(s)
}

/// Reads the leading integer of a CSS-ish size (`"32px"` -> 32).
///
/// Leading whitespace and a sign are accepted, anything after the digits is ignored.
/// Returns `None` when no digits are present or the value does not fit an `i64`.
/// Digits are always decimal; `"0x20"` reads as 0.
pub fn parse_font_size(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    rest[..digits_len].parse::<i64>().ok().map(|n| n * sign)
}

/// Runs the full gate over an arbitrary JSON payload.
///
/// On success the returned record satisfies every memo invariant and its content is plain
/// text.
pub fn validate_insert_memo(candidate: &JsonValue) -> Result<InsertMemo, ValidationError> {
    let c = check_shape(candidate)?;

    let content = sanitize_content(&c.content);

    if !is_hex_color(&c.color) || !is_hex_color(&c.bg_color) {
        return Err(ValidationError::InvalidColor);
    }

    match parse_font_size(&c.font_size) {
        Some(n) if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&n) => {}
        _ => return Err(ValidationError::InvalidFontSize),
    }

    let font_weight = FontWeight::parse(&c.font_weight)
        .ok_or(ValidationError::InvalidEnum { field: "fontWeight" })?;
    let font_style = FontStyle::parse(&c.font_style)
        .ok_or(ValidationError::InvalidEnum { field: "fontStyle" })?;

    Ok(InsertMemo {
        content,
        styles: MemoStyle {
            color: c.color,
            font_size: c.font_size,
            font_weight,
            font_style,
        },
        bg_color: c.bg_color,
    })
}
