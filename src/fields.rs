use std::cmp::Ordering;

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// First candidate key whose value is neither null nor an empty string.
pub fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        match value.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(v) => return Some(v),
        }
    }
    None
}

pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = value.get(*key).and_then(as_string) {
            return Some(s);
        }
    }
    None
}

pub fn pick_string_or(value: &Value, keys: &[&str], fallback: &str) -> String {
    pick_string(value, keys).unwrap_or_else(|| fallback.to_string())
}

/// First candidate that coerces to a finite number. Later keys are still tried
/// when an earlier one is present but unparseable.
pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(as_f64)
}

pub fn pick_f64_or(value: &Value, keys: &[&str], fallback: f64) -> f64 {
    pick_f64(value, keys).unwrap_or(fallback)
}

/// First candidate that is a finite number greater than zero, floored.
pub fn pick_positive_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(as_f64)
        .find(|n| *n >= 1.0)
        .map(|n| n.floor().min(u32::MAX as f64) as u32)
}

/// Position from the first present candidate only. Zero, negative or
/// unparseable values mean unclassified; later keys are not consulted.
pub fn pick_position(value: &Value, keys: &[&str]) -> Option<u32> {
    pick(value, keys)
        .and_then(as_f64)
        .filter(|n| *n >= 1.0)
        .map(|n| n.floor().min(u32::MAX as f64) as u32)
}

pub fn pick_truthy(value: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .any(is_truthy)
}

pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if n.is_finite() { Some(n) } else { None }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Identity key for matching drivers across sources: trimmed, lower-cased,
/// inner whitespace collapsed.
pub fn normalize_name_key(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display-name order: case and accents are ignored first, so "juan perez"
/// sits next to "Juan Pérez" rather than after every capitalized name. Raw
/// byte order breaks the remaining ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Non-empty and not a "no team" placeholder.
pub fn is_valid_team_name(team: &str) -> bool {
    let t = team.trim();
    if t.is_empty() {
        return false;
    }
    if t.chars().all(|c| matches!(c, '—' | '-' | '–' | '_')) {
        return false;
    }
    let lowered = t.to_lowercase();
    if matches!(lowered.as_str(), "none" | "no team" | "sin equipo" | "s/equipo") {
        return false;
    }
    if let Some(rest) = lowered.strip_prefix('s')
        && rest.trim_start_matches('/').trim_start() == "equipo"
    {
        return false;
    }
    true
}
