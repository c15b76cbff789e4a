//! Loose numeric coercions for provider payloads.
//!
//! Data vendors mix JSON numbers and numeric strings freely, so the helpers
//! here accept both and mirror the forgiving coercions those payloads were
//! designed around.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid regex"));
static DECIMAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex"));
static INTEGER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("valid regex"));

/// Strict whole-value coercion: `null` and blank strings are 0, booleans are
/// 0/1, numeric strings parse, everything else is NaN.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => coerce_str(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn coerce_str(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    if DECIMAL.is_match(t) {
        t.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Leading-number parse of a string or number (`"187.5 USD"` reads as 187.5).
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim_start();
            DECIMAL_PREFIX
                .find(t)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }
        _ => None,
    }
}

/// Integer prefix of a string, or the truncated value of a number.
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => INTEGER_PREFIX
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<i64>().ok()),
        _ => None,
    }
}

/// JSON rendering of a float: integral values print without a fraction and
/// non-finite values become `null`.
pub fn json_number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
