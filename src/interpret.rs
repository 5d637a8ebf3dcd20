//! Turns the raw text of a value into an [`EnvValue`].
//!
//! Whitespace is folded first. Bare values may then be cast to null,
//! booleans, numbers or named constants. Values that stay strings get
//! `${NAME}` references replaced from the entries parsed so far, and
//! quoted values finally have their escapes resolved.

use crate::lexer::is_space;
use crate::value::{Constants, EnvMap, EnvValue};

/// How a value was written, which decides how it is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForm {
    /// Unquoted.
    Bare,
    /// `'...'`
    SingleQuoted,
    /// `"..."`
    DoubleQuoted,
}

impl ValueForm {
    /// Whether type casting applies.
    #[must_use]
    pub const fn casts(self) -> bool {
        matches!(self, Self::Bare)
    }

    /// Whether `\ ` pairs are removed from values containing whitespace.
    #[must_use]
    pub const fn unfolds(self) -> bool {
        !matches!(self, Self::SingleQuoted)
    }

    /// Whether `${NAME}` references are substituted.
    #[must_use]
    pub const fn interpolates(self) -> bool {
        !matches!(self, Self::SingleQuoted)
    }
}

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Interpret `raw` written in `form`.
///
/// `env` holds the entries committed before this one; `constants` is
/// consulted for bare values that are neither null, boolean nor
/// numeric.
#[must_use]
pub fn interpret(raw: &str, form: ValueForm, env: &EnvMap, constants: &Constants) -> EnvValue {
    let mut text = if raw.bytes().any(is_space) {
        let folded = fold_whitespace(raw);
        if form.unfolds() {
            folded.replace("\\ ", "")
        } else {
            folded
        }
    } else {
        if form.casts() {
            if let Some(value) = cast(raw, constants) {
                return value;
            }
        }
        raw.to_string()
    };

    if form.interpolates() {
        text = interpolate(&text, env);
    }

    let text = match form {
        ValueForm::Bare => text,
        ValueForm::SingleQuoted => text.replace("\\'", "'"),
        ValueForm::DoubleQuoted => text
            .replace("\\\"", "\"")
            .replace("\\r", "\r")
            .replace("\\n", "\n")
            .replace("\\t", "\t"),
    };

    EnvValue::String(text)
}

/// Collapse every run of whitespace into one space.
#[must_use]
pub fn fold_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if u8::try_from(ch).is_ok_and(is_space) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Cast a whitespace-free bare value.
///
/// Returns `None` when the value stays a string. That includes values
/// that look numeric but have no finite `i64` or `f64` representation,
/// such as `1e400`.
#[must_use]
pub fn cast(raw: &str, constants: &Constants) -> Option<EnvValue> {
    match raw.to_ascii_lowercase().as_str() {
        "null" => return Some(EnvValue::Null),
        "true" | "on" | "yes" => return Some(EnvValue::Bool(true)),
        "false" | "off" | "no" => return Some(EnvValue::Bool(false)),
        _ => {}
    }

    if is_numeric(raw) {
        return cast_number(raw);
    }

    constants.get(raw).cloned()
}

#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn cast_number(raw: &str) -> Option<EnvValue> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(EnvValue::Int(i));
    }

    let x: f64 = raw.parse().ok()?;
    if !x.is_finite() {
        return None;
    }
    // 1.0, 1e3: integral values compare equal to their integer cast
    if x.trunc() == x && (I64_LOWER..I64_UPPER).contains(&x) {
        return Some(EnvValue::Int(x as i64));
    }
    Some(EnvValue::Float(x))
}

/// `[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?`
fn is_numeric(raw: &str) -> bool {
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };

    let mantissa_ok = digits(whole)
        && fraction.is_none_or(digits)
        && (!whole.is_empty() || fraction.is_some_and(|f| !f.is_empty()));
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && digits(e)
    });

    mantissa_ok && exponent_ok
}

/// Replace each `${NAME}` with the string form of `NAME` in `env`, or
/// nothing if it is undefined. Substituted text is not rescanned.
#[must_use]
pub fn interpolate(text: &str, env: &EnvMap) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        if let Some(value) = env.get(name) {
            out.push_str(&value.to_string());
        }
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(raw: &str) -> EnvValue {
        interpret(raw, ValueForm::Bare, &EnvMap::new(), &Constants::new())
    }

    fn env(pairs: &[(&str, EnvValue)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn casts_keywords_case_insensitively() {
        assert_eq!(bare("null"), EnvValue::Null);
        assert_eq!(bare("NULL"), EnvValue::Null);
        assert_eq!(bare("True"), EnvValue::Bool(true));
        assert_eq!(bare("on"), EnvValue::Bool(true));
        assert_eq!(bare("YES"), EnvValue::Bool(true));
        assert_eq!(bare("false"), EnvValue::Bool(false));
        assert_eq!(bare("Off"), EnvValue::Bool(false));
        assert_eq!(bare("no"), EnvValue::Bool(false));
    }

    #[test]
    fn casts_numbers() {
        assert_eq!(bare("42"), EnvValue::Int(42));
        assert_eq!(bare("-7"), EnvValue::Int(-7));
        assert_eq!(bare("+5"), EnvValue::Int(5));
        assert_eq!(bare("007"), EnvValue::Int(7));
        assert_eq!(bare("1.0"), EnvValue::Int(1));
        assert_eq!(bare("1e3"), EnvValue::Int(1000));
        assert_eq!(bare("4.5"), EnvValue::Float(4.5));
        assert_eq!(bare(".5"), EnvValue::Float(0.5));
        assert_eq!(bare("2.5E-1"), EnvValue::Float(0.25));
    }

    #[test]
    fn huge_integers_become_floats() {
        assert_eq!(
            bare("9223372036854775808"),
            EnvValue::Float(9_223_372_036_854_775_808.0)
        );
        assert_eq!(bare("9223372036854775807"), EnvValue::Int(i64::MAX));
    }

    #[test]
    fn unrepresentable_numbers_stay_strings() {
        assert_eq!(bare("1e400"), EnvValue::from("1e400"));
    }

    #[test]
    fn non_numeric_lookalikes_stay_strings() {
        for raw in ["1.2.3", "0x1A", "inf", "NaN", "1e", ".", "-", "12abc", "1_000"] {
            assert_eq!(bare(raw), EnvValue::from(raw), "{raw}");
        }
    }

    #[test]
    fn named_constants() {
        let mut constants = Constants::new();
        constants.insert("NEWLINE".to_string(), EnvValue::from("\n"));
        constants.insert("MAX".to_string(), EnvValue::Int(10));
        let empty = EnvMap::new();
        assert_eq!(
            interpret("NEWLINE", ValueForm::Bare, &empty, &constants),
            EnvValue::from("\n")
        );
        assert_eq!(
            interpret("MAX", ValueForm::Bare, &empty, &constants),
            EnvValue::Int(10)
        );
        // exact name only
        assert_eq!(
            interpret("max", ValueForm::Bare, &empty, &constants),
            EnvValue::from("max")
        );
        // quoting opts out
        assert_eq!(
            interpret("MAX", ValueForm::DoubleQuoted, &empty, &constants),
            EnvValue::from("MAX")
        );
    }

    #[test]
    fn quoted_values_are_never_cast() {
        let empty = EnvMap::new();
        let constants = Constants::new();
        assert_eq!(
            interpret("42", ValueForm::DoubleQuoted, &empty, &constants),
            EnvValue::from("42")
        );
        assert_eq!(
            interpret("true", ValueForm::SingleQuoted, &empty, &constants),
            EnvValue::from("true")
        );
    }

    #[test]
    fn folds_whitespace() {
        assert_eq!(fold_whitespace("a  \t b\n\nc"), "a b c");
        assert_eq!(fold_whitespace(" x "), " x ");
        let value = interpret(
            "a   b",
            ValueForm::SingleQuoted,
            &EnvMap::new(),
            &Constants::new(),
        );
        assert_eq!(value, EnvValue::from("a b"));
    }

    #[test]
    fn unfolds_escaped_spaces() {
        assert_eq!(bare(r"foo\ bar"), EnvValue::from("foobar"));
        assert_eq!(bare(r"foo\  bar"), EnvValue::from("foobar"));
        let single = interpret(
            r"foo\ bar",
            ValueForm::SingleQuoted,
            &EnvMap::new(),
            &Constants::new(),
        );
        assert_eq!(single, EnvValue::from(r"foo\ bar"));
    }

    #[test]
    fn whitespace_disables_casting() {
        assert_eq!(bare(r"1\ 2"), EnvValue::from("12"));
    }

    #[test]
    fn interpolates_known_names() {
        let env = env(&[
            ("A", EnvValue::Int(1)),
            ("ON", EnvValue::Bool(true)),
            ("NIL", EnvValue::Null),
        ]);
        assert_eq!(interpolate("${A}2", &env), "12");
        assert_eq!(interpolate("[${ON}][${NIL}]", &env), "[1][]");
        assert_eq!(interpolate("${MISSING}x", &env), "x");
        assert_eq!(interpolate("${}", &env), "");
        assert_eq!(interpolate("${A", &env), "${A");
        assert_eq!(interpolate("$A {A}", &env), "$A {A}");
    }

    #[test]
    fn interpolation_is_not_recursive() {
        let env = env(&[("A", EnvValue::from("${B}")), ("B", EnvValue::from("b"))]);
        assert_eq!(interpolate("${A}", &env), "${B}");
    }

    #[test]
    fn bare_values_interpolate_unless_cast() {
        let env = env(&[("HOST", EnvValue::from("db"))]);
        let constants = Constants::new();
        assert_eq!(
            interpret("${HOST}:5432", ValueForm::Bare, &env, &constants),
            EnvValue::from("db:5432")
        );
        assert_eq!(
            interpret("yes", ValueForm::Bare, &env, &constants),
            EnvValue::Bool(true)
        );
    }

    #[test]
    fn single_quotes_do_not_interpolate() {
        let env = env(&[("A", EnvValue::Int(1))]);
        let value = interpret(r"${A}\'s", ValueForm::SingleQuoted, &env, &Constants::new());
        assert_eq!(value, EnvValue::from("${A}'s"));
    }

    #[test]
    fn double_quote_escapes() {
        let value = interpret(
            r#"say \"hi\"\r\n\tbye"#,
            ValueForm::DoubleQuoted,
            &EnvMap::new(),
            &Constants::new(),
        );
        assert_eq!(value, EnvValue::from("say \"hi\"\r\n\tbye"));
    }

    #[test]
    fn escapes_resolve_after_interpolation() {
        let env = env(&[("SEP", EnvValue::from(r"\n"))]);
        let value = interpret("a${SEP}b", ValueForm::DoubleQuoted, &env, &Constants::new());
        assert_eq!(value, EnvValue::from("a\nb"));
    }
}
