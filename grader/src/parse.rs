//! Sanitization and parsing of raw model output.
//!
//! The grading model promises nothing about well-formedness: replies arrive
//! wrapped in explanatory prose, with typographic quotes, or truncated before
//! the final closing brace. This module is the pipeline's defense against
//! that variability. It normalizes quotes, extracts the outermost brace span,
//! repairs missing closing braces, and validates the result against the
//! required schema. Everything here is exercised with fixture strings; no
//! live model call is involved.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::GraderError;

/// Grade and comment for one question, keyed by prompt ordinal.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct QuestionGrade {
    pub note: f64,
    pub commentaires: String,
}

/// The validated grading result: global advice plus per-ordinal grades.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub advice: String,
    pub grading: BTreeMap<u32, QuestionGrade>,
}

#[derive(Debug, Deserialize)]
struct RawOutcome {
    advice: String,
    grading: BTreeMap<String, QuestionGrade>,
}

/// Replaces typographic quotation marks with their ASCII equivalents.
///
/// Idempotent: normalizing an already-normalized string is a no-op.
pub fn normalize_quotes(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Extracts the JSON candidate: the span from the first `{` through the last
/// `}` (greedy). Returns `None` when no opening brace exists.
pub fn extract_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}').map(|i| i + 1).unwrap_or(text.len());
    if end <= start {
        // An opening brace with no closing brace after it; keep the tail so
        // brace repair can still close it.
        return Some(&text[start..]);
    }
    Some(&text[start..end])
}

/// Balances a truncated candidate by appending missing closing braces.
///
/// Repair is strictly one-directional: more `}` than `{` means the candidate
/// was never a single object to begin with and is treated as unrecoverable.
fn balance_braces(candidate: &str, raw: &str) -> Result<String, GraderError> {
    let open = candidate.matches('{').count();
    let close = candidate.matches('}').count();
    if close > open {
        return Err(GraderError::parse(
            format!("unbalanced JSON candidate: {close} closing braces for {open} opening"),
            raw,
        ));
    }
    let mut balanced = candidate.to_string();
    balanced.extend(std::iter::repeat('}').take(open - close));
    Ok(balanced)
}

/// Reduces raw model output to a validated [`GradingOutcome`].
///
/// Failure at any step yields [`GraderError::Parse`] carrying the original
/// raw text for diagnostics.
pub fn parse_grading_output(raw: &str) -> Result<GradingOutcome, GraderError> {
    let normalized = normalize_quotes(raw);
    let candidate = extract_candidate(&normalized)
        .ok_or_else(|| GraderError::parse("no JSON object found in model output", raw))?;
    let balanced = balance_braces(candidate, raw)?;

    let parsed: RawOutcome = serde_json::from_str(&balanced)
        .map_err(|e| GraderError::parse(format!("invalid grading JSON: {e}"), raw))?;

    let mut grading = BTreeMap::new();
    for (key, grade) in parsed.grading {
        let ordinal: u32 = key.trim().parse().map_err(|_| {
            GraderError::parse(format!("grading key {key:?} is not a positive integer"), raw)
        })?;
        if ordinal == 0 {
            return Err(GraderError::parse(
                "grading key 0 is not a valid 1-based ordinal",
                raw,
            ));
        }
        grading.insert(ordinal, grade);
    }

    Ok(GradingOutcome {
        advice: parsed.advice,
        grading,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{"advice":"Bon travail","grading":{"1":{"note":10,"commentaires":"Correct"},"2":{"note":2,"commentaires":"Date incorrecte"}}}"#;

    #[test]
    fn parses_bare_json() {
        let outcome = parse_grading_output(BARE).unwrap();
        assert_eq!(outcome.advice, "Bon travail");
        assert_eq!(outcome.grading.len(), 2);
        assert_eq!(outcome.grading[&1].note, 10.0);
        assert_eq!(outcome.grading[&2].commentaires, "Date incorrecte");
    }

    #[test]
    fn prose_wrapped_json_parses_identically_to_bare() {
        let wrapped = format!("Voici la correction demandée :\n{BARE}\nJ'espère que cela aide !");
        assert_eq!(
            parse_grading_output(&wrapped).unwrap(),
            parse_grading_output(BARE).unwrap()
        );
    }

    #[test]
    fn quote_normalization_is_idempotent() {
        let input = "l\u{2019}étudiant a dit \u{201C}Paris\u{201D}";
        let once = normalize_quotes(input);
        let twice = normalize_quotes(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "l'étudiant a dit \"Paris\"");
    }

    #[test]
    fn smart_quotes_inside_json_are_normalized() {
        let smart = BARE.replace('"', "\u{201C}");
        // All-left-quote JSON still normalizes to plain quotes and parses.
        assert!(parse_grading_output(&smart).is_ok());
    }

    #[test]
    fn truncated_output_gets_missing_braces_appended() {
        // Two unmatched opening braces.
        let truncated = r#"{"advice":"ok","grading":{"1":{"note":5,"commentaires":"bien""#;
        let outcome = parse_grading_output(truncated).unwrap();
        assert_eq!(outcome.grading[&1].note, 5.0);
    }

    #[test]
    fn repair_appends_exactly_the_missing_count() {
        let candidate = r#"{"a":{"b":{"c":1}"#;
        let balanced = balance_braces(candidate, candidate).unwrap();
        assert_eq!(balanced.matches('{').count(), balanced.matches('}').count());
        assert!(balanced.ends_with("}}"));
    }

    #[test]
    fn excess_closing_braces_are_not_repaired() {
        let excess = r#"{"advice":"ok","grading":{}}}"#;
        let err = parse_grading_output(excess).unwrap_err();
        assert!(matches!(err, GraderError::Parse { .. }));
    }

    #[test]
    fn non_integer_grading_key_fails() {
        let bad = r#"{"advice":"ok","grading":{"un":{"note":1,"commentaires":"x"}}}"#;
        assert!(matches!(
            parse_grading_output(bad).unwrap_err(),
            GraderError::Parse { .. }
        ));
    }

    #[test]
    fn zero_ordinal_fails() {
        let bad = r#"{"advice":"ok","grading":{"0":{"note":1,"commentaires":"x"}}}"#;
        assert!(parse_grading_output(bad).is_err());
    }

    #[test]
    fn missing_advice_fails() {
        let bad = r#"{"grading":{"1":{"note":1,"commentaires":"x"}}}"#;
        assert!(parse_grading_output(bad).is_err());
    }

    #[test]
    fn empty_advice_is_accepted() {
        let ok = r#"{"advice":"","grading":{}}"#;
        let outcome = parse_grading_output(ok).unwrap();
        assert!(outcome.advice.is_empty());
        assert!(outcome.grading.is_empty());
    }

    #[test]
    fn unescaped_quote_inside_string_fails_even_with_balanced_braces() {
        let bad = r#"{"advice":"il a dit "oui"","grading":{}}"#;
        assert!(matches!(
            parse_grading_output(bad).unwrap_err(),
            GraderError::Parse { .. }
        ));
    }

    #[test]
    fn parse_error_retains_raw_text() {
        let garbage = "the model refuses to answer";
        match parse_grading_output(garbage).unwrap_err() {
            GraderError::Parse { raw, .. } => assert_eq!(raw, garbage),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn integer_and_fractional_notes_both_parse() {
        let mixed = r#"{"advice":"","grading":{"1":{"note":1.5,"commentaires":"a"},"2":{"note":3,"commentaires":"b"}}}"#;
        let outcome = parse_grading_output(mixed).unwrap();
        assert_eq!(outcome.grading[&1].note, 1.5);
        assert_eq!(outcome.grading[&2].note, 3.0);
    }
}
