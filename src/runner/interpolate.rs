//! Variable interpolation for command lines
//!
//! This module replaces `${NAME}` placeholders in a single pass. Substituted
//! values are never rescanned, and `$$` collapses to a literal `$`.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Result of interpolating one string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    /// The substituted text
    pub value: String,

    /// Placeholders that had no binding and became empty, in order of
    /// first appearance
    pub undefined: Vec<String>,
}

/// Interpolate placeholders in `s`, resolving names through `lookup`
///
/// Supports:
/// - `${NAME}` - replaced by `lookup(NAME)`, or the empty string
/// - `$$` - a literal `$`
///
/// Anything else, including `$NAME` and malformed `${...}`, is kept as is.
pub fn interpolate<F>(s: &str, lookup: F) -> Interpolated
where
    F: Fn(&str) -> Option<String>,
{
    let mut undefined: Vec<String> = Vec::new();

    let value = PLACEHOLDER
        .replace_all(s, |caps: &Captures| {
            let Some(name) = caps.get(1) else {
                return "$".to_string();
            };

            match lookup(name.as_str()) {
                Some(value) => value,
                None => {
                    if !undefined.iter().any(|n| n == name.as_str()) {
                        undefined.push(name.as_str().to_string());
                    }
                    String::new()
                }
            }
        })
        .into_owned();

    Interpolated { value, undefined }
}

/// Names referenced by `${NAME}` placeholders in `s`
pub fn placeholders(s: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(s) {
        if let Some(name) = caps.get(1) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run(s: &str, vars: &HashMap<String, String>) -> Interpolated {
        interpolate(s, |name| vars.get(name).cloned())
    }

    #[test]
    fn test_simple_interpolation() {
        let result = run("echo ${VAR}", &vars(&[("VAR", "foo")]));
        assert_eq!(result.value, "echo foo");
        assert!(result.undefined.is_empty());
    }

    #[test]
    fn test_multiple_variables() {
        let vars = vars(&[("FIRST", "John"), ("LAST", "Doe")]);
        let result = run("${FIRST} ${LAST}", &vars);
        assert_eq!(result.value, "John Doe");
    }

    #[test]
    fn test_undefined_variable_is_empty() {
        let result = run("Hello, ${missing}!", &HashMap::new());
        assert_eq!(result.value, "Hello, !");
        assert_eq!(result.undefined, vec!["missing"]);
    }

    #[test]
    fn test_undefined_reported_once() {
        let result = run("${A}${A}${B}", &HashMap::new());
        assert_eq!(result.undefined, vec!["A", "B"]);
    }

    #[test]
    fn test_dollar_escape() {
        let result = run("echo $$HOME and $${VAR}", &vars(&[("VAR", "x")]));
        assert_eq!(result.value, "echo $HOME and ${VAR}");
        assert!(result.undefined.is_empty());
    }

    #[test]
    fn test_non_recursive() {
        let vars = vars(&[("OUTER", "${INNER}"), ("INNER", "value")]);
        let result = run("Result: ${OUTER}", &vars);
        assert_eq!(result.value, "Result: ${INNER}");
    }

    #[test]
    fn test_self_reference_does_not_loop() {
        let vars = vars(&[("X", "${X}${X}")]);
        let result = run("${X}", &vars);
        assert_eq!(result.value, "${X}${X}");
    }

    #[test]
    fn test_lone_and_bare_dollars_kept() {
        let result = run("cost $5 for $USER ${} ${bad-name}", &HashMap::new());
        assert_eq!(result.value, "cost $5 for $USER ${} ${bad-name}");
        assert!(result.undefined.is_empty());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("${A} $${B} ${C} ${A}"),
            vec!["A".to_string(), "C".to_string()]
        );
    }
}
