//!
//! Utility functions shared by the configuration layer.
//!
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//!

use {
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
};

/// Matches `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names must be uppercase letters, digits, or underscores.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Replaces handlebars-style placeholders with environment variable values.
///
/// Searches the input for patterns like `{{ VAR_NAME }}` and replaces them
/// with the corresponding environment variable value. `{{VAR}}`, `{{ VAR }}`
/// and `{{  VAR  }}` are equivalent. Unset variables become empty strings and
/// are reported with a warning.
///
/// This lets route tables refer to deployment-specific handler names without
/// hard-coding them in the TOML file:
///
/// ```
/// use route_conf::replace_handlebars_with_env;
///
/// let template = r#"default_handler = "{{ ROUTE_CONF_DOC_MISSING }}""#;
/// assert_eq!(replace_handlebars_with_env(template), r#"default_handler = """#);
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_replace_handlebars_with_env_no_variables() {
        let input = "[routing]\ndefault_handler = \"Home\"";
        assert_eq!(replace_handlebars_with_env(input), input);
    }

    #[test]
    fn test_replace_handlebars_with_env_with_variables() {
        unsafe {
            env::set_var("UTILS_TEST_HANDLER", "Dashboard");
            env::set_var("UTILS_TEST_ACTION", "overview");
        }
        let input = "{{ UTILS_TEST_HANDLER }}:{{UTILS_TEST_ACTION}}";
        assert_eq!(replace_handlebars_with_env(input), "Dashboard:overview");

        unsafe {
            env::remove_var("UTILS_TEST_HANDLER");
            env::remove_var("UTILS_TEST_ACTION");
        }
    }

    #[test]
    fn test_replace_handlebars_with_env_missing_variable() {
        unsafe {
            env::remove_var("UTILS_TEST_NONEXISTENT");
        }
        let input = "Value: {{ UTILS_TEST_NONEXISTENT }}";
        assert_eq!(replace_handlebars_with_env(input), "Value: ");
    }

    proptest! {
        /// Strings without braces should pass through unchanged
        #[test]
        fn handlebars_no_pattern_unchanged(s in "[^{}]*") {
            let result = replace_handlebars_with_env(&s);
            prop_assert_eq!(result, s);
        }

        /// Route placeholders use single angle brackets and must never be touched
        #[test]
        fn handlebars_leaves_route_params_alone(name in "[a-z_]{1,10}") {
            let input = format!("\"/items/<{name}>\" = {{ handler = \"Items\" }}");
            let result = replace_handlebars_with_env(&input);
            prop_assert_eq!(result, input);
        }
    }
}
