//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` references in `value`; `field` names the setting in errors.
///
/// Bare `$VAR` is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|err| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", err.cause.0),
    })
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDTREE_TEST_EXPAND_RENDERER", "/opt/bin/wkhtmltopdf");
        }

        let result = expand_env("${MDTREE_TEST_EXPAND_RENDERER}", "export.pdf_renderer").unwrap();

        assert_eq!(result, "/opt/bin/wkhtmltopdf");
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDTREE_TEST_EXPAND_UNSET");
        }

        let result = expand_env("${MDTREE_TEST_EXPAND_UNSET:-A4}", "export.page_size").unwrap();

        assert_eq!(result, "A4");
    }

    #[test]
    fn test_expand_embedded() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDTREE_TEST_EXPAND_HOME", "/home/me");
        }

        let result = expand_env("${MDTREE_TEST_EXPAND_HOME}/styles/doc.css", "export.css").unwrap();

        assert_eq!(result, "/home/me/styles/doc.css");
    }

    #[test]
    fn test_missing_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDTREE_TEST_EXPAND_MISSING");
        }

        let err = expand_env("${MDTREE_TEST_EXPAND_MISSING}", "export.css").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in export.css: ${MDTREE_TEST_EXPAND_MISSING} not set"
        );
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        assert_eq!(expand_env("$HOME/x", "export.css").unwrap(), "$HOME/x");
    }
}
