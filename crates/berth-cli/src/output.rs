//! Formatted output helpers for CLI commands.

use std::collections::BTreeMap;

use berth_compose::emitter::ComposeDocument;

/// Formats variables as `NAME = VALUE` lines, sorted by name.
#[must_use]
pub fn format_env_vars(vars: &BTreeMap<String, String>) -> Vec<String> {
    vars.iter()
        .map(|(name, value)| format!("    {name} = {value}"))
        .collect()
}

/// Comma-separated service names of a document, or `none`.
#[must_use]
pub fn service_summary(document: &ComposeDocument) -> String {
    if document.is_empty() {
        return "none".to_string();
    }
    document.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use berth_compose::emitter::ComposeService;

    use super::*;

    #[test]
    fn format_env_vars_is_sorted() {
        let vars = BTreeMap::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        assert_eq!(format_env_vars(&vars), vec!["    a = 1", "    b = 2"]);
    }

    #[test]
    fn format_env_vars_empty() {
        assert!(format_env_vars(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn service_summary_lists_names() {
        let mut document = ComposeDocument::new();
        let _ = document.insert("web".to_string(), ComposeService::default());
        let _ = document.insert("db".to_string(), ComposeService::default());
        assert_eq!(service_summary(&document), "db, web");
    }

    #[test]
    fn service_summary_empty() {
        assert_eq!(service_summary(&ComposeDocument::new()), "none");
    }
}
