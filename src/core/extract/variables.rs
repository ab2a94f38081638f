use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

/// `${NAME}` where NAME is uppercase letters, digits and underscores.
static VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([A-Z0-9_]+)\}").unwrap());

/// Distinct variable names referenced in `text`, sorted.
pub fn find_variables(text: &str) -> Vec<String> {
    VARIABLE_REGEX
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
