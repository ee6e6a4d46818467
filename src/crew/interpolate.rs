use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::CrewError;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Replace `{name}` placeholders with `inputs[name]`.
///
/// Only bare identifiers in braces are placeholders, so JSON snippets pass
/// through untouched. A placeholder without a matching input is an error.
pub fn interpolate(template: &str, inputs: &HashMap<String, String>) -> Result<String, CrewError> {
    if let Some(missing) = placeholder()
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .find(|name| !inputs.contains_key(name))
    {
        return Err(CrewError::MissingInput {
            name: missing,
            template: template.to_string(),
        });
    }

    Ok(placeholder()
        .replace_all(template, |c: &Captures| inputs[&c[1]].clone())
        .into_owned())
}
