//! Reference token syntax.
//!
//! Declared resources refer to attributes of other resources with
//! `${{ resources.<logical_id>.<attribute> }}` tokens embedded in string
//! property values. This module owns the token grammar: formatting a token
//! and scanning strings for the tokens they contain. Substitution is the
//! engine's job.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pseudo-attribute resolving to a resource's physical identifier. Always
/// available once the resource exists, on top of whatever attributes its
/// executor reported.
pub const PHYSICAL_ID_ATTRIBUTE: &str = "physical_resource_id";

static REF_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{\{\s*resources\.([A-Za-z0-9_-]+)\.([A-Za-z0-9_-]+)\s*\}\}").expect("reference token pattern")
});

/// One attribute reference found in a property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    pub logical_id: String,
    pub attribute: String,
}

impl AttributeRef {
    pub fn new(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    /// Render the token form of this reference.
    pub fn token(&self) -> String {
        format!("${{{{ resources.{}.{} }}}}", self.logical_id, self.attribute)
    }
}

/// Scan a string for every reference token it contains, in order.
pub fn find_refs(input: &str) -> Vec<AttributeRef> {
    REF_TOKEN
        .captures_iter(input)
        .map(|captures| AttributeRef::new(&captures[1], &captures[2]))
        .collect()
}

/// Replace every reference token in a string using the given lookup.
///
/// Tokens the lookup declines are left in place so the caller can report
/// them with their original spelling.
pub fn replace_refs(input: &str, mut lookup: impl FnMut(&AttributeRef) -> Option<String>) -> String {
    REF_TOKEN
        .replace_all(input, |captures: &regex::Captures| {
            let reference = AttributeRef::new(&captures[1], &captures[2]);
            lookup(&reference).unwrap_or_else(|| captures[0].to_string())
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_scan() {
        let reference = AttributeRef::new("credentials", "credentials_id");
        let found = find_refs(&reference.token());
        assert_eq!(found, vec![reference]);
    }

    #[test]
    fn finds_multiple_tokens_with_loose_spacing() {
        let input = "arn=${{ resources.creds.role_arn }} id=${{resources.ws.workspace_id}}";
        let found = find_refs(input);
        assert_eq!(
            found,
            vec![
                AttributeRef::new("creds", "role_arn"),
                AttributeRef::new("ws", "workspace_id"),
            ]
        );
    }

    #[test]
    fn replace_substitutes_known_and_keeps_unknown() {
        let input = "${{ resources.a.id }}/${{ resources.b.id }}";
        let output = replace_refs(input, |reference| {
            (reference.logical_id == "a").then(|| "A-1".to_string())
        });
        assert_eq!(output, "A-1/${{ resources.b.id }}");
    }

    #[test]
    fn plain_strings_pass_through_untouched() {
        assert!(find_refs("no tokens here, not even ${ this }").is_empty());
        assert_eq!(replace_refs("plain", |_| None), "plain");
    }
}
