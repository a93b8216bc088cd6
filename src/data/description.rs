use crate::error::DescriptionError;

/// The `(prefix, name)` pair at the head of a protein description,
/// e.g. `gb|AGJ65242.2` → (`gb`, `AGJ65242.2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub prefix: String,
    pub name: String,
}

/// Split a protein description into its database prefix and accession.
///
/// Only the text before the first whitespace is examined, so a description
/// starting with whitespace has an empty first token. That token is split
/// at its first `|`; any later `|` stays part of the name. Control entries
/// have no `|` and come back as [`DescriptionError::Unparseable`].
pub fn parse_description(description: &str) -> Result<ParsedName, DescriptionError> {
    let token = description.split(char::is_whitespace).next().unwrap_or("");

    match token.split_once('|') {
        Some((prefix, name)) => Ok(ParsedName {
            prefix: prefix.to_string(),
            name: name.to_string(),
        }),
        None => Err(DescriptionError::Unparseable {
            description: description.to_string(),
        }),
    }
}
