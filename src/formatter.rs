//! # Filename Formatter Module
//!
//! Substitutes `{field}` placeholders in a user-supplied template with
//! normalized metadata values. Unknown field names are a hard error so a
//! typo never silently ends up in a filename.

use crate::error::RenameError;
use crate::metadata::NormalizedMetadata;

/// Render a template against normalized metadata.
///
/// Text outside placeholders passes through verbatim. A placeholder
/// naming a field outside the schema fails with `UnknownField`; an
/// unterminated `{` is a template syntax error.
pub fn render(template: &str, meta: &NormalizedMetadata) -> Result<String, RenameError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after_brace = &rest[start + 1..];

        let end = after_brace.find('}').ok_or_else(|| {
            RenameError::Validation(format!("unterminated placeholder in template: {template}"))
        })?;

        let name = &after_brace[..end];
        let value = meta
            .field(name)
            .ok_or_else(|| RenameError::UnknownField(name.to_string()))?;
        output.push_str(&value);

        rest = &after_brace[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
