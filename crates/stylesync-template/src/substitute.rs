//! Placeholder substitution.
//!
//! `{{ key }}` placeholders are replaced by looking `key` up through a
//! caller-supplied function. Whitespace inside the braces is optional.
//!
//! Substitution never fails:
//!
//! - A key the lookup does not know is left exactly as written, braces and
//!   spacing included, so a half-filled template is easy to spot.
//! - An opening `{{` with no closing `}}` is copied through verbatim.
//! - Brace pairs whose content is not a plain key (`{{ a b }}`, JSON-ish
//!   content) are copied through verbatim.

/// Replaces every `{{ key }}` in `text` with `lookup(key)`.
///
/// # Example
///
/// ```rust
/// use stylesync_template::substitute;
///
/// let out = substitute("let {{name}} = {{ value }} // {{ missing }}", |key| match key {
///     "name" => Some("primary"),
///     "value" => Some("0xFF0000"),
///     _ => None,
/// });
/// assert_eq!(out, "let primary = 0xFF0000 // {{ missing }}");
/// ```
pub fn substitute<'v>(text: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);

        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = after_open[..end].trim();
        let value = if is_key(key) { lookup(key) } else { None };
        match value {
            Some(value) => result.push_str(value),
            // Leave the placeholder as written
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }

        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

fn is_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
