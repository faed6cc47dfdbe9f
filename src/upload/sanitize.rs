use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for image uploads, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Reduces a client-supplied filename to a flat, ASCII-only basename.
///
/// Accented letters are decomposed first so their ASCII base survives. Path
/// separators become word breaks, whitespace runs collapse to `_`, anything
/// outside `[A-Za-z0-9_.-]` (control characters included) is
/// dropped and leading/trailing `.`/`_` are trimmed. The output never holds a
/// separator or a `..` segment, and sanitizing it again is a no-op.
pub fn sanitize_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced
        .split(is_word_break)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

// ASCII whitespace plus vertical tab and the file/group/record/unit separators.
fn is_word_break(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '\x0B' | '\x1C'..='\x1F')
}

/// Lowercase extension of `filename`, if it has a non-empty one.
pub fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_allowed(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Media type implied by an allowed extension.
pub fn media_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
