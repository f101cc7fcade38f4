/// Derive a URL-safe slug from a human-readable title: lower-cased,
/// Icelandic letters transliterated, everything else outside `[a-z0-9]`
/// either collapsed into a single `-` (separators) or dropped entirely.
/// Strict: a title that yields nothing produces no slug at all.
pub fn slugify(title: &str) -> Option<String> {
    let mut slug = String::with_capacity(title.len());

    for c in title.chars() {
        for lower in c.to_lowercase() {
            if let Some(mapped) = transliterate(lower) {
                slug.push_str(mapped);
            } else if lower.is_ascii_alphanumeric() {
                slug.push(lower);
            } else if is_separator(lower) && !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() { None } else { Some(slug) }
}

fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        'á' => "a",
        'ð' => "d",
        'é' => "e",
        'í' => "i",
        'ó' => "o",
        'ú' => "u",
        'ý' => "y",
        'þ' => "th",
        'æ' => "ae",
        'ö' => "o",
        _ => return None,
    };
    Some(mapped)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '_' | '/')
}
