//! Identifier conversions: model/field names to column names, slugs and display labels.

/// Convert a single identifier from CamelCase or camelCase to snake_case.
/// e.g. "BlogPost" -> "blog_post", "createdAt" -> "created_at"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == ' ' || c == '-' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Human-readable label from an identifier.
/// e.g. "published_at" -> "Published at", "authorName" -> "Author name"
pub fn to_label(s: &str) -> String {
    let snake = to_snake_case(s);
    let mut out = String::with_capacity(snake.len());
    for (i, part) in snake.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if i == 0 {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push_str(part);
        }
    }
    out
}

/// True for plain SQL identifiers: letter or underscore, then letters, digits, underscores.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("BlogPost"), "blog_post");
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_snake_case("title"), "title");
        assert_eq!(to_snake_case("Page Views"), "page_views");
    }

    #[test]
    fn labels() {
        assert_eq!(to_label("published_at"), "Published at");
        assert_eq!(to_label("authorName"), "Author name");
        assert_eq!(to_label("Title"), "Title");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("posts"));
        assert!(is_identifier("_tmp1"));
        assert!(!is_identifier("1posts"));
        assert!(!is_identifier("posts; drop"));
        assert!(!is_identifier(""));
    }
}
