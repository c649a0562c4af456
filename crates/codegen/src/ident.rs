//! Identifier helpers.

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "super", "Self"];

/// Converts a wire field name (`nameId`, `iconURI`) to a Rust field
/// identifier (`name_id`, `icon_uri`).
pub fn field_ident(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    let out = out.trim_end_matches('_').to_string();
    if out.is_empty() {
        return "field".into();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", out);
    }
    escape_keyword(out)
}

/// Module name for a qualified package: its last segment.
pub fn module_ident(package: &str) -> String {
    let last = package.rsplit('.').next().unwrap_or(package);
    field_ident(last)
}

fn escape_keyword(ident: String) -> String {
    if RESERVED.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_to_snake_case() {
        assert_eq!(field_ident("id"), "id");
        assert_eq!(field_ident("nameId"), "name_id");
        assert_eq!(field_ident("iconURI"), "icon_uri");
        assert_eq!(field_ident("URLPath"), "url_path");
        assert_eq!(field_ident("level2Bonus"), "level2_bonus");
        assert_eq!(field_ident("ClassType_"), "class_type");
    }

    #[test]
    fn awkward_names() {
        assert_eq!(field_ident(""), "field");
        assert_eq!(field_ident("2d"), "_2d");
        assert_eq!(field_ident("type"), "r#type");
        assert_eq!(field_ident("self"), "self_");
        assert_eq!(field_ident("a-b c"), "a_b_c");
    }

    #[test]
    fn module_names() {
        assert_eq!(module_ident("com.ankamagames.dofus.datacenter.items"), "items");
        assert_eq!(module_ident("monsters"), "monsters");
        assert_eq!(module_ident("com.ankamagames.dofus.datacenter.mod"), "r#mod");
    }
}
