//! Lexical well-formedness checks that `quick-xml` leaves to the caller.

use std::collections::HashMap;

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Whether `s` is a colon-free XML name.
pub fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

/// Split a qualified name into its optional prefix and local part.
///
/// Returns `None` unless both parts are valid colon-free names.
pub fn split_qname(name: &str) -> Option<(Option<&str>, &str)> {
    match name.split_once(':') {
        None => is_ncname(name).then_some((None, name)),
        Some((prefix, local)) => {
            (is_ncname(prefix) && is_ncname(local)).then_some((Some(prefix), local))
        }
    }
}

/// Whether every quoted attribute value in a raw attribute list is followed
/// by whitespace or the end of the tag.
pub fn attributes_separated(raw: &[u8]) -> bool {
    let mut quote = None;
    for (i, &b) in raw.iter().enumerate() {
        if let Some(q) = quote {
            if b != q {
                continue;
            }
            quote = None;
            let next = raw.get(i + 1);
            let at_end = next.is_none() || (next == Some(&b'/') && i + 2 == raw.len());
            if !at_end && !next.is_some_and(u8::is_ascii_whitespace) {
                return false;
            }
        } else if b == b'"' || b == b'\'' {
            quote = Some(b);
        }
    }
    true
}

/// `]]>` may only close a CDATA section.
pub fn contains_cdata_end(text: &[u8]) -> bool {
    text.windows(3).any(|w| w == b"]]>")
}

/// Comment bodies may not contain `--` or end with `-`.
pub fn comment_is_valid(body: &[u8]) -> bool {
    !body.windows(2).any(|w| w == b"--") && body.last() != Some(&b'-')
}

/// The five entities every XML document may reference.
pub fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => None,
    }
}

/// General entities with literal values declared in a DOCTYPE internal subset.
///
/// Parameter entities and external (`SYSTEM`/`PUBLIC`) entities are skipped.
/// The first declaration of a name wins.
pub fn internal_entities(doctype: &str) -> HashMap<String, String> {
    const DECL: &str = "<!ENTITY";

    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(pos) = rest.find(DECL) {
        rest = rest[pos + DECL.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        let after = rest[name_end..].trim_start();
        let Some(quote) = after.chars().next().filter(|&c| c == '"' || c == '\'') else {
            rest = after;
            continue;
        };

        let body = &after[1..];
        let Some(close) = body.find(quote) else {
            break;
        };
        entities
            .entry(name.to_owned())
            .or_insert_with(|| body[..close].to_owned());
        rest = &body[close + 1..];
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert!(is_ncname("pl-multiple-choice"));
        assert!(is_ncname("_x.1"));
        assert!(is_ncname("\u{e9}t\u{e9}"));
        assert!(!is_ncname("1a"));
        assert!(!is_ncname("-a"));
        assert!(!is_ncname(""));
        assert!(!is_ncname("a b"));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("div"), Some((None, "div")));
        assert_eq!(split_qname("p:b"), Some((Some("p"), "b")));
        assert_eq!(split_qname("p:b:c"), None);
        assert_eq!(split_qname(":b"), None);
        assert_eq!(split_qname("p:"), None);
    }

    #[test]
    fn test_attributes_separated() {
        assert!(attributes_separated(b" b=\"1\" c='2'"));
        assert!(attributes_separated(b" b=\"1\"/"));
        assert!(attributes_separated(b""));
        assert!(!attributes_separated(b" b=\"1\"c=\"2\""));
        assert!(!attributes_separated(b" b='1'c='2'"));
    }

    #[test]
    fn test_comment_and_cdata_end() {
        assert!(comment_is_valid(b" fine - really "));
        assert!(!comment_is_valid(b" x -- y "));
        assert!(!comment_is_valid(b" trailing-"));
        assert!(contains_cdata_end(b"a ]]> b"));
        assert!(!contains_cdata_end(b"a ]] > b"));
    }

    #[test]
    fn test_internal_entities() {
        let entities = internal_entities(
            "r [<!ENTITY e \"x\"> <!ENTITY % p 'ignored'> <!ENTITY ext SYSTEM \"f.xml\">\
             <!ENTITY s 'single'> <!ENTITY e \"second\">]",
        );
        assert_eq!(entities.get("e").map(String::as_str), Some("x"));
        assert_eq!(entities.get("s").map(String::as_str), Some("single"));
        assert!(!entities.contains_key("p"));
        assert!(!entities.contains_key("ext"));
    }

    #[test]
    fn test_predefined_entities() {
        assert_eq!(predefined_entity("amp"), Some("&"));
        assert_eq!(predefined_entity("nbsp"), None);
    }
}
