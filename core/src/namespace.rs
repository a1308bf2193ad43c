//! Markup namespaces and name helpers shared by every host.

/// The SVG namespace used for graphical markup.
pub const SVG: &str = "http://www.w3.org/2000/svg";
/// The MathML namespace.
pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
/// The XHTML namespace standard elements live in.
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
/// The XLink namespace (`xlink:href` and friends).
pub const XLINK: &str = "http://www.w3.org/1999/xlink";
/// The XML namespace (`xml:lang`, `xml:space`).
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
/// The XMLNS namespace (`xmlns`, `xmlns:*`).
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// Resolves the namespace an attribute belongs to from its qualified name.
///
/// Unprefixed names live in the null namespace.
#[must_use]
pub fn for_attribute(qualified_name: &str) -> Option<&'static str> {
    if qualified_name == "xmlns" || qualified_name.starts_with("xmlns:") {
        Some(XMLNS)
    } else if qualified_name.starts_with("xlink:") {
        Some(XLINK)
    } else if qualified_name.starts_with("xml:") {
        Some(XML)
    } else {
        None
    }
}

/// Converts a dataset key into its `data-*` attribute name.
///
/// Upper-case ASCII letters become `-` followed by the lower-case letter, so
/// `fooBar` maps to `data-foo-bar`.
#[must_use]
pub fn dataset_attribute(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    name.push_str("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

/// Returns `true` when `name` is acceptable as an element or attribute name.
///
/// Mirrors the browser rule: a leading letter, `_` or `:`, followed by
/// letters, digits, `-`, `_`, `.` or `:`. Non-ASCII characters are allowed.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let start_ok = first.is_alphabetic() || first == '_' || first == ':';
    start_ok
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_namespaces_follow_prefix() {
        assert_eq!(for_attribute("xlink:href"), Some(XLINK));
        assert_eq!(for_attribute("xml:lang"), Some(XML));
        assert_eq!(for_attribute("xmlns"), Some(XMLNS));
        assert_eq!(for_attribute("xmlns:xlink"), Some(XMLNS));
        assert_eq!(for_attribute("viewBox"), None);
    }

    #[test]
    fn dataset_keys_are_kebab_cased() {
        assert_eq!(dataset_attribute("state"), "data-state");
        assert_eq!(dataset_attribute("fooBarBaz"), "data-foo-bar-baz");
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("div"));
        assert!(is_valid_name("my-widget"));
        assert!(is_valid_name("xlink:href"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1div"));
        assert!(!is_valid_name("di v"));
        assert!(!is_valid_name("<div>"));
    }
}
