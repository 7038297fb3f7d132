//! Normalize attributes of opening tags.
//!
//! Every rule is a flat predicate over `(tag, name, value)`. Attributes are
//! dropped first (redundant values, then script and style `type`), then the
//! value is cleaned up. Quoting is decided last, after empty and boolean
//! attributes have been handled.

use super::whitespace::{collapse_whitespace, trim_whitespace};
use crate::{config::Options, event::Attribute};

/// Normalize an attribute of `tag`.
///
/// Returns the fragment to write after the tag name (e.g. ` id=main`), or an
/// empty string if the attribute is dropped. `siblings` holds every attribute
/// of the element, including this one.
pub(crate) fn normalize(
    options: &Options,
    tag: &str,
    attribute: &Attribute,
    siblings: &[Attribute],
) -> String {
    let name = attribute.name.to_ascii_lowercase();
    let name = name.as_str();
    let value = attribute.value.as_str();

    if (options.remove_redundant_attributes && is_redundant(tag, name, value, siblings))
        || (options.remove_script_type_attributes && is_script_type(tag, name, value))
        || (options.remove_style_link_type_attributes && is_style_link_type(tag, name, value))
    {
        return String::new();
    }

    let value = clean_value(tag, name, value);

    if options.remove_empty_attributes && can_delete_empty(tag, name, &value) {
        return String::new();
    }

    if options.collapse_boolean_attributes && is_boolean(name) {
        return format!(" {name}");
    }

    if options.remove_attribute_quotes && can_remove_quotes(&value) {
        format!(" {name}={value}")
    } else {
        format!(" {name}={}", quote(&value))
    }
}

/// Compare a value with an expected lowercase keyword.
fn value_is(value: &str, expected: &str) -> bool {
    trim_whitespace(value).eq_ignore_ascii_case(expected)
}

fn has_attribute(siblings: &[Attribute], name: &str) -> bool {
    siblings
        .iter()
        .any(|attribute| attribute.name.eq_ignore_ascii_case(name))
}

/// Check whether an attribute is set to its default value.
fn is_redundant(tag: &str, name: &str, value: &str, siblings: &[Attribute]) -> bool {
    match (tag, name) {
        ("script", "language") => value_is(value, "javascript"),
        ("form", "method") => value_is(value, "get"),
        ("input", "type") => value_is(value, "text"),
        ("script", "charset") => !has_attribute(siblings, "src"),
        ("a", "name") => has_attribute(siblings, "id"),
        ("area", "shape") => value_is(value, "rect"),
        _ => false,
    }
}

fn is_script_type(tag: &str, name: &str, value: &str) -> bool {
    tag == "script" && name == "type" && value_is(value, "text/javascript")
}

fn is_style_link_type(tag: &str, name: &str, value: &str) -> bool {
    matches!(tag, "style" | "link") && name == "type" && value_is(value, "text/css")
}

/// Event handler attributes (`onclick`, `onload`...).
fn is_event(name: &str) -> bool {
    name.strip_prefix("on")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_lowercase()))
}

fn is_boolean(name: &str) -> bool {
    matches!(name, "checked" | "disabled" | "selected" | "readonly")
}

/// Attributes holding a URI.
fn is_uri(tag: &str, name: &str) -> bool {
    match tag {
        "a" | "area" | "link" | "base" => name == "href",
        "img" => matches!(name, "src" | "longdesc" | "usemap"),
        "object" => matches!(name, "classid" | "codebase" | "data" | "usemap"),
        "q" | "blockquote" | "ins" | "del" => name == "cite",
        "form" => name == "action",
        "input" => matches!(name, "src" | "usemap"),
        "head" => name == "profile",
        "script" => matches!(name, "src" | "for"),
        _ => false,
    }
}

/// Attributes holding a number.
fn is_number(tag: &str, name: &str) -> bool {
    match tag {
        "a" | "area" | "object" | "button" => name == "tabindex",
        "input" => matches!(name, "maxlength" | "tabindex"),
        "select" => matches!(name, "size" | "tabindex"),
        "textarea" => matches!(name, "rows" | "cols" | "tabindex"),
        "colgroup" | "col" => name == "span",
        "th" | "td" => matches!(name, "rowspan" | "colspan"),
        _ => false,
    }
}

/// Attributes that are commonly left empty.
fn is_commonly_empty(name: &str) -> bool {
    matches!(
        name,
        "class"
            | "id"
            | "style"
            | "title"
            | "lang"
            | "dir"
            | "onfocus"
            | "onblur"
            | "onchange"
            | "onclick"
            | "ondblclick"
            | "onmousedown"
            | "onmouseup"
            | "onmouseover"
            | "onmousemove"
            | "onmouseout"
            | "onkeypress"
            | "onkeydown"
            | "onkeyup"
    )
}

fn clean_value(tag: &str, name: &str, value: &str) -> String {
    if is_event(name) {
        let value = trim_whitespace(value);
        let value = value
            .strip_prefix("javascript:")
            .map_or(value, |rest| rest.trim_start());
        let value = value.strip_suffix(';').map_or(value, |rest| rest.trim_end());
        value.to_owned()
    } else if name == "class" {
        collapse_whitespace(trim_whitespace(value)).into_owned()
    } else if is_uri(tag, name) || is_number(tag, name) {
        trim_whitespace(value).to_owned()
    } else if name == "style" {
        let value = trim_whitespace(value);
        let value = value.strip_suffix(';').map_or(value, |rest| rest.trim_end());
        value.to_owned()
    } else {
        value.to_owned()
    }
}

fn can_delete_empty(tag: &str, name: &str, value: &str) -> bool {
    trim_whitespace(value).is_empty()
        && ((tag == "input" && name == "value") || is_commonly_empty(name))
}

/// Check whether a value can be written without quotes.
///
/// The empty string always needs quotes, otherwise the next attribute name
/// would become its value.
fn can_remove_quotes(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b':' | b'-'))
}

/// Quote a value, picking a delimiter that does not occur in it.
fn quote(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        format!("\"{}\"", value.replace('"', "&quot;"))
    }
}

#[cfg(test)]
mod tests {
    use super::normalize;
    use crate::{config::Options, event::Attribute};

    fn run(options: &Options, tag: &str, attributes: &[Attribute]) -> String {
        attributes
            .iter()
            .map(|attribute| normalize(options, tag, attribute, attributes))
            .collect()
    }

    #[test]
    fn redundant() {
        let options = Options::default();

        const CASES: [(&str, &str, &str, &str); 6] = [
            ("script", "language", "JavaScript", ""),
            ("form", "method", " GET ", ""),
            ("input", "type", "text", ""),
            ("area", "shape", "rect", ""),
            ("input", "type", "checkbox", " type=checkbox"),
            ("form", "method", "post", " method=post"),
        ];

        for (tag, name, value, expected) in CASES {
            let result = run(&options, tag, &[Attribute::new(name, value)]);
            assert_eq!(
                result, expected,
                "\n<{tag} {name}={value:?}> expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn redundant_depends_on_siblings() {
        let options = Options::default();

        assert_eq!(
            run(&options, "script", &[Attribute::new("charset", "utf-8")]),
            ""
        );
        assert_eq!(
            run(
                &options,
                "script",
                &[Attribute::new("src", "a.js"), Attribute::new("charset", "utf-8")]
            ),
            " src=a.js charset=utf-8"
        );
        assert_eq!(
            run(
                &options,
                "a",
                &[Attribute::new("id", "top"), Attribute::new("name", "top")]
            ),
            " id=top"
        );
        assert_eq!(
            run(&options, "a", &[Attribute::new("name", "top")]),
            " name=top"
        );
    }

    #[test]
    fn redundant_disabled() {
        let options = Options {
            remove_redundant_attributes: false,
            ..Options::default()
        };

        assert_eq!(
            run(&options, "form", &[Attribute::new("method", "get")]),
            " method=get"
        );
    }

    #[test]
    fn script_and_style_types() {
        let keep = Options::default();
        let remove = Options {
            remove_script_type_attributes: true,
            remove_style_link_type_attributes: true,
            ..Options::default()
        };
        let script = [Attribute::new("type", "text/javascript")];
        let style = [Attribute::new("type", "Text/CSS")];

        assert_eq!(run(&keep, "script", &script), " type=\"text/javascript\"");
        assert_eq!(run(&remove, "script", &script), "");
        assert_eq!(run(&keep, "style", &style), " type=\"Text/CSS\"");
        assert_eq!(run(&remove, "style", &style), "");
        assert_eq!(run(&remove, "link", &style), "");
        assert_eq!(run(&remove, "div", &style), " type=\"Text/CSS\"");
    }

    #[test]
    fn clean_values() {
        let options = Options::default();

        const CASES: [(&str, &str, &str, &str); 8] = [
            ("a", "onclick", " javascript: go(); ", " onclick=\"go()\""),
            ("body", "onload", "init();", " onload=\"init()\""),
            ("div", "class", "  foo   bar\n baz ", " class=\"foo bar baz\""),
            ("a", "href", "  page.html ", " href=page.html"),
            ("td", "colspan", " 2 ", " colspan=2"),
            ("div", "style", " color: red; ", " style=\"color: red\""),
            ("div", "title", " padded ", " title=\" padded \""),
            ("img", "alt", "a \"quoted\" word", " alt='a \"quoted\" word'"),
        ];

        for (tag, name, value, expected) in CASES {
            let result = run(&options, tag, &[Attribute::new(name, value)]);
            assert_eq!(
                result, expected,
                "\n<{tag} {name}={value:?}> expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn quotes() {
        let options = Options::default();

        for value in ["abc", "a-b_c.d:e", "0", "ABC123"] {
            assert_eq!(
                run(&options, "div", &[Attribute::new("data-x", value)]),
                format!(" data-x={value}")
            );
        }

        for value in ["a b", "a=b", "a/b", ""] {
            assert_eq!(
                run(&options, "div", &[Attribute::new("data-x", value)]),
                format!(" data-x=\"{value}\"")
            );
        }

        let keep = Options {
            remove_attribute_quotes: false,
            ..Options::default()
        };

        assert_eq!(
            run(&keep, "div", &[Attribute::new("id", "main")]),
            " id=\"main\""
        );
    }

    #[test]
    fn both_quote_kinds() {
        let options = Options::default();

        assert_eq!(
            run(&options, "div", &[Attribute::new("title", "it's \"x\"")]),
            " title=\"it's &quot;x&quot;\""
        );
    }

    #[test]
    fn empty_attributes() {
        let options = Options::default();

        for name in ["class", "id", "style", "title", "lang", "dir", "onclick", "onmouseover", "onkeyup"] {
            assert_eq!(
                run(&options, "div", &[Attribute::new(name, "  ")]),
                "",
                "{name} should be removed"
            );
        }

        assert_eq!(run(&options, "input", &[Attribute::new("value", "")]), "");
        assert_eq!(
            run(&options, "option", &[Attribute::new("value", "")]),
            " value=\"\""
        );
        assert_eq!(
            run(&options, "div", &[Attribute::new("data-x", "")]),
            " data-x=\"\""
        );

        let keep = Options {
            remove_empty_attributes: false,
            ..Options::default()
        };

        assert_eq!(run(&keep, "div", &[Attribute::new("class", "")]), " class=\"\"");
    }

    #[test]
    fn boolean_attributes() {
        let options = Options::default();

        for name in ["checked", "disabled", "selected", "readonly"] {
            assert_eq!(
                run(&options, "input", &[Attribute::new(name, name)]),
                format!(" {name}")
            );
            assert_eq!(run(&options, "input", &[Attribute::bare(name)]), format!(" {name}"));
        }

        let keep = Options {
            collapse_boolean_attributes: false,
            ..Options::default()
        };

        assert_eq!(
            run(&keep, "input", &[Attribute::new("checked", "checked")]),
            " checked=checked"
        );
    }

    #[test]
    fn uppercase_names() {
        let options = Options::default();

        assert_eq!(
            run(&options, "input", &[Attribute::new("CHECKED", "checked")]),
            " checked"
        );
    }
}
