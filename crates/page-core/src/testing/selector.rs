//! The subset of CSS selectors the in-memory page understands
//!
//! Comma-separated lists of compound selectors: a tag, `#id`, `.class` and
//! attribute tests (`[a]`, `[a="v"]`, `[a^="v"]`, `[a$="v"]`, `[a*="v"]`).
//! Combinators are not supported.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub selector: String,
    pub reason: &'static str,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector {:?}: {}", self.selector, self.reason)
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Exists,
    Equals,
    Prefix,
    Suffix,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrTest {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
}

impl AttrTest {
    fn accepts(&self, actual: &str) -> bool {
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == self.value,
            // An empty operand never matches for the substring forms
            AttrOp::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttrOp::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
            AttrOp::Contains => !self.value.is_empty() && actual.contains(&self.value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttrTest>,
}

/// What the matcher needs to know about one element
pub trait Subject {
    fn tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let fail = |reason| SelectorError {
            selector: source.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        let mut chars = source.chars().peekable();
        loop {
            skip_whitespace(&mut chars);
            let compound = parse_compound(&mut chars).map_err(fail)?;
            alternatives.push(compound);

            skip_whitespace(&mut chars);
            match chars.next() {
                None => break,
                Some(',') => continue,
                Some(_) => return Err(fail("combinators are not supported")),
            }
        }
        Ok(Self { alternatives })
    }

    pub fn matches(&self, subject: &impl Subject) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound_matches(compound, subject))
    }
}

fn compound_matches(compound: &Compound, subject: &impl Subject) -> bool {
    if let Some(tag) = &compound.tag {
        if !tag.eq_ignore_ascii_case(subject.tag()) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if subject.attribute("id") != Some(id.as_str()) {
            return false;
        }
    }
    compound.classes.iter().all(|class| subject.has_class(class))
        && compound.attributes.iter().all(|test| {
            subject
                .attribute(&test.name)
                .is_some_and(|actual| test.accepts(actual))
        })
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn skip_whitespace(chars: &mut Chars<'_>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_compound(chars: &mut Chars<'_>) -> Result<Compound, &'static str> {
    let mut compound = Compound::default();
    let mut empty = true;

    if chars.peek() == Some(&'*') {
        chars.next();
        empty = false;
    } else if chars.peek().is_some_and(|c| is_ident_char(*c)) {
        compound.tag = Some(read_ident(chars).to_ascii_lowercase());
        empty = false;
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                chars.next();
                compound.id = Some(non_empty(read_ident(chars))?);
            }
            '.' => {
                chars.next();
                compound.classes.push(non_empty(read_ident(chars))?);
            }
            '[' => {
                chars.next();
                compound.attributes.push(parse_attribute(chars)?);
            }
            _ => break,
        }
        empty = false;
    }

    if empty {
        return Err("expected a compound selector");
    }
    Ok(compound)
}

fn parse_attribute(chars: &mut Chars<'_>) -> Result<AttrTest, &'static str> {
    skip_whitespace(chars);
    let name = non_empty(read_ident(chars))?.to_ascii_lowercase();
    skip_whitespace(chars);

    let op = match chars.next() {
        Some(']') => {
            return Ok(AttrTest {
                name,
                op: AttrOp::Exists,
                value: String::new(),
            })
        }
        Some('=') => AttrOp::Equals,
        Some(prefix @ ('^' | '$' | '*')) => {
            if chars.next() != Some('=') {
                return Err("expected '=' in attribute test");
            }
            match prefix {
                '^' => AttrOp::Prefix,
                '$' => AttrOp::Suffix,
                _ => AttrOp::Contains,
            }
        }
        _ => return Err("malformed attribute test"),
    };

    skip_whitespace(chars);
    let value = match chars.peek() {
        Some(&quote @ ('"' | '\'')) => {
            chars.next();
            read_quoted(chars, quote)?
        }
        _ => non_empty(read_ident(chars))?,
    };
    skip_whitespace(chars);
    if chars.next() != Some(']') {
        return Err("unterminated attribute test");
    }

    Ok(AttrTest { name, op, value })
}

fn read_quoted(chars: &mut Chars<'_>, quote: char) -> Result<String, &'static str> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => return Err("dangling escape"),
            },
            Some(c) if c == quote => return Ok(value),
            Some(c) => value.push(c),
            None => return Err("unterminated string"),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut Chars<'_>) -> String {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|c| is_ident_char(*c)) {
        ident.push(c);
    }
    ident
}

fn non_empty(ident: String) -> Result<String, &'static str> {
    if ident.is_empty() {
        Err("expected an identifier")
    } else {
        Ok(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct El(&'static str, Vec<(&'static str, &'static str)>);

    impl Subject for El {
        fn tag(&self) -> &str {
            self.0
        }

        fn attribute(&self, name: &str) -> Option<&str> {
            self.1.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
    }

    #[test]
    fn test_lists_and_compounds() {
        let modal = El("div", vec![("class", "modal fade show")]);
        let closed = El("div", vec![("class", "modal")]);
        let selector = Selector::parse(".modal.show").unwrap();
        assert!(selector.matches(&modal));
        assert!(!selector.matches(&closed));

        let tracked = Selector::parse("a, button, .card").unwrap();
        assert!(tracked.matches(&El("BUTTON", vec![])));
        assert!(!tracked.matches(&El("p", vec![])));
    }

    #[test]
    fn test_attribute_operators() {
        let anchor = Selector::parse(r##"a[href^="#"]"##).unwrap();
        assert!(anchor.matches(&El("a", vec![("href", "#stats")])));
        assert!(!anchor.matches(&El("a", vec![("href", "/home")])));

        let search = Selector::parse(r#"input[type="search"], .search-input"#).unwrap();
        assert!(search.matches(&El("input", vec![("type", "search")])));

        let escaped = Selector::parse(r#"[name="say \"hi\""]"#).unwrap();
        assert!(escaped.matches(&El("input", vec![("name", "say \"hi\"")])));

        let bare = Selector::parse("[data-tooltip]").unwrap();
        assert!(bare.matches(&El("span", vec![("data-tooltip", "")])));
    }

    #[test]
    fn test_rejects_unsupported_syntax() {
        assert!(Selector::parse("nav a").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("[name=").is_err());
    }
}
