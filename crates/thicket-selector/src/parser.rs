//! Recursive-descent parser for [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! ```text
//! <selector-list>          = <complex-selector>#
//! <relative-selector-list> = <relative-selector>#
//! <complex-selector>       = <compound-selector> [ <combinator>? <compound-selector> ]*
//! <relative-selector>      = <combinator>? <complex-selector>
//! <compound-selector>      = [ <type-selector>? <subclass-selector>*
//!                              [ <pseudo-element-selector> <pseudo-class-selector>* ]* ]!
//! ```

use thiserror::Error;

use crate::ast::{AnPlusB, Component, PseudoArgument, Selector, SelectorList};

/// Grammar rejection with the character offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Character offset into the input.
    pub position: usize,
}

/// Parse a selector list such as `ul > li.active, #main`.
pub fn parse_selector(input: &str) -> Result<SelectorList, ParseError> {
    Parser::new(input).parse_top_level(false)
}

/// Parse a relative selector list such as `> li, + dt` (the argument of `:has()`).
pub fn parse_relative_selector_list(input: &str) -> Result<SelectorList, ParseError> {
    Parser::new(input).parse_top_level(true)
}

/// Which grammar a nested selector list follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    /// Any invalid branch invalidates the whole list.
    Strict,
    /// [§ 4.2 Forgiving selector lists](https://www.w3.org/TR/selectors-4/#forgiving-selector):
    /// invalid branches are dropped.
    Forgiving,
    /// Branches may start with a combinator.
    Relative,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

const fn is_combinator_char(c: char) -> bool {
    matches!(c, '>' | '+' | '~')
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error<T>(&self, message: &str) -> Result<T, ParseError> {
        Err(ParseError {
            message: message.to_string(),
            position: self.pos,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skip whitespace, reporting whether there was any.
    fn consume_whitespace(&mut self) -> bool {
        let start = self.pos;
        self.skip_whitespace();
        self.pos > start
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(&format!("expected '{expected}'"))
        }
    }

    fn parse_top_level(mut self, relative: bool) -> Result<SelectorList, ParseError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return self.error("empty selector");
        }
        let kind = if relative { ListKind::Relative } else { ListKind::Strict };
        let list = self.parse_selector_list(kind)?;
        if self.peek().is_some() {
            return self.error("unexpected character");
        }
        Ok(list)
    }

    /// Parse comma-separated complex selectors up to `)` or end of input.
    fn parse_selector_list(&mut self, kind: ListKind) -> Result<SelectorList, ParseError> {
        let mut children = Vec::new();
        self.skip_whitespace();
        if matches!(self.peek(), None | Some(')')) {
            return Ok(SelectorList { children });
        }

        loop {
            if kind == ListKind::Forgiving {
                let start = self.pos;
                match self.parse_complex_selector(false) {
                    Ok(selector) => children.push(selector),
                    Err(_) => {
                        self.pos = start;
                        self.skip_to_list_boundary();
                    }
                }
            } else {
                children.push(self.parse_complex_selector(kind == ListKind::Relative)?);
            }

            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                _ => break,
            }
        }
        Ok(SelectorList { children })
    }

    /// Advance to the next `,` or `)` at nesting depth zero.
    fn skip_to_list_boundary(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' if depth > 0 => depth -= 1,
                ',' | ')' if depth == 0 => return,
                '"' | '\'' => {
                    let _ = self.parse_string();
                    continue;
                }
                '\\' => self.pos += 1,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    fn parse_complex_selector(&mut self, relative: bool) -> Result<Selector, ParseError> {
        let mut children = Vec::new();
        self.skip_whitespace();

        if let Some(c) = self.peek().filter(|&c| is_combinator_char(c)) {
            if !relative {
                return self.error("unexpected combinator");
            }
            self.pos += 1;
            children.push(Component::Combinator {
                name: c.to_string(),
            });
            self.skip_whitespace();
        }

        loop {
            let compound = self.parse_compound_selector()?;
            if compound.is_empty() {
                return self.error("expected selector");
            }
            children.extend(compound);

            let had_whitespace = self.consume_whitespace();
            match self.peek() {
                None | Some(',' | ')') => break,
                Some(c) if is_combinator_char(c) => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek().is_some_and(is_combinator_char) {
                        return self.error("invalid combinator sequence");
                    }
                    children.push(Component::Combinator {
                        name: c.to_string(),
                    });
                }
                Some(_) if had_whitespace => children.push(Component::Combinator {
                    name: " ".to_string(),
                }),
                Some(_) => return self.error("unexpected character"),
            }
        }

        Ok(Selector { children })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound_selector(&mut self) -> Result<Vec<Component>, ParseError> {
        let mut compound = Vec::new();
        if let Some(type_selector) = self.parse_type_selector()? {
            compound.push(type_selector);
        }

        loop {
            match self.peek() {
                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                Some('#') => {
                    self.pos += 1;
                    let name = self.parse_name()?;
                    compound.push(Component::IdSelector { name });
                }
                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                Some('.') => {
                    self.pos += 1;
                    let name = self.parse_ident()?;
                    compound.push(Component::ClassSelector { name });
                }
                Some('[') => {
                    self.pos += 1;
                    compound.push(self.parse_attribute_selector()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// [§ 5.3 Namespaces in elemental selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
    fn parse_type_selector(&mut self) -> Result<Option<Component>, ParseError> {
        let first = match self.peek() {
            Some('*') => {
                self.pos += 1;
                Some("*".to_string())
            }
            _ if self.starts_ident(0) => Some(self.parse_ident()?),
            Some('|') => None,
            _ => return Ok(None),
        };

        if self.peek() == Some('|') && self.peek_at(1) != Some('=') {
            self.pos += 1;
            let local = if self.peek() == Some('*') {
                self.pos += 1;
                "*".to_string()
            } else {
                self.parse_ident()?
            };
            let prefix = first.unwrap_or_default();
            return Ok(Some(Component::TypeSelector {
                name: format!("{prefix}|{local}"),
            }));
        }

        match first {
            Some(name) => Ok(Some(Component::TypeSelector { name })),
            None => self.error("expected selector"),
        }
    }

    /// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
    fn parse_attribute_selector(&mut self) -> Result<Component, ParseError> {
        self.skip_whitespace();

        let first = match self.peek() {
            Some('*') if self.peek_at(1) == Some('|') => {
                self.pos += 1;
                Some("*".to_string())
            }
            Some('|') => None,
            _ => Some(self.parse_ident()?),
        };
        let name = if self.peek() == Some('|') && self.peek_at(1) != Some('=') {
            self.pos += 1;
            let local = self.parse_ident()?;
            format!("{}|{local}", first.unwrap_or_default())
        } else if let Some(name) = first {
            name
        } else {
            return self.error("expected attribute name");
        };

        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Component::AttributeSelector {
                name,
                matcher: None,
                value: None,
                flags: None,
            });
        }

        let matcher = match (self.peek(), self.peek_at(1)) {
            (Some('='), _) => {
                self.pos += 1;
                "=".to_string()
            }
            (Some(op @ ('~' | '|' | '^' | '$' | '*')), Some('=')) => {
                self.pos += 2;
                format!("{op}=")
            }
            _ => return self.error("invalid attribute matcher"),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some('"' | '\'') => self.parse_string()?,
            _ => self.parse_ident()?,
        };

        self.skip_whitespace();
        let flags = if self.starts_ident(0) {
            let flag = self.parse_ident()?.to_ascii_lowercase();
            if flag != "i" && flag != "s" {
                return self.error("invalid attribute flag");
            }
            self.skip_whitespace();
            Some(flag)
        } else {
            None
        };
        self.expect(']')?;

        Ok(Component::AttributeSelector {
            name,
            matcher: Some(matcher),
            value: Some(value),
            flags,
        })
    }

    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes) and
    /// [§ 3.6.1 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements).
    /// The leading `:` has been consumed.
    fn parse_pseudo(&mut self) -> Result<Component, ParseError> {
        let is_element = self.peek() == Some(':');
        if is_element {
            self.pos += 1;
        }
        let name = self.parse_ident()?.to_ascii_lowercase();

        if self.peek() != Some('(') {
            return Ok(if is_element {
                Component::PseudoElementSelector {
                    name,
                    children: None,
                }
            } else {
                Component::PseudoClassSelector {
                    name,
                    children: None,
                }
            });
        }
        self.pos += 1;

        let argument = if is_element {
            self.parse_raw_argument()
        } else {
            match name.as_str() {
                "is" | "where" => {
                    PseudoArgument::SelectorList(self.parse_selector_list(ListKind::Forgiving)?)
                }
                "not" | "host" | "host-context" | "slotted" => {
                    PseudoArgument::SelectorList(self.parse_selector_list(ListKind::Strict)?)
                }
                "has" => PseudoArgument::SelectorList(self.parse_selector_list(ListKind::Relative)?),
                "nth-child" | "nth-last-child" => PseudoArgument::AnPlusB(self.parse_nth(true)?),
                "nth-of-type" | "nth-last-of-type" | "nth-col" | "nth-last-col" => {
                    PseudoArgument::AnPlusB(self.parse_nth(false)?)
                }
                _ => self.parse_raw_argument(),
            }
        };
        self.skip_whitespace();
        self.expect(')')?;

        let children = Some(vec![argument]);
        Ok(if is_element {
            Component::PseudoElementSelector { name, children }
        } else {
            Component::PseudoClassSelector { name, children }
        })
    }

    /// Parse `An+B` optionally followed by `of <selector-list>`, stopping
    /// before the closing `)`.
    fn parse_nth(&mut self, allow_of: bool) -> Result<AnPlusB, ParseError> {
        self.skip_whitespace();
        let mut expression = String::new();
        let mut selector = None;

        loop {
            match self.peek() {
                None => return self.error("unterminated An+B"),
                Some(')') => break,
                Some(c) if c.is_ascii_whitespace() => {
                    self.skip_whitespace();
                    if allow_of && self.at_keyword_of() {
                        self.pos += 2;
                        let list = self.parse_selector_list(ListKind::Strict)?;
                        if list.is_empty() {
                            return self.error("expected selector after 'of'");
                        }
                        selector = Some(list);
                        break;
                    }
                    expression.push(' ');
                }
                Some(c) if c.is_ascii_alphanumeric() || c == '+' || c == '-' => {
                    self.pos += 1;
                    expression.push(c);
                }
                Some(_) => return self.error("invalid An+B"),
            }
        }

        let Some((a, b)) = parse_an_plus_b(&expression) else {
            return self.error("invalid An+B");
        };
        Ok(AnPlusB { a, b, selector })
    }

    fn at_keyword_of(&self) -> bool {
        matches!(
            (self.peek(), self.peek_at(1), self.peek_at(2)),
            (Some('o' | 'O'), Some('f' | 'F'), Some(c)) if c.is_ascii_whitespace()
        )
    }

    /// Consume balanced text up to (not including) the closing `)`.
    fn parse_raw_argument(&mut self) -> PseudoArgument {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                '"' | '\'' => {
                    let _ = self.parse_string();
                    continue;
                }
                '\\' => self.pos += 1,
                _ => {}
            }
            self.pos += 1;
        }
        let end = self.pos.min(self.chars.len());
        let value: String = self.chars[start..end].iter().collect();
        PseudoArgument::Raw {
            value: value.trim().to_string(),
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_ident(&self, offset: usize) -> bool {
        match self.peek_at(offset) {
            Some('-') => match self.peek_at(offset + 1) {
                Some('-') => true,
                Some('\\') => self.is_valid_escape(offset + 1),
                Some(c) => is_ident_start_char(c),
                None => false,
            },
            Some('\\') => self.is_valid_escape(offset),
            Some(c) => is_ident_start_char(c),
            None => false,
        }
    }

    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_valid_escape(&self, offset: usize) -> bool {
        self.peek_at(offset) == Some('\\') && self.peek_at(offset + 1).is_some_and(|c| c != '\n')
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn parse_ident(&mut self) -> Result<String, ParseError> {
        if !self.starts_ident(0) {
            return self.error("expected identifier");
        }
        self.parse_name()
    }

    /// Consume ident code points and escapes; used directly for ID selectors,
    /// whose hash token may start with a digit.
    fn parse_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_char(c) => {
                    self.pos += 1;
                    name.push(c);
                }
                Some('\\') if self.is_valid_escape(0) => {
                    self.pos += 1;
                    name.push(self.consume_escape());
                }
                _ => break,
            }
        }
        if name.is_empty() {
            return self.error("expected name");
        }
        Ok(name)
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    /// The backslash has been consumed.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.bump() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }

        let mut digits = String::from(c);
        while digits.len() < 6 && self.peek().is_some_and(|d| d.is_ascii_hexdigit()) {
            digits.push(self.chars[self.pos]);
            self.pos += 1;
        }
        if self.peek().is_some_and(|w| w.is_ascii_whitespace()) {
            self.pos += 1;
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn parse_string(&mut self) -> Result<String, ParseError> {
        let Some(quote) = self.bump() else {
            return self.error("expected string");
        };
        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                _ if c == quote => return Ok(value),
                '\n' => return self.error("newline in string"),
                '\\' => match self.peek() {
                    None => {}
                    Some('\n') => self.pos += 1,
                    Some(_) => value.push(self.consume_escape()),
                },
                _ => value.push(c),
            }
        }
        // "EOF: This is a parse error. Return the <string-token>."
        Ok(value)
    }
}

/// [CSS Syntax § 6.2 Parsing An+B](https://www.w3.org/TR/css-syntax-3/#anb-syntax)
///
/// Accepts `odd`, `even`, an integer, or `An+B` in its usual spellings
/// (`2n+1`, `-n+3`, `n`, `+5`, `3n - 2`). Returns `(a, b)` with `b` 1-based.
/// Whitespace is only allowed around the sign between `An` and `B`.
pub(crate) fn parse_an_plus_b(raw: &str) -> Option<(i32, i32)> {
    let expression = raw.trim().to_ascii_lowercase();
    if expression.is_empty() {
        return None;
    }

    match expression.as_str() {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        _ => {}
    }

    if !expression.contains('n') {
        return expression.parse::<i32>().ok().map(|b| (0, b));
    }
    if expression.matches('n').count() != 1 {
        return None;
    }

    let (a_part, rest) = expression.split_once('n')?;
    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => a_part.parse::<i32>().ok()?,
    };

    let rest = rest.trim_start();
    if rest.is_empty() {
        return Some((a, 0));
    }
    let (sign, digits) = if let Some(digits) = rest.strip_prefix('+') {
        (1, digits)
    } else if let Some(digits) = rest.strip_prefix('-') {
        (-1, digits)
    } else {
        return None;
    };
    let digits = digits.trim_start();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let b = digits.parse::<i32>().ok()?;
    Some((a, sign * b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_an_plus_b_keywords() {
        assert_eq!(parse_an_plus_b("odd"), Some((2, 1)));
        assert_eq!(parse_an_plus_b("EVEN"), Some((2, 0)));
    }

    #[test]
    fn test_an_plus_b_forms() {
        assert_eq!(parse_an_plus_b("3"), Some((0, 3)));
        assert_eq!(parse_an_plus_b("+5"), Some((0, 5)));
        assert_eq!(parse_an_plus_b("n"), Some((1, 0)));
        assert_eq!(parse_an_plus_b("-n+3"), Some((-1, 3)));
        assert_eq!(parse_an_plus_b("2n+1"), Some((2, 1)));
        assert_eq!(parse_an_plus_b("3n - 2"), Some((3, -2)));
        assert_eq!(parse_an_plus_b("-2n"), Some((-2, 0)));
    }

    #[test]
    fn test_an_plus_b_rejects_garbage() {
        assert_eq!(parse_an_plus_b(""), None);
        assert_eq!(parse_an_plus_b("foo"), None);
        assert_eq!(parse_an_plus_b("2nn"), None);
        assert_eq!(parse_an_plus_b("2n+"), None);
        assert_eq!(parse_an_plus_b("2n3"), None);
    }

    #[test]
    fn test_an_plus_b_whitespace_only_around_binary_sign() {
        assert_eq!(parse_an_plus_b(" 2n + 1 "), Some((2, 1)));
        assert_eq!(parse_an_plus_b("2n +1"), Some((2, 1)));
        assert_eq!(parse_an_plus_b("-n- 2"), Some((-1, -2)));
        assert_eq!(parse_an_plus_b("- n+3"), None);
        assert_eq!(parse_an_plus_b("+ 5"), None);
        assert_eq!(parse_an_plus_b("2 n"), None);
        assert_eq!(parse_an_plus_b("2n + - 1"), None);
    }
}
