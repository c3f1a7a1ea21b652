//! Selector AST to branches.
//!
//! Splits every comma alternative on its combinators, resolves each simple
//! selector to a [`Leaf`] once, and enforces the structural rules the grammar
//! alone cannot express (no `:has()` inside `:has()`, compound-only `:host()`
//! arguments, bounded nesting).

use std::{fmt, mem};

use thicket_common::warning::warn_once;
use thicket_selector::{AnPlusB, Component, PseudoArgument, Selector, SelectorList};

use crate::branch::{
    AttributeLeaf, AttributeOperator, Branch, CaseSensitivity, Combinator, Leaf,
    NamespaceConstraint, NthLeaf, PseudoClass, RelativeBranch, StatePseudo, TextDirection, Twig,
    TypeLeaf,
};
use crate::error::FinderError;
use crate::{COMPONENT, MAX_NESTING_DEPTH};

/// Pseudo-elements that may be written with a single colon.
///
/// [§ 3.6.1](https://www.w3.org/TR/selectors-4/#pseudo-elements) "For
/// compatibility with existing style sheets, user agents must also accept the
/// previous one-colon notation for pseudo-elements introduced in CSS levels 1
/// and 2 (namely, :first-line, :first-letter, :before, and :after)."
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["after", "before", "first-letter", "first-line"];

/// Pseudo-elements that parse but select nothing in the element tree.
const KNOWN_PSEUDO_ELEMENTS: &[&str] = &[
    "after",
    "backdrop",
    "before",
    "cue",
    "cue-region",
    "file-selector-button",
    "first-letter",
    "first-line",
    "grammar-error",
    "highlight",
    "marker",
    "part",
    "placeholder",
    "selection",
    "slotted",
    "spelling-error",
    "target-text",
];

/// Pseudo-classes that are recognized but never match. `:visited` is always
/// false so that link history cannot be sniffed; the rest depend on state a
/// static tree does not have.
const UNSUPPORTED_PSEUDO_CLASSES: &[&str] = &[
    "autofill",
    "blank",
    "buffering",
    "current",
    "fullscreen",
    "future",
    "modal",
    "muted",
    "nth-col",
    "nth-last-col",
    "past",
    "paused",
    "picture-in-picture",
    "playing",
    "popover-open",
    "seeking",
    "stalled",
    "state",
    "user-invalid",
    "user-valid",
    "visited",
    "volume-locked",
];

/// Options that affect compilation.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CompileOptions {
    /// Report unsupported and forgiven selectors.
    pub warn: bool,
    /// Turn unknown pseudo-classes and pseudo-elements into non-matching leaves.
    pub forgive: bool,
}

/// Where in the selector the compiler currently is.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    /// Inside a `:has()` argument.
    in_has: bool,
    /// Directly inside a forgiving list (`:is()`, `:where()`).
    forgiving: bool,
    /// Anywhere below a forgiving list.
    in_forgiving: bool,
    /// Selector-list nesting depth.
    depth: usize,
}

impl Scope {
    const fn nested(self, forgiving: bool) -> Self {
        Self {
            in_has: self.in_has,
            forgiving,
            in_forgiving: self.in_forgiving || forgiving,
            depth: self.depth + 1,
        }
    }
}

/// Compile a parsed selector list. `text` is the source used in messages.
pub(crate) fn compile(
    list: &SelectorList,
    text: &str,
    options: CompileOptions,
) -> Result<Vec<Branch>, FinderError> {
    if list.is_empty() {
        return Err(FinderError::invalid_selector(text, &"empty selector list"));
    }
    let mut compiler = Compiler {
        text,
        options,
        next_id: 0,
        forgiven: None,
    };
    compiler.compile_list(list, Scope::default())
}

struct Compiler<'a> {
    text: &'a str,
    options: CompileOptions,
    next_id: usize,
    /// First unknown name met in the forgiving argument being compiled.
    forgiven: Option<String>,
}

impl Compiler<'_> {
    fn syntax(&self, reason: &dyn fmt::Display) -> FinderError {
        FinderError::invalid_selector(self.text, reason)
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn compile_list(&mut self, list: &SelectorList, scope: Scope) -> Result<Vec<Branch>, FinderError> {
        if scope.depth > MAX_NESTING_DEPTH {
            return Err(self.syntax(&"selector nesting is too deep"));
        }
        if !scope.forgiving {
            return list
                .children
                .iter()
                .map(|selector| self.compile_branch(&selector.children, scope))
                .collect();
        }
        list.children
            .iter()
            .map(|selector| self.compile_forgiving_branch(&selector.children, scope))
            .collect()
    }

    /// [§ 3.8 Forgiving Selector Parsing](https://www.w3.org/TR/selectors-4/#forgiving-selector)
    /// "Invalid selectors in the list are ignored": an argument containing an
    /// unknown name at any depth becomes a branch that never matches.
    fn compile_forgiving_branch(&mut self, components: &[Component], scope: Scope) -> Result<Branch, FinderError> {
        let outer = self.forgiven.take();
        let compiled = self.compile_branch(components, scope);
        let forgiven = mem::replace(&mut self.forgiven, outer);
        let branch = compiled?;
        Ok(match forgiven {
            Some(display) => Branch {
                id: branch.id,
                twigs: vec![Twig {
                    combinator: None,
                    leaves: vec![Leaf::Unknown(display)],
                }],
                volatile: false,
            },
            None => branch,
        })
    }

    /// Split one complex selector on its combinators.
    fn compile_branch(&mut self, components: &[Component], scope: Scope) -> Result<Branch, FinderError> {
        let mut twigs = Vec::new();
        let mut combinator = None;
        let mut leaves = Vec::new();
        let mut simple_count = 0usize;

        for component in components {
            if let Component::Combinator { name } = component {
                if simple_count == 0 {
                    return Err(self.syntax(&format!("unexpected combinator {name:?}")));
                }
                twigs.push(Twig {
                    combinator,
                    leaves: mem::take(&mut leaves),
                });
                simple_count = 0;
                combinator = Some(name.parse::<Combinator>().map_err(|err| self.syntax(&err))?);
            } else {
                leaves.extend(self.compile_component(component, scope)?);
                simple_count += 1;
            }
        }

        if simple_count == 0 {
            return Err(self.syntax(&"expected a compound selector"));
        }
        twigs.push(Twig { combinator, leaves });

        let volatile = twigs
            .iter()
            .any(|twig| twig.leaves.iter().any(Leaf::is_volatile));
        Ok(Branch {
            id: self.next_id(),
            twigs,
            volatile,
        })
    }

    /// [§ 4.4 Relative selectors](https://www.w3.org/TR/selectors-4/#relative)
    fn compile_relative(&mut self, selector: &Selector, scope: Scope) -> Result<RelativeBranch, FinderError> {
        let (anchor, rest) = match selector.children.split_first() {
            Some((Component::Combinator { name }, rest)) => {
                (name.parse::<Combinator>().map_err(|err| self.syntax(&err))?, rest)
            }
            _ => (Combinator::Descendant, selector.children.as_slice()),
        };
        Ok(RelativeBranch {
            anchor,
            branch: self.compile_branch(rest, scope)?,
        })
    }

    fn compile_component(&mut self, component: &Component, scope: Scope) -> Result<Vec<Leaf>, FinderError> {
        let leaf = match component {
            Component::TypeSelector { name } => {
                let (namespace, local) = NamespaceConstraint::split(name);
                Leaf::Type(TypeLeaf {
                    namespace,
                    local_name: (local != "*").then(|| local.to_string()),
                })
            }
            Component::ClassSelector { name } => Leaf::Class(name.clone()),
            Component::IdSelector { name } => Leaf::Id(name.clone()),
            Component::AttributeSelector {
                name,
                matcher,
                value,
                flags,
            } => Leaf::Attribute(self.compile_attribute(name, matcher.as_deref(), value.as_deref(), flags.as_deref())?),
            Component::PseudoClassSelector { name, children } => {
                return self.compile_pseudo_class(name, children.as_deref(), scope);
            }
            Component::PseudoElementSelector { name, .. } => {
                return self.compile_pseudo_element(name, scope);
            }
            Component::Combinator { name } => {
                return Err(self.syntax(&format!("unexpected combinator {name:?}")));
            }
        };
        Ok(vec![leaf])
    }

    fn compile_attribute(
        &self,
        name: &str,
        matcher: Option<&str>,
        value: Option<&str>,
        flags: Option<&str>,
    ) -> Result<AttributeLeaf, FinderError> {
        let (namespace, local) = NamespaceConstraint::split(name);
        let operator = match (matcher, value) {
            (None, _) => AttributeOperator::Exists,
            (Some(matcher), Some(value)) => {
                let value = value.to_string();
                match matcher {
                    "=" => AttributeOperator::Equals(value),
                    "~=" => AttributeOperator::Includes(value),
                    "|=" => AttributeOperator::DashMatch(value),
                    "^=" => AttributeOperator::Prefix(value),
                    "$=" => AttributeOperator::Suffix(value),
                    "*=" => AttributeOperator::Substring(value),
                    other => return Err(self.syntax(&format!("unknown attribute matcher {other:?}"))),
                }
            }
            (Some(matcher), None) => {
                return Err(self.syntax(&format!("attribute matcher {matcher:?} without a value")));
            }
        };
        let case = match flags.map(str::to_ascii_lowercase).as_deref() {
            None => CaseSensitivity::Default,
            Some("i") => CaseSensitivity::AsciiInsensitive,
            Some("s") => CaseSensitivity::Sensitive,
            Some(other) => return Err(self.syntax(&format!("unknown attribute flag {other:?}"))),
        };
        Ok(AttributeLeaf {
            namespace,
            local_name: local.to_string(),
            operator,
            case,
        })
    }

    fn compile_pseudo_class(
        &mut self,
        name: &str,
        args: Option<&[PseudoArgument]>,
        scope: Scope,
    ) -> Result<Vec<Leaf>, FinderError> {
        if args.is_none() && LEGACY_PSEUDO_ELEMENTS.contains(&name) {
            return self.compile_pseudo_element(name, scope);
        }

        if let Ok(state) = name.parse::<StatePseudo>() {
            if args.is_some() {
                return Err(self.syntax(&format!(":{name} does not take arguments")));
            }
            return Ok(vec![Leaf::Pseudo(PseudoClass::State(state))]);
        }

        let pseudo = match name {
            "first-child" => self.nth(0, 1, false, false, None),
            "last-child" => self.nth(0, 1, true, false, None),
            "first-of-type" => self.nth(0, 1, false, true, None),
            "last-of-type" => self.nth(0, 1, true, true, None),
            // Only-child is first-child and last-child at once.
            "only-child" | "only-of-type" => {
                let of_type = name == "only-of-type";
                return Ok(vec![
                    Leaf::Pseudo(self.nth(0, 1, false, of_type, None)),
                    Leaf::Pseudo(self.nth(0, 1, true, of_type, None)),
                ]);
            }
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                let Some([PseudoArgument::AnPlusB(AnPlusB { a, b, selector })]) = args else {
                    return Err(self.syntax(&format!(":{name}() requires an An+B argument")));
                };
                let of = match selector {
                    Some(list) if list.is_empty() => {
                        return Err(self.syntax(&format!(":{name}() has an empty 'of' list")));
                    }
                    Some(list) => Some(self.compile_list(list, scope.nested(false))?),
                    None => None,
                };
                self.nth(*a, *b, name.contains("-last-"), name.ends_with("-of-type"), of)
            }
            "is" | "where" => {
                let list = self.selector_list_argument(name, args)?;
                let branches = self.compile_list(list, scope.nested(true))?;
                if name == "is" {
                    PseudoClass::Is(branches)
                } else {
                    PseudoClass::Where(branches)
                }
            }
            "not" => {
                let list = self.non_empty_list_argument(name, args)?;
                PseudoClass::Not(self.compile_list(list, scope.nested(false))?)
            }
            "has" => {
                if scope.in_has {
                    return Err(self.syntax(&":has() cannot be nested inside :has()"));
                }
                let list = self.non_empty_list_argument(name, args)?;
                let inner = Scope {
                    in_has: true,
                    ..scope.nested(false)
                };
                if inner.depth > MAX_NESTING_DEPTH {
                    return Err(self.syntax(&"selector nesting is too deep"));
                }
                let relatives = list
                    .children
                    .iter()
                    .map(|selector| self.compile_relative(selector, inner))
                    .collect::<Result<Vec<_>, _>>()?;
                PseudoClass::Has(relatives)
            }
            "host" if args.is_none() => PseudoClass::Host(None),
            "host" | "host-context" => {
                let list = self.non_empty_list_argument(name, args)?;
                if list
                    .children
                    .iter()
                    .any(|selector| selector.children.iter().any(Component::is_combinator))
                {
                    return Err(self.syntax(&format!(":{name}() takes a compound selector")));
                }
                let branches = self.compile_list(list, scope.nested(false))?;
                if name == "host" {
                    PseudoClass::Host(Some(branches))
                } else {
                    PseudoClass::HostContext(branches)
                }
            }
            "lang" => PseudoClass::Lang(self.language_ranges(self.raw_argument(name, args)?)?),
            "dir" => {
                let raw = self.raw_argument(name, args)?;
                let direction = raw
                    .parse::<TextDirection>()
                    .map_err(|_| self.syntax(&format!(":dir({raw}) expects ltr or rtl")))?;
                PseudoClass::Dir(direction)
            }
            _ if UNSUPPORTED_PSEUDO_CLASSES.contains(&name) => {
                self.not_supported(&format!("pseudo-class :{name}"));
                PseudoClass::Unsupported(name.to_string())
            }
            _ => {
                let display = if args.is_some() {
                    format!(":{name}()")
                } else {
                    format!(":{name}")
                };
                return self.unknown("pseudo-class", display, scope);
            }
        };
        Ok(vec![Leaf::Pseudo(pseudo)])
    }

    fn compile_pseudo_element(&mut self, name: &str, scope: Scope) -> Result<Vec<Leaf>, FinderError> {
        if KNOWN_PSEUDO_ELEMENTS.contains(&name) {
            self.not_supported(&format!("pseudo-element ::{name}"));
            return Ok(vec![Leaf::PseudoElement(name.to_string())]);
        }
        self.unknown("pseudo-element", format!("::{name}"), scope)
    }

    fn nth(&mut self, a: i32, b: i32, reverse: bool, of_type: bool, of: Option<Vec<Branch>>) -> PseudoClass {
        PseudoClass::Nth(NthLeaf {
            id: self.next_id(),
            a,
            b,
            reverse,
            of_type,
            of,
        })
    }

    fn selector_list_argument<'s>(
        &self,
        name: &str,
        args: Option<&'s [PseudoArgument]>,
    ) -> Result<&'s SelectorList, FinderError> {
        match args {
            Some([PseudoArgument::SelectorList(list)]) => Ok(list),
            _ => Err(self.syntax(&format!(":{name}() requires a selector list"))),
        }
    }

    fn non_empty_list_argument<'s>(
        &self,
        name: &str,
        args: Option<&'s [PseudoArgument]>,
    ) -> Result<&'s SelectorList, FinderError> {
        let list = self.selector_list_argument(name, args)?;
        if list.is_empty() {
            return Err(self.syntax(&format!(":{name}() requires an argument")));
        }
        Ok(list)
    }

    fn raw_argument<'s>(&self, name: &str, args: Option<&'s [PseudoArgument]>) -> Result<&'s str, FinderError> {
        match args {
            Some([PseudoArgument::Raw { value }]) if !value.trim().is_empty() => Ok(value.trim()),
            _ => Err(self.syntax(&format!(":{name}() requires an argument"))),
        }
    }

    /// [§ 8.2](https://www.w3.org/TR/selectors-4/#the-lang-pseudo) "The :lang()
    /// pseudo-class takes a comma-separated list of one or more language ranges
    /// as its argument. Each language range in :lang() must be a valid CSS
    /// <ident> or <string>."
    fn language_ranges(&self, raw: &str) -> Result<Vec<String>, FinderError> {
        raw.split(',')
            .map(|range| {
                let range = range.trim();
                let unquoted = range
                    .strip_prefix('"')
                    .and_then(|r| r.strip_suffix('"'))
                    .or_else(|| range.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')));
                match unquoted {
                    Some(quoted) => Ok(quoted.to_string()),
                    None if range.is_empty() => Err(self.syntax(&":lang() has an empty range")),
                    None => Ok(range.replace('\\', "")),
                }
            })
            .collect()
    }

    fn not_supported(&self, what: &str) {
        if self.options.warn {
            let err = FinderError::NotSupported(format!("Unsupported {what}"));
            warn_once(COMPONENT, &err.to_string());
        }
    }

    /// Unknown names void the enclosing forgiving argument, become a
    /// non-matching leaf under `forgive`, and are a syntax error otherwise.
    fn unknown(&mut self, kind: &str, display: String, scope: Scope) -> Result<Vec<Leaf>, FinderError> {
        if scope.in_forgiving || self.options.forgive {
            if self.options.warn {
                warn_once(COMPONENT, &format!("Ignoring unknown {kind} {display}"));
            }
            if scope.in_forgiving && self.forgiven.is_none() {
                self.forgiven = Some(display.clone());
            }
            return Ok(vec![Leaf::Unknown(display)]);
        }
        Err(FinderError::Syntax(format!("Unknown {kind} {display}")))
    }
}

#[cfg(test)]
mod tests {
    use thicket_selector::parse_selector;

    use super::*;

    fn compile_str(text: &str) -> Result<Vec<Branch>, FinderError> {
        compile(&parse_selector(text)?, text, CompileOptions::default())
    }

    #[test]
    fn test_splits_on_combinators() {
        let branches = compile_str("ul > li.a b").unwrap();
        assert_eq!(branches.len(), 1);
        let twigs = &branches[0].twigs;
        assert_eq!(twigs.len(), 3);
        assert_eq!(twigs[0].combinator, None);
        assert_eq!(twigs[1].combinator, Some(Combinator::Child));
        assert!(twigs[1].is_compound());
        assert_eq!(twigs[2].combinator, Some(Combinator::Descendant));
    }

    #[test]
    fn test_branch_ids_are_unique() {
        let branches = compile_str("a, :is(b, c), d").unwrap();
        let mut ids: Vec<usize> = branches.iter().map(|b| b.id).collect();
        if let Leaf::Pseudo(PseudoClass::Is(inner)) = &branches[1].twigs[0].leaves[0] {
            ids.extend(inner.iter().map(|b| b.id));
        }
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert_eq!(count, 5);
    }

    #[test]
    fn test_only_child_expands_to_two_leaves() {
        let branches = compile_str(":only-child").unwrap();
        assert_eq!(branches[0].twigs[0].leaves.len(), 2);
    }

    #[test]
    fn test_nested_has_rejected() {
        assert!(matches!(compile_str(":has(:has(a))"), Err(FinderError::Syntax(_))));
        assert!(matches!(compile_str(":has(:is(:has(a)))"), Err(FinderError::Syntax(_))));
        assert!(matches!(compile_str(":has(:not(b :has(a)))"), Err(FinderError::Syntax(_))));
        assert!(compile_str(":has(a):has(b)").is_ok());
    }

    #[test]
    fn test_host_argument_must_be_compound() {
        assert!(compile_str(":host(div > p)").is_err());
        assert!(compile_str(":host-context()").is_err());
        assert!(compile_str(":host(.a)").is_ok());
    }

    #[test]
    fn test_volatile_branches() {
        let branches = compile_str("a:hover, b, :is(c:focus) d").unwrap();
        let flags: Vec<bool> = branches.iter().map(|b| b.volatile).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_unknown_pseudo_class() {
        assert!(matches!(compile_str(":foobar"), Err(FinderError::Syntax(_))));
        // Inside :is() the branch is kept as a never-matching leaf.
        assert!(compile_str(":is(:foobar, a)").is_ok());

        // Deeper inside :is() the whole argument is voided, not just the leaf.
        let branches = compile_str(":is(:not(:foobar), a)").unwrap();
        let Leaf::Pseudo(PseudoClass::Is(inner)) = &branches[0].twigs[0].leaves[0] else {
            panic!("expected :is()");
        };
        assert_eq!(inner[0].twigs.len(), 1);
        assert_eq!(inner[0].twigs[0].leaves, vec![Leaf::Unknown(":foobar".to_string())]);
        assert!(matches!(compile_str(":not(:is(:has(:has(a))))"), Err(FinderError::Syntax(_))));

        let list = parse_selector(":foobar()").unwrap();
        let options = CompileOptions {
            warn: false,
            forgive: true,
        };
        let branches = compile(&list, ":foobar()", options).unwrap();
        assert_eq!(
            branches[0].twigs[0].leaves,
            vec![Leaf::Unknown(":foobar()".to_string())]
        );
    }

    #[test]
    fn test_pseudo_elements() {
        let branches = compile_str("p::before, p:after").unwrap();
        assert_eq!(
            branches[0].twigs[0].leaves[1],
            Leaf::PseudoElement("before".to_string())
        );
        assert_eq!(
            branches[1].twigs[0].leaves[1],
            Leaf::PseudoElement("after".to_string())
        );
        assert!(compile_str("p::nonsense").is_err());
    }

    #[test]
    fn test_nesting_depth_limit() {
        let deep = format!("{}a{}", ":is(".repeat(MAX_NESTING_DEPTH + 1), ")".repeat(MAX_NESTING_DEPTH + 1));
        assert!(compile_str(&deep).is_err());
        let shallow = format!("{}a{}", ":is(".repeat(4), ")".repeat(4));
        assert!(compile_str(&shallow).is_ok());
    }

    #[test]
    fn test_lang_ranges() {
        let branches = compile_str(r#":lang(en, "de-*")"#).unwrap();
        assert_eq!(
            branches[0].twigs[0].leaves[0],
            Leaf::Pseudo(PseudoClass::Lang(vec!["en".to_string(), "de-*".to_string()]))
        );
    }
}
