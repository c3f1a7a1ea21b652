//! Tests for the four query operations, selector errors and Finder options.

use thicket_common::warning::{clear_warnings, warned};
use thicket_dom::{DomTree, ElementData, NodeId, NodeType};
use thicket_finder::{ErrorKind, FindOptions, Finder, TargetType};
use thicket_selector::SelectorList;

/// Helper building:
///
/// ```html
/// <html><body>
///   <div id="main" class="box">
///     <p class="note">one</p>
///     <p>two <span class="note">x</span></p>
///     <ul id="menu"><li>a</li><li class="active">b</li><li>c</li></ul>
///   </div>
///   <div class="box"><p class="note">three</p></div>
/// </body></html>
/// ```
struct Fixture {
    dom: DomTree,
    html: NodeId,
    body: NodeId,
    main: NodeId,
    p1: NodeId,
    p2: NodeId,
    span: NodeId,
    menu: NodeId,
    items: Vec<NodeId>,
    aside: NodeId,
    p3: NodeId,
}

fn fixture() -> Fixture {
    let mut dom = DomTree::new();
    let html = dom.append_html(NodeId::ROOT, "html", &[]);
    let body = dom.append_html(html, "body", &[]);
    let main = dom.append_html(body, "div", &[("id", "main"), ("class", "box")]);
    let p1 = dom.append_html(main, "p", &[("class", "note")]);
    let _ = dom.append_text(p1, "one");
    let p2 = dom.append_html(main, "p", &[]);
    let _ = dom.append_text(p2, "two ");
    let span = dom.append_html(p2, "span", &[("class", "note")]);
    let _ = dom.append_text(span, "x");
    let menu = dom.append_html(main, "ul", &[("id", "menu")]);
    let items = vec![
        dom.append_html(menu, "li", &[]),
        dom.append_html(menu, "li", &[("class", "active")]),
        dom.append_html(menu, "li", &[]),
    ];
    let aside = dom.append_html(body, "div", &[("class", "box")]);
    let p3 = dom.append_html(aside, "p", &[("class", "note")]);
    Fixture {
        dom,
        html,
        body,
        main,
        p1,
        p2,
        span,
        menu,
        items,
        aside,
        p3,
    }
}

fn options() -> FindOptions<NodeId> {
    FindOptions::default()
}

fn qsa(dom: &DomTree, selector: &str, node: NodeId) -> Vec<NodeId> {
    Finder::new()
        .query_selector_all(dom, selector, node, &options())
        .unwrap()
}

// ========== querySelectorAll ==========

#[test]
fn test_qsa_type_selector_in_tree_order() {
    let f = fixture();
    assert_eq!(qsa(&f.dom, "p", NodeId::ROOT), vec![f.p1, f.p2, f.p3]);
}

#[test]
fn test_qsa_selector_list_is_deduplicated_and_ordered() {
    let f = fixture();
    let found = qsa(&f.dom, ".note, p, #main", NodeId::ROOT);
    assert_eq!(found, vec![f.main, f.p1, f.p2, f.span, f.p3]);
}

#[test]
fn test_qsa_is_limited_to_descendants() {
    let f = fixture();
    assert_eq!(qsa(&f.dom, ".note", f.main), vec![f.p1, f.span]);
    assert_eq!(qsa(&f.dom, "div", f.main), Vec::<NodeId>::new());
}

#[test]
fn test_qsa_combinators() {
    let f = fixture();
    assert_eq!(qsa(&f.dom, "#main > p", NodeId::ROOT), vec![f.p1, f.p2]);
    assert_eq!(qsa(&f.dom, "div p", NodeId::ROOT), vec![f.p1, f.p2, f.p3]);
    assert_eq!(qsa(&f.dom, ".note + p", NodeId::ROOT), vec![f.p2]);
    assert_eq!(qsa(&f.dom, ".note ~ ul", NodeId::ROOT), vec![f.menu]);
    assert_eq!(qsa(&f.dom, "#menu li", NodeId::ROOT), f.items);
    assert_eq!(qsa(&f.dom, "li.active ~ li", NodeId::ROOT), vec![f.items[2]]);
    assert_eq!(qsa(&f.dom, "body > div > p.note", NodeId::ROOT), vec![f.p1, f.p3]);
}

#[test]
fn test_qsa_scope_anchors_at_context() {
    let f = fixture();
    assert_eq!(qsa(&f.dom, ":scope > p", f.main), vec![f.p1, f.p2]);
    assert_eq!(qsa(&f.dom, ":scope > .box", f.body), vec![f.main, f.aside]);
}

#[test]
fn test_qsa_combinator_may_reach_outside_context() {
    let f = fixture();
    // Ancestors of the context node still satisfy the left-hand side.
    assert_eq!(qsa(&f.dom, "body .note", f.main), vec![f.p1, f.span]);
}

#[test]
fn test_query_selector_is_first_of_all() {
    let f = fixture();
    for selector in ["p", ".note", "div p, li", "#menu > li", "span, #main", "li:last-child"] {
        let all = qsa(&f.dom, selector, NodeId::ROOT);
        let first = Finder::new()
            .query_selector(&f.dom, selector, NodeId::ROOT, &options())
            .unwrap();
        assert_eq!(first, all.first().copied(), "selector {selector:?}");
    }
}

#[test]
fn test_query_selector_without_match() {
    let f = fixture();
    let found = Finder::new()
        .query_selector(&f.dom, "table", NodeId::ROOT, &options())
        .unwrap();
    assert_eq!(found, None);
}

#[test]
fn test_qsa_from_fragment() {
    let mut dom = DomTree::new();
    let fragment = dom.create_fragment();
    let a = dom.append_html(fragment, "a", &[]);
    let b = dom.append_html(a, "b", &[]);
    assert_eq!(qsa(&dom, "a, b", fragment), vec![a, b]);
    assert_eq!(qsa(&dom, "a > b", fragment), vec![b]);
}

// ========== matches / closest ==========

#[test]
fn test_matches() {
    let f = fixture();
    let mut finder = Finder::new();
    assert_eq!(finder.matches(&f.dom, "div#main.box", f.main, &options()), Ok(true));
    assert_eq!(finder.matches(&f.dom, "body > .box", f.main, &options()), Ok(true));
    assert_eq!(finder.matches(&f.dom, "span", f.main, &options()), Ok(false));
    assert_eq!(finder.matches(&f.dom, "p, li.active", f.items[1], &options()), Ok(true));
    assert_eq!(finder.matches(&f.dom, "html", f.html, &options()), Ok(true));
}

#[test]
fn test_matches_scope_is_the_element() {
    let f = fixture();
    let mut finder = Finder::new();
    assert_eq!(finder.matches(&f.dom, ":scope", f.p1, &options()), Ok(true));
    assert_eq!(finder.matches(&f.dom, "#main > :scope", f.p1, &options()), Ok(true));
}

#[test]
fn test_closest() {
    let f = fixture();
    let mut finder = Finder::new();
    assert_eq!(finder.closest(&f.dom, "div", f.span, &options()), Ok(Some(f.main)));
    assert_eq!(finder.closest(&f.dom, "p, ul", f.span, &options()), Ok(Some(f.p2)));
    assert_eq!(finder.closest(&f.dom, "span", f.span, &options()), Ok(Some(f.span)));
    assert_eq!(finder.closest(&f.dom, "body > div", f.span, &options()), Ok(Some(f.main)));
    assert_eq!(finder.closest(&f.dom, "table", f.span, &options()), Ok(None));
}

// ========== errors ==========

#[test]
fn test_unknown_pseudo_class_is_syntax_error() {
    let f = fixture();
    let err = Finder::new()
        .query_selector_all(&f.dom, "p:foobar()", NodeId::ROOT, &options())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().starts_with("SyntaxError"));
}

#[test]
fn test_malformed_selector_is_syntax_error() {
    let f = fixture();
    for selector in ["", "p >", "[", "a,,b", ":nth-child(foo)", "> p"] {
        let err = Finder::new()
            .query_selector(&f.dom, selector, NodeId::ROOT, &options())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "selector {selector:?}");
    }
}

#[test]
fn test_wrong_node_kind_is_type_error() {
    let mut f = fixture();
    let text = f.dom.append_text(f.p3, "three");
    let mut finder = Finder::new();

    let err = finder.matches(&f.dom, "p", text, &options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    let err = finder.closest(&f.dom, "p", NodeId::ROOT, &options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    let err = finder.query_selector_all(&f.dom, "p", text, &options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn test_find_before_setup_is_type_error() {
    let f = fixture();
    let finder = Finder::new();
    let err = finder.find(&f.dom, TargetType::All).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

// ========== options ==========

#[test]
fn test_forgive_turns_unknown_into_non_match() {
    let f = fixture();
    let forgiving = FindOptions {
        forgive: true,
        ..options()
    };
    let mut finder = Finder::new();
    assert_eq!(
        finder.query_selector_all(&f.dom, "p:foobar()", NodeId::ROOT, &forgiving),
        Ok(Vec::new())
    );
    assert_eq!(
        finder.query_selector_all(&f.dom, "li.active, p::foo", NodeId::ROOT, &forgiving),
        Ok(vec![f.items[1]])
    );
}

#[test]
fn test_forgive_does_not_hide_grammar_errors() {
    let f = fixture();
    let forgiving = FindOptions {
        forgive: true,
        ..options()
    };
    let err = Finder::new()
        .query_selector(&f.dom, "p >", NodeId::ROOT, &forgiving)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_noexcept_swallows_every_error() {
    let mut f = fixture();
    let text = f.dom.append_text(f.p3, "three");
    let quiet = FindOptions {
        noexcept: true,
        ..options()
    };
    let mut finder = Finder::new();
    assert_eq!(finder.query_selector_all(&f.dom, "p >", NodeId::ROOT, &quiet), Ok(Vec::new()));
    assert_eq!(finder.query_selector(&f.dom, ":foobar", NodeId::ROOT, &quiet), Ok(None));
    assert_eq!(finder.matches(&f.dom, "p", text, &quiet), Ok(false));
    assert_eq!(finder.closest(&f.dom, "p", NodeId::ROOT, &quiet), Ok(None));
}

#[test]
fn test_warn_reports_forgiven_and_unsupported_selectors() {
    clear_warnings();
    let f = fixture();
    let loud = FindOptions {
        warn: true,
        forgive: true,
        ..options()
    };
    let mut finder = Finder::new();
    assert_eq!(finder.query_selector_all(&f.dom, "p:bogus", NodeId::ROOT, &loud), Ok(Vec::new()));
    assert!(warned("Selector", "Ignoring unknown pseudo-class :bogus"));

    assert_eq!(finder.query_selector_all(&f.dom, "a:visited", NodeId::ROOT, &loud), Ok(Vec::new()));
    assert!(warned("Selector", "NotSupportedError: Unsupported pseudo-class :visited"));
}

#[test]
fn test_no_warning_without_warn_option() {
    let f = fixture();
    let forgiving = FindOptions {
        forgive: true,
        ..options()
    };
    let _ = Finder::new().query_selector_all(&f.dom, "p:quietly-ignored", NodeId::ROOT, &forgiving);
    assert!(!warned("Selector", "Ignoring unknown pseudo-class :quietly-ignored"));
}

#[test]
fn test_invalidate_sees_mutations() {
    let mut f = fixture();
    let mut finder = Finder::new();
    let first = finder
        .query_selector_all(&f.dom, "li:first-child", NodeId::ROOT, &options())
        .unwrap();
    assert_eq!(first, vec![f.items[0]]);

    let inserted = f.dom.alloc(NodeType::Element(ElementData::html("li")));
    f.dom.insert_before(f.menu, inserted, f.items[0]);
    let fresh = FindOptions {
        invalidate: true,
        ..options()
    };
    let again = finder
        .query_selector_all(&f.dom, "li:first-child", NodeId::ROOT, &fresh)
        .unwrap();
    assert_eq!(again, vec![inserted]);
}

#[test]
fn test_repeated_queries_reuse_session() {
    let f = fixture();
    let mut finder = Finder::new();
    for _ in 0..3 {
        assert_eq!(
            finder.query_selector_all(&f.dom, "#main .note", NodeId::ROOT, &options()),
            Ok(vec![f.p1, f.span])
        );
    }
    assert_eq!(
        finder.query_selector_all(&f.dom, "#main .note", f.p2, &options()),
        Ok(vec![f.span])
    );
}

// ========== setup / find ==========

#[test]
fn test_setup_and_find_targets() {
    let f = fixture();
    let mut finder = Finder::new();
    finder.setup(&f.dom, ".note", NodeId::ROOT, &options()).unwrap();
    assert_eq!(finder.find(&f.dom, TargetType::All), Ok(vec![f.p1, f.span, f.p3]));
    assert_eq!(finder.find(&f.dom, TargetType::First), Ok(vec![f.p1]));

    finder.setup(&f.dom, ".box", f.span, &options()).unwrap();
    assert_eq!(finder.find(&f.dom, TargetType::Lineal), Ok(vec![f.main]));
    assert_eq!(finder.find(&f.dom, TargetType::Itself), Ok(Vec::new()));
}

#[test]
fn test_setup_ast_from_json() {
    let f = fixture();
    let list: SelectorList = serde_json::from_str(
        r#"{"children":[{"type":"Selector","children":[
            {"type":"IdSelector","name":"menu"},
            {"type":"Combinator","name":">"},
            {"type":"TypeSelector","name":"li"},
            {"type":"ClassSelector","name":"active"}
        ]}]}"#,
    )
    .unwrap();
    let mut finder = Finder::new();
    finder.setup_ast(&f.dom, &list, NodeId::ROOT, &options()).unwrap();
    assert_eq!(finder.find(&f.dom, TargetType::All), Ok(vec![f.items[1]]));
}

#[test]
fn test_target_type_display() {
    assert_eq!(TargetType::Itself.to_string(), "self");
    assert_eq!(TargetType::Lineal.to_string(), "lineal");
    assert_eq!(TargetType::All.to_string(), "all");
}

// ========== leaves ==========

#[test]
fn test_attribute_selectors() {
    let mut dom = DomTree::new();
    let root = dom.append_html(NodeId::ROOT, "div", &[]);
    let a = dom.append_html(root, "a", &[("href", "https://example.com/a.pdf"), ("rel", "nofollow noopener")]);
    let b = dom.append_html(root, "a", &[("href", "/b.html"), ("lang", "en-US")]);
    let c = dom.append_html(root, "a", &[("title", "")]);

    assert_eq!(qsa(&dom, "[href]", NodeId::ROOT), vec![a, b]);
    assert_eq!(qsa(&dom, "[href^='https:']", NodeId::ROOT), vec![a]);
    assert_eq!(qsa(&dom, "[href$='.pdf']", NodeId::ROOT), vec![a]);
    assert_eq!(qsa(&dom, "[href*=example]", NodeId::ROOT), vec![a]);
    assert_eq!(qsa(&dom, "[rel~=noopener]", NodeId::ROOT), vec![a]);
    assert_eq!(qsa(&dom, "[lang|=en]", NodeId::ROOT), vec![b]);
    assert_eq!(qsa(&dom, "[title='']", NodeId::ROOT), vec![c]);
    assert_eq!(qsa(&dom, "[title^='']", NodeId::ROOT), Vec::<NodeId>::new());
}

#[test]
fn test_attribute_value_case() {
    let mut dom = DomTree::new();
    let root = dom.append_html(NodeId::ROOT, "div", &[]);
    let input = dom.append_html(root, "input", &[("type", "text"), ("data-x", "abc")]);

    // `type` is compared case-insensitively in HTML documents.
    assert_eq!(qsa(&dom, "[type=TEXT]", NodeId::ROOT), vec![input]);
    assert_eq!(qsa(&dom, "[type=TEXT s]", NodeId::ROOT), Vec::<NodeId>::new());
    assert_eq!(qsa(&dom, "[data-x=ABC]", NodeId::ROOT), Vec::<NodeId>::new());
    assert_eq!(qsa(&dom, "[data-x=ABC i]", NodeId::ROOT), vec![input]);
}

#[test]
fn test_type_selector_case() {
    let mut html = DomTree::new();
    let div = html.append_html(NodeId::ROOT, "div", &[]);
    assert_eq!(qsa(&html, "DIV", NodeId::ROOT), vec![div]);

    let mut xml = DomTree::new_xml();
    let item = xml.append_element(NodeId::ROOT, ElementData::new(None, "Item"));
    assert_eq!(qsa(&xml, "Item", NodeId::ROOT), vec![item]);
    assert_eq!(qsa(&xml, "item", NodeId::ROOT), Vec::<NodeId>::new());
}

#[test]
fn test_namespace_constraints() {
    let mut dom = DomTree::new();
    let root = dom.append_html(NodeId::ROOT, "div", &[]);
    let plain = dom.append_element(root, ElementData::new(None, "item"));
    let svg = dom.append_element(root, ElementData::new(Some("http://www.w3.org/2000/svg"), "svg"));

    assert_eq!(qsa(&dom, "|item", NodeId::ROOT), vec![plain]);
    assert_eq!(qsa(&dom, "*|svg", NodeId::ROOT), vec![svg]);
    assert_eq!(qsa(&dom, "svg|svg", NodeId::ROOT), vec![svg]);
}

#[test]
fn test_universal_selector() {
    let f = fixture();
    let all = qsa(&f.dom, "*", f.menu);
    assert_eq!(all, f.items);
    assert_eq!(qsa(&f.dom, "#main > *", NodeId::ROOT), vec![f.p1, f.p2, f.menu]);
}
