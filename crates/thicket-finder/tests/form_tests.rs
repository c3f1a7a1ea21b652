//! Tests for the input pseudo-classes: enabled state, checkedness, defaults,
//! mutability, validity and range.

use thicket_dom::{DomTree, NodeId};
use thicket_finder::{FindOptions, Finder};

fn qsa(dom: &DomTree, selector: &str) -> Vec<NodeId> {
    Finder::new()
        .query_selector_all(dom, selector, NodeId::ROOT, &FindOptions::default())
        .unwrap()
}

/// Helper creating a document with a single `<form>` under `<body>`.
fn form_document() -> (DomTree, NodeId) {
    let mut dom = DomTree::new();
    let html = dom.append_html(NodeId::ROOT, "html", &[]);
    let body = dom.append_html(html, "body", &[]);
    let form = dom.append_html(body, "form", &[]);
    (dom, form)
}

// ========== :enabled / :disabled ==========

#[test]
fn test_disabled_attribute_and_fieldset() {
    let (mut dom, form) = form_document();
    let fieldset = dom.append_html(form, "fieldset", &[("disabled", "")]);
    let legend = dom.append_html(fieldset, "legend", &[]);
    let in_legend = dom.append_html(legend, "input", &[]);
    let in_fieldset = dom.append_html(fieldset, "input", &[]);
    let outside = dom.append_html(form, "input", &[]);
    let own = dom.append_html(form, "button", &[("disabled", "")]);

    assert_eq!(qsa(&dom, ":disabled"), vec![fieldset, in_fieldset, own]);
    assert_eq!(qsa(&dom, ":enabled"), vec![in_legend, outside]);
    // Elements that cannot be disabled match neither.
    assert_eq!(qsa(&dom, "legend:enabled, legend:disabled"), Vec::<NodeId>::new());
}

#[test]
fn test_disabled_options() {
    let (mut dom, form) = form_document();
    let select = dom.append_html(form, "select", &[]);
    let group = dom.append_html(select, "optgroup", &[("disabled", "")]);
    let grouped = dom.append_html(group, "option", &[]);
    let plain = dom.append_html(select, "option", &[]);
    let own = dom.append_html(select, "option", &[("disabled", "")]);

    assert_eq!(qsa(&dom, "option:disabled"), vec![grouped, own]);
    assert_eq!(qsa(&dom, "option:enabled"), vec![plain]);
    assert_eq!(qsa(&dom, "optgroup:disabled"), vec![group]);
}

// ========== :checked / :default / :indeterminate ==========

#[test]
fn test_checked_follows_live_state() {
    let (mut dom, form) = form_document();
    let by_attr = dom.append_html(form, "input", &[("type", "checkbox"), ("checked", "")]);
    let by_state = dom.append_html(form, "input", &[("type", "checkbox")]);
    dom.set_checked(by_state, true);
    let unchecked = dom.append_html(form, "input", &[("type", "checkbox"), ("checked", "")]);
    dom.set_checked(unchecked, false);
    let _text = dom.append_html(form, "input", &[("checked", "")]);

    assert_eq!(qsa(&dom, ":checked"), vec![by_attr, by_state]);
    assert_eq!(qsa(&dom, ":default"), vec![by_attr, unchecked]);
}

#[test]
fn test_checked_options() {
    let (mut dom, form) = form_document();
    let single = dom.append_html(form, "select", &[]);
    let _first = dom.append_html(single, "option", &[]);
    let marked = dom.append_html(single, "option", &[("selected", "")]);
    let implicit = dom.append_html(form, "select", &[]);
    let skipped = dom.append_html(implicit, "option", &[("disabled", "")]);
    let first_enabled = dom.append_html(implicit, "option", &[]);
    let multiple = dom.append_html(form, "select", &[("multiple", "")]);
    let _none = dom.append_html(multiple, "option", &[]);

    assert_eq!(qsa(&dom, "option:checked"), vec![marked, first_enabled]);
    assert_eq!(qsa(&dom, "option:default"), vec![marked]);
    assert!(!qsa(&dom, "option:checked").contains(&skipped));
}

#[test]
fn test_last_selected_option_wins() {
    let (mut dom, form) = form_document();
    let select = dom.append_html(form, "select", &[]);
    let _a = dom.append_html(select, "option", &[("selected", "")]);
    let b = dom.append_html(select, "option", &[("selected", "")]);
    assert_eq!(qsa(&dom, "option:checked"), vec![b]);
}

#[test]
fn test_single_select_has_one_default_option() {
    let (mut dom, form) = form_document();
    let single = dom.append_html(form, "select", &[]);
    let group = dom.append_html(single, "optgroup", &[]);
    let grouped = dom.append_html(group, "option", &[("selected", "")]);
    let _later = dom.append_html(single, "option", &[("selected", "")]);
    let multiple = dom.append_html(form, "select", &[("multiple", "")]);
    let m1 = dom.append_html(multiple, "option", &[("selected", "")]);
    let m2 = dom.append_html(multiple, "option", &[("selected", "")]);

    assert_eq!(qsa(&dom, "option:default"), vec![grouped, m1, m2]);
}

#[test]
fn test_default_button_is_first_submit_of_form() {
    let (mut dom, form) = form_document();
    let _plain = dom.append_html(form, "button", &[("type", "button")]);
    let first = dom.append_html(form, "button", &[]);
    let _second = dom.append_html(form, "input", &[("type", "submit")]);
    let body = dom.parent(form).unwrap();
    let _orphan = dom.append_html(body, "button", &[]);

    assert_eq!(qsa(&dom, ":default"), vec![first]);
}

#[test]
fn test_indeterminate() {
    let (mut dom, form) = form_document();
    let checkbox = dom.append_html(form, "input", &[("type", "checkbox")]);
    dom.set_indeterminate(checkbox, true);
    let settled = dom.append_html(form, "input", &[("type", "checkbox")]);
    let r1 = dom.append_html(form, "input", &[("type", "radio"), ("name", "size")]);
    let r2 = dom.append_html(form, "input", &[("type", "radio"), ("name", "size")]);
    let c1 = dom.append_html(form, "input", &[("type", "radio"), ("name", "color"), ("checked", "")]);
    let c2 = dom.append_html(form, "input", &[("type", "radio"), ("name", "color")]);
    let busy = dom.append_html(form, "progress", &[]);
    let done = dom.append_html(form, "progress", &[("value", "1")]);

    let found = qsa(&dom, ":indeterminate");
    assert_eq!(found, vec![checkbox, r1, r2, busy]);
    for node in [settled, c1, c2, done] {
        assert!(!found.contains(&node));
    }
}

// ========== :required / :read-write / :placeholder-shown ==========

#[test]
fn test_required_and_optional() {
    let (mut dom, form) = form_document();
    let required = dom.append_html(form, "input", &[("required", "")]);
    let optional = dom.append_html(form, "input", &[]);
    let select = dom.append_html(form, "select", &[("required", "")]);
    let textarea = dom.append_html(form, "textarea", &[]);
    let _button = dom.append_html(form, "input", &[("type", "button"), ("required", "")]);
    let _div = dom.append_html(form, "div", &[("required", "")]);

    assert_eq!(qsa(&dom, ":required"), vec![required, select]);
    assert_eq!(qsa(&dom, ":optional"), vec![optional, textarea]);
}

#[test]
fn test_read_write_and_read_only() {
    let (mut dom, form) = form_document();
    let text = dom.append_html(form, "input", &[]);
    let readonly = dom.append_html(form, "input", &[("readonly", "")]);
    let disabled = dom.append_html(form, "input", &[("disabled", "")]);
    let checkbox = dom.append_html(form, "input", &[("type", "checkbox")]);
    let textarea = dom.append_html(form, "textarea", &[]);
    let editable = dom.append_html(form, "div", &[("contenteditable", "")]);
    let inner = dom.append_html(editable, "span", &[]);
    let frozen = dom.append_html(editable, "span", &[("contenteditable", "false")]);

    assert_eq!(qsa(&dom, "form :read-write"), vec![text, textarea, editable, inner]);
    let read_only = qsa(&dom, "form :read-only");
    for node in [readonly, disabled, checkbox, frozen] {
        assert!(read_only.contains(&node));
    }
}

#[test]
fn test_placeholder_shown() {
    let (mut dom, form) = form_document();
    let empty = dom.append_html(form, "input", &[("placeholder", "Name")]);
    let _prefilled = dom.append_html(form, "input", &[("placeholder", "Name"), ("value", "Ann")]);
    let typed = dom.append_html(form, "input", &[("placeholder", "Name")]);
    dom.set_value(typed, "Bo");
    let area = dom.append_html(form, "textarea", &[("placeholder", "Notes")]);
    let _checkbox = dom.append_html(form, "input", &[("type", "checkbox"), ("placeholder", "x")]);

    assert_eq!(qsa(&dom, ":placeholder-shown"), vec![empty, area]);
}

// ========== :valid / :invalid ==========

#[test]
fn test_validity_of_inputs() {
    let (mut dom, form) = form_document();
    let missing = dom.append_html(form, "input", &[("required", "")]);
    let bad_email = dom.append_html(form, "input", &[("type", "email"), ("value", "nope")]);
    let good_email = dom.append_html(form, "input", &[("type", "email"), ("value", "a@b.co")]);
    let bad_code = dom.append_html(form, "input", &[("pattern", "[0-9]{3}"), ("value", "12a")]);
    let good_code = dom.append_html(form, "input", &[("pattern", "[0-9]{3}"), ("value", "123")]);
    let bad_url = dom.append_html(form, "input", &[("type", "url"), ("value", "/relative")]);
    let good_url = dom.append_html(form, "input", &[("type", "url"), ("value", "https://example.com/")]);
    let _hidden = dom.append_html(form, "input", &[("type", "hidden"), ("required", "")]);

    assert_eq!(
        qsa(&dom, "input:invalid"),
        vec![missing, bad_email, bad_code, bad_url]
    );
    assert_eq!(qsa(&dom, "input:valid"), vec![good_email, good_code, good_url]);
}

#[test]
fn test_validity_follows_current_value() {
    let (mut dom, form) = form_document();
    let name = dom.append_html(form, "input", &[("required", "")]);
    assert_eq!(qsa(&dom, ":invalid"), vec![form, name]);

    dom.set_value(name, "Ann");
    assert_eq!(qsa(&dom, ":invalid"), Vec::<NodeId>::new());
    assert_eq!(qsa(&dom, ":valid"), vec![form, name]);
}

#[test]
fn test_whitespace_value_is_not_missing() {
    let (mut dom, form) = form_document();
    let name = dom.append_html(form, "input", &[("required", ""), ("value", "   ")]);
    assert_eq!(qsa(&dom, "input:valid"), vec![name]);

    dom.set_value(name, "");
    assert_eq!(qsa(&dom, "input:invalid"), vec![name]);
}

#[test]
fn test_required_controls() {
    let (mut dom, form) = form_document();
    let checkbox = dom.append_html(form, "input", &[("type", "checkbox"), ("required", "")]);
    let r1 = dom.append_html(form, "input", &[("type", "radio"), ("name", "g"), ("required", "")]);
    let r2 = dom.append_html(form, "input", &[("type", "radio"), ("name", "g")]);
    let select = dom.append_html(form, "select", &[("required", "")]);
    let _placeholder = dom.append_html(select, "option", &[("value", "")]);
    let choice = dom.append_html(select, "option", &[("value", "x")]);
    let textarea = dom.append_html(form, "textarea", &[("required", "")]);

    assert_eq!(
        qsa(&dom, "form :invalid"),
        vec![checkbox, r1, r2, select, textarea]
    );

    dom.set_checked(checkbox, true);
    dom.set_checked(r2, true);
    let _ = dom.append_text(textarea, "hello");
    dom.set_selected(choice, true);
    assert_eq!(qsa(&dom, "form :invalid"), Vec::<NodeId>::new());
}

#[test]
fn test_fieldset_aggregates_validity() {
    let (mut dom, form) = form_document();
    let good = dom.append_html(form, "fieldset", &[]);
    let _ok = dom.append_html(good, "input", &[("value", "fine")]);
    let bad = dom.append_html(form, "fieldset", &[]);
    let _missing = dom.append_html(bad, "input", &[("required", "")]);

    assert_eq!(qsa(&dom, "fieldset:valid"), vec![good]);
    assert_eq!(qsa(&dom, "fieldset:invalid"), vec![bad]);
    assert_eq!(qsa(&dom, "form:invalid"), vec![form]);
}

#[test]
fn test_barred_controls_have_no_validity() {
    let (mut dom, form) = form_document();
    let _disabled = dom.append_html(form, "input", &[("required", ""), ("disabled", "")]);
    let _readonly = dom.append_html(form, "input", &[("required", ""), ("readonly", "")]);
    let _reset = dom.append_html(form, "input", &[("type", "reset")]);
    let _button = dom.append_html(form, "button", &[("type", "button")]);

    assert_eq!(qsa(&dom, "form :valid, form :invalid"), Vec::<NodeId>::new());
    assert_eq!(qsa(&dom, "form:valid"), vec![form]);
}

// ========== :in-range / :out-of-range ==========

#[test]
fn test_number_range() {
    let (mut dom, form) = form_document();
    let inside = dom.append_html(form, "input", &[("type", "number"), ("min", "1"), ("max", "10"), ("value", "5")]);
    let above = dom.append_html(form, "input", &[("type", "number"), ("min", "1"), ("max", "10"), ("value", "11")]);
    let below = dom.append_html(form, "input", &[("type", "number"), ("min", "1"), ("value", "0")]);
    let blank = dom.append_html(form, "input", &[("type", "number"), ("max", "3")]);
    let _unbounded = dom.append_html(form, "input", &[("type", "number"), ("value", "99")]);
    let _text = dom.append_html(form, "input", &[("min", "1"), ("value", "0")]);

    assert_eq!(qsa(&dom, ":in-range"), vec![inside, blank]);
    assert_eq!(qsa(&dom, ":out-of-range"), vec![above, below]);
    let invalid = qsa(&dom, "input:invalid");
    assert!(invalid.contains(&above) && invalid.contains(&below));
}

#[test]
fn test_range_control_defaults() {
    let (mut dom, form) = form_document();
    let slider = dom.append_html(form, "input", &[("type", "range"), ("value", "50")]);
    let beyond = dom.append_html(form, "input", &[("type", "range"), ("value", "150")]);

    assert_eq!(qsa(&dom, ":in-range"), vec![slider]);
    assert_eq!(qsa(&dom, ":out-of-range"), vec![beyond]);
}

#[test]
fn test_date_and_time_ranges() {
    let (mut dom, form) = form_document();
    let early = dom.append_html(
        form,
        "input",
        &[("type", "date"), ("min", "2024-01-01"), ("value", "2023-12-31")],
    );
    let late_shift = dom.append_html(
        form,
        "input",
        &[("type", "time"), ("min", "22:00"), ("max", "06:00"), ("value", "23:30")],
    );
    let midday = dom.append_html(
        form,
        "input",
        &[("type", "time"), ("min", "22:00"), ("max", "06:00"), ("value", "12:00")],
    );

    assert_eq!(qsa(&dom, ":out-of-range"), vec![early, midday]);
    assert_eq!(qsa(&dom, ":in-range"), vec![late_shift]);
}

#[test]
fn test_step_mismatch_is_invalid() {
    let (mut dom, form) = form_document();
    let aligned = dom.append_html(form, "input", &[("type", "number"), ("step", "0.5"), ("min", "0")]);
    dom.set_value(aligned, "1.5");
    let off = dom.append_html(form, "input", &[("type", "number"), ("step", "2"), ("min", "1")]);
    dom.set_value(off, "4");
    let any = dom.append_html(form, "input", &[("type", "number"), ("step", "any")]);
    dom.set_value(any, "0.333");

    assert_eq!(qsa(&dom, "input:invalid"), vec![off]);
    assert_eq!(qsa(&dom, "input:valid"), vec![aligned, any]);
}
