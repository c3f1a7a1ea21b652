//! [§ 13 The Input Pseudo-classes](https://www.w3.org/TR/selectors-4/#input-pseudos)
//!
//! Element semantics follow [HTML § 4.16.3 Pseudo-classes](https://html.spec.whatwg.org/multipage/semantics-other.html#pseudo-classes)
//! and [§ 4.10.21 Constraints](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#constraints).

use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::branch::StatePseudo;
use crate::context::MatchContext;
use crate::tree::Tree;
use crate::walk;

/// Every `type` keyword; anything else is the Text state.
const INPUT_TYPES: &[&str] = &[
    "hidden",
    "text",
    "search",
    "tel",
    "url",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
    "range",
    "color",
    "checkbox",
    "radio",
    "file",
    "submit",
    "image",
    "reset",
    "button",
];

/// Types to which `pattern`, `maxlength` and `minlength` apply.
const TEXT_TYPES: &[&str] = &["text", "search", "url", "tel", "email", "password"];

/// Types to which `readonly` applies.
const READONLY_TYPES: &[&str] = &[
    "text",
    "search",
    "url",
    "tel",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
];

/// Types to which `required` applies.
const REQUIRED_TYPES: &[&str] = &[
    "text",
    "search",
    "url",
    "tel",
    "email",
    "password",
    "date",
    "month",
    "week",
    "time",
    "datetime-local",
    "number",
    "checkbox",
    "radio",
    "file",
];

/// Types to which `placeholder` applies.
const PLACEHOLDER_TYPES: &[&str] = &["text", "search", "url", "tel", "email", "password", "number"];

/// Types with range limitations through `min` and `max`.
const RANGE_TYPES: &[&str] = &["date", "month", "week", "time", "datetime-local", "number", "range"];

/// Types barred from constraint validation.
const BARRED_TYPES: &[&str] = &["hidden", "reset", "button"];

/// Elements that can be disabled.
const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "optgroup", "option", "fieldset"];

/// Tolerance when checking that a number lies on a step.
const STEP_EPSILON: f64 = 1e-7;

/// [HTML § 4.10.5.1.5](https://html.spec.whatwg.org/multipage/input.html#valid-e-mail-address)
static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

/// [HTML § 4.10.21.3 The constraint validation API](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#validitystate)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
struct Validity {
    value_missing: bool,
    type_mismatch: bool,
    pattern_mismatch: bool,
    too_long: bool,
    too_short: bool,
    range_underflow: bool,
    range_overflow: bool,
    step_mismatch: bool,
}

impl Validity {
    fn is_valid(self) -> bool {
        !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow
            || self.step_mismatch)
    }
}

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    pub(super) fn match_form_state(&self, state: StatePseudo, node: T::Node) -> bool {
        match state {
            StatePseudo::Enabled => self.can_be_disabled(node) && !self.is_disabled(node),
            StatePseudo::Disabled => self.can_be_disabled(node) && self.is_disabled(node),
            StatePseudo::Checked => self.is_checked(node),
            StatePseudo::Indeterminate => self.is_indeterminate(node),
            StatePseudo::Default => self.is_default(node),
            StatePseudo::Required => self.supports_required(node) && self.has_attr(node, "required"),
            StatePseudo::Optional => self.supports_required(node) && !self.has_attr(node, "required"),
            StatePseudo::ReadWrite => self.is_read_write(node),
            StatePseudo::ReadOnly => !self.is_read_write(node),
            StatePseudo::PlaceholderShown => self.is_placeholder_shown(node),
            StatePseudo::Valid => self.match_validity(node, true),
            StatePseudo::Invalid => self.match_validity(node, false),
            StatePseudo::InRange => self.range_state(node).is_some_and(|(under, over)| !under && !over),
            StatePseudo::OutOfRange => self.range_state(node).is_some_and(|(under, over)| under || over),
            _ => false,
        }
    }

    fn has_attr(&self, node: T::Node, name: &str) -> bool {
        self.tree.attribute(node, name).is_some()
    }

    /// [HTML § 4.10.5 `type`](https://html.spec.whatwg.org/multipage/input.html#attr-input-type)
    /// state of an `input` element, lowercased; `None` for other elements.
    pub(crate) fn input_type(&self, node: T::Node) -> Option<String> {
        if !self.is_html(node, "input") {
            return None;
        }
        let declared = self
            .tree
            .attribute(node, "type")
            .map(|ty| ty.trim().to_ascii_lowercase())
            .filter(|ty| INPUT_TYPES.contains(&ty.as_str()));
        Some(declared.unwrap_or_else(|| "text".to_string()))
    }

    fn input_type_in(&self, node: T::Node, types: &[&str]) -> bool {
        self.input_type(node).is_some_and(|ty| types.contains(&ty.as_str()))
    }

    // ========== :enabled / :disabled ==========

    fn can_be_disabled(&self, node: T::Node) -> bool {
        DISABLEABLE.iter().any(|name| self.is_html(node, name))
    }

    /// [HTML § 4.10.18.5](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#concept-fe-disabled)
    fn is_disabled(&self, node: T::Node) -> bool {
        if self.is_html(node, "option") {
            return self.has_attr(node, "disabled")
                || self.tree.parent(node).is_some_and(|parent| {
                    self.is_html(parent, "optgroup") && self.has_attr(parent, "disabled")
                });
        }
        if self.is_html(node, "optgroup") {
            return self.has_attr(node, "disabled");
        }
        self.has_attr(node, "disabled") || self.disabled_by_fieldset(node)
    }

    /// "it is a descendant of a fieldset element whose disabled attribute is
    /// specified, and is not a descendant of that fieldset element's first
    /// legend element child, if any."
    fn disabled_by_fieldset(&self, node: T::Node) -> bool {
        let mut child = node;
        for ancestor in walk::inclusive_ancestors(self.tree, node).skip(1) {
            if self.is_html(ancestor, "fieldset") && self.has_attr(ancestor, "disabled") {
                let first_legend = walk::element_children(self.tree, ancestor)
                    .find(|&legend| self.is_html(legend, "legend"));
                if first_legend != Some(child) {
                    return true;
                }
            }
            child = ancestor;
        }
        false
    }

    // ========== :checked / :indeterminate / :default ==========

    fn is_checked(&self, node: T::Node) -> bool {
        match self.input_type(node).as_deref() {
            Some("checkbox" | "radio") => self.tree.checked(node),
            Some(_) => false,
            None => self.is_html(node, "option") && self.is_option_selected(node),
        }
    }

    /// The `select` an option belongs to, directly or through an `optgroup`.
    fn owner_select(&self, option: T::Node) -> Option<T::Node> {
        let parent = self.tree.parent(option)?;
        if self.is_html(parent, "select") {
            return Some(parent);
        }
        if self.is_html(parent, "optgroup") {
            return self.tree.parent(parent).filter(|&select| self.is_html(select, "select"));
        }
        None
    }

    /// [HTML § 4.10.7 list of options](https://html.spec.whatwg.org/multipage/form-elements.html#concept-select-option-list)
    fn select_options(&self, select: T::Node) -> Vec<T::Node> {
        let mut options = Vec::new();
        for child in walk::element_children(self.tree, select) {
            if self.is_html(child, "option") {
                options.push(child);
            } else if self.is_html(child, "optgroup") {
                options.extend(
                    walk::element_children(self.tree, child).filter(|&option| self.is_html(option, "option")),
                );
            }
        }
        options
    }

    fn display_size(&self, select: T::Node) -> usize {
        self.tree
            .attribute(select, "size")
            .and_then(|size| size.trim().parse::<usize>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(if self.has_attr(select, "multiple") { 4 } else { 1 })
    }

    /// Selectedness, including the implicit selection of a single-select
    /// `select` with nothing selected.
    fn is_option_selected(&self, option: T::Node) -> bool {
        let Some(select) = self.owner_select(option) else {
            return self.tree.selected(option);
        };
        if self.has_attr(select, "multiple") {
            return self.tree.selected(option);
        }
        let options = self.select_options(select);
        // At most one option of a single select is selected; the last wins.
        if let Some(&last) = options.iter().rev().find(|&&candidate| self.tree.selected(candidate)) {
            return last == option;
        }
        self.display_size(select) == 1
            && options.iter().find(|&&candidate| !self.is_disabled(candidate)) == Some(&option)
    }

    fn is_indeterminate(&self, node: T::Node) -> bool {
        match self.input_type(node).as_deref() {
            Some("checkbox") => self.tree.indeterminate(node),
            Some("radio") => !self
                .radio_group(node)
                .into_iter()
                .any(|radio| self.tree.checked(radio)),
            Some(_) => false,
            None => self.is_html(node, "progress") && !self.has_attr(node, "value"),
        }
    }

    /// [HTML § 4.10.21 form owner](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-owner)
    fn form_owner(&self, node: T::Node) -> Option<T::Node> {
        if let Some(id) = self.tree.attribute(node, "form") {
            let root = walk::root(self.tree, node);
            return self
                .tree
                .elements_by_id(root, id)
                .into_iter()
                .find(|&form| self.is_html(form, "form"));
        }
        walk::inclusive_ancestors(self.tree, node)
            .skip(1)
            .find(|&ancestor| self.is_html(ancestor, "form"))
    }

    /// [HTML § 4.10.5.1.18 radio button group](https://html.spec.whatwg.org/multipage/input.html#radio-button-group)
    fn radio_group(&self, node: T::Node) -> Vec<T::Node> {
        let Some(name) = self.tree.attribute(node, "name").filter(|name| !name.is_empty()) else {
            return vec![node];
        };
        let owner = self.form_owner(node);
        let root = walk::root(self.tree, node);
        let group: Vec<T::Node> = std::iter::once(root)
            .chain(walk::descendant_elements(self.tree, root))
            .filter(|&candidate| {
                self.input_type(candidate).as_deref() == Some("radio")
                    && self.tree.attribute(candidate, "name") == Some(name)
                    && self.form_owner(candidate) == owner
            })
            .collect();
        if group.is_empty() { vec![node] } else { group }
    }

    fn is_submit_button(&self, node: T::Node) -> bool {
        if self.is_html(node, "button") {
            return !self
                .tree
                .attribute(node, "type")
                .is_some_and(|ty| ty.eq_ignore_ascii_case("reset") || ty.eq_ignore_ascii_case("button"));
        }
        self.input_type_in(node, &["submit", "image"])
    }

    /// "Checkbox and radio input elements whose checked content attribute is
    /// present, option elements with a selected attribute, and the default
    /// button of a form."
    fn is_default(&self, node: T::Node) -> bool {
        if self.input_type_in(node, &["checkbox", "radio"]) {
            return self.has_attr(node, "checked");
        }
        if self.is_html(node, "option") {
            return self.is_default_option(node);
        }
        if !self.is_submit_button(node) {
            return false;
        }
        // [§ 4.10.22.2](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#default-button)
        // "the first submit button in tree order whose form owner is that form"
        let Some(form) = self.form_owner(node) else {
            return false;
        };
        let root = walk::root(self.tree, node);
        walk::descendant_elements(self.tree, root)
            .find(|&button| self.is_submit_button(button) && self.form_owner(button) == Some(form))
            == Some(node)
    }

    /// A single-select `select` has at most one default option: the first
    /// one in its list of options with a `selected` attribute.
    fn is_default_option(&self, option: T::Node) -> bool {
        if !self.has_attr(option, "selected") {
            return false;
        }
        match self.owner_select(option) {
            Some(select) if !self.has_attr(select, "multiple") => self
                .select_options(select)
                .into_iter()
                .find(|&candidate| self.has_attr(candidate, "selected"))
                == Some(option),
            _ => true,
        }
    }

    // ========== :required / :read-write / :placeholder-shown ==========

    fn supports_required(&self, node: T::Node) -> bool {
        self.input_type_in(node, REQUIRED_TYPES)
            || self.is_html(node, "select")
            || self.is_html(node, "textarea")
    }

    /// "input elements to which the readonly attribute applies, and that are
    /// mutable; textarea elements that do not have a readonly attribute, and
    /// that are not disabled; elements that are editing hosts or editable"
    fn is_read_write(&self, node: T::Node) -> bool {
        if let Some(ty) = self.input_type(node) {
            return READONLY_TYPES.contains(&ty.as_str())
                && !self.has_attr(node, "readonly")
                && !self.is_disabled(node);
        }
        if self.is_html(node, "textarea") {
            return !self.has_attr(node, "readonly") && !self.is_disabled(node);
        }
        self.is_editable(node)
    }

    /// [HTML § 6.8.1 contenteditable](https://html.spec.whatwg.org/multipage/interaction.html#attr-contenteditable)
    /// inherited from the nearest element with a valid keyword.
    fn is_editable(&self, node: T::Node) -> bool {
        for element in walk::inclusive_ancestors(self.tree, node).filter(|&n| self.is_html_element(n)) {
            match self
                .tree
                .attribute(element, "contenteditable")
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("" | "true" | "plaintext-only") => return true,
                Some("false") => return false,
                _ => {}
            }
        }
        false
    }

    fn is_placeholder_shown(&self, node: T::Node) -> bool {
        (self.input_type_in(node, PLACEHOLDER_TYPES) || self.is_html(node, "textarea"))
            && self.has_attr(node, "placeholder")
            && self.tree.value(node).is_empty()
    }

    // ========== :valid / :invalid ==========

    /// [HTML § 4.10.21.1 barred from constraint validation](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#barred-from-constraint-validation)
    fn is_candidate(&self, node: T::Node) -> bool {
        let barred_by_type = match self.input_type(node) {
            Some(ty) => {
                BARRED_TYPES.contains(&ty.as_str())
                    || (READONLY_TYPES.contains(&ty.as_str()) && self.has_attr(node, "readonly"))
            }
            None if self.is_html(node, "button") => !self.is_submit_button(node),
            None if self.is_html(node, "textarea") => self.has_attr(node, "readonly"),
            None => !self.is_html(node, "select"),
        };
        !barred_by_type
            && !self.is_disabled(node)
            && !walk::inclusive_ancestors(self.tree, node)
                .skip(1)
                .any(|ancestor| self.is_html(ancestor, "datalist"))
    }

    fn validity(&self, node: T::Node) -> Option<Validity> {
        if !self.is_candidate(node) {
            return None;
        }
        let mut validity = Validity::default();
        let required = self.has_attr(node, "required");

        if let Some(ty) = self.input_type(node) {
            self.input_validity(node, &ty, required, &mut validity);
        } else if self.is_html(node, "textarea") {
            let value = self.tree.value(node);
            validity.value_missing = required && value.is_empty();
            self.length_validity(node, &value, &mut validity);
        } else if self.is_html(node, "select") {
            validity.value_missing = required && self.select_value_missing(node);
        }
        Some(validity)
    }

    fn input_validity(&self, node: T::Node, ty: &str, required: bool, validity: &mut Validity) {
        let value = self.tree.value(node);
        let required = required && REQUIRED_TYPES.contains(&ty);
        let multiple_emails = ty == "email" && self.has_attr(node, "multiple");

        validity.value_missing = match ty {
            "checkbox" => required && !self.tree.checked(node),
            // "If an element in the radio button group is required, and all of
            // the input elements in the radio button group have a checkedness
            // that is false, then the element is suffering from being missing."
            "radio" => {
                let group = self.radio_group(node);
                group.iter().any(|&radio| self.has_attr(radio, "required"))
                    && !group.iter().any(|&radio| self.tree.checked(radio))
            }
            _ => required && value.is_empty(),
        };
        if value.is_empty() {
            return;
        }

        let values: Vec<&str> = if multiple_emails {
            value.split(',').map(str::trim).collect()
        } else {
            vec![value.as_str()]
        };
        match ty {
            "email" => validity.type_mismatch = values.iter().any(|email| !is_valid_email(email)),
            "url" => validity.type_mismatch = !is_absolute_url(&value),
            _ => {}
        }

        if TEXT_TYPES.contains(&ty) {
            if let Some(pattern) = self.tree.attribute(node, "pattern") {
                validity.pattern_mismatch = pattern_mismatch(pattern, &values);
            }
            self.length_validity(node, &value, validity);
        }

        if let Some(number) = parse_for_type(ty, value.trim()) {
            if let Some((under, over)) = self.range_limits(node, ty, number) {
                validity.range_underflow = under;
                validity.range_overflow = over;
            }
            validity.step_mismatch = matches!(ty, "number" | "range") && self.step_mismatch(node, number);
        }
    }

    fn length_validity(&self, node: T::Node, value: &str, validity: &mut Validity) {
        let length = value.chars().count();
        let limit = |name: &str| {
            self.tree
                .attribute(node, name)
                .and_then(|limit| limit.trim().parse::<usize>().ok())
        };
        validity.too_long = limit("maxlength").is_some_and(|max| length > max);
        validity.too_short = limit("minlength").is_some_and(|min| length > 0 && length < min);
    }

    /// [HTML § 4.10.7](https://html.spec.whatwg.org/multipage/form-elements.html#placeholder-label-option)
    /// A required select suffers from being missing when nothing is selected,
    /// or only its placeholder label option.
    fn select_value_missing(&self, select: T::Node) -> bool {
        let options = self.select_options(select);
        let selected: Vec<T::Node> = options
            .iter()
            .copied()
            .filter(|&option| self.is_option_selected(option))
            .collect();
        if selected.is_empty() {
            return true;
        }
        if self.has_attr(select, "multiple") || self.display_size(select) != 1 {
            return false;
        }
        let placeholder = options.first().copied().filter(|&option| {
            self.tree.parent(option) == Some(select) && self.option_value(option).is_empty()
        });
        placeholder.is_some_and(|placeholder| selected == [placeholder])
    }

    fn option_value(&self, option: T::Node) -> String {
        match self.tree.attribute(option, "value") {
            Some(value) => value.to_string(),
            None => walk::text_content(self.tree, option)
                .split_ascii_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Forms and fieldsets aggregate the validity of the controls they hold.
    fn match_validity(&self, node: T::Node, valid: bool) -> bool {
        let members: Option<Vec<T::Node>> = if self.is_html(node, "form") {
            let root = walk::root(self.tree, node);
            Some(
                walk::descendant_elements(self.tree, root)
                    .filter(|&control| self.form_owner(control) == Some(node))
                    .collect(),
            )
        } else if self.is_html(node, "fieldset") {
            Some(walk::descendant_elements(self.tree, node).collect())
        } else {
            None
        };

        match members {
            Some(members) => {
                let any_invalid = members
                    .into_iter()
                    .any(|member| self.validity(member).is_some_and(|validity| !validity.is_valid()));
                any_invalid != valid
            }
            None => self.validity(node).is_some_and(|validity| validity.is_valid() == valid),
        }
    }

    // ========== :in-range / :out-of-range ==========

    /// Underflow and overflow of a candidate with range limitations; `None`
    /// when the element has none.
    fn range_state(&self, node: T::Node) -> Option<(bool, bool)> {
        let ty = self.input_type(node)?;
        if !RANGE_TYPES.contains(&ty.as_str()) || !self.is_candidate(node) {
            return None;
        }
        let value = self.tree.value(node);
        match parse_for_type(&ty, value.trim()) {
            Some(number) => self.range_limits(node, &ty, number),
            None => self.range_bounds(node, &ty).map(|_| (false, false)),
        }
    }

    /// `min` and `max` as numbers; `None` when neither applies. Range
    /// controls default to 0 and 100.
    fn range_bounds(&self, node: T::Node, ty: &str) -> Option<(Option<f64>, Option<f64>)> {
        let limit = |name: &str| {
            self.tree
                .attribute(node, name)
                .and_then(|limit| parse_for_type(ty, limit.trim()))
        };
        let (mut min, mut max) = (limit("min"), limit("max"));
        if ty == "range" {
            min = min.or(Some(0.0));
            max = max.or(Some(100.0));
        }
        (min.is_some() || max.is_some()).then_some((min, max))
    }

    fn range_limits(&self, node: T::Node, ty: &str, number: f64) -> Option<(bool, bool)> {
        let (min, max) = self.range_bounds(node, ty)?;
        // [§ 4.10.5.1.9](https://html.spec.whatwg.org/multipage/input.html#has-a-reversed-range)
        // A reversed time range wraps around midnight.
        if let (Some(min), Some(max)) = (min, max)
            && ty == "time"
            && min > max
        {
            let out = number < min && number > max;
            return Some((out, out));
        }
        Some((
            min.is_some_and(|min| number < min),
            max.is_some_and(|max| number > max),
        ))
    }

    /// [HTML § 4.10.5.3.8 step](https://html.spec.whatwg.org/multipage/input.html#attr-input-step)
    fn step_mismatch(&self, node: T::Node, number: f64) -> bool {
        let step = match self.tree.attribute(node, "step").map(str::trim) {
            Some(step) if step.eq_ignore_ascii_case("any") => return false,
            Some(step) => parse_number(step).filter(|&step| step > 0.0).unwrap_or(1.0),
            None => 1.0,
        };
        let base = ["min", "value"]
            .iter()
            .find_map(|name| self.tree.attribute(node, name).and_then(|v| parse_number(v.trim())))
            .unwrap_or(0.0);
        let steps = (number - base) / step;
        (steps - steps.round()).abs() > STEP_EPSILON
    }
}

fn is_valid_email(email: &str) -> bool {
    EMAIL
        .as_ref()
        .is_some_and(|regex| regex.is_match(email).unwrap_or(false))
}

fn is_absolute_url(url: &str) -> bool {
    url.trim().split_once(':').is_some_and(|(scheme, rest)| {
        !rest.is_empty()
            && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// "the pattern attribute ... must match the entire value, not just any
/// subset"; an invalid pattern is ignored.
fn pattern_mismatch(pattern: &str, values: &[&str]) -> bool {
    let Ok(regex) = Regex::new(&format!("^(?:{pattern})$")) else {
        return false;
    };
    values.iter().any(|value| !regex.is_match(value).unwrap_or(true))
}

/// Parse a value in the microsyntax of the input type, as a number that
/// orders the same way.
#[allow(clippy::cast_precision_loss)]
fn parse_for_type(ty: &str, value: &str) -> Option<f64> {
    match ty {
        "number" | "range" => parse_number(value),
        "date" => parse_date(value).map(day_number),
        "month" => parse_month(value).map(|(year, month)| (year - 1970) as f64 * 12.0 + f64::from(month - 1)),
        "week" => parse_week(value),
        "time" => parse_time(value),
        "datetime-local" => parse_datetime_local(value),
        _ => None,
    }
}

/// [HTML § 2.3.4.3 valid floating-point number](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#valid-floating-point-number)
fn parse_number(value: &str) -> Option<f64> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let mantissa = unsigned.split(['e', 'E']).next().unwrap_or_default();
    let well_formed = !mantissa.is_empty()
        && !mantissa.ends_with('.')
        && mantissa.chars().any(|c| c.is_ascii_digit())
        && unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && !unsigned.starts_with(['+', '-']);
    if !well_formed {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn all_digits(value: &str, len: usize) -> Option<u32> {
    (value.len() == len && value.chars().all(|c| c.is_ascii_digit()))
        .then(|| value.parse().ok())
        .flatten()
}

fn parse_year(value: &str) -> Option<i64> {
    (value.len() >= 4 && value.chars().all(|c| c.is_ascii_digit()))
        .then(|| value.parse::<i64>().ok())
        .flatten()
        .filter(|&year| year > 0)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 of a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month = i64::from(month);
    let day_of_year = (153 * (if month > 2 { month - 3 } else { month + 9 }) + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

#[allow(clippy::cast_precision_loss)]
fn day_number((year, month, day): (i64, u32, u32)) -> f64 {
    days_from_civil(year, month, day) as f64
}

fn parse_month(value: &str) -> Option<(i64, u32)> {
    let (year, month) = value.rsplit_once('-')?;
    let year = parse_year(year)?;
    let month = all_digits(month, 2).filter(|month| (1..=12).contains(month))?;
    Some((year, month))
}

fn parse_date(value: &str) -> Option<(i64, u32, u32)> {
    let (year_month, day) = value.rsplit_once('-')?;
    let (year, month) = parse_month(year_month)?;
    let day = all_digits(day, 2).filter(|&day| day >= 1 && day <= days_in_month(year, month))?;
    Some((year, month, day))
}

/// Days since the epoch of the Monday starting the week.
#[allow(clippy::cast_precision_loss)]
fn parse_week(value: &str) -> Option<f64> {
    let (year, week) = value.split_once("-W")?;
    let year = parse_year(year)?;
    let week = all_digits(week, 2)?;

    let weekday = |days: i64| (days + 3).rem_euclid(7);
    let new_year = days_from_civil(year, 1, 1);
    let weeks_in_year = if weekday(new_year) == 3 || (weekday(new_year) == 2 && is_leap_year(year)) {
        53
    } else {
        52
    };
    if week == 0 || week > weeks_in_year {
        return None;
    }
    let fourth_of_january = days_from_civil(year, 1, 4);
    Some((fourth_of_january - weekday(fourth_of_january) + i64::from(week - 1) * 7) as f64)
}

/// Seconds since midnight.
fn parse_time(value: &str) -> Option<f64> {
    let mut parts = value.split(':');
    let hour = all_digits(parts.next()?, 2).filter(|&hour| hour < 24)?;
    let minute = all_digits(parts.next()?, 2).filter(|&minute| minute < 60)?;
    let second = match parts.next() {
        None => 0.0,
        Some(second) => {
            let (whole, fraction) = second.split_once('.').unwrap_or((second, ""));
            let whole = all_digits(whole, 2).filter(|&whole| whole < 60)?;
            if second.contains('.')
                && (fraction.is_empty() || fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()))
            {
                return None;
            }
            let fraction = if fraction.is_empty() {
                0.0
            } else {
                format!("0.{fraction}").parse::<f64>().ok()?
            };
            f64::from(whole) + fraction
        }
    };
    if parts.next().is_some() {
        return None;
    }
    Some(f64::from(hour * 3600 + minute * 60) + second)
}

fn parse_datetime_local(value: &str) -> Option<f64> {
    let (date, time) = value.split_once(['T', ' '])?;
    Some(day_number(parse_date(date)?) * 86_400.0 + parse_time(time)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("-.5"), Some(-0.5));
        assert_eq!(parse_number("2e3"), Some(2000.0));
        assert_eq!(parse_number("+1"), None);
        assert_eq!(parse_number("1."), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), Some((2024, 2, 29)));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("24-01-01"), None);
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2000, 3, 1), 11_017);
    }

    #[test]
    fn test_parse_week() {
        // 2020 has 53 ISO weeks; 2021 has 52.
        assert!(parse_week("2020-W53").is_some());
        assert!(parse_week("2021-W53").is_none());
        // 2021-W01 starts on Monday 2021-01-04.
        assert_eq!(parse_week("2021-W01"), Some(day_number((2021, 1, 4))));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("13:30"), Some(48_600.0));
        assert_eq!(parse_time("00:00:01.5"), Some(1.5));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("12:00:00."), None);
    }

    #[test]
    fn test_email_and_url() {
        assert!(is_valid_email("someone@example.com"));
        assert!(!is_valid_email("someone@"));
        assert!(is_absolute_url("https://example.com"));
        assert!(!is_absolute_url("example.com"));
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        assert!(!pattern_mismatch("[a-z]+", &["abc"]));
        assert!(pattern_mismatch("[a-z]+", &["abc1"]));
        assert!(!pattern_mismatch("(", &["abc"]));
    }
}
