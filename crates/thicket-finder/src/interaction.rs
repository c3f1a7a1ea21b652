//! UI interaction state behind `:hover`, `:active`, `:focus`,
//! `:focus-visible` and `:focus-within`.
//!
//! [§ 9 User Action Pseudo-classes](https://www.w3.org/TR/selectors-4/#useraction-pseudos)
//!
//! A Finder subscribes [`InteractionState::handle`] to the tree's UI events and
//! keeps the resulting state across setups. Only trusted events change it.

use crate::branch::StatePseudo;
use crate::context::MatchContext;
use crate::tree::{Tree, UiEvent, UiEventKind};
use crate::walk;

/// Input types whose activation by pointer does not show a focus ring.
const POINTER_INPUT_TYPES: &[&str] = &[
    "button", "checkbox", "color", "file", "image", "radio", "range", "reset", "submit",
];

/// The input device most recently used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// Mouse, pen or touch.
    Pointer,
    /// Keyboard.
    Keyboard,
}

/// Tracked interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState<N> {
    modality: Modality,
    focused: Option<N>,
    focus_visible: bool,
    hovered: Option<N>,
    pressed: Option<N>,
}

impl<N> Default for InteractionState<N> {
    fn default() -> Self {
        Self {
            modality: Modality::Keyboard,
            focused: None,
            focus_visible: false,
            hovered: None,
            pressed: None,
        }
    }
}

impl<N: Copy + Eq> InteractionState<N> {
    /// Fresh state: nothing hovered, pressed or focused; keyboard modality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state machine with one event. Untrusted events are ignored.
    pub fn handle(&mut self, event: &UiEvent<N>) {
        if !event.trusted {
            return;
        }
        match event.kind {
            UiEventKind::KeyDown => {
                self.modality = Modality::Keyboard;
                if event.key.as_deref() == Some("Tab") && self.focused.is_some() {
                    self.focus_visible = true;
                }
            }
            UiEventKind::KeyUp => {}
            UiEventKind::MouseDown => {
                if event.primary_button() {
                    self.modality = Modality::Pointer;
                    self.pressed = Some(event.target);
                    self.focus_visible = false;
                }
            }
            UiEventKind::MouseUp => self.pressed = None,
            UiEventKind::MouseOver => self.hovered = Some(event.target),
            UiEventKind::MouseOut => {
                if self.hovered == Some(event.target) {
                    self.hovered = None;
                }
            }
            UiEventKind::Focus => {
                self.focused = Some(event.target);
                self.focus_visible = self.modality == Modality::Keyboard;
            }
            UiEventKind::Blur => {
                if self.focused == Some(event.target) {
                    self.focused = None;
                    self.focus_visible = false;
                }
            }
        }
    }

    /// The input device most recently used.
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// The element that last received focus.
    pub fn focused(&self) -> Option<N> {
        self.focused
    }

    /// Whether the focused element should show a focus indicator.
    pub fn focus_visible(&self) -> bool {
        self.focus_visible
    }

    /// The element under the pointer.
    pub fn hovered(&self) -> Option<N> {
        self.hovered
    }

    /// The element the primary button went down on.
    pub fn pressed(&self) -> Option<N> {
        self.pressed
    }
}

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    pub(crate) fn match_interaction(&self, state: StatePseudo, node: T::Node) -> bool {
        match state {
            // [§ 9.2](https://www.w3.org/TR/selectors-4/#the-hover-pseudo)
            // "An element also matches :hover if one of its descendants ... matches :hover."
            StatePseudo::Hover => self
                .hover_target()
                .is_some_and(|target| self.is_flat_inclusive_ancestor(node, target)),
            // [§ 9.3](https://www.w3.org/TR/selectors-4/#the-active-pseudo)
            StatePseudo::Active => self
                .active_target()
                .is_some_and(|target| self.is_flat_inclusive_ancestor(node, target)),
            // [§ 9.4](https://www.w3.org/TR/selectors-4/#the-focus-pseudo)
            StatePseudo::Focus => self.focus_target(node) == Some(node),
            // [§ 9.5](https://www.w3.org/TR/selectors-4/#the-focus-visible-pseudo)
            StatePseudo::FocusVisible => {
                self.focus_target(node) == Some(node) && self.shows_focus_ring(node)
            }
            // [§ 9.6](https://www.w3.org/TR/selectors-4/#the-focus-within-pseudo)
            StatePseudo::FocusWithin => self
                .focus_target(node)
                .is_some_and(|focused| self.is_flat_inclusive_ancestor(node, focused)),
            _ => false,
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors, crossing from
    /// shadow roots to their hosts.
    fn is_flat_inclusive_ancestor(&self, ancestor: T::Node, node: T::Node) -> bool {
        node == ancestor || walk::flat_element_ancestors(self.tree, node).any(|a| a == ancestor)
    }

    fn hover_target(&self) -> Option<T::Node> {
        match self.event {
            Some(event) if event.kind == UiEventKind::MouseOver => Some(event.target),
            Some(event) if event.kind == UiEventKind::MouseOut => None,
            _ => self.interaction.hovered(),
        }
    }

    fn active_target(&self) -> Option<T::Node> {
        match self.event {
            Some(event) if event.kind == UiEventKind::MouseDown && event.primary_button() => {
                Some(event.target)
            }
            Some(event) if event.kind == UiEventKind::MouseUp => None,
            _ => self.interaction.pressed(),
        }
    }

    fn focus_target(&self, node: T::Node) -> Option<T::Node> {
        match self.event {
            Some(event) if event.kind == UiEventKind::Focus => Some(event.target),
            Some(event) if event.kind == UiEventKind::Blur => None,
            _ => self
                .tree
                .active_element(node)
                .or_else(|| self.interaction.focused()),
        }
    }

    /// [§ 9.5](https://www.w3.org/TR/selectors-4/#the-focus-visible-pseudo)
    /// "If the user interacts with the page via keyboard, the currently focused
    /// element should match :focus-visible"; text fields always do.
    fn shows_focus_ring(&self, node: T::Node) -> bool {
        let keyboard = self.event.and_then(|event| match event.kind {
            UiEventKind::KeyDown | UiEventKind::KeyUp => Some(true),
            UiEventKind::MouseDown | UiEventKind::MouseUp => Some(false),
            _ => None,
        });
        keyboard.unwrap_or_else(|| self.interaction.focus_visible()) || !self.is_pointer_control(node)
    }

    /// Controls whose pointer activation does not need a focus indicator.
    fn is_pointer_control(&self, node: T::Node) -> bool {
        if let Some(ty) = self.input_type(node) {
            return POINTER_INPUT_TYPES.contains(&ty.as_str());
        }
        ["button", "summary", "select"].iter().any(|name| self.is_html(node, name))
            || ((self.is_html(node, "a") || self.is_html(node, "area"))
                && self.tree.attribute(node, "href").is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: UiEventKind, target: u32) -> UiEvent<u32> {
        UiEvent::new(kind, target)
    }

    #[test]
    fn test_initial_state() {
        let state = InteractionState::<u32>::new();
        assert_eq!(state.modality(), Modality::Keyboard);
        assert_eq!(state.focused(), None);
        assert!(!state.focus_visible());
    }

    #[test]
    fn test_pointer_focus_is_not_visible() {
        let mut state = InteractionState::new();
        state.handle(&event(UiEventKind::MouseDown, 3).with_buttons(1));
        state.handle(&event(UiEventKind::Focus, 3));
        assert_eq!(state.modality(), Modality::Pointer);
        assert_eq!(state.pressed(), Some(3));
        assert_eq!(state.focused(), Some(3));
        assert!(!state.focus_visible());

        state.handle(&event(UiEventKind::MouseUp, 3));
        assert_eq!(state.pressed(), None);
    }

    #[test]
    fn test_tab_makes_focus_visible() {
        let mut state = InteractionState::new();
        state.handle(&event(UiEventKind::MouseDown, 3).with_buttons(1));
        state.handle(&event(UiEventKind::Focus, 3));
        state.handle(&event(UiEventKind::KeyDown, 3).with_key("Tab"));
        assert_eq!(state.modality(), Modality::Keyboard);
        assert!(state.focus_visible());
    }

    #[test]
    fn test_secondary_button_does_not_press() {
        let mut state = InteractionState::new();
        state.handle(&event(UiEventKind::MouseDown, 3).with_buttons(2));
        assert_eq!(state.pressed(), None);
        assert_eq!(state.modality(), Modality::Keyboard);
    }

    #[test]
    fn test_hover_tracking() {
        let mut state = InteractionState::new();
        state.handle(&event(UiEventKind::MouseOver, 4));
        assert_eq!(state.hovered(), Some(4));
        state.handle(&event(UiEventKind::MouseOut, 5));
        assert_eq!(state.hovered(), Some(4));
        state.handle(&event(UiEventKind::MouseOut, 4));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_untrusted_events_are_ignored() {
        let mut state = InteractionState::new();
        let mut over = event(UiEventKind::MouseOver, 4);
        over.trusted = false;
        state.handle(&over);
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_blur_clears_focus() {
        let mut state = InteractionState::new();
        state.handle(&event(UiEventKind::Focus, 7));
        assert!(state.focus_visible());
        state.handle(&event(UiEventKind::Blur, 7));
        assert_eq!(state.focused(), None);
        assert!(!state.focus_visible());
    }
}
