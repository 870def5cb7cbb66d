//! Search box buffering for multi-keystroke text composition (IME input).
//!
//! While a composition is open the typed text only lives in the local
//! buffer. The shareable location sees the text once the composition ends,
//! or straight away for plain input.

use super::LocationAdapter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    CompositionStart,
    Input(String),
    CompositionEnd(String),
}

#[derive(Clone, Debug, Default)]
pub struct SearchInput {
    buffer: String,
    composing: bool,
}

impl SearchInput {
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            composing: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Applies one input event. Returns the text to commit to the location,
    /// if any.
    pub fn handle(&mut self, event: InputEvent) -> Option<String> {
        match event {
            InputEvent::CompositionStart => {
                self.composing = true;
                None
            }
            InputEvent::Input(text) => {
                self.buffer = text;
                if self.composing {
                    None
                } else {
                    Some(self.buffer.clone())
                }
            }
            InputEvent::CompositionEnd(text) => {
                self.composing = false;
                self.buffer = text;
                Some(self.buffer.clone())
            }
        }
    }

    /// Follows an external location change (back/forward, pasted link).
    /// Ignored mid-composition so the user's partial text is not clobbered.
    pub fn sync_from(&mut self, query: &str) {
        if !self.composing && self.buffer != query {
            self.buffer = query.to_string();
        }
    }

    /// Feeds `event` through the buffer and replaces the location's search
    /// parameter when the event commits text.
    pub fn apply(&mut self, event: InputEvent, location: &mut LocationAdapter) -> bool {
        match self.handle(event) {
            Some(text) => {
                location.update(|s| s.query = text);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urlstate::{parse_base, RouteMode, ViewState};

    fn location() -> LocationAdapter {
        LocationAdapter::new(
            parse_base("https://example.com/").unwrap(),
            RouteMode::Path,
            &ViewState::default(),
        )
    }

    #[test]
    fn plain_input_commits_immediately() {
        let mut loc = location();
        let mut input = SearchInput::default();
        assert!(input.apply(InputEvent::Input("sa".to_string()), &mut loc));
        assert_eq!(loc.state().query, "sa");
    }

    #[test]
    fn composition_defers_commit_until_end() {
        let mut loc = location();
        let mut input = SearchInput::default();
        input.apply(InputEvent::CompositionStart, &mut loc);
        assert!(!input.apply(InputEvent::Input("s".to_string()), &mut loc));
        assert!(!input.apply(InputEvent::Input("さ".to_string()), &mut loc));
        assert_eq!(input.value(), "さ");
        assert_eq!(loc.state().query, "");
        assert!(loc.current().query().is_none());

        assert!(input.apply(InputEvent::CompositionEnd("坂".to_string()), &mut loc));
        assert!(!input.is_composing());
        assert_eq!(loc.state().query, "坂");
        assert_eq!(loc.history_len(), 1);
    }

    #[test]
    fn external_sync_waits_for_composition() {
        let mut input = SearchInput::new("a");
        input.handle(InputEvent::CompositionStart);
        input.handle(InputEvent::Input("か".to_string()));
        input.sync_from("");
        assert_eq!(input.value(), "か");
        input.handle(InputEvent::CompositionEnd("花".to_string()));
        input.sync_from("b");
        assert_eq!(input.value(), "b");
    }
}
