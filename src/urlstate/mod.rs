pub mod compose;

pub use compose::{InputEvent, SearchInput};

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;
use url::Url;

use crate::filter::MemberFilter;
use crate::model::Underlive;

pub const PARAM_QUERY: &str = "q";
pub const PARAM_GEN: &str = "gen";
pub const PARAM_GRADUATED: &str = "graduated";
pub const PARAM_ID: &str = "id";
pub const PARAM_ABSENT: &str = "absent";

const FLAG_ON: &str = "1";

#[derive(Debug, Error)]
pub enum UrlStateError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL '{url}' cannot be used as a base")]
    NotABase { url: String },

    #[error("unknown route mode '{value}', expected path or hash")]
    UnknownRouteMode { value: String },

    #[error("unknown tab '{value}', expected penlight, underlive or quiz")]
    UnknownTab { value: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Penlight,
    Underlive,
    Quiz,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Penlight, Tab::Underlive, Tab::Quiz];

    pub fn parse(value: &str) -> Result<Self, UrlStateError> {
        match value.trim().to_lowercase().as_str() {
            "penlight" | "" => Ok(Self::Penlight),
            "underlive" => Ok(Self::Underlive),
            "quiz" => Ok(Self::Quiz),
            other => Err(UrlStateError::UnknownTab {
                value: other.to_string(),
            }),
        }
    }

    /// Path or fragment segment for the tab. The default tab has none.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Penlight => "",
            Self::Underlive => "underlive",
            Self::Quiz => "quiz",
        }
    }

    /// Unknown segments route to the default tab.
    pub fn from_segment(segment: &str) -> Self {
        match segment.trim_matches('/') {
            "underlive" => Self::Underlive,
            "quiz" => Self::Quiz,
            _ => Self::Penlight,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Penlight => "penlight",
            Self::Underlive => "underlive",
            Self::Quiz => "quiz",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RouteMode {
    /// `/`, `/underlive`, `/quiz` with parameters in the query string.
    #[default]
    Path,
    /// `#/underlive?q=...`; the tab and parameters live in the fragment.
    Hash,
}

impl RouteMode {
    pub fn parse(value: &str) -> Result<Self, UrlStateError> {
        match value.trim().to_lowercase().as_str() {
            "path" | "query" => Ok(Self::Path),
            "hash" | "fragment" => Ok(Self::Hash),
            other => Err(UrlStateError::UnknownRouteMode {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub tab: Tab,
    pub query: String,
    pub gen: String,
    pub include_graduated: bool,
    pub selected_id: String,
    pub show_absent: bool,
}

impl ViewState {
    pub fn member_filter(&self) -> MemberFilter {
        MemberFilter {
            query: self.query.clone(),
            gen: self.gen.clone(),
            include_graduated: self.include_graduated,
        }
    }

    /// Parameters in write order. Empty strings and false flags are omitted.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if !self.query.is_empty() {
            out.push((PARAM_QUERY, self.query.as_str()));
        }
        if !self.gen.is_empty() {
            out.push((PARAM_GEN, self.gen.as_str()));
        }
        if self.include_graduated {
            out.push((PARAM_GRADUATED, FLAG_ON));
        }
        if !self.selected_id.is_empty() {
            out.push((PARAM_ID, self.selected_id.as_str()));
        }
        if self.show_absent {
            out.push((PARAM_ABSENT, FLAG_ON));
        }
        out
    }

    fn apply_param(&mut self, key: &str, value: &str) {
        match key {
            PARAM_QUERY => self.query = value.to_string(),
            PARAM_GEN => self.gen = value.to_string(),
            PARAM_GRADUATED => self.include_graduated = value == FLAG_ON,
            PARAM_ID => self.selected_id = value.to_string(),
            PARAM_ABSENT => self.show_absent = value == FLAG_ON,
            _ => {}
        }
    }
}

fn serialize_params(state: &ViewState) -> Option<String> {
    let params = state.params();
    if params.is_empty() {
        return None;
    }
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (k, v) in params {
        ser.append_pair(k, v);
    }
    Some(ser.finish())
}

fn apply_query_string(state: &mut ViewState, raw: &str) {
    for (k, v) in form_urlencoded::parse(raw.as_bytes()) {
        state.apply_param(&k, &v);
    }
}

pub fn parse_location(raw: &str) -> Result<Url, UrlStateError> {
    Url::parse(raw.trim()).map_err(|e| UrlStateError::InvalidUrl {
        url: raw.to_string(),
        source: e,
    })
}

/// Parses `raw` as the application root. The path always ends in `/` so tab
/// segments join beneath it.
pub fn parse_base(raw: &str) -> Result<Url, UrlStateError> {
    let mut base = parse_location(raw)?;
    if base.cannot_be_a_base() {
        return Err(UrlStateError::NotABase {
            url: raw.to_string(),
        });
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_fragment(None);
    Ok(base)
}

pub fn encode(state: &ViewState, base: &Url, mode: RouteMode) -> Url {
    let mut url = base.clone();
    match mode {
        RouteMode::Path => {
            let path = format!("{}{}", base.path(), state.tab.segment());
            url.set_path(&path);
            url.set_query(serialize_params(state).as_deref());
            url.set_fragment(None);
        }
        RouteMode::Hash => {
            let mut fragment = format!("/{}", state.tab.segment());
            if let Some(params) = serialize_params(state) {
                fragment.push('?');
                fragment.push_str(&params);
            }
            url.set_fragment(Some(&fragment));
        }
    }
    url
}

pub fn decode(location: &Url, base: &Url, mode: RouteMode) -> ViewState {
    let mut state = ViewState::default();
    match mode {
        RouteMode::Path => {
            let path = location.path();
            let rest = path.strip_prefix(base.path()).unwrap_or(path);
            let segment = rest.trim_matches('/').split('/').next().unwrap_or_default();
            state.tab = Tab::from_segment(segment);
            if let Some(query) = location.query() {
                apply_query_string(&mut state, query);
            }
        }
        RouteMode::Hash => {
            let fragment = location.fragment().unwrap_or_default();
            let (route, query) = fragment.split_once('?').unwrap_or((fragment, ""));
            let segment = route.trim_matches('/').split('/').next().unwrap_or_default();
            state.tab = Tab::from_segment(segment);
            apply_query_string(&mut state, query);
        }
    }
    state
}

/// The page location plus its history stack. Incremental edits replace the
/// current entry; only tab navigation adds one.
#[derive(Clone, Debug)]
pub struct LocationAdapter {
    base: Url,
    mode: RouteMode,
    entries: Vec<Url>,
    cursor: usize,
}

impl LocationAdapter {
    pub fn new(base: Url, mode: RouteMode, initial: &ViewState) -> Self {
        let first = encode(initial, &base, mode);
        Self {
            base,
            mode,
            entries: vec![first],
            cursor: 0,
        }
    }

    /// Starts from an existing link, re-encoding it so the stored entry is
    /// canonical.
    pub fn from_location(base: Url, mode: RouteMode, location: &Url) -> Self {
        let state = decode(location, &base, mode);
        Self::new(base, mode, &state)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    pub fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    pub fn state(&self) -> ViewState {
        decode(self.current(), &self.base, self.mode)
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn replace(&mut self, state: &ViewState) {
        let url = encode(state, &self.base, self.mode);
        self.entries[self.cursor] = url;
    }

    pub fn update<F>(&mut self, edit: F) -> ViewState
    where
        F: FnOnce(&mut ViewState),
    {
        let mut state = self.state();
        edit(&mut state);
        self.replace(&state);
        state
    }

    /// Pushes a history entry for `tab`, dropping any forward entries.
    /// Navigating to the current tab is a no-op.
    pub fn navigate(&mut self, tab: Tab) -> ViewState {
        let mut state = self.state();
        if state.tab == tab {
            return state;
        }
        state.tab = tab;
        let url = encode(&state, &self.base, self.mode);
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor += 1;
        state
    }

    pub fn back(&mut self) -> Option<ViewState> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.state())
    }

    pub fn forward(&mut self) -> Option<ViewState> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.state())
    }

    /// Selects the first event when the current selection is missing or
    /// unknown. Returns the newly selected id when the location changed.
    pub fn reconcile_selection(&mut self, events: &[Underlive]) -> Option<String> {
        let first = events.first()?;
        let state = self.state();
        if events.iter().any(|u| u.id == state.selected_id) {
            return None;
        }
        let id = first.id.clone();
        self.update(|s| s.selected_id = id.clone());
        Some(id)
    }

    pub fn link(&self) -> String {
        self.current().to_string()
    }
}
