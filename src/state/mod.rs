//! The single state container: datasets, their load status and the view
//! state. It only changes through [`reduce`]; readers borrow a snapshot.

use log::{debug, info, warn};

use crate::dataset::DatasetStore;
use crate::filter::{self, MemberFilter};
use crate::model::{Member, Underlive};
use crate::roster::{self, RosterView};
use crate::urlstate::ViewState;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Clone, Debug)]
pub enum Action {
    MembersLoaded(Vec<Member>),
    MembersFailed(String),
    UnderlivesLoaded(Vec<Underlive>),
    UnderlivesFailed(String),
    ViewChanged(ViewState),
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    store: DatasetStore,
    members_status: LoadStatus,
    underlives_status: LoadStatus,
    view: ViewState,
}

impl AppState {
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn members(&self) -> &[Member] {
        self.store.members()
    }

    pub fn underlives(&self) -> &[Underlive] {
        self.store.underlives()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn members_status(&self) -> &LoadStatus {
        &self.members_status
    }

    pub fn underlives_status(&self) -> &LoadStatus {
        &self.underlives_status
    }

    /// The member error that blocks the primary view, if any.
    pub fn fatal_error(&self) -> Option<&str> {
        match &self.members_status {
            LoadStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.members_status.is_settled()
    }

    pub fn filtered_members(&self) -> Vec<&Member> {
        filter::filter_members(self.members(), &self.view.member_filter())
    }

    pub fn generations(&self) -> Vec<String> {
        filter::generations(self.members())
    }

    pub fn member_filter(&self) -> MemberFilter {
        self.view.member_filter()
    }

    pub fn roster(&self) -> RosterView<'_> {
        roster::resolve_roster(
            self.underlives(),
            &self.view.selected_id,
            self.members(),
            self.view.show_absent,
        )
    }
}

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::MembersLoaded(members) => {
            if state.members_status.is_settled() {
                debug!("event=members_loaded module=state status=ignored reason=already_settled");
                return state;
            }
            info!("event=members_loaded module=state count={}", members.len());
            AppState {
                store: state.store.with_members(members),
                members_status: LoadStatus::Ready,
                ..state
            }
        }
        Action::MembersFailed(reason) => {
            if state.members_status.is_settled() {
                return state;
            }
            AppState {
                members_status: LoadStatus::Failed(reason),
                ..state
            }
        }
        Action::UnderlivesLoaded(underlives) => {
            if state.underlives_status.is_settled() {
                debug!("event=underlives_loaded module=state status=ignored reason=already_settled");
                return state;
            }
            info!("event=underlives_loaded module=state count={}", underlives.len());
            AppState {
                store: state.store.with_underlives(underlives),
                underlives_status: LoadStatus::Ready,
                ..state
            }
        }
        Action::UnderlivesFailed(reason) => {
            if state.underlives_status.is_settled() {
                return state;
            }
            // Degrades to an empty collection; not shown to the user.
            warn!("event=underlives_failed module=state reason={reason}");
            AppState {
                store: state.store.with_underlives(Vec::new()),
                underlives_status: LoadStatus::Failed(reason),
                ..state
            }
        }
        Action::ViewChanged(view) => AppState { view, ..state },
    }
}
