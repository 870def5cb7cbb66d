use std::time::Duration;

use log::{info, warn};
use thiserror::Error;
use tokio::time::Instant;

use crate::dataset::{self, DataSource, MemberFormat};
use crate::state::{self, Action, AppState};
use crate::urlstate::{self, LocationAdapter, RouteMode, UrlStateError, ViewState};

pub const DEFAULT_BASE_URL: &str = "https://example.github.io/nogi-psyllium/";
pub const DEFAULT_MEMBERS: &str = "https://example.github.io/nogi-psyllium/data/members.json";
pub const DEFAULT_UNDERLIVES: &str =
    "https://example.github.io/nogi-psyllium/data/underlives.json";

#[derive(Clone, Debug)]
pub struct Options {
    pub members: String,
    pub members_format: Option<MemberFormat>,
    pub underlives: Option<String>,
    pub base_url: String,
    pub route_mode: RouteMode,
    pub view: ViewState,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            members: DEFAULT_MEMBERS.to_string(),
            members_format: None,
            underlives: Some(DEFAULT_UNDERLIVES.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            route_mode: RouteMode::Path,
            view: ViewState::default(),
            timeout_seconds: 10,
            proxy: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no member dataset provided")]
    NoMembers,

    #[error("invalid base URL: {source}")]
    InvalidBase {
        #[source]
        source: UrlStateError,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Everything a view needs after both loads have settled.
#[derive(Clone, Debug)]
pub struct ViewResult {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub state: AppState,
    pub location: LocationAdapter,
    /// Event id chosen automatically because the requested one was absent.
    pub auto_selected: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    members: DataSource,
    underlives: Option<DataSource>,
    base: url::Url,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.members.trim().is_empty() {
            return Err(RunnerError::NoMembers);
        }
        let base = urlstate::parse_base(&options.base_url)
            .map_err(|e| RunnerError::InvalidBase { source: e })?;
        let members = DataSource::parse(&options.members);
        let underlives = options
            .underlives
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(DataSource::parse);
        Ok(Self {
            options,
            members,
            underlives,
            base,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn base(&self) -> &url::Url {
        &self.base
    }

    /// Loads both datasets concurrently and settles the state container.
    /// A member failure lands in the state as a fatal error; an event
    /// failure only leaves the event collection empty.
    pub async fn run(&self) -> Result<ViewResult, RunnerError> {
        let started_at = Instant::now();
        let client = build_client(self.options.proxy.as_deref(), self.options.timeout_seconds)?;

        let members_fut = dataset::load_members(&client, &self.members, self.options.members_format);
        let underlives_fut = async {
            match self.underlives.as_ref() {
                Some(source) => dataset::load_underlives(&client, source).await.map(Some),
                None => Ok(None),
            }
        };
        let (members, underlives) = tokio::join!(members_fut, underlives_fut);

        let mut location = LocationAdapter::new(self.base.clone(), self.options.route_mode, &self.options.view);
        let mut app = AppState::new(location.state());

        app = match underlives {
            Ok(Some(list)) => state::reduce(app, Action::UnderlivesLoaded(list)),
            Ok(None) => state::reduce(app, Action::UnderlivesLoaded(Vec::new())),
            Err(e) => state::reduce(app, Action::UnderlivesFailed(e.to_string())),
        };
        app = match members {
            Ok(list) => state::reduce(app, Action::MembersLoaded(list)),
            Err(e) => {
                warn!("event=members_failed module=runner reason={e}");
                state::reduce(app, Action::MembersFailed(e.to_string()))
            }
        };

        let auto_selected = location.reconcile_selection(app.underlives());
        if let Some(id) = auto_selected.as_deref() {
            info!("event=auto_select module=runner id={id}");
            app = state::reduce(app, Action::ViewChanged(location.state()));
        }

        Ok(ViewResult {
            started_at,
            elapsed: started_at.elapsed(),
            state: app,
            location,
            auto_selected,
        })
    }
}

pub fn build_client(proxy: Option<&str>, timeout_seconds: usize) -> Result<reqwest::Client, RunnerError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!("psyllium/", env!("CARGO_PKG_VERSION"))),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| RunnerError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| RunnerError::HttpClientBuild { source: e })
}
