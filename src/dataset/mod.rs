pub mod csv;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use thiserror::Error;
use url::Url;

use crate::model::{Member, Underlive};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to fetch {source_name}: {source}")]
    Fetch {
        source_name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {source_name}: HTTP {status}")]
    HttpStatus { source_name: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {source_name} line {line}: {message}")]
    Csv {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("unknown member format '{value}', expected json or csv")]
    UnknownFormat { value: String },
}

/// Where a dataset comes from: a remote URL or a local file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Remote(Url),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            if let Ok(url) = Url::parse(trimmed) {
                return Self::Remote(url);
            }
        }
        Self::File(crate::config::expand_tilde(trimmed))
    }

    fn extension(&self) -> Option<String> {
        let path = match self {
            Self::Remote(url) => PathBuf::from(url.path()),
            Self::File(path) => path.clone(),
        };
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberFormat {
    Json,
    Csv,
}

impl MemberFormat {
    pub fn parse(value: &str) -> Result<Self, DatasetError> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(DatasetError::UnknownFormat {
                value: other.to_string(),
            }),
        }
    }

    /// `.csv` sources are tables; everything else is read as JSON.
    pub fn infer(source: &DataSource) -> Self {
        match source.extension().as_deref() {
            Some("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

pub async fn fetch_text(client: &reqwest::Client, source: &DataSource) -> Result<String, DatasetError> {
    match source {
        DataSource::Remote(url) => {
            debug!("event=fetch module=dataset url={url}");
            let resp = client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| DatasetError::Fetch {
                    source_name: url.to_string(),
                    source: e,
                })?;
            let status = resp.status();
            if !status.is_success() {
                return Err(DatasetError::HttpStatus {
                    source_name: url.to_string(),
                    status: status.as_u16(),
                });
            }
            resp.text().await.map_err(|e| DatasetError::Fetch {
                source_name: url.to_string(),
                source: e,
            })
        }
        DataSource::File(path) => {
            debug!("event=read module=dataset path={}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DatasetError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
        }
    }
}

pub fn parse_members_json(source_name: &str, text: &str) -> Result<Vec<Member>, DatasetError> {
    serde_json::from_str(text).map_err(|e| DatasetError::Json {
        source_name: source_name.to_string(),
        source: e,
    })
}

pub fn parse_underlives_json(source_name: &str, text: &str) -> Result<Vec<Underlive>, DatasetError> {
    serde_json::from_str(text).map_err(|e| DatasetError::Json {
        source_name: source_name.to_string(),
        source: e,
    })
}

pub async fn load_members(
    client: &reqwest::Client,
    source: &DataSource,
    format: Option<MemberFormat>,
) -> Result<Vec<Member>, DatasetError> {
    let text = fetch_text(client, source).await?;
    let name = source.to_string();
    match format.unwrap_or_else(|| MemberFormat::infer(source)) {
        MemberFormat::Json => parse_members_json(&name, &text),
        MemberFormat::Csv => csv::parse_members(&name, &text),
    }
}

pub async fn load_underlives(
    client: &reqwest::Client,
    source: &DataSource,
) -> Result<Vec<Underlive>, DatasetError> {
    let text = fetch_text(client, source).await?;
    parse_underlives_json(&source.to_string(), &text)
}

/// Loaded collections. Cloning shares the underlying records.
#[derive(Clone, Debug, Default)]
pub struct DatasetStore {
    members: Arc<[Member]>,
    underlives: Arc<[Underlive]>,
}

impl DatasetStore {
    pub fn new(members: Vec<Member>, underlives: Vec<Underlive>) -> Self {
        Self {
            members: members.into(),
            underlives: underlives.into(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn underlives(&self) -> &[Underlive] {
        &self.underlives
    }

    pub(crate) fn with_members(&self, members: Vec<Member>) -> Self {
        Self {
            members: members.into(),
            underlives: Arc::clone(&self.underlives),
        }
    }

    pub(crate) fn with_underlives(&self, underlives: Vec<Underlive>) -> Self {
        Self {
            members: Arc::clone(&self.members),
            underlives: underlives.into(),
        }
    }
}
