use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;

use crate::http_client::http_client;
use crate::model::{Championship, EntryListRecord};
use crate::parsing::{parse_championship_json, parse_entry_list_json};

pub const CHAMPIONSHIP_CANDIDATES: &[&str] = &["data/championship.json", "championship.json"];
pub const ENTRYLIST_CANDIDATES: &[&str] = &[
    "data/entrylist.json",
    "entrylist.json",
    "data/entrylist.json.json",
    "entrylist.json.json",
];

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub cache_bust: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            cache_bust: false,
        }
    }
}

/// Where data files live: a local directory or an `http(s)` base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Dir(PathBuf),
    Http(String),
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let base = if trimmed.ends_with('/') {
                trimmed.to_string()
            } else {
                format!("{trimmed}/")
            };
            Source::Http(base)
        } else if trimmed.is_empty() {
            Source::Dir(PathBuf::from("."))
        } else {
            Source::Dir(PathBuf::from(trimmed))
        }
    }

    pub fn locator(&self, rel: &str) -> String {
        match self {
            Source::Dir(dir) => dir.join(rel).display().to_string(),
            Source::Http(base) => format!("{base}{}", rel.trim_start_matches('/')),
        }
    }

    pub fn fetch_text(&self, rel: &str, opts: &FetchOptions) -> Result<String> {
        match self {
            Source::Dir(dir) => {
                let path = dir.join(rel);
                fs::read_to_string(&path)
                    .with_context(|| format!("failed reading {}", path.display()))
            }
            Source::Http(_) => {
                let client = http_client(opts.timeout)?;
                let mut url = self.locator(rel);
                if opts.cache_bust {
                    url = with_cache_buster(&url);
                }
                let resp = client
                    .get(&url)
                    .header(USER_AGENT, "Mozilla/5.0")
                    .send()
                    .with_context(|| format!("request failed: {url}"))?;
                let status = resp.status();
                let body = resp.text().context("failed reading body")?;
                if !status.is_success() {
                    return Err(anyhow!("http {status} {url}"));
                }
                Ok(body)
            }
        }
    }

    /// Whether `rel` resolves, without reading it.
    pub fn exists(&self, rel: &str, opts: &FetchOptions) -> bool {
        match self {
            Source::Dir(dir) => dir.join(rel).is_file(),
            Source::Http(_) => {
                let Ok(client) = http_client(opts.timeout) else {
                    return false;
                };
                client
                    .head(self.locator(rel))
                    .header(USER_AGENT, "Mozilla/5.0")
                    .send()
                    .map(|resp| resp.status() == StatusCode::OK)
                    .unwrap_or(false)
            }
        }
    }

    /// Body of the first candidate that resolves, with its locator.
    pub fn fetch_first(&self, candidates: &[&str], opts: &FetchOptions) -> Result<(String, String)> {
        let mut last_err = None;
        for rel in candidates {
            match self.fetch_text(rel, opts) {
                Ok(body) => {
                    debug!("loaded {}", self.locator(rel));
                    return Ok((self.locator(rel), body));
                }
                Err(err) => {
                    debug!("candidate {} failed: {err:#}", self.locator(rel));
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("no candidates to fetch")))
    }
}

pub fn load_championship(source: &Source, opts: &FetchOptions) -> Result<Championship> {
    let (locator, body) = source
        .fetch_first(CHAMPIONSHIP_CANDIDATES, opts)
        .context("championship data not found")?;
    parse_championship_json(&body).with_context(|| format!("failed parsing {locator}"))
}

/// Optional roster; any failure degrades to an empty list.
pub fn load_entry_list(source: &Source, opts: &FetchOptions) -> Vec<EntryListRecord> {
    let loaded = source
        .fetch_first(ENTRYLIST_CANDIDATES, opts)
        .and_then(|(locator, body)| {
            parse_entry_list_json(&body).with_context(|| format!("failed parsing {locator}"))
        });
    match loaded {
        Ok(list) => list,
        Err(err) => {
            warn!("entry list unavailable: {err:#}");
            Vec::new()
        }
    }
}

pub fn with_cache_buster(url: &str) -> String {
    if url.contains("v=") {
        return url.to_string();
    }
    let ts = Utc::now().timestamp_millis();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}v={ts}")
}
