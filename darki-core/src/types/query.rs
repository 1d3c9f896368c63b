//! Search parameters, normalization and cache keys.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DarkiError, Result};

/// Kind of media being searched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film (default).
    #[default]
    Movie,
    /// Episodic series.
    Series,
    /// Anime series.
    Animes,
}

impl MediaType {
    /// Returns the wire name of this media type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Animes => "animes",
        }
    }

    /// Episodic media cannot be searched without a season.
    pub fn requires_season(&self) -> bool {
        matches!(self, MediaType::Series | MediaType::Animes)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DarkiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "movie" | "movies" => Ok(MediaType::Movie),
            "series" | "serie" | "tv" => Ok(MediaType::Series),
            "animes" | "anime" => Ok(MediaType::Animes),
            other => Err(DarkiError::UnknownMediaType(other.to_string())),
        }
    }
}

/// A search request as seen by the cache and the release source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw query text supplied by the client
    pub query: String,
    /// Media type
    pub media_type: MediaType,
    /// Season number (episodic media only)
    pub season: Option<u32>,
    /// Episode number (episodic media only)
    pub episode: Option<u32>,
}

impl SearchQuery {
    /// Creates a query without season or episode.
    pub fn new(query: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            query: query.into(),
            media_type,
            season: None,
            episode: None,
        }
    }

    /// Sets the season.
    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    /// Sets the episode.
    pub fn with_episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }

    /// Rejects queries the source cannot answer usefully.
    ///
    /// Media managers send bare episode numbers ("01", "02") for anime, so
    /// episodic searches without a season are refused outright.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(DarkiError::MissingParameter("name".into()));
        }
        if self.media_type.requires_season() && self.season.is_none() {
            return Err(DarkiError::ValidationError(format!(
                "Season parameter is required for {} searches",
                self.media_type
            )));
        }
        Ok(())
    }

    /// Lowercased, whitespace-collapsed query with redundant season markers removed.
    ///
    /// Markers ("TV", "Season 2", "2nd Season", "S02", "Part 2") are only
    /// stripped when a season is set, since the season parameter already
    /// carries that information.
    pub fn normalized_query(&self) -> String {
        let mut normalized = self
            .query
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if self.season.is_some() {
            loop {
                let stripped = season_suffix().replace(&normalized, "").into_owned();
                if stripped == normalized {
                    break;
                }
                normalized = stripped;
            }
        }

        normalized
    }

    /// Cache and single-flight key for this query.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.normalized_query(),
            self.media_type,
            self.season.map(|s| s.to_string()).unwrap_or_default(),
            self.episode.map(|e| e.to_string()).unwrap_or_default(),
        )
    }
}

fn season_suffix() -> &'static Regex {
    static SEASON_SUFFIX: OnceLock<Regex> = OnceLock::new();
    SEASON_SUFFIX.get_or_init(|| {
        Regex::new(r"\s+(?:tv|(?:season|saison)\s*\d+|\d+(?:st|nd|rd|th)\s+season|s\d{1,2}|part\s*\d+)$")
            .expect("season suffix pattern is valid")
    })
}
