//! Release candidates and the releases built from them.

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_RELEASE_NAME;

/// Identifier of a release candidate, unique within one search.
pub type ReleaseId = String;

/// A raw release produced by the release source, before link checking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCandidate {
    /// Candidate identifier
    pub id: ReleaseId,
    /// Download link on the file hoster
    pub link: String,
    /// Media title as shown by the source
    pub title: String,
    /// Quality label (e.g. "REMUX BLURAY", "1080p")
    #[serde(default)]
    pub quality: Option<String>,
    /// Audio languages
    #[serde(default)]
    pub languages: Vec<String>,
    /// File hoster name (e.g. "1fichier")
    #[serde(default)]
    pub hoster: Option<String>,
    /// Size in bytes, when known
    #[serde(default)]
    pub size: Option<u64>,
}

impl ReleaseCandidate {
    /// Creates a candidate with only the mandatory fields.
    pub fn new(id: impl Into<String>, link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            link: link.into(),
            title: title.into(),
            quality: None,
            languages: Vec::new(),
            hoster: None,
            size: None,
        }
    }

    /// Sets the quality label.
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    /// Sets the audio languages.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the hoster.
    pub fn with_hoster(mut self, hoster: impl Into<String>) -> Self {
        self.hoster = Some(hoster.into());
        self
    }

    /// Checks the candidate's hoster against a lowercase allow-list.
    ///
    /// An empty allow-list admits everything; otherwise candidates without a
    /// hoster are refused.
    pub fn is_hoster_allowed(&self, allowed: &[String]) -> bool {
        if allowed.is_empty() {
            return true;
        }
        self.hoster
            .as_deref()
            .map(|h| h.trim().to_lowercase())
            .is_some_and(|h| allowed.iter().any(|a| *a == h))
    }
}

/// A release whose link was confirmed alive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Candidate identifier
    pub id: ReleaseId,
    /// Final release name
    pub name: String,
    /// Download link
    pub link: String,
    /// Media title
    pub title: String,
    /// Quality label
    pub quality: Option<String>,
    /// Audio languages
    pub languages: Vec<String>,
    /// File hoster
    pub hoster: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    /// Whether `name` is the exact hoster filename
    pub exact_name: bool,
}

impl Release {
    /// Builds a release from a live candidate and its optional exact filename.
    pub fn from_candidate(candidate: ReleaseCandidate, exact_filename: Option<&str>) -> Self {
        let exact_name = exact_filename.is_some_and(|f| !f.is_empty());
        let name = build_release_name(
            &candidate.title,
            candidate.quality.as_deref(),
            &candidate.languages,
            exact_filename,
        );

        Self {
            id: candidate.id,
            name,
            link: candidate.link,
            title: candidate.title,
            quality: candidate.quality,
            languages: candidate.languages,
            hoster: candidate.hoster,
            size: candidate.size,
            exact_name,
        }
    }
}

/// Builds a release name: `{title} {quality} {language tag}`.
///
/// An exact filename from the debrid API wins over the constructed name.
pub fn build_release_name(
    title: &str,
    quality: Option<&str>,
    languages: &[String],
    exact_filename: Option<&str>,
) -> String {
    if let Some(exact) = exact_filename.filter(|f| !f.is_empty()) {
        return exact.to_string();
    }

    let mut parts = Vec::with_capacity(3);

    let clean_title = title.replace("Poster for ", "");
    let clean_title = clean_title.trim();
    if !clean_title.is_empty() {
        parts.push(clean_title.to_string());
    }

    if let Some(q) = quality.map(str::trim).filter(|q| !q.is_empty()) {
        parts.push(q.to_string());
    }

    let tag = format_language_tag(languages);
    if !tag.is_empty() {
        parts.push(tag);
    }

    if parts.is_empty() {
        UNKNOWN_RELEASE_NAME.to_string()
    } else {
        parts.join(" ")
    }
}

/// Formats a language list into a scene-style tag.
///
/// - two or more languages: `MULTI VFF` when French is among them, else `MULTI`
/// - TrueFrench / VFF: `VFF`
/// - French: `FRENCH`
/// - English: `ENGLISH`
/// - anything else: the language uppercased
pub fn format_language_tag(languages: &[String]) -> String {
    if languages.is_empty() {
        return String::new();
    }

    let normalized: Vec<String> = languages.iter().map(|l| l.trim().to_lowercase()).collect();

    if normalized.len() >= 2 {
        if normalized.iter().any(|l| l == "french" || l == "truefrench") {
            return "MULTI VFF".into();
        }
        return "MULTI".into();
    }

    let single = normalized[0].as_str();
    if single.contains("truefrench") || single.contains("vff") {
        "VFF".into()
    } else if single.contains("french") || single.contains("français") {
        "FRENCH".into()
    } else if single.contains("english") || single.contains("anglais") {
        "ENGLISH".into()
    } else {
        single.to_uppercase()
    }
}
