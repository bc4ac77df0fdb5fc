//! Text edition sources
//!
//! Each source knows where its edition lives and what its payload looks like.
//! Payloads are parsed into chapters, cleaned of prepended Bismillah text and
//! flattened into a [`Corpus`].

use crate::corpus::{Chapter, ChapterVerse, Corpus};
use crate::error::TadabburError;
use crate::normalize::normalize;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ALQURAN_CLOUD_BASE_URL: &str = "https://api.alquran.cloud/v1/quran/";
const FAWAZAHMED0_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/fawazahmed0/quran-api@1/editions/";
const FAWAZAHMED0_PREFIX: &str = "fawazahmed0:";

const DEFAULT_BISMILLAH: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ";

/// Chapters that never carry a cleanable Bismillah (Al-Fatiha, At-Tawbah)
const BISMILLAH_EXEMPT: [u32; 2] = [1, 9];

/// Where an edition comes from; each variant carries only what it needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source_api", rename_all = "snake_case")]
pub enum EditionSource {
    AlQuranCloud { identifier: String },
    Fawazahmed0 { identifier: String },
    Manual { url: String },
}

impl EditionSource {
    /// Stable key for caching and on-disk storage
    pub fn identifier(&self) -> &str {
        match self {
            EditionSource::AlQuranCloud { identifier } => identifier,
            EditionSource::Fawazahmed0 { identifier } => identifier,
            EditionSource::Manual { url } => url,
        }
    }

    pub fn fetch_url(&self) -> String {
        match self {
            EditionSource::AlQuranCloud { identifier } => {
                format!("{}{}", ALQURAN_CLOUD_BASE_URL, identifier)
            }
            EditionSource::Fawazahmed0 { identifier } => {
                format!("{}{}.json", FAWAZAHMED0_BASE_URL, identifier)
            }
            EditionSource::Manual { url } => url.clone(),
        }
    }

    /// File name used when the edition is stored under the data directory
    pub fn file_name(&self) -> String {
        let safe: String = self
            .identifier()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        format!("{}.json", safe)
    }

    /// Parse a raw payload into chapters, in the shape this source serves
    pub fn parse_payload(&self, payload: &[u8]) -> Result<Vec<Chapter>, TadabburError> {
        match self {
            EditionSource::AlQuranCloud { .. } | EditionSource::Manual { .. } => {
                parse_alquran_cloud(payload)
            }
            EditionSource::Fawazahmed0 { .. } => parse_fawazahmed0(payload),
        }
    }
}

impl fmt::Display for EditionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditionSource::Fawazahmed0 { identifier } => write!(f, "{}{}", FAWAZAHMED0_PREFIX, identifier),
            _ => f.write_str(self.identifier()),
        }
    }
}

impl FromStr for EditionSource {
    type Err = TadabburError;

    /// `http(s)://...` is a manual URL, `fawazahmed0:<id>` a fawazahmed0
    /// edition, anything else an alquran.cloud identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TadabburError::Edition("empty edition identifier".to_string()));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(EditionSource::Manual { url: s.to_string() });
        }
        if let Some(identifier) = s.strip_prefix(FAWAZAHMED0_PREFIX) {
            return Ok(EditionSource::Fawazahmed0 {
                identifier: identifier.to_string(),
            });
        }
        Ok(EditionSource::AlQuranCloud {
            identifier: s.to_string(),
        })
    }
}

// === alquran.cloud payload ===

#[derive(Deserialize)]
struct AlQuranCloudResponse {
    code: u16,
    data: Option<AlQuranCloudData>,
}

#[derive(Deserialize)]
struct AlQuranCloudData {
    surahs: Option<Vec<AlQuranCloudSurah>>,
}

#[derive(Deserialize)]
struct AlQuranCloudSurah {
    number: u32,
    name: String,
    ayahs: Vec<AlQuranCloudAyah>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlQuranCloudAyah {
    number: Option<u32>,
    // audio-only editions have no text
    text: Option<String>,
    number_in_surah: u32,
}

fn parse_alquran_cloud(payload: &[u8]) -> Result<Vec<Chapter>, TadabburError> {
    let response: AlQuranCloudResponse = serde_json::from_slice(payload)
        .map_err(|e| TadabburError::InvalidPayload(e.to_string()))?;

    if response.code != 200 {
        return Err(TadabburError::InvalidPayload(format!(
            "unexpected response code {}",
            response.code
        )));
    }

    let surahs = response
        .data
        .and_then(|d| d.surahs)
        .ok_or_else(|| TadabburError::InvalidPayload("missing surahs".to_string()))?;

    Ok(surahs
        .into_iter()
        .map(|surah| Chapter {
            number: surah.number,
            name: surah.name,
            verses: surah
                .ayahs
                .into_iter()
                .map(|ayah| ChapterVerse {
                    global_number: ayah.number,
                    number_in_chapter: ayah.number_in_surah,
                    text: ayah.text.unwrap_or_default(),
                })
                .collect(),
        })
        .collect())
}

// === fawazahmed0 payload ===

#[derive(Deserialize)]
struct FawazResponse {
    quran: Option<Vec<FawazChapter>>,
}

#[derive(Deserialize)]
struct FawazChapter {
    chapter: u32,
    verses: Vec<FawazVerse>,
}

#[derive(Deserialize)]
struct FawazVerse {
    verse: u32,
    text: String,
}

fn parse_fawazahmed0(payload: &[u8]) -> Result<Vec<Chapter>, TadabburError> {
    let response: FawazResponse = serde_json::from_slice(payload)
        .map_err(|e| TadabburError::InvalidPayload(e.to_string()))?;

    let chapters = response
        .quran
        .ok_or_else(|| TadabburError::InvalidPayload("missing quran array".to_string()))?;

    Ok(chapters
        .into_iter()
        .map(|chapter| Chapter {
            number: chapter.chapter,
            // this source has no chapter names
            name: format!("سورة {}", chapter.chapter),
            verses: chapter
                .verses
                .into_iter()
                .map(|v| ChapterVerse {
                    global_number: None,
                    number_in_chapter: v.verse,
                    text: v.text,
                })
                .collect(),
        })
        .collect())
}

fn without_spaces(text: &str) -> String {
    normalize(text).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Remove Bismillah text that sources prepend to chapters other than 1 and 9.
///
/// A leading verse numbered 0 is dropped. If the first verse starts with the
/// Bismillah its words are cut; a verse left empty is removed and the chapter
/// renumbered from 1.
pub fn clean_bismillah(chapters: Vec<Chapter>) -> Vec<Chapter> {
    let bismillah = chapters
        .iter()
        .find(|c| c.number == 1)
        .and_then(|c| c.verses.first())
        .map(|v| v.text.clone())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BISMILLAH.to_string());
    let bismillah_key = without_spaces(&bismillah);
    let bismillah_words = bismillah.split(' ').count();

    chapters
        .into_iter()
        .map(|mut chapter| {
            if BISMILLAH_EXEMPT.contains(&chapter.number) || chapter.verses.is_empty() {
                return chapter;
            }

            if chapter.verses[0].number_in_chapter == 0 {
                chapter.verses.remove(0);
            }
            let Some(first) = chapter.verses.first_mut() else {
                return chapter;
            };

            if bismillah_key.is_empty()
                || first.text.is_empty()
                || !without_spaces(&first.text).starts_with(&bismillah_key)
            {
                return chapter;
            }

            let cleaned = first
                .text
                .split(' ')
                .skip(bismillah_words)
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();

            if cleaned.is_empty() {
                chapter.verses.remove(0);
                for (idx, verse) in chapter.verses.iter_mut().enumerate() {
                    verse.number_in_chapter = idx as u32 + 1;
                }
            } else {
                first.text = cleaned;
            }
            chapter
        })
        .collect()
}

/// Parse, clean and flatten a payload into a corpus
pub fn corpus_from_payload(source: &EditionSource, payload: &[u8]) -> Result<Corpus> {
    let chapters = source
        .parse_payload(payload)
        .with_context(|| format!("Failed to parse edition {}", source))?;
    Ok(Corpus::from_chapters(source.identifier(), clean_bismillah(chapters)))
}

/// Load an edition previously stored under `data_dir`
pub fn load_edition_file(data_dir: &Path, source: &EditionSource) -> Result<Corpus> {
    let path = data_dir.join(source.file_name());
    let payload = fs::read(&path)
        .with_context(|| format!("Failed to read edition file at {:?}", path))?;
    let corpus = corpus_from_payload(source, &payload)?;
    tracing::info!(edition = %source, verses = corpus.len(), "loaded edition from disk");
    Ok(corpus)
}

/// Fetch an edition payload over HTTP
pub async fn fetch_edition(client: &reqwest::Client, source: &EditionSource) -> Result<Vec<u8>> {
    let url = source.fetch_url();
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch edition {}", source))?;

    if !response.status().is_success() {
        return Err(TadabburError::Network(format!(
            "edition {} returned HTTP {}",
            source,
            response.status()
        ))
        .into());
    }

    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read edition body for {}", source))?;
    Ok(bytes.to_vec())
}

/// Download an edition into `data_dir` unless it is already there.
///
/// The payload is validated before it is written.
pub async fn ensure_edition_file(
    client: &reqwest::Client,
    data_dir: &Path,
    source: &EditionSource,
) -> Result<PathBuf> {
    let path = data_dir.join(source.file_name());
    if path.exists() {
        return Ok(path);
    }

    tracing::info!(edition = %source, url = %source.fetch_url(), "downloading edition");
    let payload = fetch_edition(client, source).await?;
    source
        .parse_payload(&payload)
        .with_context(|| format!("Downloaded edition {} is invalid", source))?;

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    fs::write(&path, &payload).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}
