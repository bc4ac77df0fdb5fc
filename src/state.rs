//! Application state management

use crate::cache::CorpusCache;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::edition::{ensure_edition_file, load_edition_file, EditionSource};
use crate::search::SearchEngine;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Application state holding the search engine and the edition cache
pub struct AppState {
    pub search_engine: Arc<SearchEngine>,
    pub corpus_cache: Arc<CorpusCache>,
    pub config: Config,
}

impl AppState {
    /// Load the configured editions, downloading missing ones when allowed.
    ///
    /// The plain edition is required. A diacritic edition that fails to load
    /// is logged and skipped; vocalized queries then search the plain text.
    pub async fn load(config: Config) -> Result<Self> {
        let corpus_cache = Arc::new(CorpusCache::new(config.cache_capacity));

        if config.fetch_missing {
            let client = reqwest::Client::new();
            ensure_edition_file(&client, &config.data_dir, &config.plain_edition)
                .await
                .context("Plain edition is not available")?;
            if let Some(source) = &config.diacritic_edition {
                if let Err(e) = ensure_edition_file(&client, &config.data_dir, source).await {
                    tracing::warn!(edition = %source, error = %e, "diacritic edition download failed");
                }
            }
        }

        // reading, parsing and indexing editions is blocking work
        let search_engine = {
            let cache = Arc::clone(&corpus_cache);
            let data_dir = config.data_dir.clone();
            let plain_source = config.plain_edition.clone();
            let diacritic_source = config.diacritic_edition.clone();
            tokio::task::spawn_blocking(move || {
                Self::build_engine(&cache, &data_dir, &plain_source, diacritic_source.as_ref())
            })
            .await
            .context("Edition loading task failed")??
        };
        let search_engine = Arc::new(search_engine);
        tracing::info!(
            verses = search_engine.plain().len(),
            vocabulary = search_engine.vocabulary().len(),
            "application state initialized"
        );

        Ok(Self {
            search_engine,
            corpus_cache,
            config,
        })
    }

    /// Build state around corpora that are already in memory
    pub fn from_corpora(config: Config, plain: Corpus, diacritic: Option<Corpus>) -> Result<Self> {
        let corpus_cache = Arc::new(CorpusCache::new(config.cache_capacity));

        let plain = Arc::new(plain);
        corpus_cache.insert(plain.identifier(), Arc::clone(&plain))?;
        let diacritic = diacritic.map(Arc::new);
        if let Some(corpus) = &diacritic {
            corpus_cache.insert(corpus.identifier(), Arc::clone(corpus))?;
        }

        Ok(Self {
            search_engine: Arc::new(SearchEngine::new(plain, diacritic)),
            corpus_cache,
            config,
        })
    }

    fn build_engine(
        cache: &CorpusCache,
        data_dir: &Path,
        plain_source: &EditionSource,
        diacritic_source: Option<&EditionSource>,
    ) -> Result<SearchEngine> {
        let plain = Self::load_corpus(cache, data_dir, plain_source)?;
        let diacritic = match diacritic_source {
            Some(source) => match Self::load_corpus(cache, data_dir, source) {
                Ok(corpus) => Some(corpus),
                Err(e) => {
                    tracing::warn!(edition = %source, error = %e, "diacritic edition unavailable");
                    None
                }
            },
            None => None,
        };
        Ok(SearchEngine::new(plain, diacritic))
    }

    fn load_corpus(cache: &CorpusCache, data_dir: &Path, source: &EditionSource) -> Result<Arc<Corpus>> {
        cache.get_or_load(source.identifier(), || load_edition_file(data_dir, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::CorpusVariant;
    use std::fs;

    const PLAIN: &str = r#"{"code":200,"data":{"surahs":[{"number":1,"name":"سُورَةُ ٱلْفَاتِحَةِ","ayahs":[
        {"number":1,"text":"بسم الله الرحمن الرحيم","numberInSurah":1},
        {"number":2,"text":"الحمد لله رب العالمين","numberInSurah":2}]}]}}"#;

    fn offline_config(dir: &Path) -> Config {
        Config {
            data_dir: dir.to_path_buf(),
            fetch_missing: false,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn loads_editions_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        fs::write(dir.path().join(config.plain_edition.file_name()), PLAIN).unwrap();

        // the diacritic edition is missing and gets skipped
        let state = AppState::load(config).await.unwrap();
        assert_eq!(state.search_engine.plain().len(), 2);
        assert_eq!(state.search_engine.search("العالمين").len(), 1);
        assert_eq!(state.corpus_cache.stats().unwrap().len, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn loads_both_editions_off_the_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        fs::write(dir.path().join(config.plain_edition.file_name()), PLAIN).unwrap();
        let diacritic = config.diacritic_edition.clone().unwrap();
        fs::write(dir.path().join(diacritic.file_name()), PLAIN).unwrap();

        let state = AppState::load(config).await.unwrap();
        assert_eq!(state.corpus_cache.stats().unwrap().len, 2);
        assert_eq!(state.search_engine.search("الْحَمْدُ").variant, CorpusVariant::Diacritic);
    }

    #[tokio::test]
    async fn missing_plain_edition_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppState::load(offline_config(dir.path())).await.is_err());
    }

    #[test]
    fn from_corpora_registers_in_cache() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_corpora(
            offline_config(dir.path()),
            Corpus::new("plain", Vec::new()),
            Some(Corpus::new("uthmani", Vec::new())),
        )
        .unwrap();
        let stats = state.corpus_cache.stats().unwrap();
        assert_eq!(stats.identifiers, vec!["uthmani".to_string(), "plain".to_string()]);
    }
}
