//! The search engine: batched scanning, result assembly and suggestions.
//!
//! [`SearchEngine`] owns an immutable [`EngineConfig`]. Each call prepares
//! the query once, scans the records in fixed-size batches (checking an
//! optional [`CancelToken`] between batches), then sorts the matches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{ConfigError, EngineConfig};
use crate::error::{Diagnostic, SearchError};
use crate::field::{Record, best_field_match};
use crate::normalize::char_len;
use crate::options::SearchOptions;
use crate::ranking::{MatchType, PreparedQuery};
use crate::sort::sort_results;
use crate::suggest::{Suggestion, rank_suggestions, record_suggestions};

/// A cooperative cancellation flag shared between a caller and a running
/// search.
///
/// Clones share the same flag. The engine checks it between batches, so a
/// search stops within one batch of [`cancel`](Self::cancel) being called.
///
/// ```
/// use collegematch::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One matching record.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'a, R> {
    /// The matched record.
    pub record: &'a R,
    /// Position of the record in the input slice.
    pub index: usize,
    /// Weighted score of the best field. Always positive.
    pub score: f64,
    /// Strategy that matched the best field.
    pub match_type: MatchType,
    /// Name of the best field.
    pub field: String,
}

/// The full outcome of [`SearchEngine::search_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport<'a, R> {
    /// Matches, best first.
    pub results: Vec<SearchResult<'a, R>>,
    /// Non-fatal problems with the query, such as an invalid regex.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of records evaluated.
    pub scanned: usize,
}

/// Multi-strategy search over a slice of records.
///
/// # Examples
///
/// ```
/// use collegematch::{College, MatchType, SearchEngine, SearchOptions};
///
/// let colleges = vec![
///     College { name: Some("AIIMS Delhi".into()), state: Some("Delhi".into()), ..Default::default() },
///     College { name: Some("JIPMER".into()), city: Some("Puducherry".into()), ..Default::default() },
/// ];
///
/// let engine = SearchEngine::default();
/// let results = engine.search("aiims", &colleges, &SearchOptions::default());
/// assert_eq!(results[0].index, 0);
/// assert_eq!(results[0].match_type, MatchType::WordStart);
/// assert_eq!(results[0].field, "name");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: EngineConfig,
}

impl SearchEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank `records` against `query`.
    ///
    /// Returns every record with at least one matching field, best first;
    /// equal scores keep input order. An empty or whitespace-only query
    /// returns no results. Invalid patterns are logged and skipped; use
    /// [`search_report`](Self::search_report) to receive them.
    pub fn search<'a, R: Record + Sync>(
        &self,
        query: &str,
        records: &'a [R],
        options: &SearchOptions,
    ) -> Vec<SearchResult<'a, R>> {
        match self.search_report(query, records, options, None) {
            Ok(report) => report.results,
            Err(err) => {
                tracing::warn!(%err, "search without a cancel token was cancelled");
                Vec::new()
            }
        }
    }

    /// Like [`search`](Self::search), but also returns diagnostics and
    /// honors an optional cancellation token.
    ///
    /// # Errors
    ///
    /// [`SearchError::Cancelled`] when `cancel` fires before the scan ends.
    pub fn search_report<'a, R: Record + Sync>(
        &self,
        query: &str,
        records: &'a [R],
        options: &SearchOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<SearchReport<'a, R>, SearchError> {
        let Some(mut q) = PreparedQuery::new(query, options, &self.config) else {
            return Ok(SearchReport {
                results: Vec::new(),
                diagnostics: Vec::new(),
                scanned: 0,
            });
        };
        let diagnostics = std::mem::take(&mut q.diagnostics);

        let config = &self.config;
        let mut results = self.scan(records, cancel, |index, record, buf| {
            let m = best_field_match(
                record,
                &config.fields,
                &q,
                &config.strategy_order,
                options,
                config.fold_diacritics,
                buf,
            )?;
            Some(SearchResult {
                record,
                index,
                score: m.score,
                match_type: m.match_type,
                field: config.fields[m.field_index].name.clone(),
            })
        })?;
        sort_results(&mut results);

        tracing::debug!(
            records = records.len(),
            matched = results.len(),
            diagnostics = diagnostics.len(),
            "search complete"
        );

        Ok(SearchReport {
            results,
            diagnostics,
            scanned: records.len(),
        })
    }

    /// Up to `max` type-ahead suggestions for `query`, best first.
    ///
    /// Queries shorter than the configured minimum (2 characters by default)
    /// return nothing. Values are de-duplicated by text and category.
    ///
    /// ```
    /// use collegematch::{College, SearchEngine};
    ///
    /// let colleges = vec![
    ///     College { name: Some("Delhi Technological University".into()), state: Some("Delhi".into()), ..Default::default() },
    ///     College { name: Some("Delhi University".into()), state: Some("Delhi".into()), ..Default::default() },
    /// ];
    /// let engine = SearchEngine::default();
    /// let suggestions = engine.suggest("delhi", &colleges, 5);
    /// assert_eq!(suggestions.len(), 3);
    /// assert_eq!(suggestions[2].text, "Delhi");
    /// assert_eq!(suggestions[2].kind, "state");
    /// assert!(engine.suggest("d", &colleges, 5).is_empty());
    /// ```
    pub fn suggest<R: Record + Sync>(&self, query: &str, records: &[R], max: usize) -> Vec<Suggestion> {
        match self.suggest_with_cancel(query, records, max, None) {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::warn!(%err, "suggest without a cancel token was cancelled");
                Vec::new()
            }
        }
    }

    /// [`suggest`](Self::suggest) with an optional cancellation token.
    ///
    /// # Errors
    ///
    /// [`SearchError::Cancelled`] when `cancel` fires before the scan ends.
    pub fn suggest_with_cancel<R: Record + Sync>(
        &self,
        query: &str,
        records: &[R],
        max: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<Suggestion>, SearchError> {
        if max == 0 {
            return Ok(Vec::new());
        }
        let Some(q) = PreparedQuery::new(query, &SearchOptions::literal_only(), &self.config) else {
            return Ok(Vec::new());
        };
        if char_len(&q.text) < self.config.min_suggest_chars {
            return Ok(Vec::new());
        }

        let config = &self.config;
        let per_record = self.scan(records, cancel, |_, record, buf| {
            let found = record_suggestions(
                record,
                &config.suggestion_fields,
                &q,
                config.suggestion_fuzzy_threshold,
                config.fold_diacritics,
                buf,
            );
            (!found.is_empty()).then_some(found)
        })?;

        let candidates: Vec<Suggestion> = per_record.into_iter().flatten().collect();
        let suggestions = rank_suggestions(candidates, max);
        tracing::debug!(records = records.len(), suggestions = suggestions.len(), "suggest complete");
        Ok(suggestions)
    }

    /// Apply `score` to every record, batch by batch, keeping the `Some`s in
    /// input order.
    ///
    /// `score` receives the record's index, the record, and a scratch buffer
    /// that is reused across records scored on the same thread.
    fn scan<'a, R, T, F>(
        &self,
        records: &'a [R],
        cancel: Option<&CancelToken>,
        score: F,
    ) -> Result<Vec<T>, SearchError>
    where
        R: Sync,
        T: Send,
        F: Fn(usize, &'a R, &mut String) -> Option<T> + Sync,
    {
        let batch_size = self.config.batch_size.max(1);
        let parallel = records.len() >= self.config.parallel_threshold;
        let mut out = Vec::new();
        let mut scanned = 0;

        for batch in records.chunks(batch_size) {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                tracing::debug!(scanned, total = records.len(), "scan cancelled");
                return Err(SearchError::Cancelled { scanned });
            }
            score_batch(batch, scanned, parallel, &score, &mut out);
            scanned += batch.len();
        }

        Ok(out)
    }
}

fn score_batch_sequential<'a, R, T, F>(batch: &'a [R], offset: usize, score: &F, out: &mut Vec<T>)
where
    F: Fn(usize, &'a R, &mut String) -> Option<T>,
{
    let mut buf = String::new();
    out.extend(
        batch
            .iter()
            .enumerate()
            .filter_map(|(i, record)| score(offset + i, record, &mut buf)),
    );
}

#[cfg(feature = "parallel")]
fn score_batch<'a, R, T, F>(batch: &'a [R], offset: usize, parallel: bool, score: &F, out: &mut Vec<T>)
where
    R: Sync,
    T: Send,
    F: Fn(usize, &'a R, &mut String) -> Option<T> + Sync,
{
    use rayon::prelude::*;

    if !parallel {
        score_batch_sequential(batch, offset, score, out);
        return;
    }
    let scored: Vec<T> = batch
        .par_iter()
        .enumerate()
        .map_init(String::new, |buf, (i, record)| score(offset + i, record, buf))
        .flatten()
        .collect();
    out.extend(scored);
}

#[cfg(not(feature = "parallel"))]
fn score_batch<'a, R, T, F>(batch: &'a [R], offset: usize, _parallel: bool, score: &F, out: &mut Vec<T>)
where
    F: Fn(usize, &'a R, &mut String) -> Option<T>,
{
    score_batch_sequential(batch, offset, score, out);
}
