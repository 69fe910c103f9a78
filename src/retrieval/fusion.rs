//! Score normalization and result merging
//!
//! Lexical and semantic scores live on different scales, so each list is
//! normalized on its own before the lists are concatenated, sorted and
//! deduplicated by chunk text.

use crate::config::{DedupKey, ScoreNormalization};
use crate::types::{RetrievalMethod, ScoredChunk};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Min-max scale scores into [0, 1]
///
/// A list whose scores are all equal maps to 1.0 everywhere when that score
/// is positive and to 0.0 otherwise, so a list of non-matches never ties the
/// best hit of another list.
pub fn min_max_normalize(scores: &[f32]) -> Vec<f32> {
    let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    let flat = if max > 0.0 { 1.0 } else { 0.0 };

    scores
        .iter()
        .map(|s| if range > 0.0 { (s - min) / range } else { flat })
        .collect()
}

/// Rank-based scores for a best-first list of length `n`: `(n - i) / n`
pub fn rank_normalize(n: usize) -> Vec<f32> {
    (0..n).map(|i| (n - i) as f32 / n as f32).collect()
}

/// Rewrite the scores of one retriever's best-first result list
pub fn normalize_scores(
    mut results: Vec<ScoredChunk>,
    normalization: ScoreNormalization,
) -> Vec<ScoredChunk> {
    let normalized = match normalization {
        ScoreNormalization::Raw => return results,
        ScoreNormalization::MinMax => {
            let raw: Vec<f32> = results.iter().map(|r| r.score).collect();
            min_max_normalize(&raw)
        }
        ScoreNormalization::Rank => rank_normalize(results.len()),
    };

    for (result, score) in results.iter_mut().zip(normalized) {
        result.score = score;
    }
    results
}

/// Key under which two chunks count as the same passage
pub fn dedup_key(text: &str, key: DedupKey) -> Cow<'_, str> {
    match key {
        DedupKey::Exact => Cow::Borrowed(text),
        DedupKey::Whitespace => Cow::Owned(text.split_whitespace().collect::<Vec<_>>().join(" ")),
    }
}

/// Concatenate lists, sort best first, drop repeated texts, keep `k`
///
/// The sort is stable, so among equal scores earlier lists win, and the first
/// occurrence of a text is the one kept.
pub fn merge_and_dedup(lists: Vec<Vec<ScoredChunk>>, dedup: DedupKey, k: usize) -> Vec<ScoredChunk> {
    let mut merged: Vec<ScoredChunk> = lists.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut seen: HashSet<String> = HashSet::with_capacity(merged.len());
    let mut results = Vec::with_capacity(k.min(merged.len()));
    for mut candidate in merged {
        if results.len() == k {
            break;
        }
        if seen.insert(dedup_key(candidate.text(), dedup).into_owned()) {
            candidate.method = RetrievalMethod::Hybrid;
            results.push(candidate);
        }
    }
    results
}
