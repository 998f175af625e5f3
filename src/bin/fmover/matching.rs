use std::collections::BTreeSet;

use itertools::Itertools;

use fiscal_mover::{significant_tokens, tokenize};

use crate::types::MatchResult;

/// Pick the destination folder whose name shares the most significant words
/// with the company name.
///
/// The company's significant words are intersected with the folder's full
/// word set. Generic words never make it into the company set (except through
/// the all-generic fallback), so they cannot inflate a folder's score, while
/// a company name made up entirely of generic words can still find its folder.
///
/// A candidate only qualifies when at least half of the company's significant
/// words (rounded down, minimum one) appear in the folder name. Candidates are
/// compared in lexicographic folder-name order and a better candidate must
/// score strictly higher, so ties keep the lexicographically first folder
/// regardless of directory listing order.
pub fn resolve_destination(company: &str, folders: &[String], generic: &BTreeSet<String>) -> MatchResult {
    let company_tokens = significant_tokens(&tokenize(company), generic);
    if company_tokens.is_empty() {
        return MatchResult::Unmatched;
    }
    let required = (company_tokens.len() / 2).max(1);

    let mut best: Option<(usize, &String)> = None;
    for folder in folders.iter().sorted() {
        let folder_tokens = tokenize(folder);
        let score = company_tokens.intersection(&folder_tokens).count();
        if score >= required && best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, folder));
        }
    }

    best.map_or(MatchResult::Unmatched, |(score, folder)| MatchResult::Matched {
        folder: folder.clone(),
        score,
    })
}
