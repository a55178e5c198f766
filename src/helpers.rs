use strsim::levenshtein;
use strum::IntoEnumIterator;

use crate::status::CommentStatus;

/// Find the most similar candidate within a small edit distance.
pub fn find_similar<'a>(target: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(target, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(id, _)| id)
}

/// Parses a status label given on the command line, any case.
pub fn parse_status(input: &str) -> Result<CommentStatus, String> {
    if let Ok(status) = input.trim().parse() {
        return Ok(status);
    }

    let labels: Vec<String> = CommentStatus::iter()
        .map(|s| s.as_ref().to_lowercase())
        .collect();
    let candidates: Vec<&str> = labels.iter().map(String::as_str).collect();

    match find_similar(&input.trim().to_lowercase(), &candidates) {
        Some(suggestion) => Err(format!(
            "Unknown status: {input}\nDid you mean: {suggestion}"
        )),
        None => Err(format!(
            "Unknown status: {input}\nExpected one of: {}",
            candidates.join(", ")
        )),
    }
}
