//! Candidate relevance scoring.
//!
//! A hand-tuned linear heuristic, not a learned model. Reproducibility is
//! the contract: the constants and thresholds below are load-bearing, and
//! the score must be recomputable from (product name, candidate, matched
//! domain) alone — a pure function with no hidden state.
//!
//! # Score composition
//!
//! 1. Token overlap: fraction of the product name's distinct tokens present
//!    in the tokenized candidate title + source label.
//! 2. `+0.25` when the normalized candidate text contains the normalized
//!    product name as a contiguous phrase.
//! 3. `+0.15` when the candidate came from an allowed domain.
//! 4. `−0.5` / `−0.2` when the smaller image edge is under 100 / 200 px;
//!    unknown dimensions are not penalized.
//! 5. `−0.3` when a low-quality keyword appears in the image URL, page URL,
//!    or title.
//!
//! Final score = `max(0, sum)`, rounded to 4 decimal places. In practice it
//! lands in `[0, 1.4]`; only the lower bound is clamped.

use std::collections::HashSet;

use crate::models::RawImage;
use crate::text::{normalize, tokenize};

/// Bonus for containing the product name as a contiguous phrase.
pub const PHRASE_BONUS: f64 = 0.25;
/// Bonus for originating from an allowed domain.
pub const DOMAIN_BONUS: f64 = 0.15;
/// Penalty when the smaller image edge is under [`TINY_EDGE_PX`].
pub const TINY_PENALTY: f64 = 0.5;
/// Penalty when the smaller image edge is under [`SMALL_EDGE_PX`].
pub const SMALL_PENALTY: f64 = 0.2;
/// Penalty when any of [`BAD_WORDS`] appears in the candidate's URLs or title.
pub const BAD_WORD_PENALTY: f64 = 0.3;

pub const TINY_EDGE_PX: u32 = 100;
pub const SMALL_EDGE_PX: u32 = 200;

/// Keywords that mark a candidate as likely not a product photo.
pub const BAD_WORDS: [&str; 9] = [
    "placeholder",
    "thumb",
    "thumbnail",
    "sprite",
    "swatch",
    "icon",
    "logo",
    "sample",
    "gif",
];

/// Score `candidate` against `product_name`.
///
/// `matched_domain` is the allowed domain the candidate satisfied, or empty
/// when there was no domain restriction or no match. Deterministic and
/// side-effect-free.
pub fn score_candidate(product_name: &str, candidate: &RawImage, matched_domain: &str) -> f64 {
    let name_tokens: HashSet<String> = tokenize(product_name).into_iter().collect();
    let cand_text = format!("{} {}", candidate.title, candidate.source);
    let cand_tokens: HashSet<String> = tokenize(&cand_text).into_iter().collect();

    let overlap = if name_tokens.is_empty() {
        0.0
    } else {
        let hits = name_tokens.iter().filter(|t| cand_tokens.contains(*t)).count();
        hits as f64 / name_tokens.len() as f64
    };

    let phrase_bonus = if normalize(&cand_text).contains(&normalize(product_name)) {
        PHRASE_BONUS
    } else {
        0.0
    };

    let domain_bonus = if matched_domain.is_empty() { 0.0 } else { DOMAIN_BONUS };

    let mut size_penalty = 0.0;
    if let (Some(w), Some(h)) = (candidate.width, candidate.height) {
        if w > 0 && h > 0 {
            let min_edge = w.min(h);
            if min_edge < TINY_EDGE_PX {
                size_penalty = TINY_PENALTY;
            } else if min_edge < SMALL_EDGE_PX {
                size_penalty = SMALL_PENALTY;
            }
        }
    }

    let url_blob =
        format!("{} {} {}", candidate.url, candidate.link, candidate.title).to_lowercase();
    let bad_penalty = if BAD_WORDS.iter().any(|w| url_blob.contains(w)) {
        BAD_WORD_PENALTY
    } else {
        0.0
    };

    let score = (overlap + phrase_bonus + domain_bonus - size_penalty - bad_penalty).max(0.0);
    round4(score)
}

/// Round to 4 decimal places, matching the stored fixture precision.
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, source: &str) -> RawImage {
        RawImage {
            position: 1,
            url: "https://cdn.example.com/a.jpg".to_string(),
            thumbnail: String::new(),
            title: title.to_string(),
            source: source.to_string(),
            link: "https://example.com/p/1".to_string(),
            width: None,
            height: None,
        }
    }

    #[test]
    fn full_overlap_with_phrase_and_domain_bonus() {
        let cand = candidate("Widget Pro product page", "example.com");
        let score = score_candidate("Widget Pro", &cand, "example.com");
        // overlap 1.0 + phrase 0.25 + domain 0.15
        assert_eq!(score, 1.4);
    }

    #[test]
    fn partial_overlap_without_phrase() {
        let cand = candidate("Widget gallery", "shop");
        let score = score_candidate("Widget Pro", &cand, "");
        assert_eq!(score, 0.5);
    }

    #[test]
    fn domain_bonus_never_lowers_a_score() {
        let cand = candidate("Widget Pro", "shop");
        let without = score_candidate("Widget Pro", &cand, "");
        let with = score_candidate("Widget Pro", &cand, "example.com");
        assert!(with >= without);
        assert_eq!(round4(with - without), DOMAIN_BONUS);
    }

    #[test]
    fn overlap_is_invariant_under_token_reordering() {
        let cand = candidate("iPhone 15 Pro official photos", "apple.com");
        let a = score_candidate("iPhone 15 Pro", &cand, "");
        let b = score_candidate("Pro 15 iPhone", &cand, "");
        // Reordering loses only the contiguous-phrase bonus, never overlap.
        assert_eq!(a - b, PHRASE_BONUS);
    }

    #[test]
    fn tiny_and_small_images_are_penalized() {
        let mut cand = candidate("Widget Pro", "shop");
        cand.width = Some(80);
        cand.height = Some(500);
        let tiny = score_candidate("Widget Pro", &cand, "");
        cand.width = Some(150);
        let small = score_candidate("Widget Pro", &cand, "");
        cand.width = Some(500);
        let large = score_candidate("Widget Pro", &cand, "");

        assert_eq!(round4(large - tiny), TINY_PENALTY);
        assert_eq!(round4(large - small), SMALL_PENALTY);
    }

    #[test]
    fn unknown_dimensions_lose_nothing() {
        let cand = candidate("Widget Pro", "shop");
        let with_size = {
            let mut c = cand.clone();
            c.width = Some(500);
            c.height = Some(500);
            score_candidate("Widget Pro", &c, "")
        };
        assert_eq!(score_candidate("Widget Pro", &cand, ""), with_size);
    }

    #[test]
    fn bad_words_are_penalized_case_insensitively() {
        let mut cand = candidate("Widget Pro", "shop");
        let clean = score_candidate("Widget Pro", &cand, "");
        cand.url = "https://cdn.example.com/THUMBNAIL/a.jpg".to_string();
        let dirty = score_candidate("Widget Pro", &cand, "");
        assert_eq!(round4(clean - dirty), BAD_WORD_PENALTY);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let mut cand = candidate("unrelated text", "elsewhere");
        cand.url = "https://cdn.example.com/sprite.png".to_string();
        cand.width = Some(50);
        cand.height = Some(50);
        assert_eq!(score_candidate("Widget Pro", &cand, ""), 0.0);
    }

    #[test]
    fn empty_product_name_has_zero_overlap() {
        let cand = candidate("Widget Pro", "shop");
        // No tokens to overlap; the empty normalized name still counts as a
        // contained phrase, matching the reference behavior.
        assert_eq!(score_candidate("", &cand, ""), PHRASE_BONUS);
    }

    #[test]
    fn score_is_deterministic() {
        let cand = candidate("Widget Pro product", "example.com");
        let a = score_candidate("Widget Pro", &cand, "example.com");
        let b = score_candidate("Widget Pro", &cand, "example.com");
        assert_eq!(a, b);
    }
}
