//! Candidate selection: domain filtering, scoring, ranking, truncation —
//! plus the deterministic fallback set used when the provider is unavailable.

use std::cmp::Ordering;

use crate::domain::{host_of, match_host};
use crate::models::{RawImage, ScoredImage};
use crate::score::score_candidate;

/// Filter, score, and rank raw candidates for one product.
///
/// The hostname is taken from each candidate's source page URL; an
/// unparsable URL yields an empty host and counts as a non-match. When
/// `domains` is non-empty, non-matching candidates are dropped. Survivors
/// are scored, sorted descending by score (stable — provider order breaks
/// ties), truncated to `top_n`, and assigned dense 1-based ranks, so
/// `len == min(top_n, survivors)` and ranks are exactly `1..=len`.
pub fn select_candidates(
    product_name: &str,
    domains: &[String],
    raw: Vec<RawImage>,
    top_n: usize,
) -> Vec<ScoredImage> {
    let mut scored: Vec<ScoredImage> = Vec::new();

    for img in raw {
        let host = host_of(&img.link);
        let matched = match_host(&host, domains);
        if !domains.is_empty() && matched.is_none() {
            continue;
        }
        let matched_domain = matched.unwrap_or_default();
        let score = score_candidate(product_name, &img, &matched_domain);

        scored.push(ScoredImage {
            rank: 0,
            url: if img.url.is_empty() { img.thumbnail.clone() } else { img.url.clone() },
            thumbnail: img.thumbnail,
            title: if img.title.is_empty() { product_name.to_string() } else { img.title },
            source_domain: host,
            source_url: img.link,
            width: img.width,
            height: img.height,
            score,
            matched_domain,
        });
    }

    // Vec::sort_by is stable: equal scores keep provider order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(top_n);
    for (i, img) in scored.iter_mut().enumerate() {
        img.rank = i + 1;
    }
    scored
}

/// Deterministic placeholder candidates for a product, labeled against the
/// requested domains. Returned when the provider is unconfigured or a call
/// fails, so a degraded batch still completes instead of aborting.
pub fn fallback_candidates(product_name: &str, domains: &[String]) -> Vec<ScoredImage> {
    let targets: Vec<String> = if domains.is_empty() {
        vec!["example.com".to_string()]
    } else {
        domains.to_vec()
    };
    let encoded = urlencoding::encode(product_name).into_owned();

    (0..3)
        .map(|i| {
            let domain = targets[i % targets.len()].clone();
            ScoredImage {
                rank: i + 1,
                url: format!(
                    "https://via.placeholder.com/400x300/3b82f6/ffffff?text={}",
                    encoded
                ),
                thumbnail: format!(
                    "https://via.placeholder.com/200x150/3b82f6/ffffff?text={}",
                    encoded
                ),
                title: format!("{} - Demo Image {}", product_name, i + 1),
                source_domain: domain.clone(),
                source_url: format!("https://{}/product/{}", domain, encoded),
                width: Some(400),
                height: Some(300),
                score: (9 - i) as f64 / 10.0,
                matched_domain: domain,
            }
        })
        .collect()
}
