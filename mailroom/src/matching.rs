//! Customer matching
//!
//! Matches OCR-extracted recipient/company text against the registry.
//! Scoring is intentionally coarse: exact equality 1.0, substring
//! containment 0.9, otherwise 0. A customer matches when either its
//! name score or its company score exceeds [`MATCH_THRESHOLD`].
//!
//! When several customers exceed the threshold the highest score wins;
//! a true tie at the top between distinct customers is reported as
//! `Unmatched` so a human resolves it, instead of silently picking one
//! by iteration order.

use shared::models::Customer;

/// Minimum similarity (exclusive) for a candidate to count as a match
pub const MATCH_THRESHOLD: f32 = 0.8;

/// Result of matching extracted text against the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    Matched(&'a Customer),
    Unmatched,
}

impl<'a> MatchResult<'a> {
    pub fn customer(&self) -> Option<&'a Customer> {
        match self {
            MatchResult::Matched(c) => Some(c),
            MatchResult::Unmatched => None,
        }
    }
}

/// Coarse similarity between two strings, case-insensitive and trimmed
fn similarity(a: &str, b: &str) -> f32 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.9;
    }
    0.0
}

/// Best score a customer achieves across its name and company fields
fn candidate_score(name: &str, company: &str, customer: &Customer) -> f32 {
    similarity(name, &customer.name).max(similarity(company, &customer.company))
}

/// Find the best-matching customer for extracted name/company text
///
/// Pure function over its inputs; iteration order of `registry` does
/// not affect the result.
pub fn find_best_match<'a>(
    extracted_name: &str,
    extracted_company: &str,
    registry: &'a [Customer],
) -> MatchResult<'a> {
    let mut best: Option<(&Customer, f32)> = None;
    let mut tied = false;

    for customer in registry {
        let score = candidate_score(extracted_name, extracted_company, customer);
        if score <= MATCH_THRESHOLD {
            continue;
        }
        match best {
            None => best = Some((customer, score)),
            Some((_, best_score)) if score > best_score => {
                best = Some((customer, score));
                tied = false;
            }
            Some((_, best_score)) if score == best_score => tied = true,
            Some(_) => {}
        }
    }

    match best {
        Some((customer, score)) if !tied => {
            tracing::debug!(
                customer_id = %customer.customer_id,
                score = score,
                "Matched extraction to customer"
            );
            MatchResult::Matched(customer)
        }
        Some(_) => {
            tracing::info!(
                name = extracted_name,
                "Ambiguous match (top-score tie), leaving unassigned"
            );
            MatchResult::Unmatched
        }
        None => MatchResult::Unmatched,
    }
}
