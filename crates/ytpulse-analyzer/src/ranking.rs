//! Rankings and quota accounting over already-fetched items. No I/O.

use std::cmp::Ordering;

use crate::types::ItemRecord;
use crate::BATCH_SIZE;

/// Two top-N views borrowing from the same item slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<'a> {
    /// Highest engagement first; ties broken by views, then by publication
    /// time, both descending.
    pub top_engagement: Vec<&'a ItemRecord>,
    /// Most viewed first; equal view counts keep their input order.
    pub top_views: Vec<&'a ItemRecord>,
}

/// Ranks `items` by engagement and by views, each truncated to `limit`.
///
/// Both sorts are stable, so items that compare equal keep the order they
/// had in `items`.
#[must_use]
pub fn rank(items: &[ItemRecord], limit: usize) -> Ranking<'_> {
    let mut top_engagement: Vec<&ItemRecord> = items.iter().collect();
    top_engagement.sort_by(|a, b| engagement_key_cmp(b, a));
    top_engagement.truncate(limit);

    let mut top_views: Vec<&ItemRecord> = items.iter().collect();
    top_views.sort_by(|a, b| b.views.cmp(&a.views));
    top_views.truncate(limit);

    Ranking {
        top_engagement,
        top_views,
    }
}

/// Ascending comparison on `(engagement_rate, views, published_at)`.
///
/// `published_at` compares lexicographically, which orders ISO-8601 UTC
/// timestamps chronologically.
fn engagement_key_cmp(a: &ItemRecord, b: &ItemRecord) -> Ordering {
    a.engagement_rate
        .total_cmp(&b.engagement_rate)
        .then_with(|| a.views.cmp(&b.views))
        .then_with(|| a.published_at.cmp(&b.published_at))
}

/// Estimated provider quota cost of an analysis that enumerated `enumerated`
/// uploads: one unit for the channel lookup plus two per batch of 50 (one
/// playlist page, one details call).
///
/// This is a fixed accounting formula kept for output compatibility, not a
/// model of real billing. Returns `None` when nothing was enumerated.
#[must_use]
pub fn quota_estimate(enumerated: usize) -> Option<u64> {
    if enumerated == 0 {
        return None;
    }
    let batches = enumerated.div_ceil(BATCH_SIZE) as u64;
    Some(1 + 2 * batches)
}
