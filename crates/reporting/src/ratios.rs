//! Derived ratios. Every ratio yields 0 when its denominator is 0, so an
//! empty bucket renders as zeros rather than NaN or infinity.

/// Click-through rate in percent: clicks / impressions × 100.
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions > 0 {
        clicks as f64 / impressions as f64 * 100.0
    } else {
        0.0
    }
}

/// Conversion rate in percent: conversions / clicks × 100.
pub fn conversion_rate(conversions: u64, clicks: u64) -> f64 {
    if clicks > 0 {
        conversions as f64 / clicks as f64 * 100.0
    } else {
        0.0
    }
}

/// Return on ad spend: revenue / spend.
pub fn roas(revenue: f64, spend: f64) -> f64 {
    if spend > 0.0 {
        revenue / spend
    } else {
        0.0
    }
}

/// Cost per click: spend / clicks.
pub fn cpc(spend: f64, clicks: u64) -> f64 {
    if clicks > 0 {
        spend / clicks as f64
    } else {
        0.0
    }
}

/// `part` as a percentage of `total`.
pub fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Plain average of `total` over `count` items.
pub fn per_item(total: f64, count: u64) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}
