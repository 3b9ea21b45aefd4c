use insights_core::Campaign;

/// A pure reduction over the campaign list, re-run whenever the dataset or
/// its parameters change.
///
/// Implementations never fail: absent breakdowns count as empty and every
/// ratio is zero-guarded, so the worst outcome is an all-zero result.
pub trait Aggregator {
    /// Extra inputs beyond the dataset (`()` for most views).
    type Params: Clone + PartialEq + Send + Sync;
    type Output: Clone + Send + Sync;

    /// Short name used in logs and metrics.
    const NAME: &'static str;

    fn aggregate(campaigns: &[Campaign], params: &Self::Params) -> Self::Output;
}
