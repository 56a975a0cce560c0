// Reserved spans per rank, for overlap detection.
//
// Every placed group reserves an interval across the flow axis at its rank.
// Ranks are bucketed with a tolerance so floating point drift between two
// "equal" ranks cannot split them into separate buckets.

/// An interval across the flow axis: `center +/- half`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span {
    pub center: f64,
    pub half: f64,
}

impl Span {
    pub fn new(center: f64, height: f64) -> Self {
        Self { center, half: height / 2.0 }
    }

    pub fn top(&self) -> f64 {
        self.center - self.half
    }

    pub fn bottom(&self) -> f64 {
        self.center + self.half
    }

    /// Free space between two spans; negative when they intersect.
    pub fn gap(&self, other: &Span) -> f64 {
        (other.top() - self.bottom()).max(self.top() - other.bottom())
    }
}

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
struct RankBucket {
    rank: f64,
    spans: Vec<Span>,
}

#[derive(Debug, Clone)]
pub struct RankIndex {
    tolerance: f64,
    buckets: Vec<RankBucket>,
}

impl RankIndex {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance: tolerance.max(0.0), buckets: Vec::new() }
    }

    fn bucket(&self, rank: f64) -> Option<&RankBucket> {
        self.buckets.iter().find(|b| (b.rank - rank).abs() <= self.tolerance)
    }

    pub fn insert(&mut self, rank: f64, span: Span) {
        let tolerance = self.tolerance;
        match self.buckets.iter_mut().find(|b| (b.rank - rank).abs() <= tolerance) {
            Some(bucket) => bucket.spans.push(span),
            None => self.buckets.push(RankBucket { rank, spans: vec![span] }),
        }
    }

    /// Whether `span` comes closer than `min_gap` to any span at `rank`.
    pub fn collides(&self, rank: f64, span: &Span, min_gap: f64) -> bool {
        self.bucket(rank)
            .is_some_and(|b| b.spans.iter().any(|s| span.gap(s) < min_gap - EPSILON))
    }

    /// Topmost and bottommost edge of everything reserved at `rank`.
    pub fn extent(&self, rank: f64) -> Option<(f64, f64)> {
        let bucket = self.bucket(rank)?;
        let top = bucket.spans.iter().map(Span::top).fold(f64::INFINITY, f64::min);
        let bottom = bucket.spans.iter().map(Span::bottom).fold(f64::NEG_INFINITY, f64::max);
        (!bucket.spans.is_empty()).then_some((top, bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_between_spans() {
        let a = Span::new(0.0, 100.0);
        let b = Span::new(200.0, 100.0);
        assert_eq!(a.gap(&b), 100.0);
        assert_eq!(b.gap(&a), 100.0);
        assert_eq!(a.gap(&Span::new(50.0, 100.0)), -50.0);
    }

    #[test]
    fn test_collides_requires_full_gap() {
        let mut index = RankIndex::new(10.0);
        index.insert(650.0, Span::new(0.0, 150.0));

        // Gap of exactly one spacing unit is fine, anything less is not.
        assert!(!index.collides(650.0, &Span::new(300.0, 150.0), 150.0));
        assert!(index.collides(650.0, &Span::new(299.0, 150.0), 150.0));
        // Other ranks are independent.
        assert!(!index.collides(1050.0, &Span::new(0.0, 150.0), 150.0));
    }

    #[test]
    fn test_ranks_within_tolerance_share_a_bucket() {
        let mut index = RankIndex::new(10.0);
        index.insert(650.0, Span::new(0.0, 150.0));
        index.insert(655.0, Span::new(400.0, 150.0));

        assert!(index.collides(645.0, &Span::new(350.0, 150.0), 150.0));
        assert_eq!(index.extent(650.0), Some((-75.0, 475.0)));
        assert_eq!(index.extent(700.0), None);
    }
}
