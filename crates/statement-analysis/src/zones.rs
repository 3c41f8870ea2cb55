//! Threshold-band classification.
//!
//! A detector declares its bands from least to most severe. Which direction
//! is "bad" lives entirely in the band bounds; the classifier only checks
//! membership.

use statement_core::Zone;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Excludes the endpoint
    Open(f64),
    /// Includes the endpoint
    Closed(f64),
    Unbounded,
}

impl Bound {
    fn admits_from_below(&self, value: f64) -> bool {
        match *self {
            Bound::Open(lower) => value > lower,
            Bound::Closed(lower) => value >= lower,
            Bound::Unbounded => true,
        }
    }

    fn admits_from_above(&self, value: f64) -> bool {
        match *self {
            Bound::Open(upper) => value < upper,
            Bound::Closed(upper) => value <= upper,
            Bound::Unbounded => true,
        }
    }
}

/// True when some value satisfies both `lower` (as a lower bound) and `upper`.
fn bounds_meet(lower: Bound, upper: Bound) -> bool {
    match (lower, upper) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => true,
        (Bound::Closed(l), Bound::Closed(u)) => l <= u,
        (Bound::Closed(l), Bound::Open(u))
        | (Bound::Open(l), Bound::Closed(u))
        | (Bound::Open(l), Bound::Open(u)) => l < u,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub zone: Zone,
    pub lower: Bound,
    pub upper: Bound,
    /// Range description, e.g. "Goodwill increased between 10%-20%"
    pub caption: String,
    /// Replaces the zone caption in the heading
    pub label: Option<&'static str>,
}

impl Band {
    pub fn new(zone: Zone, lower: Bound, upper: Bound, caption: impl Into<String>) -> Self {
        Self {
            zone,
            lower,
            upper,
            caption: caption.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && self.lower.admits_from_below(value) && self.upper.admits_from_above(value)
    }

    fn overlaps(&self, other: &Band) -> bool {
        bounds_meet(self.lower, other.upper) && bounds_meet(other.lower, self.upper)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBands {
    bands: Vec<Band>,
}

impl ZoneBands {
    pub fn new(bands: Vec<Band>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Index of the first band containing `value`. Unknown values never match.
    pub fn position(&self, value: Option<f64>) -> Option<usize> {
        let value = value.filter(|v| v.is_finite())?;
        self.bands.iter().position(|band| band.contains(value))
    }

    pub fn classify(&self, value: Option<f64>) -> Option<&Band> {
        self.position(value).map(|i| &self.bands[i])
    }

    /// True when no two bands share a value.
    pub fn is_partition(&self) -> bool {
        self.bands.iter().enumerate().all(|(i, a)| {
            self.bands[i + 1..].iter().all(|b| !a.overlaps(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margin_bands() -> ZoneBands {
        ZoneBands::new(vec![
            Band::new(Zone::Caution, Bound::Open(-0.20), Bound::Closed(-0.10), "caution"),
            Band::new(Zone::RedFlag, Bound::Open(-0.30), Bound::Closed(-0.20), "red flag"),
            Band::new(Zone::Critical, Bound::Unbounded, Bound::Closed(-0.30), "critical"),
        ])
    }

    #[test]
    fn test_boundaries_follow_bound_kind() {
        let bands = margin_bands();
        assert_eq!(bands.classify(Some(-0.10)).map(|b| b.zone), Some(Zone::Caution));
        assert_eq!(bands.classify(Some(-0.20)).map(|b| b.zone), Some(Zone::RedFlag));
        assert_eq!(bands.classify(Some(-0.30)).map(|b| b.zone), Some(Zone::Critical));
        assert_eq!(bands.classify(Some(-0.95)).map(|b| b.zone), Some(Zone::Critical));
        assert!(bands.classify(Some(-0.05)).is_none());
    }

    #[test]
    fn test_unknown_never_classifies() {
        let bands = margin_bands();
        assert!(bands.classify(None).is_none());
        assert!(bands.classify(Some(f64::NAN)).is_none());
        assert!(bands.classify(Some(f64::NEG_INFINITY)).is_none());
    }

    #[test]
    fn test_partition_detection() {
        assert!(margin_bands().is_partition());

        let shared_edge = ZoneBands::new(vec![
            Band::new(Zone::Caution, Bound::Closed(0.10), Bound::Closed(0.20), "a"),
            Band::new(Zone::RedFlag, Bound::Closed(0.20), Bound::Unbounded, "b"),
        ]);
        assert!(!shared_edge.is_partition());

        let half_open = ZoneBands::new(vec![
            Band::new(Zone::Caution, Bound::Closed(0.10), Bound::Open(0.20), "a"),
            Band::new(Zone::RedFlag, Bound::Closed(0.20), Bound::Unbounded, "b"),
        ]);
        assert!(half_open.is_partition());
    }
}
