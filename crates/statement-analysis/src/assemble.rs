//! Helpers shared by detectors to turn flagged periods into findings.

use statement_core::{Finding, FindingKind, Measure, PeriodObservation, Section, Zone};

use crate::format;
use crate::zones::ZoneBands;

/// Fixed text attached to a detector's finding.
#[derive(Debug, Clone, Copy)]
pub struct Narrative {
    pub title: &'static str,
    pub rationale: &'static str,
}

/// A period that passed the detector's predicate, before zoning.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub year: i32,
    /// Value the bands classify (a level or a change)
    pub key: Option<f64>,
    pub measure: Measure,
    pub companions: Vec<Measure>,
}

impl Candidate {
    pub fn new(year: i32, key: Option<f64>, measure: Measure) -> Self {
        Self {
            year,
            key,
            measure,
            companions: Vec::new(),
        }
    }
}

pub fn observation(year: i32, measure: Measure, companions: Vec<Measure>) -> PeriodObservation {
    PeriodObservation {
        year,
        zone: Zone::None,
        measure,
        companions,
    }
}

/// Groups candidates by band, keeping band order (least severe first).
/// Candidates outside every band are dropped.
pub fn zoned_sections(bands: &ZoneBands, candidates: impl IntoIterator<Item = Candidate>) -> Vec<Section> {
    let mut buckets: Vec<Vec<PeriodObservation>> = vec![Vec::new(); bands.bands().len()];

    for candidate in candidates {
        let Some(index) = bands.position(candidate.key) else {
            continue;
        };
        buckets[index].push(PeriodObservation {
            year: candidate.year,
            zone: bands.bands()[index].zone,
            measure: candidate.measure,
            companions: candidate.companions,
        });
    }

    bands
        .bands()
        .iter()
        .zip(buckets)
        .filter(|(_, observations)| !observations.is_empty())
        .map(|(band, observations)| Section {
            zone: band.zone,
            heading: Some(format::zone_heading(band)),
            observations,
        })
        .collect()
}

/// Single unheaded section, or nothing when no period was flagged.
pub fn flat_sections(observations: Vec<PeriodObservation>) -> Vec<Section> {
    if observations.is_empty() {
        return Vec::new();
    }
    vec![Section {
        zone: Zone::None,
        heading: None,
        observations,
    }]
}

/// Builds the finding, or `None` when no section has observations.
pub fn finding(
    detector_id: &'static str,
    kind: FindingKind,
    narrative: Narrative,
    sections: Vec<Section>,
) -> Option<Finding> {
    let sections: Vec<Section> = sections
        .into_iter()
        .filter(|s| !s.observations.is_empty())
        .collect();
    if sections.is_empty() {
        return None;
    }

    let zone = sections
        .iter()
        .flat_map(|s| s.observations.iter().map(|o| o.zone))
        .max()
        .unwrap_or(Zone::None);

    Some(Finding {
        detector_id,
        kind,
        title: narrative.title.to_string(),
        rationale: narrative.rationale.to_string(),
        zone,
        sections,
    })
}

/// Fiscal years paired with their index, skipping the first period.
pub fn later_periods(years: &[i32]) -> impl Iterator<Item = (usize, i32)> + '_ {
    years.iter().copied().enumerate().skip(1)
}
