//! Narrative formatting: numbers, arrows, zone headings and finding text.
//!
//! This is the only module that knows about presentation glyphs. Detectors
//! produce typed [`Measure`]s and [`Section`]s; everything textual is decided
//! here.

use statement_core::{
    Direction, Finding, FindingKind, InsufficientData, Measure, PeriodObservation, Unit, Zone,
};

use crate::zones::Band;

pub const RED_FLAG_PREFIX: &str = "!!! ";
pub const POSITIVE_PREFIX: &str = "✓✓✓ ";

/// Line printed between findings in a report.
pub const SEPARATOR: &str =
    "_____________________________________________________________________________________________";

const NOT_AVAILABLE: &str = "n/a";

fn strip_trailing_zeros(text: String) -> String {
    let stripped = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    if stripped == "-0" {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Scales to "million"/"billion" and strips trailing zeros.
///
/// `format_number(1_234_000_000.0) == "1.23 billion"`, `format_number(950.0) == "950"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{} billion", strip_trailing_zeros(format!("{:.2}", value / 1_000_000_000.0)))
    } else if magnitude >= 1_000_000.0 {
        format!("{} million", strip_trailing_zeros(format!("{:.2}", value / 1_000_000.0)))
    } else {
        strip_trailing_zeros(format!("{:.2}", value))
    }
}

/// Two decimals with trailing zeros stripped. No `%` is appended.
pub fn format_percent(percent: f64) -> String {
    if !percent.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    strip_trailing_zeros(format!("{:.2}", percent))
}

/// Fixed two decimals, used for ratios and day counts.
pub fn format_ratio(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let text = format!("{:.2}", value);
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

pub fn format_value(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Money | Unit::Shares => format_number(value),
        Unit::Ratio => format_ratio(value),
        Unit::Percent if value.is_finite() => format!("{}%", format_percent(value)),
        Unit::Percent => NOT_AVAILABLE.to_string(),
        Unit::Days if value.is_finite() => format!("{} days", format_ratio(value)),
        Unit::Days => NOT_AVAILABLE.to_string(),
    }
}

pub fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Flat => "→",
    }
}

/// Builds a measure; the change is a fraction and drives the direction.
pub fn measure(label: &str, value: f64, unit: Unit, change: Option<f64>) -> Measure {
    Measure {
        label: label.to_string(),
        value,
        formatted: format_value(value, unit),
        change,
        direction: change.map(Direction::from_change),
    }
}

pub fn zone_caption(zone: Zone) -> &'static str {
    match zone {
        Zone::None => "",
        Zone::Caution => "Caution Zone",
        Zone::RedFlag => "Red Flag",
        Zone::Critical => "Critical Zone",
    }
}

/// `"<zone caption>: <band caption>"`, or the band's own label in place of the zone caption.
pub fn zone_heading(band: &Band) -> String {
    let label = band.label.unwrap_or_else(|| zone_caption(band.zone));
    format!("{}: {}", label, band.caption)
}

/// Range caption for a band expressed in percent, e.g. "between 10%-20%".
pub fn percent_range(lower: f64, upper: f64) -> String {
    format!(
        "between {}%-{}%",
        format_percent(lower.abs() * 100.0),
        format_percent(upper.abs() * 100.0)
    )
}

pub fn percent_above(threshold: f64) -> String {
    format!("above {}%", format_percent(threshold.abs() * 100.0))
}

pub fn render_measure(measure: &Measure) -> String {
    match (measure.change, measure.direction) {
        (Some(change), Some(direction)) => format!(
            "{} = {} ({} {}%)",
            measure.label,
            measure.formatted,
            arrow(direction),
            format_percent(change.abs() * 100.0)
        ),
        _ => format!("{} = {}", measure.label, measure.formatted),
    }
}

/// `FY <year>: <label> = <value> (<arrow> <pct>%)[, <companion>...]`
pub fn render_observation(observation: &PeriodObservation) -> String {
    let mut parts = Vec::with_capacity(1 + observation.companions.len());
    parts.push(render_measure(&observation.measure));
    parts.extend(observation.companions.iter().map(render_measure));
    format!("FY {}: {}", observation.year, parts.join(", "))
}

pub fn title_prefix(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::RedFlag => RED_FLAG_PREFIX,
        FindingKind::Positive => POSITIVE_PREFIX,
    }
}

/// Title, blank line, rationale, blank line, then one line per flagged
/// period with zone headings between groups.
pub fn render_finding(finding: &Finding) -> String {
    let mut lines = vec![
        format!("{}{}", title_prefix(finding.kind), finding.title),
        String::new(),
        finding.rationale.clone(),
        String::new(),
    ];

    for (i, section) in finding.sections.iter().enumerate() {
        if let Some(heading) = &section.heading {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(heading.clone());
        }
        lines.extend(section.observations.iter().map(render_observation));
    }

    lines.join("\n")
}

pub fn render_insufficient(data: &InsufficientData) -> String {
    data.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::Bound;
    use statement_core::Section;

    #[test]
    fn test_format_number_scales() {
        assert_eq!(format_number(1_234_000_000.0), "1.23 billion");
        assert_eq!(format_number(2_000_000.0), "2 million");
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(-205_500_000.0), "-205.5 million");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(f64::NAN), "n/a");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0), "10");
        assert_eq!(format_percent(10.556), "10.56");
        assert_eq!(format_percent(8.695652), "8.7");
        assert_eq!(format_percent(60.0), "60");
    }

    #[test]
    fn test_format_value_units() {
        assert_eq!(format_value(2.456, Unit::Ratio), "2.46");
        assert_eq!(format_value(22.5, Unit::Percent), "22.5%");
        assert_eq!(format_value(54.0, Unit::Days), "54.00 days");
        assert_eq!(format_value(f64::INFINITY, Unit::Percent), "n/a");
    }

    #[test]
    fn test_observation_line() {
        let observation = PeriodObservation {
            year: 2023,
            zone: Zone::None,
            measure: measure("Revenue", 1050.0, Unit::Money, Some(-0.0869565)),
            companions: vec![measure("Net Income", 800.0, Unit::Money, Some(0.6))],
        };
        assert_eq!(
            render_observation(&observation),
            "FY 2023: Revenue = 1050 (↓ 8.7%), Net Income = 800 (↑ 60%)"
        );
    }

    #[test]
    fn test_zone_heading_with_label() {
        let band = Band::new(Zone::Caution, Bound::Open(0.10), Bound::Closed(0.20), "Goodwill increased between 10%-20%");
        assert_eq!(zone_heading(&band), "Caution Zone: Goodwill increased between 10%-20%");

        let negative = Band::new(Zone::Critical, Bound::Unbounded, Bound::Open(0.0), "Operating loss")
            .with_label("Negative Interest Coverage");
        assert_eq!(zone_heading(&negative), "Negative Interest Coverage: Operating loss");
    }

    #[test]
    fn test_percent_captions() {
        assert_eq!(percent_range(0.15, 0.30), "between 15%-30%");
        assert_eq!(percent_range(-0.10, -0.20), "between 10%-20%");
        assert_eq!(percent_above(-0.30), "above 30%");
    }

    #[test]
    fn test_render_finding_layout() {
        let finding = Finding {
            detector_id: "goodwill_growth",
            kind: FindingKind::RedFlag,
            title: "Large Increases in Goodwill or Intangible Assets".to_string(),
            rationale: "Risk of overpaying.".to_string(),
            zone: Zone::RedFlag,
            sections: vec![
                Section {
                    zone: Zone::Caution,
                    heading: Some("Caution Zone: Goodwill increased between 10%-20%".to_string()),
                    observations: vec![PeriodObservation {
                        year: 2021,
                        zone: Zone::Caution,
                        measure: measure("Goodwill", 115.0, Unit::Money, Some(0.15)),
                        companions: Vec::new(),
                    }],
                },
                Section {
                    zone: Zone::RedFlag,
                    heading: Some("Red Flag: Goodwill increased above 20%".to_string()),
                    observations: vec![PeriodObservation {
                        year: 2022,
                        zone: Zone::RedFlag,
                        measure: measure("Goodwill", 150.0, Unit::Money, Some(0.3043478)),
                        companions: Vec::new(),
                    }],
                },
            ],
        };

        let expected = "!!! Large Increases in Goodwill or Intangible Assets\n\
                        \n\
                        Risk of overpaying.\n\
                        \n\
                        Caution Zone: Goodwill increased between 10%-20%\n\
                        FY 2021: Goodwill = 115 (↑ 15%)\n\
                        \n\
                        Red Flag: Goodwill increased above 20%\n\
                        FY 2022: Goodwill = 150 (↑ 30.43%)";
        assert_eq!(render_finding(&finding), expected);
    }
}
