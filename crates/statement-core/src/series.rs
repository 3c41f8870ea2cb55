use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Field, FiscalPeriodRecord};

/// Ordered yearly table of statement fields for one company.
///
/// Years are unique and ascending (gaps allowed). Every field has a column of
/// the same length as `years`; unknown values are `NaN`, never `0`, so ratio
/// and change math propagate "unknown" instead of a false signal.
///
/// The series is an immutable snapshot: detectors borrow it and compute their
/// own derived arrays.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSeries {
    symbol: String,
    years: Vec<i32>,
    columns: BTreeMap<Field, Vec<f64>>,
}

impl FinancialSeries {
    /// The explicit empty-series marker. Detectors skip it.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            years: Vec::new(),
            columns: Field::ALL.iter().map(|f| (*f, Vec::new())).collect(),
        }
    }

    pub fn from_records(
        symbol: impl Into<String>,
        records: impl IntoIterator<Item = FiscalPeriodRecord>,
    ) -> Self {
        let mut builder = SeriesBuilder::new(symbol);
        builder.extend(records);
        builder.build()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Column for `field`, one value per year (NaN where unknown).
    pub fn values(&self, field: Field) -> &[f64] {
        self.columns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when at least one period carries a finite value for `field`.
    pub fn has(&self, field: Field) -> bool {
        self.values(field).iter().any(|v| v.is_finite())
    }

    /// Fields from `required` that are absent from every period.
    pub fn missing(&self, required: &[Field]) -> Vec<Field> {
        required.iter().copied().filter(|f| !self.has(*f)).collect()
    }

    /// Fields from `required` with at least one unknown period.
    pub fn incomplete(&self, required: &[Field]) -> Vec<Field> {
        required
            .iter()
            .copied()
            .filter(|f| self.values(*f).iter().any(|v| !v.is_finite()))
            .collect()
    }
}

/// Collects raw period records and produces a [`FinancialSeries`].
///
/// Records sharing a fiscal year are merged field by field; a later non-null
/// value replaces an earlier one. This lets the balance sheet, income
/// statement and cash-flow statement arrive as separate records.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    symbol: String,
    periods: BTreeMap<i32, FiscalPeriodRecord>,
    skipped: usize,
}

impl SeriesBuilder {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            periods: BTreeMap::new(),
            skipped: 0,
        }
    }

    pub fn push(&mut self, record: FiscalPeriodRecord) {
        let Some(year) = record.fiscal_year() else {
            self.skipped += 1;
            tracing::warn!(
                symbol = %self.symbol,
                "Skipping statement record without calendarYear or date"
            );
            return;
        };

        if self.symbol.is_empty() {
            if let Some(symbol) = &record.symbol {
                self.symbol = symbol.clone();
            }
        }

        let entry = self
            .periods
            .entry(year)
            .or_insert_with(|| FiscalPeriodRecord::new(year));

        for field in Field::ALL {
            let Some(incoming) = record.get(field) else {
                continue;
            };
            let slot = entry.slot_mut(field);
            if let Some(existing) = *slot {
                if existing != incoming {
                    tracing::debug!(
                        year,
                        field = field.key(),
                        existing,
                        incoming,
                        "Conflicting values for fiscal year; keeping the later record"
                    );
                }
            }
            *slot = Some(incoming);
        }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = FiscalPeriodRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// Number of records dropped because no fiscal year could be resolved.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn build(self) -> FinancialSeries {
        if self.periods.is_empty() {
            return FinancialSeries::empty(self.symbol);
        }

        let years: Vec<i32> = self.periods.keys().copied().collect();
        let columns = Field::ALL
            .iter()
            .map(|field| {
                let column = self
                    .periods
                    .values()
                    .map(|record| record.get(*field).unwrap_or(f64::NAN))
                    .collect();
                (*field, column)
            })
            .collect();

        FinancialSeries {
            symbol: self.symbol,
            years,
            columns,
        }
    }
}
