use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Dataset, Record, VENDOR_NAME};

/// Unit and vendor selections. `None` selects every offered value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub units: Option<Vec<String>>,
    pub vendors: Option<Vec<String>>,
}

impl RecordFilter {
    pub fn new(units: Vec<String>, vendors: Vec<String>) -> Self {
        Self {
            units: (!units.is_empty()).then_some(units),
            vendors: (!vendors.is_empty()).then_some(vendors),
        }
    }

    /// Units first, then vendors among what is left.
    ///
    /// A filter only bites when the column has values at all: rows with no
    /// Unit No drop out once any row has one, and likewise for vendors.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        let after_units = filter_by(&dataset.records, self.units.as_deref(), |r| {
            r.unit_no.as_deref()
        });
        let after_vendors = filter_by(&after_units, self.vendors.as_deref(), |r| {
            r.get(VENDOR_NAME)
        });
        dataset.with_records(after_vendors)
    }
}

fn filter_by<F>(records: &[Record], selection: Option<&[String]>, value: F) -> Vec<Record>
where
    F: Fn(&Record) -> Option<&str>,
{
    if !records.iter().any(|r| value(r).is_some()) {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| match (value(r), selection) {
            (Some(v), Some(selected)) => selected.iter().any(|s| s == v),
            (Some(_), None) => true,
            (None, _) => false,
        })
        .cloned()
        .collect()
}

/// Values offered by the filters: sorted, distinct, non-null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub units: Vec<String>,
    /// Vendors among rows that pass the unit selection.
    pub vendors: Vec<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset, units: Option<&[String]>) -> Self {
        let unit_values = distinct(dataset.records.iter().map(|r| r.unit_no.as_deref()));
        let unit_filter = RecordFilter {
            units: units.map(<[String]>::to_vec),
            vendors: None,
        };
        let remaining = unit_filter.apply(dataset);
        let vendor_values = distinct(remaining.records.iter().map(|r| r.get(VENDOR_NAME)));
        Self {
            units: unit_values,
            vendors: vendor_values,
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
