//! Grouped aggregation of long rows into the final tidy table.
//!
//! Categorizes every distinct feature name, verifies the decomposition is
//! lossless, then groups by (subject, activity, facets) and computes count
//! and mean of value per group.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::facets::{
    AccelerationSource, Axis, Domain, FacetTable, FeatureFacets, Instrument, Jerk, Magnitude,
    Statistic,
};
use crate::reshape::LongRow;

/// One row of the final tidy output. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRow {
    pub subject: u32,
    pub activity: String,
    pub domain: Domain,
    pub acceleration_source: AccelerationSource,
    pub instrument: Instrument,
    pub jerk: Jerk,
    pub magnitude: Magnitude,
    pub statistic: Statistic,
    pub axis: Axis,
    pub count: u64,
    pub average: f64,
}

/// Grouping key. Derived `Ord` over (subject, activity, facets) gives the
/// deterministic output order directly from the `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    subject: u32,
    activity: String,
    facets: FeatureFacets,
}

#[derive(Debug, Default)]
struct Accumulator {
    count: u64,
    sum: f64,
}

/// Aggregates long rows into tidy rows, sorted by the grouping key.
///
/// Builds the facet table from the rows themselves, so the lossless
/// (injectivity) check covers exactly the feature names present.
pub fn aggregate(rows: &[LongRow]) -> Result<Vec<TidyRow>> {
    let table = FacetTable::build(rows.iter().map(|r| r.feature.as_str()))?;
    debug!(distinct_features = table.len(), "Facet table built");

    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for row in rows {
        // Every feature present was just categorized above.
        let facets = table
            .get(&row.feature)
            .unwrap_or_else(|| unreachable!("feature '{}' missing from facet table", row.feature));

        let acc = groups
            .entry(GroupKey {
                subject: row.subject_id,
                activity: row.activity.clone(),
                facets,
            })
            .or_default();
        acc.count += 1;
        acc.sum += row.value;
    }

    Ok(groups
        .into_iter()
        .map(|(key, acc)| TidyRow {
            subject: key.subject,
            activity: key.activity,
            domain: key.facets.domain,
            acceleration_source: key.facets.acceleration_source,
            instrument: key.facets.instrument,
            jerk: key.facets.jerk,
            magnitude: key.facets.magnitude,
            statistic: key.facets.statistic,
            axis: key.facets.axis,
            count: acc.count,
            average: acc.sum / acc.count as f64,
        })
        .collect())
}
