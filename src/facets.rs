//! Feature-name facet decomposition.
//!
//! Each raw feature name (e.g. `tBodyAccJerk-std()-Z`) encodes a fixed set
//! of categorical facets. [`categorize`] parses a name into those facets as
//! a pure function; [`FacetTable`] memoizes the decomposition per distinct
//! name and verifies it is lossless.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Signal domain: time series or frequency spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Domain {
    Time,
    Freq,
}

/// Which of the two `BodyAcc`/`GravityAcc` acceleration components the
/// feature measures, if any. Gyroscope features carry neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AccelerationSource {
    #[serde(rename = "NA")]
    None,
    Body,
    Gravity,
}

/// Sensor instrument the signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Instrument {
    Accelerometer,
    Gyroscope,
}

/// Whether the feature is a jerk (derivative) signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Jerk {
    #[serde(rename = "NA")]
    None,
    Jerk,
}

/// Whether the feature is a euclidean magnitude of a three-axis signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Magnitude {
    #[serde(rename = "NA")]
    None,
    Magnitude,
}

/// Which summary statistic the feature reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Statistic {
    Mean,
    #[serde(rename = "SD")]
    Sd,
}

/// Spatial axis, absent for magnitude features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Axis {
    #[serde(rename = "NA")]
    None,
    X,
    Y,
    Z,
}

/// The full facet tuple for one feature name.
///
/// Field order matches the output column order, so the derived `Ord` is the
/// sort order of the final table's facet columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureFacets {
    pub domain: Domain,
    pub acceleration_source: AccelerationSource,
    pub instrument: Instrument,
    pub jerk: Jerk,
    pub magnitude: Magnitude,
    pub statistic: Statistic,
    pub axis: Axis,
}

/// Decomposes a feature name into its facets.
///
/// The facet rules apply independently; the optional facets (acceleration
/// source, jerk, magnitude, axis) default to their absent level. A name
/// matching neither alternative of a mandatory facet (domain, instrument,
/// statistic) is an error.
pub fn categorize(name: &str) -> Result<FeatureFacets> {
    let mandatory = |facet: &'static str| PipelineError::UncategorizableFeature {
        name: name.to_string(),
        facet,
    };

    let domain = if name.starts_with('t') {
        Domain::Time
    } else if name.starts_with('f') {
        Domain::Freq
    } else {
        return Err(mandatory("domain"));
    };

    let instrument = if name.contains("Acc") {
        Instrument::Accelerometer
    } else if name.contains("Gyro") {
        Instrument::Gyroscope
    } else {
        return Err(mandatory("instrument"));
    };

    let acceleration_source = if name.contains("BodyAcc") {
        AccelerationSource::Body
    } else if name.contains("GravityAcc") {
        AccelerationSource::Gravity
    } else {
        AccelerationSource::None
    };

    let jerk = if name.contains("Jerk") {
        Jerk::Jerk
    } else {
        Jerk::None
    };

    let magnitude = if name.contains("Mag") {
        Magnitude::Magnitude
    } else {
        Magnitude::None
    };

    let statistic = if name.contains("mean()") {
        Statistic::Mean
    } else if name.contains("std()") {
        Statistic::Sd
    } else {
        return Err(mandatory("statistic"));
    };

    let axis = if name.contains("-X") {
        Axis::X
    } else if name.contains("-Y") {
        Axis::Y
    } else if name.contains("-Z") {
        Axis::Z
    } else {
        Axis::None
    };

    Ok(FeatureFacets {
        domain,
        acceleration_source,
        instrument,
        jerk,
        magnitude,
        statistic,
        axis,
    })
}

/// Memoized facet decomposition over a set of distinct feature names.
///
/// Building the table enforces the lossless invariant: two distinct names
/// landing on the same facet tuple abort the run instead of silently
/// merging their groups downstream.
#[derive(Debug, Default)]
pub struct FacetTable {
    map: HashMap<String, FeatureFacets>,
}

impl FacetTable {
    /// Categorizes every distinct name in `names`, failing on a collision.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut map: HashMap<String, FeatureFacets> = HashMap::new();
        let mut seen: HashMap<FeatureFacets, String> = HashMap::new();

        for name in names {
            if map.contains_key(name) {
                continue;
            }
            let facets = categorize(name)?;
            if let Some(first) = seen.insert(facets, name.to_string()) {
                return Err(PipelineError::CategorizationCollision {
                    first,
                    second: name.to_string(),
                });
            }
            map.insert(name.to_string(), facets);
        }

        Ok(Self { map })
    }

    pub fn get(&self, name: &str) -> Option<FeatureFacets> {
        self.map.get(name).copied()
    }

    /// Count of distinct feature names (equal to distinct facet tuples by
    /// the checked invariant).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
