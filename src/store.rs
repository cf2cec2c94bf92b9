//! Hierarchical dataset store and persistence adapter
//!
//! Finalized containers are written into a tree of named groups, each
//! holding named n-dimensional datasets with named coordinate axes and
//! string attributes. Group paths (`Responses/<Family>`), axis names
//! (`time`, `nodeTags`/`eleTags`/`paramTags`, `components`) and channel-name
//! lists are part of the on-disk contract and must stay stable across
//! versions.
//!
//! The store serializes to JSON. Floating-point payloads are encoded as
//! IEEE-754 bit patterns because JSON has no NaN and the sentinel must
//! survive a round trip bit-for-bit.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{ArrayD, Axis, IxDyn};
use serde::{Deserialize, Serialize};

use crate::container::{DataArray, FamilyContainer};
use crate::error::{PostError, PostResult};
use crate::layout::{Family, Quantity};

/// Root group name for all response families. On-disk contract.
pub const RESPONSES_ROOT: &str = "Responses";

/// Bit-exact float vector encoding (JSON cannot represent NaN)
mod f64_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_seq(values.iter().map(|v| v.to_bits()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<f64>, D::Error> {
        let bits = Vec::<u64>::deserialize(de)?;
        Ok(bits.into_iter().map(f64::from_bits).collect())
    }
}

/// A coordinate axis attached to a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Coord {
    Floats {
        #[serde(with = "f64_bits")]
        values: Vec<f64>,
    },
    Ints {
        values: Vec<i64>,
    },
    Labels {
        values: Vec<String>,
    },
}

/// One named n-dimensional dataset with axes and attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Row-major shape
    pub shape: Vec<usize>,
    /// Row-major values, bit-exact on disk
    #[serde(with = "f64_bits")]
    pub values: Vec<f64>,
    /// Axis names, one per shape entry
    pub dims: Vec<String>,
    /// Coordinate values keyed by axis name
    pub coords: BTreeMap<String, Coord>,
    /// Scalar/string attributes
    pub attrs: BTreeMap<String, String>,
}

/// A named group: nested groups plus datasets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    pub groups: BTreeMap<String, Group>,
    pub datasets: BTreeMap<String, Dataset>,
    pub attrs: BTreeMap<String, String>,
}

/// Scalar unit factors applied to channel groups on read.
///
/// Keys are physical quantities; channels whose quantity has no entry keep
/// their stored values. Applying factors never mutates the on-disk data.
#[derive(Debug, Clone, Default)]
pub struct UnitFactors {
    factors: BTreeMap<Quantity, f64>,
}

impl UnitFactors {
    /// Empty map: every factor is 1.0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the factor for one quantity
    pub fn with(mut self, quantity: Quantity, factor: f64) -> Self {
        self.factors.insert(quantity, factor);
        self
    }

    /// Factor for a quantity, 1.0 when unset
    pub fn factor(&self, quantity: Quantity) -> f64 {
        self.factors.get(&quantity).copied().unwrap_or(1.0)
    }
}

/// The persistent store: a tree of named groups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataStore {
    pub root: Group,
}

impl DataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a store from a JSON file
    pub fn open(path: &Path) -> PostResult<Self> {
        let file = File::open(path)?;
        let store = serde_json::from_reader(BufReader::new(file))?;
        Ok(store)
    }

    /// Write the store to a JSON file
    pub fn save(&self, path: &Path) -> PostResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Group at a `/`-separated path
    pub fn group(&self, path: &str) -> Option<&Group> {
        let mut group = &self.root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            group = group.groups.get(part)?;
        }
        Some(group)
    }

    fn ensure_group(&mut self, path: &str) -> &mut Group {
        let mut group = &mut self.root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            group = group.groups.entry(part.to_string()).or_default();
        }
        group
    }

    /// Store a finalized container under its fixed family group path.
    ///
    /// A zero-entity container still writes its (empty) datasets so the
    /// on-disk schema stays uniform across runs.
    pub fn write_family(&mut self, container: &FamilyContainer) {
        let path = family_group_path(container.family);
        if container.is_empty() {
            log::warn!("{path}: writing empty marker group");
        }
        let tag_axis = container.family.tag_axis().to_string();
        let group = self.ensure_group(&path);
        group.attrs = container.attrs.clone();
        group.datasets.clear();
        for (name, array) in &container.arrays {
            let mut coords = BTreeMap::new();
            coords.insert(
                "time".to_string(),
                Coord::Floats {
                    values: container.times.clone(),
                },
            );
            coords.insert(
                tag_axis.clone(),
                Coord::Ints {
                    values: container.tags.clone(),
                },
            );
            coords.insert(
                "components".to_string(),
                Coord::Labels {
                    values: array.channels.clone(),
                },
            );
            // sub-entity axes get a plain 1-based index coordinate
            for (dim, &size) in array.dims.iter().zip(array.data.shape()) {
                if dim != "time" && *dim != tag_axis && dim != "components" {
                    coords.insert(
                        dim.clone(),
                        Coord::Ints {
                            values: (1..=size as i64).collect(),
                        },
                    );
                }
            }
            let mut attrs = BTreeMap::new();
            attrs.insert(
                "quantities".to_string(),
                array
                    .quantities
                    .iter()
                    .map(|q| q.key())
                    .collect::<Vec<_>>()
                    .join(","),
            );
            group.datasets.insert(
                name.clone(),
                Dataset {
                    shape: array.data.shape().to_vec(),
                    values: array.data.iter().copied().collect(),
                    dims: array.dims.clone(),
                    coords,
                    attrs,
                },
            );
        }
    }

    /// Reconstruct a family container, optionally rescaling channel groups
    /// by the given unit factors (in memory only; the store is unchanged)
    pub fn read_family(
        &self,
        family: Family,
        units: Option<&UnitFactors>,
    ) -> PostResult<FamilyContainer> {
        let path = family_group_path(family);
        let group = self
            .group(&path)
            .ok_or_else(|| PostError::GroupNotFound(path.clone()))?;

        let tag_axis = family.tag_axis();
        let mut times = Vec::new();
        let mut tags = Vec::new();
        let mut arrays = BTreeMap::new();

        for (name, dataset) in &group.datasets {
            let mut data = ArrayD::from_shape_vec(
                IxDyn(&dataset.shape),
                dataset.values.clone(),
            )
            .map_err(|e| PostError::MalformedDataset(format!("{path}/{name}: {e}")))?;

            if let Some(Coord::Floats { values }) = dataset.coords.get("time") {
                times = values.clone();
            }
            if let Some(Coord::Ints { values }) = dataset.coords.get(tag_axis) {
                tags = values.clone();
            }
            let channels = match dataset.coords.get("components") {
                Some(Coord::Labels { values }) => values.clone(),
                _ => Vec::new(),
            };
            let quantities: Vec<Quantity> = dataset
                .attrs
                .get("quantities")
                .map(|joined| joined.split(',').map(Quantity::from_key).collect())
                .unwrap_or_else(|| vec![Quantity::Unitless; channels.len()]);

            if let Some(units) = units {
                apply_units(&mut data, &quantities, units);
            }

            arrays.insert(
                name.clone(),
                DataArray {
                    name: name.clone(),
                    data,
                    dims: dataset.dims.clone(),
                    channels,
                    quantities,
                },
            );
        }

        Ok(FamilyContainer {
            family,
            times,
            tags,
            arrays,
            attrs: group.attrs.clone(),
        })
    }
}

/// Fixed group path for a family. On-disk contract.
pub fn family_group_path(family: Family) -> String {
    format!("{RESPONSES_ROOT}/{}", family.group_name())
}

/// Rescale each channel (last axis) by the factor of its physical quantity
fn apply_units(data: &mut ArrayD<f64>, quantities: &[Quantity], units: &UnitFactors) {
    if data.ndim() == 0 {
        return;
    }
    let channel_axis = Axis(data.ndim() - 1);
    for (i, &quantity) in quantities.iter().enumerate() {
        let factor = units.factor(quantity);
        if factor != 1.0 && i < data.len_of(channel_axis) {
            data.index_axis_mut(channel_axis, i)
                .mapv_inplace(|v| v * factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_bits_survive_nan() {
        let dataset = Dataset {
            shape: vec![3],
            values: vec![1.5, f64::NAN, -0.0],
            dims: vec!["time".to_string()],
            coords: BTreeMap::new(),
            attrs: BTreeMap::new(),
        };
        let json = serde_json::to_string(&dataset).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        for (a, b) in dataset.values.iter().zip(back.values.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn group_paths_resolve() {
        let mut store = DataStore::new();
        store.ensure_group("Responses/Nodal");
        assert!(store.group("Responses").is_some());
        assert!(store.group("Responses/Nodal").is_some());
        assert!(store.group("Responses/Frame").is_none());
    }

    #[test]
    fn missing_family_group_errs() {
        let store = DataStore::new();
        let err = store.read_family(Family::Node, None).unwrap_err();
        assert!(matches!(err, PostError::GroupNotFound(_)));
    }

    #[test]
    fn unit_factor_defaults_to_identity() {
        let units = UnitFactors::new().with(Quantity::Force, 1e-3);
        assert_eq!(units.factor(Quantity::Force), 1e-3);
        assert_eq!(units.factor(Quantity::Disp), 1.0);
    }
}
