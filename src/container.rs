//! Finalized, labeled response containers
//!
//! A [`FamilyContainer`] is the terminal product of a run for one response
//! family: a small set of named dense arrays sharing the time and entity-tag
//! axes, with channel names and per-channel physical quantities attached.
//! It owns independent storage; the accumulator's timeline buffers may be
//! discarded once it exists.

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis};

use crate::error::{PostError, PostResult};
use crate::layout::{Family, Quantity};

/// One labeled response array for a family
#[derive(Debug, Clone)]
pub struct DataArray {
    /// Measurement name (e.g. `disp`, `sectionForces`)
    pub name: String,
    /// Dense values, axes ordered as `dims`
    pub data: ArrayD<f64>,
    /// Axis names: `time`, the family tag axis, optional sub-entity axis,
    /// then `components`
    pub dims: Vec<String>,
    /// Channel names along the last axis
    pub channels: Vec<String>,
    /// Physical quantity per channel, for unit-factor rescaling
    pub quantities: Vec<Quantity>,
}

impl DataArray {
    /// Bit-for-bit equality, treating NaN sentinel cells as equal.
    /// Plain `==` on floats would report any sentinel as unequal to itself.
    pub fn bit_eq(&self, other: &DataArray) -> bool {
        self.name == other.name
            && self.dims == other.dims
            && self.channels == other.channels
            && self.quantities == other.quantities
            && self.data.shape() == other.data.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// Finalized per-family container: time-indexed, tag-labeled arrays
#[derive(Debug, Clone)]
pub struct FamilyContainer {
    /// Response family
    pub family: Family,
    /// Step times; index 0 is the initialization baseline at 0.0
    pub times: Vec<f64>,
    /// Entity-tag coordinate axis (declared set, or the outer join in
    /// model-update runs)
    pub tags: Vec<i64>,
    /// Named response arrays, all sharing the time and tag axes
    pub arrays: BTreeMap<String, DataArray>,
    /// Free-form scalar/string attributes (`topologyChanged`, `empty`, ...)
    pub attrs: BTreeMap<String, String>,
}

impl FamilyContainer {
    /// Names of the response arrays, the valid keys for [`select`](Self::select)
    pub fn response_names(&self) -> Vec<String> {
        self.arrays.keys().cloned().collect()
    }

    /// Look up one response array by name
    pub fn array(&self, name: &str) -> PostResult<&DataArray> {
        self.arrays
            .get(name)
            .ok_or_else(|| PostError::UnknownResponseKey {
                requested: name.to_string(),
                valid: self.response_names(),
            })
    }

    /// True when the family had no entities for the whole run
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Restrict the container by response name and/or entity-tag subset.
    ///
    /// An unknown response name is a schema violation and errs with the list
    /// of valid names. Requested tags not present on the axis are ignored
    /// (only field names are part of the schema contract); the surviving
    /// tags keep their axis order.
    pub fn select(&self, field: Option<&str>, tags: Option<&[i64]>) -> PostResult<FamilyContainer> {
        let mut arrays: BTreeMap<String, DataArray> = match field {
            Some(name) => {
                let array = self.array(name)?;
                BTreeMap::from([(name.to_string(), array.clone())])
            }
            None => self.arrays.clone(),
        };

        let mut out_tags = self.tags.clone();
        if let Some(wanted) = tags {
            let indices: Vec<usize> = self
                .tags
                .iter()
                .enumerate()
                .filter(|(_, t)| wanted.contains(t))
                .map(|(i, _)| i)
                .collect();
            out_tags = indices.iter().map(|&i| self.tags[i]).collect();
            for array in arrays.values_mut() {
                // axis 0 is time, axis 1 is the entity tag axis
                array.data = array.data.select(Axis(1), &indices);
            }
        }

        Ok(FamilyContainer {
            family: self.family,
            times: self.times.clone(),
            tags: out_tags,
            arrays,
            attrs: self.attrs.clone(),
        })
    }

    /// Bit-for-bit container equality (see [`DataArray::bit_eq`])
    pub fn bit_eq(&self, other: &FamilyContainer) -> bool {
        self.family == other.family
            && self.tags == other.tags
            && self.attrs == other.attrs
            && self.times.len() == other.times.len()
            && self
                .times
                .iter()
                .zip(other.times.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
            && self.arrays.len() == other.arrays.len()
            && self
                .arrays
                .iter()
                .zip(other.arrays.iter())
                .all(|((ka, a), (kb, b))| ka == kb && a.bit_eq(b))
    }
}
