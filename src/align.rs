//! Ragged array alignment
//!
//! Families with sub-entity structure (Gauss points, section integration
//! points, fibers) report a different trailing shape per entity, and in
//! model-update runs a different entity count per step. Stacking those into
//! one rectangular timeline requires padding every input out to the
//! element-wise maximum shape with the sentinel fill value.

use ndarray::{ArrayD, Dimension, IxDyn};

/// Sentinel marking "no data for this cell". Never a legitimate measurement.
pub const SENTINEL: f64 = f64::NAN;

/// Pad a list of N arrays of heterogeneous shape into one dense array of
/// shape `(N,) + max_shape`, where `max_shape` is the element-wise maximum
/// of the input shapes (shorter shapes count as extended with 1s).
///
/// Every cell not covered by an input array holds `fill`; each input is
/// copied into the leading sub-slice matching its own shape. Inputs are
/// never reordered and never truncated. When all inputs already share one
/// shape the result is exactly the stacked inputs with no fill introduced.
pub fn pad_ragged(arrays: &[ArrayD<f64>], fill: f64) -> ArrayD<f64> {
    if arrays.is_empty() {
        return ArrayD::from_elem(IxDyn(&[0]), fill);
    }
    let rank = arrays.iter().map(|a| a.ndim()).max().unwrap_or(0);
    let mut max_shape = vec![0usize; rank];
    for a in arrays {
        for (i, slot) in max_shape.iter_mut().enumerate() {
            // only a missing trailing dim counts as 1; a real zero-length
            // axis stays zero so empty entity sets keep their shape
            let d = a.shape().get(i).copied().unwrap_or(1);
            *slot = (*slot).max(d);
        }
    }

    let mut out_shape = Vec::with_capacity(rank + 1);
    out_shape.push(arrays.len());
    out_shape.extend_from_slice(&max_shape);
    let mut out = ArrayD::from_elem(IxDyn(&out_shape), fill);

    for (n, a) in arrays.iter().enumerate() {
        for (idx, &value) in a.indexed_iter() {
            let mut full = Vec::with_capacity(rank + 1);
            full.push(n);
            full.extend_from_slice(idx.slice());
            // ranks below the maximum behave as trailing size-1 axes
            full.resize(rank + 1, 0);
            out[IxDyn(&full)] = value;
        }
    }
    out
}
