//! Per-component bounds of an accessor's elements.

use super::{AccessOptions, Accessor};

impl Accessor {
    /// Recompute per-component min and max over all elements.
    ///
    /// Always scans the data: bytes may have changed through aliasing windows (slots, views,
    /// interleaved accessors) without marking this accessor dirty. Bounds declared at
    /// construction are replaced by the scanned ones. With `count == 0` both bounds are empty.
    pub fn calc_min_max(&mut self) {
        let n = self.element_component_count();
        let mut min = vec![f64::INFINITY; n];
        let mut max = vec![f64::NEG_INFINITY; n];
        let mut element = vec![0.0; n];
        for i in 0..self.count {
            self.get_element_into(i, &mut element, AccessOptions::default());
            for (k, &v) in element.iter().enumerate() {
                min[k] = min[k].min(v);
                max[k] = max[k].max(v);
            }
        }
        if self.count == 0 {
            min.clear();
            max.clear();
        }
        tracing::trace!(?min, ?max, count = self.count, "recomputed accessor bounds");
        self.min = min;
        self.max = max;
        self.min_max_dirty = false;
    }

    /// Per-component minimum as of the last [calc_min_max](Self::calc_min_max), or as declared
    /// at construction.
    #[inline]
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Per-component maximum; see [min](Self::min).
    #[inline]
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Whether the data may have changed since the bounds were last computed.
    #[inline]
    pub fn is_min_max_dirty(&self) -> bool {
        self.min_max_dirty
    }
}
