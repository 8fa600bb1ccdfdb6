//! Math values viewed as flat lists of numeric components.
//!
//! Accessors don't care what a vector or matrix *is*; they only move its components in and
//! out of bytes. [FlatValue] is that view. Matrices are flattened column-major, matching the
//! layout GPUs and glTF expect.

use nalgebra::{
    Matrix2, Matrix3, Matrix4, Point2, Point3, Point4, Vector2, Vector3, Vector4,
};
use tessera_common::ComponentValue;

/// A value made of a fixed number of numeric components.
pub trait FlatValue: Sized {
    const COMPONENTS: usize;

    /// A value with every component set to zero.
    fn zeroed() -> Self;

    /// # Panics
    ///
    /// * `k >= Self::COMPONENTS`
    fn component(&self, k: usize) -> f64;

    /// # Panics
    ///
    /// * `k >= Self::COMPONENTS`
    fn set_component(&mut self, k: usize, value: f64);

    /// Build a value from the first `Self::COMPONENTS` entries of `values`; missing entries
    /// are zero.
    fn from_components(values: &[f64]) -> Self {
        let mut res = Self::zeroed();
        for (k, &v) in values.iter().take(Self::COMPONENTS).enumerate() {
            res.set_component(k, v);
        }
        res
    }

    fn to_components(&self) -> Vec<f64> {
        (0..Self::COMPONENTS).map(|k| self.component(k)).collect()
    }
}

tessera_common::item_with_components! {C =>
    impl FlatValue for C {
        const COMPONENTS: usize = 1;

        #[inline]
        fn zeroed() -> Self {
            C::from_f64(0.0)
        }

        #[inline]
        fn component(&self, k: usize) -> f64 {
            assert_eq!(k, 0, "scalar component index out of range");
            self.to_f64()
        }

        #[inline]
        fn set_component(&mut self, k: usize, value: f64) {
            assert_eq!(k, 0, "scalar component index out of range");
            *self = C::from_f64(value);
        }
    }
}

impl<C: ComponentValue, const N: usize> FlatValue for [C; N] {
    const COMPONENTS: usize = N;

    #[inline]
    fn zeroed() -> Self {
        [C::from_f64(0.0); N]
    }

    #[inline]
    fn component(&self, k: usize) -> f64 {
        self[k].to_f64()
    }

    #[inline]
    fn set_component(&mut self, k: usize, value: f64) {
        self[k] = C::from_f64(value);
    }
}

macro_rules! impl_flat_matrix {
    ($Target:ident: $n:expr) => {
        impl<C: ComponentValue> FlatValue for $Target<C> {
            const COMPONENTS: usize = $n;

            #[inline]
            fn zeroed() -> Self {
                Self::from_element(C::from_f64(0.0))
            }

            #[inline]
            fn component(&self, k: usize) -> f64 {
                self.as_slice()[k].to_f64()
            }

            #[inline]
            fn set_component(&mut self, k: usize, value: f64) {
                self.as_mut_slice()[k] = C::from_f64(value);
            }
        }
    };
}

macro_rules! impl_flat_point {
    ($Target:ident, $Coords:ident: $n:expr) => {
        impl<C: ComponentValue> FlatValue for $Target<C> {
            const COMPONENTS: usize = $n;

            #[inline]
            fn zeroed() -> Self {
                Self::from($Coords::from_element(C::from_f64(0.0)))
            }

            #[inline]
            fn component(&self, k: usize) -> f64 {
                self.coords[k].to_f64()
            }

            #[inline]
            fn set_component(&mut self, k: usize, value: f64) {
                self.coords[k] = C::from_f64(value);
            }
        }
    };
}

impl_flat_matrix!(Vector2: 2);
impl_flat_matrix!(Vector3: 3);
impl_flat_matrix!(Vector4: 4);
impl_flat_matrix!(Matrix2: 4);
impl_flat_matrix!(Matrix3: 9);
impl_flat_matrix!(Matrix4: 16);

impl_flat_point!(Point2, Vector2: 2);
impl_flat_point!(Point3, Vector3: 3);
impl_flat_point!(Point4, Vector4: 4);
