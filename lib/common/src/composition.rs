use std::{fmt, str::FromStr};

use crate::{ComponentType, TypeError};

/// The shape of one accessor element.
///
/// Values taken from the glTF `accessor.type` enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositionType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl CompositionType {
    pub const ALL: [Self; 7] = [
        Self::Scalar,
        Self::Vec2,
        Self::Vec3,
        Self::Vec4,
        Self::Mat2,
        Self::Mat3,
        Self::Mat4,
    ];

    pub const fn number_of_components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }

    #[inline]
    pub const fn is_matrix(self) -> bool {
        matches!(self, Self::Mat2 | Self::Mat3 | Self::Mat4)
    }

    /// Natural (tightly packed) size in bytes of one element with the given component type.
    #[inline]
    pub const fn size_in_bytes(self, comp: ComponentType) -> usize {
        self.number_of_components() * comp.size_in_bytes()
    }

    pub const fn as_gltf_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }

    /// The composition with `n` components, preferring vectors over square matrices.
    pub fn from_component_count(n: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.number_of_components() == n)
    }
}

impl fmt::Display for CompositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_gltf_str())
    }
}

impl FromStr for CompositionType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_gltf_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownCompositionType(s.to_owned()))
    }
}
