use std::fmt;

use crate::TypeError;

/// Byte order used when moving component values in and out of raw bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Reads one component from the start of a byte slice, widened to `f64`.
pub type ReadFn = fn(&[u8], Endian) -> f64;

/// Writes one component, narrowed from `f64`, to the start of a byte slice.
pub type WriteFn = fn(&mut [u8], f64, Endian);

/// Storage type of a single component of an accessor element.
///
/// Values match the WebGL / glTF `componentType` enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
    Double,
}

impl ComponentType {
    pub const ALL: [Self; 8] = [
        Self::Byte,
        Self::UnsignedByte,
        Self::Short,
        Self::UnsignedShort,
        Self::Int,
        Self::UnsignedInt,
        Self::Float,
        Self::Double,
    ];

    pub const fn size_in_bytes(self) -> usize {
        use std::mem::size_of;
        match self {
            Self::Byte => size_of::<i8>(),
            Self::UnsignedByte => size_of::<u8>(),
            Self::Short => size_of::<i16>(),
            Self::UnsignedShort => size_of::<u16>(),
            Self::Int => size_of::<i32>(),
            Self::UnsignedInt => size_of::<u32>(),
            Self::Float => size_of::<f32>(),
            Self::Double => size_of::<f64>(),
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    pub const fn is_signed(self) -> bool {
        !matches!(
            self,
            Self::UnsignedByte | Self::UnsignedShort | Self::UnsignedInt
        )
    }

    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::Int => 5124,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
            Self::Double => 5130,
        }
    }

    pub fn from_gl(code: u32) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_gl() == code)
            .ok_or(TypeError::UnknownComponentType(code))
    }

    /// The function used to read one component of this type.
    pub fn reader(self) -> ReadFn {
        match self {
            Self::Byte => read_as_f64::<i8> as ReadFn,
            Self::UnsignedByte => read_as_f64::<u8> as ReadFn,
            Self::Short => read_as_f64::<i16> as ReadFn,
            Self::UnsignedShort => read_as_f64::<u16> as ReadFn,
            Self::Int => read_as_f64::<i32> as ReadFn,
            Self::UnsignedInt => read_as_f64::<u32> as ReadFn,
            Self::Float => read_as_f64::<f32> as ReadFn,
            Self::Double => read_as_f64::<f64> as ReadFn,
        }
    }

    /// The function used to write one component of this type.
    ///
    /// Integer targets saturate at their bounds; `NaN` becomes 0.
    pub fn writer(self) -> WriteFn {
        match self {
            Self::Byte => write_from_f64::<i8> as WriteFn,
            Self::UnsignedByte => write_from_f64::<u8> as WriteFn,
            Self::Short => write_from_f64::<i16> as WriteFn,
            Self::UnsignedShort => write_from_f64::<u16> as WriteFn,
            Self::Int => write_from_f64::<i32> as WriteFn,
            Self::UnsignedInt => write_from_f64::<u32> as WriteFn,
            Self::Float => write_from_f64::<f32> as WriteFn,
            Self::Double => write_from_f64::<f64> as WriteFn,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::Int => "INT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
        })
    }
}

fn read_as_f64<T: ComponentValue>(bytes: &[u8], endian: Endian) -> f64 {
    T::read(bytes, endian).to_f64()
}

fn write_from_f64<T: ComponentValue>(bytes: &mut [u8], value: f64, endian: Endian) {
    T::from_f64(value).write(bytes, endian)
}

/// A primitive which can be stored as an accessor component.
pub trait ComponentValue: Copy + PartialOrd + fmt::Debug + 'static {
    const COMPONENT: ComponentType;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;

    /// # Panics
    ///
    /// * `bytes.len() < Self::COMPONENT.size_in_bytes()`
    fn read(bytes: &[u8], endian: Endian) -> Self;

    /// # Panics
    ///
    /// * `bytes.len() < Self::COMPONENT.size_in_bytes()`
    fn write(self, bytes: &mut [u8], endian: Endian);
}

macro_rules! impl_component_value {
    ($T:ty: $comp:ident) => {
        // "size of type $T == size of component $comp"
        static_assertions::const_assert_eq!(
            std::mem::size_of::<$T>(),
            ComponentType::$comp.size_in_bytes()
        );

        impl ComponentValue for $T {
            const COMPONENT: ComponentType = ComponentType::$comp;

            #[inline]
            fn to_f64(self) -> f64 {
                num_traits::AsPrimitive::<f64>::as_(self)
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                num_traits::AsPrimitive::<$T>::as_(value)
            }

            #[inline]
            fn read(bytes: &[u8], endian: Endian) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$T>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$T>()]);
                match endian {
                    Endian::Little => <$T>::from_le_bytes(raw),
                    Endian::Big => <$T>::from_be_bytes(raw),
                }
            }

            #[inline]
            fn write(self, bytes: &mut [u8], endian: Endian) {
                let raw = match endian {
                    Endian::Little => self.to_le_bytes(),
                    Endian::Big => self.to_be_bytes(),
                };
                bytes[..raw.len()].copy_from_slice(&raw);
            }
        }
    };
}

impl_component_value!(i8: Byte);
impl_component_value!(u8: UnsignedByte);
impl_component_value!(i16: Short);
impl_component_value!(u16: UnsignedShort);
impl_component_value!(i32: Int);
impl_component_value!(u32: UnsignedInt);
impl_component_value!(f32: Float);
impl_component_value!(f64: Double);
