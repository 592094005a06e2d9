//! Data type vocabulary and tag resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Element type of a [`Buffer`](crate::Buffer).
///
/// The discriminant doubles as the dense dispatch code (see [`DTypeCode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DType {
    Float64 = 0,
    Float32 = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Uint8 = 5,
    /// `u8` storage that clamps on assignment.
    Uint8c = 6,
    Uint16 = 7,
    Uint32 = 8,
    Bool = 9,
    /// Single-precision complex (two `f32` lanes).
    Complex64 = 10,
    /// Double-precision complex (two `f64` lanes).
    Complex128 = 11,
    /// Heterogeneous [`Value`](crate::Value) elements.
    Generic = 12,
    /// Raw bytes.
    Binary = 13,
}

impl DType {
    /// Every data type, in code order.
    pub const ALL: [DType; 14] = [
        DType::Float64,
        DType::Float32,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Uint8,
        DType::Uint8c,
        DType::Uint16,
        DType::Uint32,
        DType::Bool,
        DType::Complex64,
        DType::Complex128,
        DType::Generic,
        DType::Binary,
    ];

    /// Stable string tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            DType::Float64 => "float64",
            DType::Float32 => "float32",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Uint8 => "uint8",
            DType::Uint8c => "uint8c",
            DType::Uint16 => "uint16",
            DType::Uint32 => "uint32",
            DType::Bool => "bool",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
            DType::Generic => "generic",
            DType::Binary => "binary",
        }
    }

    /// Dense dispatch code.
    #[inline]
    pub const fn code(self) -> DTypeCode {
        DTypeCode(self as u8)
    }

    /// Storage size of one element, or `None` for `generic`.
    pub const fn bytes_per_element(self) -> Option<usize> {
        match self {
            DType::Float64 => Some(8),
            DType::Float32 => Some(4),
            DType::Int8 | DType::Uint8 | DType::Uint8c | DType::Bool | DType::Binary => Some(1),
            DType::Int16 | DType::Uint16 => Some(2),
            DType::Int32 | DType::Uint32 => Some(4),
            DType::Complex64 => Some(8),
            DType::Complex128 => Some(16),
            DType::Generic => None,
        }
    }

    /// Number of scalar lanes per element (2 for complex types).
    pub const fn lanes(self) -> usize {
        if self.is_complex() {
            2
        } else {
            1
        }
    }

    pub const fn is_floating_point(self) -> bool {
        matches!(self, DType::Float64 | DType::Float32)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    pub const fn is_signed_integer(self) -> bool {
        matches!(self, DType::Int8 | DType::Int16 | DType::Int32)
    }

    pub const fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            DType::Uint8 | DType::Uint8c | DType::Uint16 | DType::Uint32
        )
    }

    pub const fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    /// Floating-point, complex or integer.
    pub const fn is_numeric(self) -> bool {
        self.is_floating_point() || self.is_complex() || self.is_integer()
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DType {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownDType(s.to_string()))
    }
}

/// Dense integer code of a data type, used to index dispatch tables.
///
/// Codes fit in four bits. Unresolvable tags map to [`DTypeCode::UNKNOWN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DTypeCode(u8);

impl DTypeCode {
    /// Sentinel for tags outside the vocabulary.
    pub const UNKNOWN: DTypeCode = DTypeCode(0x0f);

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }

    /// The data type with this code, if any.
    pub fn dtype(self) -> Option<DType> {
        DType::ALL.get(self.0 as usize).copied()
    }
}

impl From<DType> for DTypeCode {
    fn from(d: DType) -> Self {
        d.code()
    }
}

/// Resolve a dtype tag to its dispatch code.
///
/// Never fails: unknown tags resolve to [`DTypeCode::UNKNOWN`].
pub fn resolve(tag: &str) -> DTypeCode {
    tag.parse::<DType>()
        .map(DType::code)
        .unwrap_or(DTypeCode::UNKNOWN)
}
