use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    buffer::Buffer,
    components::band::BandGrid,
    errors::{MarshalError, Result},
};

/// Numeric encoding of a raster band.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    Unknown,
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
}

impl PixelType {
    /// Maps a GDAL `GDALDataType` ordinal, `Unknown` for anything unrecognised.
    pub fn from_gdal_ordinal(ordinal: u32) -> Self {
        match ordinal {
            1 => PixelType::UInt8,
            2 => PixelType::UInt16,
            3 => PixelType::Int16,
            4 => PixelType::UInt32,
            5 => PixelType::Int32,
            6 => PixelType::Float32,
            7 => PixelType::Float64,
            8 => PixelType::CInt16,
            9 => PixelType::CInt32,
            10 => PixelType::CFloat32,
            11 => PixelType::CFloat64,
            12 => PixelType::UInt64,
            13 => PixelType::Int64,
            14 => PixelType::Int8,
            _ => PixelType::Unknown,
        }
    }

    pub fn gdal_ordinal(&self) -> u32 {
        match self {
            PixelType::Unknown => 0,
            PixelType::UInt8 => 1,
            PixelType::UInt16 => 2,
            PixelType::Int16 => 3,
            PixelType::UInt32 => 4,
            PixelType::Int32 => 5,
            PixelType::Float32 => 6,
            PixelType::Float64 => 7,
            PixelType::CInt16 => 8,
            PixelType::CInt32 => 9,
            PixelType::CFloat32 => 10,
            PixelType::CFloat64 => 11,
            PixelType::UInt64 => 12,
            PixelType::Int64 => 13,
            PixelType::Int8 => 14,
        }
    }

    /// Value `value` takes once stored in this encoding, `None` when the
    /// encoding can not be written.
    pub fn coerce(&self, value: f64) -> Option<f64> {
        let coerced: f64 = match self {
            PixelType::UInt8 => u8::from_f64(value).as_(),
            PixelType::Int8 => i8::from_f64(value).as_(),
            PixelType::UInt16 => u16::from_f64(value).as_(),
            PixelType::Int16 => i16::from_f64(value).as_(),
            PixelType::UInt32 => u32::from_f64(value).as_(),
            PixelType::Int32 => i32::from_f64(value).as_(),
            PixelType::Float32 => f32::from_f64(value).as_(),
            PixelType::Float64 => value,
            PixelType::UInt64
            | PixelType::Int64
            | PixelType::CInt16
            | PixelType::CInt32
            | PixelType::CFloat32
            | PixelType::CFloat64
            | PixelType::Unknown => return None,
        };
        Some(coerced)
    }
}

/// Storage type of a writable [PixelType].
pub trait Pixel: Copy + AsPrimitive<f64> {
    const PIXEL_TYPE: PixelType;

    /// Narrows a value: integers round half away from zero and saturate,
    /// NaN becomes zero.
    fn from_f64(value: f64) -> Self;
}

macro_rules! integer_pixel {
    ($($t:ty => $variant:ident),*) => {$(
        impl Pixel for $t {
            const PIXEL_TYPE: PixelType = PixelType::$variant;

            fn from_f64(value: f64) -> Self {
                value.round() as $t
            }
        }
    )*};
}

integer_pixel!(u8 => UInt8, i8 => Int8, u16 => UInt16, i16 => Int16, u32 => UInt32, i32 => Int32);

impl Pixel for f32 {
    const PIXEL_TYPE: PixelType = PixelType::Float32;

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Pixel for f64 {
    const PIXEL_TYPE: PixelType = PixelType::Float64;

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Row-major pixels of one band in the encoding declared for the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    UInt8(Buffer<u8>),
    Int8(Buffer<i8>),
    UInt16(Buffer<u16>),
    Int16(Buffer<i16>),
    UInt32(Buffer<u32>),
    Int32(Buffer<i32>),
    Float32(Buffer<f32>),
    Float64(Buffer<f64>),
}

impl PixelBuffer {
    /// Coerces `grid` to `pixel_type` and lays it out in store order.
    ///
    /// `band` is the 1-based index reported on failure.
    pub fn encode(grid: &BandGrid, pixel_type: PixelType, band: usize) -> Result<Self> {
        let buffer = match pixel_type {
            PixelType::UInt8 => PixelBuffer::UInt8(coerce(grid)?),
            PixelType::Int8 => PixelBuffer::Int8(coerce(grid)?),
            PixelType::UInt16 => PixelBuffer::UInt16(coerce(grid)?),
            PixelType::Int16 => PixelBuffer::Int16(coerce(grid)?),
            PixelType::UInt32 => PixelBuffer::UInt32(coerce(grid)?),
            PixelType::Int32 => PixelBuffer::Int32(coerce(grid)?),
            PixelType::Float32 => PixelBuffer::Float32(coerce(grid)?),
            PixelType::Float64 => PixelBuffer::Float64(coerce(grid)?),
            PixelType::UInt64
            | PixelType::Int64
            | PixelType::CInt16
            | PixelType::CInt32
            | PixelType::CFloat32
            | PixelType::CFloat64
            | PixelType::Unknown => {
                return Err(MarshalError::UnsupportedPixelType { band, pixel_type })
            }
        };
        Ok(buffer)
    }

    pub fn pixel_type(&self) -> PixelType {
        match self {
            PixelBuffer::UInt8(_) => PixelType::UInt8,
            PixelBuffer::Int8(_) => PixelType::Int8,
            PixelBuffer::UInt16(_) => PixelType::UInt16,
            PixelBuffer::Int16(_) => PixelType::Int16,
            PixelBuffer::UInt32(_) => PixelType::UInt32,
            PixelBuffer::Int32(_) => PixelType::Int32,
            PixelBuffer::Float32(_) => PixelType::Float32,
            PixelBuffer::Float64(_) => PixelType::Float64,
        }
    }

    /// `[rows, cols]`
    pub fn shape(&self) -> [usize; 2] {
        match self {
            PixelBuffer::UInt8(buffer) => buffer.shape(),
            PixelBuffer::Int8(buffer) => buffer.shape(),
            PixelBuffer::UInt16(buffer) => buffer.shape(),
            PixelBuffer::Int16(buffer) => buffer.shape(),
            PixelBuffer::UInt32(buffer) => buffer.shape(),
            PixelBuffer::Int32(buffer) => buffer.shape(),
            PixelBuffer::Float32(buffer) => buffer.shape(),
            PixelBuffer::Float64(buffer) => buffer.shape(),
        }
    }

    pub fn to_f64(&self) -> Buffer<f64> {
        match self {
            PixelBuffer::UInt8(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::Int8(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::UInt16(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::Int16(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::UInt32(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::Int32(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::Float32(buffer) => buffer.map(AsPrimitive::as_),
            PixelBuffer::Float64(buffer) => buffer.clone(),
        }
    }
}

fn coerce<T: Pixel>(grid: &BandGrid) -> Result<Buffer<T>> {
    match grid {
        BandGrid::UInt8(array) => Buffer::from_grid(array.mapv(|v| T::from_f64(v.as_())).view()),
        BandGrid::Int16(array) => Buffer::from_grid(array.mapv(|v| T::from_f64(v.as_())).view()),
        BandGrid::Float64(array) => Buffer::from_grid(array.mapv(T::from_f64).view()),
    }
}
