use ndarray::{Array2, ArrayView2, ShapeBuilder};

use crate::errors::{MarshalError, Result};

/// Reorders a `rows x cols` row-major buffer into column-major order.
///
/// Applying it again with the dimensions swapped restores the input.
pub fn transpose<T: Copy>(data: &[T], rows: usize, cols: usize) -> Result<Vec<T>> {
    check_len(data.len(), rows, cols)?;
    let mut transposed = Vec::with_capacity(data.len());
    for col in 0..cols {
        for row in 0..rows {
            transposed.push(data[row * cols + col]);
        }
    }
    Ok(transposed)
}

fn check_len(len: usize, rows: usize, cols: usize) -> Result<()> {
    if len != rows * cols {
        return Err(MarshalError::Store(format!(
            "buffer holds {len} pixels, expected {rows}x{cols}"
        )));
    }
    Ok(())
}

/// Pixels as the raster store exchanges them.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T> {
    // Row-major
    data: Box<[T]>,
    // [rows, cols]
    shape: [usize; 2],
}

impl<T: Copy> Buffer<T> {
    pub fn new(data: Vec<T>, shape: [usize; 2]) -> Result<Self> {
        let [rows, cols] = shape;
        check_len(data.len(), rows, cols)?;
        Ok(Self {
            data: data.into_boxed_slice(),
            shape,
        })
    }

    /// Column-major copy of a grid, re-transposed into store order.
    pub fn from_grid(grid: ArrayView2<T>) -> Result<Self> {
        let (rows, cols) = grid.dim();
        let column_major: Vec<T> = grid.t().iter().copied().collect();
        Ok(Self {
            data: transpose(&column_major, cols, rows)?.into_boxed_slice(),
            shape: [rows, cols],
        })
    }

    /// Grid addressed as `grid[[row, col]]`, stored column-major.
    pub fn into_grid(self) -> Result<Array2<T>> {
        let [rows, cols] = self.shape;
        let column_major = transpose(&self.data, rows, cols)?;
        Ok(Array2::from_shape_vec((rows, cols).f(), column_major)?)
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Buffer<U> {
        Buffer {
            data: self.data.iter().copied().map(f).collect(),
            shape: self.shape,
        }
    }
}

impl<T> Buffer<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }
}
