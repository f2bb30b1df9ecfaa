//! Batched arrays with explicit broadcasting.
//!
//! A `Batch<T>` is a row-major n-dimensional array whose elements are small
//! fixed-size math types (`Vec4`, `Mat4`, ...). Binary operations combine two
//! batches by aligning their shapes from the trailing axis: two dimensions are
//! compatible when they are equal or when either one is 1, in which case the
//! size-1 side is repeated.

use crate::{GeometryError, GeometryResult};

/// An n-dimensional array of math values.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Batch<T> {
    /// Create a batch from a shape and row-major data.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<T>) -> GeometryResult<Self> {
        let shape = shape.into();
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(GeometryError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create a one-dimensional batch.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Create a zero-dimensional batch holding a single value.
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the element at a full multi-index.
    ///
    /// Returns `None` if the index has the wrong rank or is out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        self.data.get(offset)
    }

    /// Insert a size-1 axis at `axis` (like `unsqueeze`).
    ///
    /// # Panics
    ///
    /// Panics if `axis > self.ndim()`.
    pub fn insert_axis(mut self, axis: usize) -> Self {
        assert!(
            axis <= self.shape.len(),
            "axis {} out of range for a batch of rank {}",
            axis,
            self.shape.len()
        );
        self.shape.insert(axis, 1);
        self
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Batch<U> {
        Batch {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Apply a fallible `f` to every element, passing the flat element index.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(usize, &T) -> Result<U, E>,
    ) -> Result<Batch<U>, E> {
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, value)| f(i, value))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Batch {
            shape: self.shape.clone(),
            data,
        })
    }

    /// Combine two batches element-wise under broadcasting.
    ///
    /// The result has the broadcast shape of both operands.
    pub fn zip_broadcast<U, R>(
        &self,
        other: &Batch<U>,
        mut f: impl FnMut(&T, &U) -> R,
    ) -> GeometryResult<Batch<R>> {
        let shape = broadcast_shapes(&self.shape, &other.shape)?;
        let left = broadcast_strides(&self.shape, shape.len());
        let right = broadcast_strides(&other.shape, shape.len());

        let total: usize = shape.iter().product();
        let mut data = Vec::with_capacity(total);
        let mut index = vec![0usize; shape.len()];

        for _ in 0..total {
            let l: usize = index.iter().zip(&left).map(|(i, s)| i * s).sum();
            let r: usize = index.iter().zip(&right).map(|(i, s)| i * s).sum();
            data.push(f(&self.data[l], &other.data[r]));

            // Advance the multi-index, last axis fastest
            for axis in (0..shape.len()).rev() {
                index[axis] += 1;
                if index[axis] < shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }

        Ok(Batch { shape, data })
    }
}

impl<T> From<Vec<T>> for Batch<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

/// Compute the broadcast of two batch shapes.
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> GeometryResult<Vec<usize>> {
    let ndim = left.len().max(right.len());
    let l = padded(left, ndim);
    let r = padded(right, ndim);

    l.iter()
        .zip(&r)
        .map(|(&a, &b)| match (a, b) {
            _ if a == b => Ok(a),
            (1, _) => Ok(b),
            (_, 1) => Ok(a),
            _ => Err(GeometryError::ShapeMismatch {
                left: left.to_vec(),
                right: right.to_vec(),
            }),
        })
        .collect()
}

/// Left-pad a shape with 1s up to `ndim` axes.
fn padded(shape: &[usize], ndim: usize) -> Vec<usize> {
    let mut out = vec![1; ndim - shape.len()];
    out.extend_from_slice(shape);
    out
}

/// Row-major strides of `shape` viewed at rank `ndim`, with 0 on repeated axes.
fn broadcast_strides(shape: &[usize], ndim: usize) -> Vec<usize> {
    let shape = padded(shape, ndim);
    let mut strides = vec![0; ndim];
    let mut stride = 1;
    for axis in (0..ndim).rev() {
        strides[axis] = if shape[axis] == 1 { 0 } else { stride };
        stride *= shape[axis];
    }
    strides
}
