/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::ops::{Index, IndexMut};

/// A dense matrix stored as a flat vector in row-major order, addressed by
/// `(row, column)` pairs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Clone + Default> Matrix<T> {
    /// Creates a new `rows` × `cols` matrix with all elements set to
    /// `T::default()`.
    pub fn new(rows: usize, cols: usize) -> Self {
        let data = vec![T::default(); rows * cols];
        Matrix { data, rows, cols }
    }
}

impl<T> Matrix<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns a row of the matrix.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns an iterator over the rows of the matrix.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |row| self.row(row))
    }
}

impl<T: Copy> Matrix<T> {
    /// Returns an iterator over a column of the matrix.
    pub fn column(&self, col: usize) -> impl Iterator<Item = T> + '_ {
        assert!(col < self.cols, "Column {col} out of range ({})", self.cols);
        (0..self.rows).map(move |row| self.data[row * self.cols + col])
    }

    /// Overwrites a column of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not contain exactly one value per row.
    pub fn set_column(&mut self, col: usize, values: &[T]) {
        assert!(col < self.cols, "Column {col} out of range ({})", self.cols);
        assert_eq!(
            values.len(),
            self.rows,
            "Column length ({}) does not match the number of rows ({})",
            values.len(),
            self.rows
        );
        for (row, &value) in values.iter().enumerate() {
            self.data[row * self.cols + col] = value;
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        debug_assert!(col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, col) = index;
        debug_assert!(col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}
