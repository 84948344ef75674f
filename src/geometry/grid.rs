//! Owned, row-major 2D buffers used for per-plate cell data.

use std::ops::{Index, IndexMut};

/// A dense `width × height` buffer stored in row-major order.
///
/// Plates keep one grid per cell attribute (thickness, age, continent id).
/// Grids never alias: growing one allocates a new buffer and copies the old
/// rows into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// Returns `None` if `cells.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self { width, height, cells })
    }

    /// Returns a larger grid holding this grid's content at `(offset_x, offset_y)`.
    ///
    /// Cells not covered by the old content are set to `fill`.
    pub fn expanded(
        &self,
        new_width: usize,
        new_height: usize,
        offset_x: usize,
        offset_y: usize,
        fill: T,
    ) -> Self {
        debug_assert!(offset_x + self.width <= new_width);
        debug_assert!(offset_y + self.height <= new_height);

        let mut grown = Self::new(new_width, new_height, fill);
        for (row, src) in self.cells.chunks_exact(self.width.max(1)).enumerate() {
            let dst = (offset_y + row) * new_width + offset_x;
            grown.cells[dst..dst + self.width].clone_from_slice(src);
        }
        grown
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of a local cell.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Local coordinates of a row-major index.
    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.cells[index]
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![1.0f32; 4]).is_some());
        assert!(Grid::from_vec(2, 2, vec![1.0f32; 3]).is_none());
    }

    #[test]
    fn test_expanded_copies_at_offset() {
        let grid = Grid::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let grown = grid.expanded(4, 3, 1, 1, 0);

        assert_eq!(grown.width(), 4);
        assert_eq!(grown.height(), 3);
        assert_eq!(
            grown.as_slice(),
            &[0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0]
        );
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(5, 3, 0u8);
        let i = grid.index_of(4, 2);
        assert_eq!(i, 14);
        assert_eq!(grid.coords_of(i), (4, 2));
        assert!(grid.get(5, 0).is_none());
    }
}
