//! Character-grid surface

use std::fmt;

/// Fixed-size grid of characters, row-major
///
/// Writes outside the grid are clipped.
#[derive(Clone, PartialEq, Eq)]
pub struct TextSurface {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl TextSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Fills every cell with a space
    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Resizes the grid, discarding its content
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    /// Writes `text` starting at column `x` of row `y`
    pub fn put_str(&mut self, x: i32, y: i32, text: &str) {
        let Ok(row) = u16::try_from(y) else {
            return;
        };
        if row >= self.height {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let Some(col) = i32::try_from(offset)
                .ok()
                .and_then(|o| x.checked_add(o))
                .and_then(|c| u16::try_from(c).ok())
            else {
                continue;
            };
            if col >= self.width {
                break;
            }
            let index = usize::from(row) * usize::from(self.width) + usize::from(col);
            self.cells[index] = ch;
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
            .copied()
    }

    /// Row `y` as a string; empty when out of range
    pub fn row(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|y| self.row(y))
    }
}

impl fmt::Debug for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
