/// Grid of sampled QR modules, true = dark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new all-light matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Build a matrix from rows of module values; rows must share one length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let mut matrix = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &dark) in row.iter().enumerate() {
                matrix.set(x, y, dark);
            }
        }
        Some(matrix)
    }

    /// Parse a text grid, one row per line.
    ///
    /// `#`, `1` and `X` are dark modules; `.`, `0` and spaces are light.
    /// Blank lines are skipped.
    pub fn parse_grid(text: &str) -> Option<Self> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                match ch {
                    '#' | '1' | 'X' | 'x' => row.push(true),
                    '.' | '0' | ' ' => row.push(false),
                    _ => return None,
                }
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-range reads are light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if value {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Reflect a square matrix across its main diagonal, swapping (x, y) with (y, x).
    ///
    /// This is the mirrored reading of a QR code. Non-square matrices are left
    /// unchanged.
    pub fn transpose_in_place(&mut self) {
        if self.width != self.height {
            return;
        }
        for x in 0..self.width {
            for y in (x + 1)..self.height {
                let a = self.get(x, y);
                let b = self.get(y, x);
                if a != b {
                    self.toggle(x, y);
                    self.toggle(y, x);
                }
            }
        }
    }

    /// Render as a text grid using `#` and `.`
    pub fn to_grid_string(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(if self.get(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
