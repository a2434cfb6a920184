use crate::models::{BitMatrix, Version};

/// Function module map for a QR version.
/// true = function module (finder, timing, alignment, format, version), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators
        Self::mark_region(&mut mask, 0, 0, 9, 9);
        Self::mark_region(&mut mask, size - 8, 0, 8, 9);
        Self::mark_region(&mut mask, 0, size - 8, 9, 8);

        // Timing patterns
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        let align = alignment_pattern_positions(version);
        for &cx in &align {
            for &cy in &align {
                let in_tl = cx <= 8 && cy <= 8;
                let in_tr = cx >= size - 9 && cy <= 8;
                let in_bl = cx <= 8 && cy >= size - 9;
                if in_tl || in_tr || in_bl {
                    continue;
                }
                Self::mark_region(&mut mask, cx - 2, cy - 2, 5, 5);
            }
        }

        // Second format copy; the bottom-left strip includes the dark module
        Self::mark_region(&mut mask, size - 8, 8, 8, 1);
        Self::mark_region(&mut mask, 8, size - 8, 1, 8);

        if version.has_version_info() {
            Self::mark_region(&mut mask, size - 11, 0, 3, 6);
            Self::mark_region(&mut mask, 0, size - 11, 6, 3);
        }

        Self { mask, version }
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .filter(|&(x, y)| !self.mask.get(x, y))
            .count()
    }

    fn mark_region(mask: &mut BitMatrix, left: usize, top: usize, width: usize, height: usize) {
        for y in top..top + height {
            for x in left..left + width {
                mask.set(x, y, true);
            }
        }
    }
}

/// Alignment pattern centers (shared by rows and columns) for a version.
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    // The last center sits 7 modules in from the far edge; the rest step back from it
    let last = version.size() - 7;
    let mut positions = vec![6usize; num_align];
    for (k, slot) in positions.iter_mut().skip(1).rev().enumerate() {
        *slot = last - k * step;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tables::total_codewords;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(v(1)).is_empty());
        assert_eq!(alignment_pattern_positions(v(2)), vec![6, 18]);
        assert_eq!(alignment_pattern_positions(v(7)), vec![6, 22, 38]);
        assert_eq!(alignment_pattern_positions(v(14)), vec![6, 26, 46, 66]);
        assert_eq!(alignment_pattern_positions(v(32)), vec![6, 34, 60, 86, 112, 138]);
        // The first gap is narrower than the step here
        assert_eq!(
            alignment_pattern_positions(v(36)),
            vec![6, 24, 50, 76, 102, 128, 154]
        );
        assert_eq!(
            alignment_pattern_positions(v(39)),
            vec![6, 26, 54, 82, 110, 138, 166]
        );
        assert_eq!(
            alignment_pattern_positions(v(40)),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
    }

    #[test]
    fn test_data_modules_hold_every_codeword() {
        for n in 1..=40 {
            let func = FunctionMask::new(v(n));
            let modules = func.data_modules_count();
            // Up to 7 remainder bits trail the last codeword
            assert_eq!(modules / 8, total_codewords(v(n)), "version {n}");
        }
    }

    #[test]
    fn test_version_one_layout() {
        let func = FunctionMask::new(v(1));
        assert_eq!(func.size(), 21);
        assert_eq!(func.data_modules_count(), 208);
        assert!(func.is_function(6, 10));
        assert!(func.is_function(8, 13));
        assert!(!func.is_function(20, 20));
        assert!(!func.is_function(9, 9));
    }
}
