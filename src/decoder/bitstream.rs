/// Codeword extraction from a QR code matrix
use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Data modules (x, y) in placement order.
///
/// Column pairs are walked right to left starting at the right edge, skipping
/// the vertical timing column. Direction alternates, starting upward, and the
/// right module of each pair comes first.
pub fn data_module_order(func: &FunctionMask) -> Vec<(usize, usize)> {
    let dimension = func.size();
    let mut order = Vec::with_capacity(func.data_modules_count());

    let mut upward = true;
    let mut col = dimension as i32 - 1;

    while col > 0 {
        if col == 6 {
            col -= 1;
            continue;
        }

        for count in 0..dimension {
            let row = if upward { dimension - 1 - count } else { count };
            for c in [col, col - 1] {
                let x = c as usize;
                if !func.is_function(x, row) {
                    order.push((x, row));
                }
            }
        }

        upward = !upward;
        col -= 2;
    }

    order
}

/// Pack the (unmasked) data modules into codewords, MSB first.
///
/// Trailing remainder bits that do not fill a byte are dropped.
pub fn read_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
    let order = data_module_order(func);
    order
        .chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |byte, &(x, y)| (byte << 1) | matrix.get(x, y) as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Version;

    #[test]
    fn test_order_starts_bottom_right_and_skips_timing_column() {
        let func = FunctionMask::new(Version::new(1).unwrap());
        let order = data_module_order(&func);
        assert_eq!(order.len(), 208);
        assert_eq!(&order[..4], &[(20, 20), (19, 20), (20, 19), (19, 19)]);
        assert!(order.iter().all(|&(x, _)| x != 6));
    }

    #[test]
    fn test_read_codewords_msb_first() {
        let func = FunctionMask::new(Version::new(1).unwrap());
        let order = data_module_order(&func);
        let mut matrix = BitMatrix::new(21, 21);
        // First codeword 0b1000_0001, second 0b0100_0000
        matrix.set(order[0].0, order[0].1, true);
        matrix.set(order[7].0, order[7].1, true);
        matrix.set(order[9].0, order[9].1, true);

        let codewords = read_codewords(&matrix, &func);
        assert_eq!(codewords.len(), 26);
        assert_eq!(codewords[0], 0x81);
        assert_eq!(codewords[1], 0x40);
        assert!(codewords[2..].iter().all(|&c| c == 0));
    }
}
