/// Data mask removal
use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// XOR the mask pattern over every data module.
///
/// Applying it twice restores the original matrix.
pub fn unmask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let size = func.size().min(matrix.width()).min(matrix.height());
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}
