//! Power-of-two size planning.
//!
//! Pure functions only: no I/O, no images. Everything here is deterministic and is
//! recomputed for every batch run.

use crate::error::{PackError, Result};

/// Target dimensions for one image in one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePlan {
    pub width: u32,
    pub height: u32,
    /// `false` when the natural size already conforms and the original bytes can be
    /// packed untouched.
    pub needs_resize: bool,
}

/// Nearest power of two to `n`, rounding the exponent rather than the magnitude.
///
/// Returns `None` for `n == 0` (log2 is undefined) or when the result does not fit
/// in a `u32`.
///
/// # Examples
/// ```
/// # use pot_pack::nearest_power_of_two;
/// assert_eq!(nearest_power_of_two(100), Some(128)); // log2(100) = 6.64 -> 7
/// assert_eq!(nearest_power_of_two(50), Some(64));   // log2(50) = 5.64 -> 6
/// assert_eq!(nearest_power_of_two(90), Some(64));   // log2(90) = 6.49 -> 6
/// assert_eq!(nearest_power_of_two(0), None);
/// ```
pub fn nearest_power_of_two(n: u32) -> Option<u32> {
    if n == 0 {
        return None;
    }
    let exponent = f64::from(n).log2().round() as u32;
    1u32.checked_shl(exponent)
}

/// Plan the output size of an image with natural size `width` x `height` under the
/// ceiling `max_size` (itself a power of two).
///
/// Both sides snap to their nearest power of two. When the larger side exceeds the
/// ceiling, both are divided by the same power-of-two ratio so the aspect ratio of
/// the snapped size is kept; a side never shrinks below one pixel.
///
/// # Errors
/// * `InvalidDimensions` if either side is zero or snaps past `u32::MAX`
/// * `InvalidCeiling` if `max_size` is not a power of two
pub fn plan_size(width: u32, height: u32, max_size: u32) -> Result<SizePlan> {
    if !max_size.is_power_of_two() {
        return Err(PackError::InvalidCeiling(max_size));
    }

    let (w2, h2) = match (nearest_power_of_two(width), nearest_power_of_two(height)) {
        (Some(w2), Some(h2)) => (w2, h2),
        _ => return Err(PackError::InvalidDimensions(width, height)),
    };

    let larger = w2.max(h2);

    if w2 == width && h2 == height && larger <= max_size {
        return Ok(SizePlan {
            width,
            height,
            needs_resize: false,
        });
    }

    let (w2, h2) = if larger > max_size {
        // Both operands are powers of two, so the ratio is exact.
        let ratio = larger / max_size;
        ((w2 / ratio).max(1), (h2 / ratio).max(1))
    } else {
        (w2, h2)
    };

    Ok(SizePlan {
        width: w2,
        height: h2,
        needs_resize: true,
    })
}
