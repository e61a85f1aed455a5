//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Height matching `width` at the source aspect ratio, rounded to nearest.
///
/// This is the height used both to name a variant and to resize it, so the
/// file on disk always has the dimensions its name claims.
///
/// # Examples
/// ```
/// # use gallery_forge::imaging::proportional_height;
/// assert_eq!(proportional_height((4000, 3000), 2000), 1500);
/// assert_eq!(proportional_height((3959, 5938), 400), 600);
/// ```
pub fn proportional_height(source: (u32, u32), width: u32) -> u32 {
    let (src_w, src_h) = source;
    ((width as f64 * src_h as f64 / src_w as f64).round() as u32).max(1)
}

/// Height used to test a width against the height cap (rounded down).
fn floor_height(source: (u32, u32), width: u32) -> u32 {
    let (src_w, src_h) = source;
    (width as u64 * src_h as u64 / src_w as u64) as u32
}

/// Pick the widths worth rendering for one source image.
///
/// `widths` must be ascending. The first matching rule wins:
///
/// 1. configured widths below the source width whose height stays under
///    `max_height`;
/// 2. if the source is taller than `max_height`, the single width that scales
///    it down to exactly that height;
/// 3. configured widths below the source width, ignoring the height cap;
/// 4. the source width itself.
///
/// # Examples
/// ```
/// # use gallery_forge::imaging::plan_widths;
/// // 4000 is not smaller than the source, so only 2000 remains.
/// assert_eq!(plan_widths((4000, 3000), &[2000, 4000], 3200), vec![2000]);
///
/// // Too small for every width: render at original size.
/// assert_eq!(plan_widths((300, 200), &[400, 800], 3200), vec![300]);
/// ```
pub fn plan_widths(source: (u32, u32), widths: &[u32], max_height: u32) -> Vec<u32> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return Vec::new();
    }

    let narrower: Vec<u32> = widths.iter().copied().filter(|&w| w < src_w).collect();

    let capped: Vec<u32> = narrower
        .iter()
        .copied()
        .filter(|&w| floor_height(source, w) < max_height)
        .collect();
    if !capped.is_empty() {
        return capped;
    }

    if src_h > max_height {
        let fit = (max_height as u64 * src_w as u64 / src_h as u64) as u32;
        return vec![fit.max(1)];
    }

    if !narrower.is_empty() {
        return narrower;
    }

    vec![src_w]
}

/// Planned `(width, height)` pairs for one source image.
pub fn plan_sizes(source: (u32, u32), widths: &[u32], max_height: u32) -> Vec<(u32, u32)> {
    plan_widths(source, widths, max_height)
        .into_iter()
        .map(|w| (w, proportional_height(source, w)))
        .collect()
}

/// Output dimensions of a thumbnail `width` pixels wide.
///
/// Square thumbnails are cropped to `width × width`; others keep the source
/// aspect ratio.
///
/// # Examples
/// ```
/// # use gallery_forge::imaging::thumbnail_dimensions;
/// assert_eq!(thumbnail_dimensions((4000, 3000), 100, true), (100, 100));
/// assert_eq!(thumbnail_dimensions((4000, 3000), 100, false), (100, 75));
/// ```
pub fn thumbnail_dimensions(source: (u32, u32), width: u32, square: bool) -> (u32, u32) {
    if square {
        (width, width)
    } else {
        (width, proportional_height(source, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // proportional_height
    // =========================================================================

    #[test]
    fn proportional_height_rounds_to_nearest() {
        assert_eq!(proportional_height((4000, 3000), 2000), 1500);
        // 1000 * 667 / 1000 exactly
        assert_eq!(proportional_height((1000, 667), 1000), 667);
        // 400 * 5938 / 3959 = 599.95 → 600
        assert_eq!(proportional_height((3959, 5938), 400), 600);
        // 3 * 2 / 4 = 1.5 → 2
        assert_eq!(proportional_height((4, 2), 3), 2);
    }

    #[test]
    fn proportional_height_never_zero() {
        assert_eq!(proportional_height((10000, 10), 100), 1);
    }

    // =========================================================================
    // plan_widths
    // =========================================================================

    #[test]
    fn rule_one_keeps_widths_under_both_limits() {
        // floor(w * 5938 / 3959): 400→599, 800→1199, 1200→1799, 1600→2399
        let widths = [400, 800, 1200, 1600, 2000];
        assert_eq!(plan_widths((3959, 5938), &widths, 2000), vec![400, 800, 1200]);
    }

    #[test]
    fn rule_one_boundary_is_strict() {
        // 1000 wide, 2000 tall: width 500 gives exactly 1000.
        assert_eq!(plan_widths((1000, 2000), &[400, 500], 1000), vec![400]);
        assert_eq!(plan_widths((1000, 2000), &[400, 500], 1001), vec![400, 500]);
    }

    #[test]
    fn rule_one_excludes_widths_not_smaller_than_source() {
        assert_eq!(plan_widths((4000, 3000), &[2000, 4000], 3200), vec![2000]);
        assert_eq!(
            plan_widths((1600, 1200), &[400, 800, 1600, 3200], 3200),
            vec![400, 800]
        );
    }

    #[test]
    fn rule_two_fits_tall_image_to_height_cap() {
        // Every candidate is too tall: 100 * 10000 / 1000 = 1000 ≥ 500.
        assert_eq!(plan_widths((1000, 10000), &[100, 200], 500), vec![50]);
    }

    #[test]
    fn rule_two_floors_synthesized_width() {
        // 2000 * 3959 / 5938 = 1333.4
        assert_eq!(plan_widths((3959, 5938), &[4000], 2000), vec![1333]);
    }

    #[test]
    fn narrower_widths_always_fit_when_source_fits_cap() {
        // Any width below W scales H down, so a source under the cap never
        // falls past the first rule.
        assert_eq!(plan_widths((400, 300), &[100, 200], 300), vec![100, 200]);
        assert_eq!(plan_widths((301, 300), &[300], 300), vec![300]);
    }

    #[test]
    fn tall_source_with_no_fitting_width_is_scaled_to_cap() {
        // 100 → 75 and 200 → 150 both reach the cap of 60.
        assert_eq!(plan_widths((400, 300), &[100, 200], 60), vec![80]);
    }

    #[test]
    fn rule_four_renders_original_size() {
        assert_eq!(plan_widths((300, 200), &[400, 800], 3200), vec![300]);
        assert_eq!(plan_widths((400, 300), &[400], 3200), vec![400]);
    }

    #[test]
    fn zero_sized_source_plans_nothing() {
        assert!(plan_widths((0, 100), &[100], 3200).is_empty());
    }

    #[test]
    fn plan_sizes_pairs_width_with_rounded_height() {
        assert_eq!(
            plan_sizes((3959, 5938), &[400, 800], 2000),
            vec![(400, 600), (800, 1200)]
        );
    }

    // =========================================================================
    // thumbnail_dimensions
    // =========================================================================

    #[test]
    fn square_thumbnail_is_width_by_width() {
        assert_eq!(thumbnail_dimensions((3000, 4000), 120, true), (120, 120));
    }

    #[test]
    fn proportional_thumbnail_keeps_aspect() {
        assert_eq!(thumbnail_dimensions((3000, 4000), 120, false), (120, 160));
    }
}
