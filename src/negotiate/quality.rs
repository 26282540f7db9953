//! Selector quality derived from compressed size.
//!
//! `quality = round(1 / (size + 1), 12)`, rendered with exactly twelve
//! fractional digits. Computed in integer arithmetic (no float error),
//! rounding half away from zero at the twelfth digit. Sizes whose quality
//! would round to zero (`size >= 2e12`) are clamped to `0.000000000001`,
//! the smallest positive value.

/// Fractional digits in a rendered quality value.
pub const QUALITY_DIGITS: usize = 12;

const SCALE: u128 = 1_000_000_000_000;

/// Quality value for an asset of `size` bytes.
///
/// Smaller sizes yield higher qualities; `size == 0` yields `1.000000000000`.
pub fn quality(size: u64) -> String {
    let divisor = u128::from(size) + 1;
    // round(SCALE / divisor), half away from zero
    let scaled = (SCALE * 2 + divisor) / (divisor * 2);
    // zero is not a valid quality
    let scaled = scaled.max(1);

    let whole = scaled / SCALE;
    let frac = scaled % SCALE;
    format!("{whole}.{frac:0width$}", width = QUALITY_DIGITS)
}
