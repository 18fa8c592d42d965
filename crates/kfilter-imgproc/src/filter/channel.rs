use num_traits::AsPrimitive;

/// Scale between the 16-bit accumulator and the 8-bit output channel.
pub const WIDE_TO_NARROW: f64 = 256.0;

/// Slack added to the narrowed value before truncation.
///
/// Kernel weights only sum to one up to rounding, so an accumulator that should
/// land exactly on a multiple of [`WIDE_TO_NARROW`] can fall just below it.
pub const REDUCE_EPSILON: f64 = 1e-6;

/// A source channel sample that can be widened to 16-bit precision.
///
/// Filters accumulate in the 16-bit range regardless of the source depth, so
/// 8-bit and 16-bit inputs go through the same reduction to 8-bit output.
pub trait Sample: Copy + Send + Sync + AsPrimitive<f64> {
    /// Factor mapping the native range onto `[0, 65535]`.
    const WIDEN: f64;

    /// The sample expressed in the 16-bit range.
    #[inline(always)]
    fn to_wide(self) -> f64 {
        self.as_() * Self::WIDEN
    }
}

impl Sample for u8 {
    // 0xff * 0x101 == 0xffff
    const WIDEN: f64 = 257.0;
}

impl Sample for u16 {
    const WIDEN: f64 = 1.0;
}

/// Clamp a signed channel value into `[0, 255]`.
///
/// # Examples
///
/// ```
/// use kfilter_imgproc::filter::clamp_channel;
///
/// assert_eq!(clamp_channel(-10), 0);
/// assert_eq!(clamp_channel(128), 128);
/// assert_eq!(clamp_channel(300), 255);
/// ```
#[inline(always)]
pub fn clamp_channel(x: i32) -> u8 {
    if x >= 255 {
        255
    } else if x < 0 {
        0
    } else {
        x as u8
    }
}

/// Reduce a 16-bit accumulated channel to 8 bits and apply the contrast offset.
///
/// The scaled value is truncated toward zero before the offset is added.
/// Values within [`REDUCE_EPSILON`] below an integer level round up to it.
///
/// # Arguments
///
/// * `acc` - The accumulated channel value in the 16-bit range.
/// * `contrast` - Signed offset added after the reduction.
#[inline(always)]
pub fn reduce_channel(acc: f64, contrast: i32) -> u8 {
    clamp_channel((acc / WIDE_TO_NARROW + REDUCE_EPSILON) as i32 + contrast)
}
