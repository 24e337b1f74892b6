// THEORY (single-pixel heuristics):
// The `Pixel` module is the smallest unit of the scoring core. It is a "dumb"
// data container for one RGB pixel plus the heuristics that can be computed from
// that pixel alone, with no knowledge of its neighbours. Anything that needs the
// whole image (means, standard deviations, blank detection) belongs to `Frame`.
//
// Two heuristics live here:
// - Vegetation enhancement: a fixed channel re-weighting (green ×1.5, red and
//   blue ×0.5) that pushes foliage towards green and suppresses soil, sky and
//   shadow. Each channel is clipped to 0..255 and truncated back to a byte, so an
//   enhanced pixel is again an ordinary `Pixel`.
// - Red-green vegetation index (RGVI): (g − r) / (g + r + ε), clipped to [-1, 1].
//   Pure green reads as +1, pure red as −1, grey as 0.
//
// Channels are also cached as f64 ("computed") so the per-pixel arithmetic in
// the hot loops does not keep re-casting bytes.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type ComputedChannel = f64;
    pub type VegetationIndex = f64;

    /// Green channel gain applied by vegetation enhancement.
    pub const GREEN_GAIN: ComputedChannel = 1.5;
    /// Red channel gain applied by vegetation enhancement.
    pub const RED_GAIN: ComputedChannel = 0.5;
    /// Blue channel gain applied by vegetation enhancement.
    pub const BLUE_GAIN: ComputedChannel = 0.5;
    /// Keeps the index finite on black pixels.
    pub const RGVI_EPSILON: ComputedChannel = 1e-5;

    const CHANNELS: usize = 3;

    /// A single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        red_computed: ComputedChannel,
        green_computed: ComputedChannel,
        blue_computed: ComputedChannel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                red_computed: red as ComputedChannel,
                green_computed: green as ComputedChannel,
                blue_computed: blue as ComputedChannel,
            }
        }

        /// Applies the vegetation channel gains, clipping and truncating each channel.
        pub fn enhanced(&self) -> Pixel {
            Pixel::new(
                Self::scale_channel(self.red_computed, RED_GAIN),
                Self::scale_channel(self.green_computed, GREEN_GAIN),
                Self::scale_channel(self.blue_computed, BLUE_GAIN),
            )
        }

        /// Red-green vegetation index of this pixel, in [-1, 1].
        #[inline]
        pub fn red_green_index(&self) -> VegetationIndex {
            let index = (self.green_computed - self.red_computed)
                / (self.green_computed + self.red_computed + RGVI_EPSILON);
            index.clamp(-1.0, 1.0)
        }

        #[inline]
        fn scale_channel(value: ComputedChannel, gain: ComputedChannel) -> Channel {
            // Truncation, not rounding: 101 * 1.5 = 151.5 becomes 151.
            (value * gain).clamp(0.0, 255.0) as Channel
        }
    }

    impl From<&[Byte]> for Pixel {
        fn from(bytes: &[Byte]) -> Self {
            debug_assert!(bytes.len() >= CHANNELS);
            Pixel::new(bytes[0], bytes[1], bytes[2])
        }
    }

    impl From<image::Rgb<Byte>> for Pixel {
        fn from(rgb: image::Rgb<Byte>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<Pixel> for image::Rgb<Byte> {
        fn from(pixel: Pixel) -> Self {
            image::Rgb([pixel.red, pixel.green, pixel.blue])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn enhancement_scales_and_truncates() {
        let enhanced = Pixel::new(101, 101, 33).enhanced();
        assert_eq!(enhanced.red, 50);
        assert_eq!(enhanced.green, 151);
        assert_eq!(enhanced.blue, 16);
    }

    #[test]
    fn enhancement_clips_green_at_255() {
        let enhanced = Pixel::new(255, 200, 255).enhanced();
        assert_eq!(enhanced.green, 255);
        assert_eq!(enhanced.red, 127);
        assert_eq!(enhanced.blue, 127);
    }

    #[test]
    fn index_extremes() {
        assert!((Pixel::new(0, 255, 0).red_green_index() - 1.0).abs() < 1e-6);
        assert!((Pixel::new(255, 0, 0).red_green_index() + 1.0).abs() < 1e-6);
        assert_eq!(Pixel::new(120, 120, 30).red_green_index(), 0.0);
    }

    #[test]
    fn index_of_black_is_zero() {
        assert_eq!(Pixel::new(0, 0, 0).red_green_index(), 0.0);
    }

    #[test]
    fn converts_from_rgb_bytes() {
        let bytes = [10u8, 20, 30];
        let pixel = Pixel::from(&bytes[..]);
        assert_eq!((pixel.red, pixel.green, pixel.blue), (10, 20, 30));
    }
}
