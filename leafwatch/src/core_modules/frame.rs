// THEORY:
// A `Frame` is the whole normalized image: a flattened, row-major grid of
// `Pixel`s with a known width and height. Like `Pixel`, it is a data container.
// It knows how to summarize its own contents (channel sums and population
// standard deviations) and how to produce a transformed copy of itself, but it
// does not interpret those numbers. Interpretation (is it blank, is it green,
// how stressed is the plant) lives in the sanity and vegetation modules.
//
// Statistics are accumulated as exact integer sums and sums of squares over the
// byte channels, then converted to f64 once. For a 256×256 image the sums fit
// comfortably in u64 and the variance numerator in u128, so the standard
// deviation carries no accumulated rounding error.

pub mod frame {
    use crate::core_modules::pixel::pixel::Pixel;

    /// Selects one color channel for per-channel statistics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ChannelKind {
        Red,
        Green,
        Blue,
    }

    impl ChannelKind {
        pub const ALL: [ChannelKind; 3] = [ChannelKind::Red, ChannelKind::Green, ChannelKind::Blue];

        #[inline]
        fn value(self, pixel: &Pixel) -> u8 {
            match self {
                ChannelKind::Red => pixel.red,
                ChannelKind::Green => pixel.green,
                ChannelKind::Blue => pixel.blue,
            }
        }
    }

    /// Exact first and second moments of a set of byte samples.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct Moments {
        pub count: u64,
        pub sum: u64,
        pub sum_of_squares: u64,
    }

    impl Moments {
        #[inline]
        fn push(&mut self, value: u8) {
            let v = value as u64;
            self.count += 1;
            self.sum += v;
            self.sum_of_squares += v * v;
        }

        fn merge(self, other: Moments) -> Moments {
            Moments {
                count: self.count + other.count,
                sum: self.sum + other.sum,
                sum_of_squares: self.sum_of_squares + other.sum_of_squares,
            }
        }

        /// Population standard deviation (divides by N, not N−1).
        pub fn std_dev(&self) -> f64 {
            if self.count == 0 {
                return 0.0;
            }
            let n = self.count as u128;
            let numerator = n * self.sum_of_squares as u128 - (self.sum as u128) * (self.sum as u128);
            (numerator as f64).sqrt() / self.count as f64
        }
    }

    /// A row-major RGB image.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Frame {
        /// The width of the frame in pixels.
        pub width: u32,
        /// The height of the frame in pixels.
        pub height: u32,
        /// Flattened pixel data, `width * height` entries.
        pub pixels: Vec<Pixel>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
            debug_assert_eq!(pixels.len(), (width * height) as usize);
            Self {
                width,
                height,
                pixels,
            }
        }

        /// A frame where every pixel has the same value.
        pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
            Self::new(width, height, vec![pixel; (width * height) as usize])
        }

        pub fn from_rgb_image(image: &image::RgbImage) -> Self {
            let pixels = image.pixels().map(|p| Pixel::from(*p)).collect();
            Self::new(image.width(), image.height(), pixels)
        }

        pub fn to_rgb_image(&self) -> image::RgbImage {
            image::RgbImage::from_fn(self.width, self.height, |x, y| {
                self.pixels[(y * self.width + x) as usize].into()
            })
        }

        pub fn len(&self) -> usize {
            self.pixels.len()
        }

        pub fn is_empty(&self) -> bool {
            self.pixels.is_empty()
        }

        /// Produces a new frame by applying `f` to every pixel.
        pub fn map_pixels<F>(&self, f: F) -> Frame
        where
            F: Fn(&Pixel) -> Pixel,
        {
            Frame::new(self.width, self.height, self.pixels.iter().map(f).collect())
        }

        /// Moments of a single channel.
        pub fn channel_moments(&self, channel: ChannelKind) -> Moments {
            let mut moments = Moments::default();
            for pixel in &self.pixels {
                moments.push(channel.value(pixel));
            }
            moments
        }

        /// Moments over every channel value of every pixel, as if the frame were
        /// one flat array of `3 * width * height` bytes.
        pub fn moments(&self) -> Moments {
            ChannelKind::ALL
                .iter()
                .map(|&channel| self.channel_moments(channel))
                .fold(Moments::default(), Moments::merge)
        }

        /// Population standard deviation across all channels.
        pub fn std_dev(&self) -> f64 {
            self.moments().std_dev()
        }

        pub fn channel_std_dev(&self, channel: ChannelKind) -> f64 {
            self.channel_moments(channel).std_dev()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::frame::*;
    use crate::core_modules::pixel::pixel::Pixel;

    #[test]
    fn uniform_frame_has_zero_deviation() {
        let frame = Frame::filled(8, 8, Pixel::new(40, 90, 200));
        assert_eq!(frame.channel_std_dev(ChannelKind::Green), 0.0);
        assert_eq!(frame.len(), 64);
    }

    #[test]
    fn std_dev_matches_population_formula() {
        // Green samples 0 and 100: mean 50, population std-dev 50.
        let frame = Frame::new(2, 1, vec![Pixel::new(0, 0, 0), Pixel::new(0, 100, 0)]);
        assert!((frame.channel_std_dev(ChannelKind::Green) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn overall_std_dev_pools_all_channels() {
        // Flat array [0, 0, 0, 255, 255, 255]: mean 127.5, std-dev 127.5.
        let frame = Frame::new(2, 1, vec![Pixel::new(0, 0, 0), Pixel::new(255, 255, 255)]);
        assert!((frame.std_dev() - 127.5).abs() < 1e-9);

        // A single pixel whose channels differ still has spread.
        let frame = Frame::new(1, 1, vec![Pixel::new(0, 255, 0)]);
        assert!(frame.std_dev() > 100.0);
    }

    #[test]
    fn round_trips_through_rgb_image() {
        let frame = Frame::new(2, 1, vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]);
        assert_eq!(Frame::from_rgb_image(&frame.to_rgb_image()), frame);
    }
}
