//! Seeded randomness for spawning, geometry and colors.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::palette::Color;

/// Demo-wide random source (ChaCha8, explicitly seeded so runs are reproducible).
#[derive(Clone, Debug)]
pub struct DemoRng {
    rng: ChaCha8Rng,
}

impl DemoRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from the host: `Math.random` in the browser, the clock natively.
    pub fn from_host() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
            Self::new(seed ^ (js_sys::Date::now() as u64))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let nanos = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(12345);
            Self::new(nanos)
        }
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform in `[min, max)`. Degenerate ranges return `min`.
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        self.unit() * (max - min) + min
    }

    /// Integer in `[min, max)`; returns `min` when the range is empty.
    pub fn range_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Integer in `[0, max]`.
    pub fn up_to(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..=max)
    }

    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit() < probability
    }

    /// Random color with every channel in `[min_channel, 1)`.
    pub fn color(&mut self, min_channel: f32) -> Color {
        let r = self.range(min_channel, 1.0);
        let g = self.range(min_channel, 1.0);
        let b = self.range(min_channel, 1.0);
        Color::from_unit_rgb(r, g, b)
    }
}
