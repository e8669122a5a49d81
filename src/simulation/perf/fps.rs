use crate::entities::FrameEvent;

/// Frames between readout updates.
const WINDOW: u64 = 60;

/// Frame-rate readout refreshed once every 60 frames, to one decimal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FpsMeter {
    fps: f64,
    window_start: f64,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self {
            fps: 60.0,
            window_start: 0.0,
        }
    }

    pub fn record(&mut self, frame: &FrameEvent) {
        if (frame.count + 1) % WINDOW != 0 {
            return;
        }
        let elapsed = frame.time - self.window_start;
        if elapsed > 0.0 {
            self.fps = (WINDOW as f64 * 10.0 / elapsed).round() / 10.0;
        }
        self.window_start = frame.time;
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(count: u64, time: f64) -> FrameEvent {
        FrameEvent { time, count, delta: 0.0 }
    }

    #[test]
    fn updates_only_on_window_edge() {
        let mut meter = FpsMeter::new();
        meter.record(&frame(10, 0.5));
        assert_eq!(meter.fps(), 60.0);

        meter.record(&frame(59, 2.0));
        assert_eq!(meter.fps(), 30.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        let mut meter = FpsMeter::new();
        meter.record(&frame(59, 0.7));
        assert_eq!(meter.fps(), 85.7);
        meter.record(&frame(119, 0.7));
        assert_eq!(meter.fps(), 85.7);
    }
}
