use std::time::Instant;

/// Longest step handed to the simulation, so a stall does not teleport
/// orbiting shapes.
const MAX_FRAME_DT: f32 = 0.25;

pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        let raw = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.advance(raw);
    }

    fn advance(&mut self, raw_dt: f32) {
        self.dt = raw_dt.clamp(0.0, MAX_FRAME_DT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_stalls_are_clamped() {
        let mut timer = FrameTimer::new();
        timer.advance(3.0);
        assert_eq!(timer.dt, MAX_FRAME_DT);
        timer.advance(1.0 / 60.0);
        assert_eq!(timer.dt, 1.0 / 60.0);
        timer.advance(-1.0);
        assert_eq!(timer.dt, 0.0);
    }
}
