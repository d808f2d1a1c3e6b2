/// Game clock derived from the wall clock.
///
/// `elapsed` is game time in milliseconds: wall-clock milliseconds since
/// start multiplied by `time_scale`, the save's game-speed multiplier.
#[derive(Debug, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f64,
    pub delta: f64,
    pub time_scale: f64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    pub fn with_scale(time_scale: f64) -> Self {
        WorldTime {
            time_scale,
            ..Default::default()
        }
    }

    /// Recompute game time from a wall-clock reading in milliseconds.
    pub fn advance_to(&mut self, wall_ms: f64) -> f64 {
        let now = wall_ms * self.time_scale;
        self.delta = now - self.elapsed;
        self.elapsed = now;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_wall_clock() {
        let mut time = WorldTime::with_scale(2.0);
        assert_eq!(time.advance_to(100.0), 200.0);
        assert_eq!(time.advance_to(150.0), 300.0);
        assert_eq!(time.delta, 100.0);
    }
}
