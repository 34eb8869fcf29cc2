use bevy_ecs::prelude::Resource;

/// Figures only the renderer knows, pushed in by the host.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct RenderStats {
    /// Frames per second as measured by the renderer. When `None` the
    /// telemetry loop reports the simulated frame rate.
    pub fps: Option<f32>,
    pub resolution: String,
    pub light_summary: String,
    pub vertex_count: u64,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self {
            fps: None,
            resolution: "0x0".to_string(),
            light_summary: "HemisphericLight, DirectionalLight".to_string(),
            vertex_count: 0,
        }
    }
}

/// State of the periodic stats / race timer loop.
#[derive(Resource, Clone, Debug)]
pub struct Telemetry {
    pub interval_ms: f32,
    pub accumulated_ms: f32,
    /// Frames simulated since the last tick.
    pub frames: u32,
    /// Set once the host stopped answering. The loop never restarts on its
    /// own.
    pub halted: bool,
}

impl Telemetry {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1) as f32,
            accumulated_ms: 0.0,
            frames: 0,
            halted: false,
        }
    }

    /// Account one frame of `dt` seconds. Returns the measured fps when an
    /// interval has elapsed.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.halted {
            return None;
        }
        self.accumulated_ms += dt * 1000.0;
        self.frames += 1;
        if self.accumulated_ms < self.interval_ms {
            return None;
        }
        let fps = self.frames as f32 * 1000.0 / self.accumulated_ms;
        self.accumulated_ms %= self.interval_ms;
        self.frames = 0;
        Some(fps)
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_once_per_interval() {
        let mut t = Telemetry::new(100);
        let ticks = (0..32).filter_map(|_| t.advance(0.03125)).count();
        assert_eq!(ticks, 10);
    }

    #[test]
    fn halted_loop_stays_quiet() {
        let mut t = Telemetry::new(100);
        t.halted = true;
        assert!((0..100).all(|_| t.advance(0.05).is_none()));
    }

    #[test]
    fn reports_frame_rate() {
        let mut t = Telemetry::new(100);
        let mut fps = None;
        for _ in 0..8 {
            fps = fps.or(t.advance(0.0125));
        }
        assert!((fps.unwrap() - 80.0).abs() < 1e-3);
    }
}
