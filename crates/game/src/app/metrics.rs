use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LoopMetricsSnapshot {
    pub(crate) tps: f32,
    pub(crate) fps: f32,
    pub(crate) draw_time_ms: f32,
    pub(crate) draw_commands_per_frame: f32,
}

/// Per-interval tick, frame and draw-list counters for the loop runner.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    draw_commands: u64,
    draw_time_sum: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            ticks: 0,
            draw_commands: 0,
            draw_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, draw_time: Duration, draw_commands: usize) {
        self.frames = self.frames.saturating_add(1);
        self.draw_time_sum = self.draw_time_sum.saturating_add(draw_time);
        self.draw_commands = self.draw_commands.saturating_add(draw_commands as u64);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let (draw_time_ms, draw_commands_per_frame) = if self.frames == 0 {
            (0.0, 0.0)
        } else {
            (
                (self.draw_time_sum.as_secs_f32() / self.frames as f32) * 1000.0,
                self.draw_commands as f32 / self.frames as f32,
            )
        };

        let snapshot = LoopMetricsSnapshot {
            tps: self.ticks as f32 / elapsed_seconds,
            fps: self.frames as f32 / elapsed_seconds,
            draw_time_ms,
            draw_commands_per_frame,
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.draw_commands = 0;
        self.draw_time_sum = Duration::ZERO;

        Some(snapshot)
    }
}
