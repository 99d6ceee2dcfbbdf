/// Fixed-rate tick clock driving the demo updates
///
/// Real time is accumulated every frame and handed out in whole ticks, so the
/// demos always see the same tick length however fast frames are drawn.
use std::time::{Duration, Instant};

/// Maximum number of ticks per frame to prevent a spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Length of one tick
    tick: Duration,

    /// Time not yet consumed by whole ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether updates are suspended
    paused: bool,

    /// Ticks handed out since start (the demos' elapsed-ticks count)
    ticks: u64,
}

impl GameLoop {
    /// Create a loop ticking `rate` times per second
    pub fn new(rate: u32) -> Self {
        Self {
            tick: Duration::from_secs_f64(1.0 / f64::from(rate.max(1))),
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            ticks: 0,
        }
    }

    /// Begin a new frame, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of real time, returns the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.tick;
            ticks += 1;
        }

        // Drop what the cap refused so a long stall doesn't replay later
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = self.accumulator.min(self.tick);
        }

        ticks
    }

    /// Claim the next tick number
    pub fn next_tick(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// Get total number of ticks handed out
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Length of one tick in seconds
    pub fn tick_secs(&self) -> f32 {
        self.tick.as_secs_f32()
    }

    /// Check if updates are paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            log::info!("Simulation paused");
        } else {
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::default();
        assert_eq!(game_loop.ticks(), 0);
        assert!(!game_loop.is_paused());
        assert!((game_loop.tick_secs() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_whole_ticks_are_counted() {
        let mut game_loop = GameLoop::new(60);
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 0);
        // 10ms + 30ms = 40ms, two full 16.6ms ticks
        assert_eq!(game_loop.advance(Duration::from_millis(30)), 2);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new(60);
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        assert_eq!(game_loop.advance(Duration::from_millis(100)), 0);

        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_max_ticks_limit() {
        let mut game_loop = GameLoop::new(60);
        assert_eq!(game_loop.advance(Duration::from_millis(300)), MAX_TICKS_PER_FRAME);
        // The backlog was dropped, not deferred
        assert!(game_loop.advance(Duration::ZERO) <= 1);
    }

    #[test]
    fn test_tick_numbers_increase() {
        let mut game_loop = GameLoop::new(60);
        assert_eq!(game_loop.next_tick(), 1);
        assert_eq!(game_loop.next_tick(), 2);
        assert_eq!(game_loop.ticks(), 2);
    }
}
