//! Frame loop and audit timer
//!
//! The host owns the loop: `FrameDriver::pump` runs one frame if the game is
//! playing, and `run` keeps pumping until the run stops or a frame budget is
//! spent. No frame is ever scheduled while the game is not playing.

use crate::consts::AUDIT_INTERVAL_MS;
use crate::game::Game;
use crate::persistence::KeyValueStore;
use crate::platform::RenderSink;
use crate::sim::Violation;

/// Monotonic host timestamps in milliseconds
pub trait FrameSource {
    /// Timestamp for the next frame
    fn next_frame_ms(&mut self) -> f64;
}

/// Synthetic clock advancing a fixed step per frame (headless runs, tests)
#[derive(Debug, Clone)]
pub struct FixedStepSource {
    now_ms: f64,
    step_ms: f64,
}

impl FixedStepSource {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            step_ms,
        }
    }

    /// 60 fps from t = 0
    pub fn sixty_fps() -> Self {
        Self::new(0.0, 1000.0 / 60.0)
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Jump ahead without producing a frame (e.g. time spent paused)
    pub fn skip(&mut self, ms: f64) {
        self.now_ms += ms;
    }
}

impl FrameSource for FixedStepSource {
    fn next_frame_ms(&mut self) -> f64 {
        let now = self.now_ms;
        self.now_ms += self.step_ms;
        now
    }
}

/// Fires every `interval_ms` of real time
///
/// The first observed timestamp starts the period.
#[derive(Debug, Clone)]
pub struct AuditTimer {
    interval_ms: f64,
    next_ms: Option<f64>,
}

impl Default for AuditTimer {
    fn default() -> Self {
        Self::new(AUDIT_INTERVAL_MS)
    }
}

impl AuditTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_ms: None,
        }
    }

    /// True when a period has elapsed at `now_ms`
    pub fn due(&mut self, now_ms: f64) -> bool {
        let next = *self.next_ms.get_or_insert(now_ms + self.interval_ms);
        if now_ms < next {
            return false;
        }
        // Missed periods collapse into one firing
        self.next_ms = Some(now_ms + self.interval_ms);
        true
    }

    /// Audit the game if due. Runs regardless of the game's phase.
    ///
    /// `None` when no audit fired at `now_ms`.
    pub fn poll<S: KeyValueStore>(
        &mut self,
        now_ms: f64,
        game: &mut Game<S>,
    ) -> Option<Result<(), Violation>> {
        self.due(now_ms).then(|| game.audit())
    }
}

/// Explicit frame loop over a timestamp source and a render sink
pub struct FrameDriver<F: FrameSource, R: RenderSink> {
    source: F,
    sink: R,
    audit: AuditTimer,
    frames: u64,
}

impl<F: FrameSource, R: RenderSink> FrameDriver<F, R> {
    pub fn new(source: F, sink: R) -> Self {
        Self {
            source,
            sink,
            audit: AuditTimer::default(),
            frames: 0,
        }
    }

    pub fn with_audit(mut self, audit: AuditTimer) -> Self {
        self.audit = audit;
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn source_mut(&mut self) -> &mut F {
        &mut self.source
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Run one frame if the game is playing. Returns whether it ran.
    ///
    /// The frame that ends a run is still presented.
    pub fn pump<S: KeyValueStore>(&mut self, game: &mut Game<S>) -> bool {
        if !game.is_playing() {
            return false;
        }
        let now = self.source.next_frame_ms();
        if let Some(Err(violation)) = self.audit.poll(now, game) {
            log::debug!("frame at {now:.0} ms ends after audit ({})", violation.code());
        }
        game.frame(now);
        self.sink.present(&game.snapshot());
        self.frames += 1;
        true
    }

    /// Pump until the game stops playing or `max_frames` frames ran
    pub fn run<S: KeyValueStore>(&mut self, game: &mut Game<S>, max_frames: u64) -> u64 {
        let mut ran = 0;
        while ran < max_frames && self.pump(game) {
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLoader;
    use crate::persistence::MemoryStore;
    use crate::platform::NullSink;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    fn game() -> Game<MemoryStore> {
        Game::new(MemoryStore::new(), Tuning::default(), 11).with_assets(AssetLoader::placeholders())
    }

    #[test]
    fn test_fixed_step_source() {
        let mut source = FixedStepSource::new(100.0, 16.0);
        assert_eq!(source.next_frame_ms(), 100.0);
        assert_eq!(source.next_frame_ms(), 116.0);
        source.skip(1000.0);
        assert_eq!(source.next_frame_ms(), 1132.0);
    }

    #[test]
    fn test_audit_timer_period() {
        let mut timer = AuditTimer::new(5000.0);
        assert!(!timer.due(0.0));
        assert!(!timer.due(4999.0));
        assert!(timer.due(5000.0));
        assert!(!timer.due(6000.0));
        // A long stall fires once, not once per missed period
        assert!(timer.due(30_000.0));
        assert!(!timer.due(30_001.0));
    }

    #[test]
    fn test_no_frames_unless_playing() {
        let mut game = game();
        let mut driver = FrameDriver::new(FixedStepSource::sixty_fps(), NullSink::default());
        assert!(!driver.pump(&mut game));
        assert_eq!(driver.run(&mut game, 100), 0);

        game.start();
        assert_eq!(driver.run(&mut game, 30), 30);
        game.pause();
        assert_eq!(driver.run(&mut game, 30), 0);
        assert_eq!(driver.sink().frames, 30);
    }

    #[test]
    fn test_run_stops_at_game_over() {
        let mut game = game();
        game.start();
        game.state_mut().speed = 40.0;
        let mut driver = FrameDriver::new(FixedStepSource::sixty_fps(), NullSink::default())
            .with_audit(AuditTimer::new(100.0));
        let ran = driver.run(&mut game, 1000);
        assert!(ran < 1000);
        assert_eq!(game.phase(), GamePhase::GameOver);
        // The audit caught the bogus speed before any car arrived
        assert_eq!(game.state().score, 0);
        assert_eq!(driver.frames(), ran);
    }

    #[test]
    fn test_poll_reports_violation() {
        let mut game = game();
        game.start();
        game.state_mut().speed = 99.0;
        let mut timer = AuditTimer::new(100.0);
        assert_eq!(timer.poll(0.0, &mut game), None);
        assert!(matches!(
            timer.poll(100.0, &mut game),
            Some(Err(Violation::SpeedOutOfRange { .. }))
        ));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_audit_runs_while_paused() {
        let mut game = game();
        game.start();
        game.pause();
        game.state_mut().speed = 99.0;
        let mut timer = AuditTimer::new(5000.0);
        assert_eq!(timer.poll(0.0, &mut game), None);
        assert_eq!(timer.poll(5000.0, &mut game), Some(Ok(())));
        // Paused sessions are not audited, but the timer keeps its period
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(!timer.due(9000.0));
        assert!(timer.due(10_000.0));
    }
}
