//! Bike Racer entry point
//!
//! Native builds run a headless autopilot demo against a simulated 60 fps
//! clock and log the outcome. On the web the host page drives `Game` through
//! the library directly.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bike Racer (native, headless demo) starting...");

    let options = <demo::Options as clap::Parser>::parse();
    demo::run(&options);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page creates a `Game` and calls `frame` from its own animation loop
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::{Path, PathBuf};

    use bike_racer::assets::AssetLoader;
    use bike_racer::driver::{FixedStepSource, FrameDriver};
    use bike_racer::persistence::MemoryStore;
    use bike_racer::platform::{NullSink, ToastLog};
    use bike_racer::{Game, Tuning};
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(name = "bike-racer")]
    #[command(about = "Headless Bike Racer autopilot demo on a simulated 60 fps clock")]
    pub struct Options {
        /// Base RNG seed; each run derives its own seed from it
        #[arg(long, default_value_t = 0x5eed)]
        pub seed: u64,
        /// Number of runs to play back to back
        #[arg(long, default_value_t = 3)]
        pub runs: u32,
        /// Simulated minutes before a surviving run is ended
        #[arg(long, default_value_t = 5)]
        pub minutes: u64,
        /// JSON file overriding balance values
        #[arg(long)]
        pub tuning: Option<PathBuf>,
    }

    impl Options {
        /// Tuning from `--tuning`, or the defaults if absent or unusable
        pub fn load_tuning(&self) -> Tuning {
            match &self.tuning {
                Some(path) => load_tuning(path),
                None => Tuning::default(),
            }
        }
    }

    fn load_tuning(path: &Path) -> Tuning {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("cannot read {}: {e}; using default tuning", path.display());
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{}: {e}; using default tuning", path.display());
                Tuning::default()
            }
        }
    }

    pub fn run(options: &Options) {
        let toasts = ToastLog::new();
        let mut game = Game::new(MemoryStore::new(), options.load_tuning(), options.seed)
            .with_assets(AssetLoader::placeholders())
            .with_notifier(Box::new(toasts.clone()));
        game.set_autopilot(true);

        let max_frames = options.minutes * 60 * 60;
        let mut driver = FrameDriver::new(FixedStepSource::sixty_fps(), NullSink::default());

        for run in 1..=options.runs {
            let started = if run == 1 { game.start() } else { game.restart() };
            if !started {
                log::warn!("run {run} could not start");
                break;
            }
            let frames = driver.run(&mut game, max_frames);
            let state = game.state();
            println!(
                "run {run}: score {} level {} coins {} ({:.1}s simulated)",
                state.score,
                state.level,
                state.coins,
                frames as f64 / 60.0
            );
            if game.is_playing() {
                // Survived the whole budget; end it so the next run can start
                game.end_run();
            }
        }

        println!(
            "best {} | total coins {} | {} toasts",
            game.high_score(),
            game.state().total_coins,
            toasts.toasts().len()
        );
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let options = Options::try_parse_from(["bike-racer"]).unwrap();
            assert_eq!(options.seed, 0x5eed);
            assert_eq!(options.runs, 3);
            assert_eq!(options.minutes, 5);
            assert!(options.tuning.is_none());
        }

        #[test]
        fn test_flags_override_defaults() {
            let options =
                Options::try_parse_from(["bike-racer", "--seed", "9", "--runs", "1", "--minutes", "2"])
                    .unwrap();
            assert_eq!((options.seed, options.runs, options.minutes), (9, 1, 2));
            assert!(Options::try_parse_from(["bike-racer", "--runs", "many"]).is_err());
            assert!(Options::try_parse_from(["bike-racer", "--speed", "3"]).is_err());
        }

        #[test]
        fn test_unreadable_tuning_falls_back() {
            let options =
                Options::try_parse_from(["bike-racer", "--tuning", "/nonexistent/tuning.json"])
                    .unwrap();
            assert_eq!(options.load_tuning(), Tuning::default());
        }
    }
}
