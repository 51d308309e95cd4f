//! Problem generation, answer verification and result persistence for the
//! ACCA cognitive minigames.
//!
//! Each game lives under [`games`] as a pure problem generator plus an async
//! service that owns the active session. [`Games`] bundles the six services
//! over one [`GameStore`].

pub mod config;
pub mod db;
pub mod error;
pub mod games;
pub mod rng;
pub mod session;
pub mod stats;
pub mod store;
pub mod utils;

use anyhow::{Context, Result};

pub use config::EngineConfig;
pub use db::{Database, GameCode, GameSession, ResultRecord, SessionId, StoredResult};
pub use error::{GameError, GameResult};
pub use games::cat_chaser::CatChaserService;
pub use games::count_comparison::CountComparisonService;
pub use games::nback::NBackService;
pub use games::number_pressing::NumberPressingService;
pub use games::rps::RpsService;
pub use games::shape_rotation::ShapeRotationService;
pub use rng::GameRng;
pub use session::GamePhase;
pub use store::{GameStore, MemoryStore};
pub use utils::init_logging;

const ENABLE_LOGS: bool = true;

/// All six game services sharing one store.
#[derive(Clone)]
pub struct Games<S: GameStore> {
    pub nback: NBackService<S>,
    pub rps: RpsService<S>,
    pub count_comparison: CountComparisonService<S>,
    pub number_pressing: NumberPressingService<S>,
    pub shape_rotation: ShapeRotationService<S>,
    pub cat_chaser: CatChaserService<S>,
    store: S,
}

impl<S: GameStore> Games<S> {
    /// Each service gets its own stream forked from `rng`, so a fixed seed
    /// reproduces every game independently of the order they are played.
    pub fn new(store: S, mut rng: GameRng) -> Self {
        Self {
            nback: NBackService::new(store.clone(), rng.fork()),
            rps: RpsService::new(store.clone(), rng.fork()),
            count_comparison: CountComparisonService::new(store.clone(), rng.fork()),
            number_pressing: NumberPressingService::new(store.clone(), rng.fork()),
            shape_rotation: ShapeRotationService::new(store.clone(), rng.fork()),
            cat_chaser: CatChaserService::new(store.clone(), rng.fork()),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl Games<Database> {
    /// Open the SQLite store and seed the generators as `config` describes.
    /// Installs the logger on first use.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        init_logging();

        let db = match &config.db_path {
            Some(path) => Database::new(path.clone())
                .with_context(|| format!("Failed to open game database at {}", path.display()))?,
            None => Database::open_in_memory().context("Failed to open in-memory game database")?,
        };

        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        log_info!(
            "Game engine ready (db: {}, seed: {})",
            db.path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string()),
            rng.seed()
        );

        Ok(Self::new(db, rng))
    }
}
