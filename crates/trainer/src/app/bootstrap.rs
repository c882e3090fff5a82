use std::path::Path;

use simcore::sim::{bounds_from_extents, Vec3};
use simcore::{
    ensure_exports_dir, resolve_app_paths, LoopConfig, ScenarioCatalog, Scene, StartupError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError, ConfigSource, TrainerConfig, CONFIG_FILE_NAME};
use super::simulation::{SimulationScene, SimulationSetup};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Surgical Trainer Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        assets_dir = %paths.assets_dir.display(),
        exports_dir = %paths.exports_dir.display(),
        "startup"
    );

    let (trainer_config, source) = load_config(&paths.root)?;
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "config_loaded"),
        ConfigSource::Defaults => info!(
            expected = %paths.root.join(CONFIG_FILE_NAME).display(),
            "config_defaults"
        ),
    }

    let catalog = load_scenario_catalog(&paths.scenario_catalog_path());
    let scenario_index = initial_scenario_index(&catalog, trainer_config.scenario.as_deref());
    let export_dir = match trainer_config.export_dir_under(&paths.root) {
        Some(dir) => {
            ensure_exports_dir(&dir)?;
            dir
        }
        None => paths.exports_dir.clone(),
    };

    let scene = SimulationScene::new(SimulationSetup {
        catalog,
        scenario_index,
        settings: trainer_config.settings,
        organ: organ_bounds(&trainer_config),
        export_dir,
    });

    Ok(AppWiring {
        config: LoopConfig {
            window_width: trainer_config.window.width,
            window_height: trainer_config.window.height,
            max_render_fps: trainer_config.window.max_fps,
            ..LoopConfig::default()
        },
        scene: Box::new(scene),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// A broken catalog never blocks startup; the built-in levels take over.
fn load_scenario_catalog(path: &Path) -> ScenarioCatalog {
    match ScenarioCatalog::load(path) {
        Ok(Some(catalog)) => {
            info!(
                path = %path.display(),
                scenarios = catalog.len(),
                "scenario_catalog_loaded"
            );
            catalog
        }
        Ok(None) => {
            info!(path = %path.display(), "scenario_catalog_builtin");
            ScenarioCatalog::builtin()
        }
        Err(error) => {
            warn!(error = %error, "scenario_catalog_invalid_using_builtin");
            ScenarioCatalog::builtin()
        }
    }
}

fn initial_scenario_index(catalog: &ScenarioCatalog, requested: Option<&str>) -> usize {
    let Some(name) = requested else {
        return 0;
    };
    catalog.index_of(name).unwrap_or_else(|| {
        warn!(
            requested = name,
            available = ?catalog.names().collect::<Vec<_>>(),
            "unknown_initial_scenario"
        );
        0
    })
}

fn organ_bounds(config: &TrainerConfig) -> Option<simcore::sim::Aabb> {
    let [x, y, z] = config.organ_extents;
    let bounds = bounds_from_extents(Vec3::new(x, y, z));
    if bounds.is_none() {
        warn!(extents = ?config.organ_extents, "organ_bounds_degenerate");
    }
    bounds
}
