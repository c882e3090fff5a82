use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;
pub mod sim;

pub use app::{
    run_app, AppError, FrameStatsSnapshot, InputAction, InputSnapshot, LoopConfig, Renderer,
    Scene, SceneCommand, SceneView, Trigger, Viewport,
};
pub use content::{
    write_export, ExportError, MetricsExport, ScenarioCatalog, ScenarioCatalogError, ScenarioDef,
    SettingsPreset, SourceLocation, SCENARIO_FILE_NAME,
};

pub const ROOT_ENV_VAR: &str = "SURGISIM_ROOT";
const ASSETS_DIR_NAME: &str = "assets";
const EXPORTS_DIR_NAME: &str = "exports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub exports_dir: PathBuf,
}

impl AppPaths {
    pub fn for_root(root: PathBuf) -> Self {
        Self {
            assets_dir: root.join(ASSETS_DIR_NAME),
            exports_dir: root.join(EXPORTS_DIR_NAME),
            root,
        }
    }

    pub fn scenario_catalog_path(&self) -> PathBuf {
        self.assets_dir.join(SCENARIO_FILE_NAME)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create exports directory at {path}: {source}")]
    CreateExportsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "SURGISIM_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/surgical-trainer\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Locates the application root and makes sure the default exports
/// directory exists beneath it.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let paths = AppPaths::for_root(resolve_root()?);
    ensure_exports_dir(&paths.exports_dir)?;
    Ok(paths)
}

pub fn ensure_exports_dir(path: &Path) -> Result<(), StartupError> {
    fs::create_dir_all(path).map_err(|source| StartupError::CreateExportsDir {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(Path::new(&value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            find_root_from(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root_from(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join(ASSETS_DIR_NAME).is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
