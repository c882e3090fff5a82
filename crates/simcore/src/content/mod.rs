mod atomic_io;
mod export;
mod scenarios;

pub use export::{export_file_name, write_export, ExportError, MetricsExport, EXPORT_FILE_PREFIX};
pub use scenarios::{
    ScenarioCatalog, ScenarioCatalogError, ScenarioDef, SettingsPreset, SourceLocation,
    SCENARIO_FILE_NAME,
};
