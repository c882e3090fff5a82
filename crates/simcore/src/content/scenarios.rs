use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::sim::{SessionSettings, ARM_SPEED_RANGE, FEEDBACK_RANGE, PRECISION_RANGE};

pub const SCENARIO_FILE_NAME: &str = "scenarios.xml";
const BUILTIN_SCENARIOS: [&str; 3] = ["Basic", "Intermediate", "Advanced"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Error)]
pub enum ScenarioCatalogError {
    #[error("failed to read scenario catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed scenario XML in {path} at {}:{}: {message}", .location.line, .location.column)]
    Malformed {
        path: PathBuf,
        location: SourceLocation,
        message: String,
    },
    #[error("invalid scenario catalog {path} at {}:{}: {message}", .location.line, .location.column)]
    Invalid {
        path: PathBuf,
        location: SourceLocation,
        message: String,
    },
}

/// Settings applied when a scenario is selected. Unset fields keep the
/// operator's current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsPreset {
    pub precision_target: Option<f32>,
    pub arm_speed: Option<f32>,
    pub feedback_intensity: Option<f32>,
}

impl SettingsPreset {
    pub fn apply(&self, settings: &mut SessionSettings) {
        if let Some(value) = self.precision_target {
            settings.set_precision_target(value);
        }
        if let Some(value) = self.arm_speed {
            settings.set_arm_speed(value);
        }
        if let Some(value) = self.feedback_intensity {
            settings.set_feedback_intensity(value);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDef {
    pub name: String,
    pub preset: SettingsPreset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    scenarios: Vec<ScenarioDef>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScenarioCatalog {
    pub fn builtin() -> Self {
        Self {
            scenarios: BUILTIN_SCENARIOS
                .iter()
                .map(|name| ScenarioDef {
                    name: (*name).to_string(),
                    preset: SettingsPreset::default(),
                })
                .collect(),
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ScenarioCatalogError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ScenarioCatalogError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(path, &raw).map(Some)
    }

    pub fn parse(path: &Path, raw: &str) -> Result<Self, ScenarioCatalogError> {
        let doc = Document::parse(raw).map_err(|error| ScenarioCatalogError::Malformed {
            path: path.to_path_buf(),
            location: SourceLocation {
                line: error.pos().row,
                column: error.pos().col,
            },
            message: error.to_string(),
        })?;
        let parser = CatalogParser { path, doc: &doc };

        let root = doc.root_element();
        if root.tag_name().name() != "Scenarios" {
            return Err(parser.invalid(root, "root element must be <Scenarios>"));
        }

        let mut names = HashSet::new();
        let mut scenarios = Vec::new();
        for child in root.children().filter(Node::is_element) {
            if child.tag_name().name() != "Scenario" {
                return Err(parser.invalid(
                    child,
                    format!("unexpected <{}>; expected <Scenario>", child.tag_name().name()),
                ));
            }
            let scenario = parser.scenario(child)?;
            if !names.insert(scenario.name.clone()) {
                return Err(parser.invalid(
                    child,
                    format!("duplicate scenario '{}'", scenario.name),
                ));
            }
            scenarios.push(scenario);
        }

        if scenarios.is_empty() {
            return Err(parser.invalid(root, "catalog must define at least one <Scenario>"));
        }
        Ok(Self { scenarios })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScenarioDef> {
        self.scenarios.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.scenarios
            .iter()
            .position(|scenario| scenario.name.eq_ignore_ascii_case(name))
    }

    pub fn next_index(&self, index: usize) -> usize {
        if self.scenarios.is_empty() {
            0
        } else {
            (index + 1) % self.scenarios.len()
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|scenario| scenario.name.as_str())
    }
}

struct CatalogParser<'a, 'input> {
    path: &'a Path,
    doc: &'a Document<'input>,
}

impl CatalogParser<'_, '_> {
    fn scenario(&self, node: Node<'_, '_>) -> Result<ScenarioDef, ScenarioCatalogError> {
        let mut seen = HashSet::new();
        let mut name = None;
        let mut preset = SettingsPreset::default();

        for field in node.children().filter(Node::is_element) {
            let field_name = field.tag_name().name();
            if !seen.insert(field_name.to_string()) {
                return Err(self.invalid(field, format!("duplicate field <{field_name}>")));
            }
            match field_name {
                "name" => name = Some(self.text(field)?),
                "precision" => {
                    preset.precision_target = Some(self.number(field, PRECISION_RANGE)?)
                }
                "speed" => preset.arm_speed = Some(self.number(field, ARM_SPEED_RANGE)?),
                "feedback" => {
                    preset.feedback_intensity = Some(self.number(field, FEEDBACK_RANGE)?)
                }
                _ => {
                    return Err(self.invalid(
                        field,
                        format!("unknown field <{field_name}> in <Scenario>"),
                    ))
                }
            }
        }

        let Some(name) = name else {
            return Err(self.invalid(node, "missing required field <name> in <Scenario>"));
        };
        Ok(ScenarioDef { name, preset })
    }

    fn text(&self, node: Node<'_, '_>) -> Result<String, ScenarioCatalogError> {
        let value = node.text().map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(self.invalid(
                node,
                format!("field <{}> must not be empty", node.tag_name().name()),
            ));
        }
        Ok(value.to_string())
    }

    fn number(
        &self,
        node: Node<'_, '_>,
        (min, max): (f32, f32),
    ) -> Result<f32, ScenarioCatalogError> {
        let raw = self.text(node)?;
        let value = raw.parse::<f32>().map_err(|_| {
            self.invalid(
                node,
                format!("<{}> value '{raw}' is not a number", node.tag_name().name()),
            )
        })?;
        if !value.is_finite() || value < min || value > max {
            return Err(self.invalid(
                node,
                format!(
                    "<{}> must be within [{min}, {max}], got {value}",
                    node.tag_name().name()
                ),
            ));
        }
        Ok(value)
    }

    fn invalid(&self, node: Node<'_, '_>, message: impl Into<String>) -> ScenarioCatalogError {
        let pos = self.doc.text_pos_at(node.range().start);
        ScenarioCatalogError::Invalid {
            path: self.path.to_path_buf(),
            location: SourceLocation {
                line: pos.row,
                column: pos.col,
            },
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(raw: &str) -> Result<ScenarioCatalog, ScenarioCatalogError> {
        ScenarioCatalog::parse(Path::new("scenarios.xml"), raw)
    }

    #[test]
    fn builtin_catalog_has_three_levels_in_order() {
        let catalog = ScenarioCatalog::builtin();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["Basic", "Intermediate", "Advanced"]
        );
        assert_eq!(catalog.next_index(2), 0);
        assert_eq!(catalog.index_of("advanced"), Some(2));
    }

    #[test]
    fn presets_are_parsed_and_applied() {
        let catalog = parse(
            r#"<Scenarios>
                <Scenario><name>Warmup</name></Scenario>
                <Scenario><name>Nephrectomy</name><precision>90</precision><speed>0.8</speed></Scenario>
            </Scenarios>"#,
        )
        .expect("catalog");
        assert_eq!(catalog.len(), 2);

        let mut settings = SessionSettings::default();
        catalog.get(1).expect("scenario").preset.apply(&mut settings);
        assert_eq!(settings.precision_target, 90.0);
        assert_eq!(settings.arm_speed, 0.8);
        assert_eq!(settings.feedback_intensity, 80.0);
    }

    #[test]
    fn unknown_field_reports_location() {
        let err = parse("<Scenarios>\n  <Scenario><name>A</name><mood>x</mood></Scenario>\n</Scenarios>")
            .expect_err("err");
        match err {
            ScenarioCatalogError::Invalid {
                location, message, ..
            } => {
                assert_eq!(location.line, 2);
                assert!(message.contains("<mood>"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_preset_is_rejected() {
        let err = parse("<Scenarios><Scenario><name>A</name><speed>9</speed></Scenario></Scenarios>")
            .expect_err("err");
        assert!(matches!(err, ScenarioCatalogError::Invalid { .. }));
    }

    #[test]
    fn duplicate_and_missing_names_are_rejected() {
        assert!(parse(
            "<Scenarios><Scenario><name>A</name></Scenario><Scenario><name>A</name></Scenario></Scenarios>"
        )
        .is_err());
        assert!(parse("<Scenarios><Scenario><speed>1</speed></Scenario></Scenarios>").is_err());
        assert!(parse("<Scenarios><Scenario><name>  </name></Scenario></Scenarios>").is_err());
        assert!(parse("<Scenarios></Scenarios>").is_err());
        assert!(parse("<Levels><Scenario><name>A</name></Scenario></Levels>").is_err());
    }

    #[test]
    fn malformed_xml_reports_position() {
        let err = parse("<Scenarios><Scenario><name>A</name></Scenarios>").expect_err("err");
        assert!(matches!(err, ScenarioCatalogError::Malformed { .. }));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let temp = TempDir::new().expect("temp");
        let loaded = ScenarioCatalog::load(&temp.path().join(SCENARIO_FILE_NAME)).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn load_reads_catalog_from_disk() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join(SCENARIO_FILE_NAME);
        fs::write(&path, "<Scenarios><Scenario><name>Solo</name></Scenario></Scenarios>")
            .expect("write");
        let catalog = ScenarioCatalog::load(&path).expect("load").expect("catalog");
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Solo"]);
    }
}
