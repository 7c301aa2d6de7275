//! RON preset loader

use crate::error::{Error, Result};
use pulley_core::{PresetId, PulleyConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A named joint preset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JointDef {
    pub id: PresetId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub joint: PulleyConfig,
}

impl JointDef {
    /// Reject values the server could never use
    ///
    /// Editor ranges are advisory and are not checked here.
    fn validate(&self) -> Result<()> {
        let joint = &self.joint;
        let fields = [
            ("length_a", joint.length_a),
            ("length_b", joint.length_b),
            ("rest_length", joint.rest_length),
            ("stiffness", joint.stiffness),
            ("damping", joint.damping),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidPreset {
                    id: self.id.to_string(),
                    reason: format!("{} is not finite", name),
                });
            }
        }
        Ok(())
    }
}

/// A file holding a `joints: [...]` list
#[derive(Deserialize)]
struct JointFile {
    joints: Vec<JointDef>,
}

impl JointFile {
    /// The content parsed fine up to a missing top-level `joints` field
    fn is_missing(err: &ron::error::SpannedError) -> bool {
        matches!(
            err.code,
            ron::Error::MissingStructField { field: "joints", .. }
        )
    }
}

/// Loaded joint presets
#[derive(Debug, Default)]
pub struct JointDefs {
    /// Preset definitions by ID
    pub joints: HashMap<PresetId, JointDef>,
}

impl JointDefs {
    /// Create empty preset definitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset's joint configuration
    pub fn get(&self, id: &PresetId) -> Option<&PulleyConfig> {
        self.joints.get(id).map(|def| &def.joint)
    }

    /// Get the full preset definition
    pub fn get_def(&self, id: &PresetId) -> Option<&JointDef> {
        self.joints.get(id)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// Loader for RON joint presets
pub struct Loader {
    defs: JointDefs,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            defs: JointDefs::new(),
        }
    }

    /// Load a single RON file
    ///
    /// The file may hold a `joints: [...]` list or a single preset. Files
    /// without a top-level `joints` field are read as a single preset.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        match ron::from_str::<JointFile>(&content) {
            Ok(file) => self.insert_all(file.joints),
            Err(e) if JointFile::is_missing(&e) => self.load_single_definition(&content),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a `joints: [...]` list from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: JointFile = ron::from_str(content)?;
        self.insert_all(file.joints)
    }

    /// Load a single preset from a RON string
    pub fn load_single_definition(&mut self, content: &str) -> Result<()> {
        let def: JointDef = ron::from_str(content)?;
        self.insert(def)
    }

    /// Load all RON files from a directory, recursing into subdirectories
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();

            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the presets
    pub fn finish(self) -> JointDefs {
        self.defs
    }

    /// Get the current presets (for inspection during loading)
    pub fn defs(&self) -> &JointDefs {
        &self.defs
    }

    fn insert_all(&mut self, defs: Vec<JointDef>) -> Result<()> {
        for def in defs {
            self.insert(def)?;
        }
        Ok(())
    }

    fn insert(&mut self, def: JointDef) -> Result<()> {
        def.validate()?;
        if self.defs.joints.contains_key(&def.id) {
            return Err(Error::DuplicateDefinition(def.id.to_string()));
        }
        self.defs.joints.insert(def.id.clone(), def);
        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
