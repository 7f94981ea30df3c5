use crate::config::{Config, CROSS_SECTIONS_ENV};
use crate::geometry::Geometry;
use crate::materials::Materials;
use crate::settings::Settings;
use crate::tally::Tallies;
use log::info;
use std::path::Path;
use std::process::Command;

/// Complete description of a simulation: material definitions, the cell
/// hierarchy, run parameters and requested tallies. A model can serialize
/// itself to the engine's XML input files and launch the engine on them.
#[derive(Debug)]
pub struct Model {
    pub materials: Materials,
    pub geometry: Geometry,
    pub settings: Settings,
    pub tallies: Tallies,
}

impl Model {
    pub fn new(
        materials: Materials,
        geometry: Geometry,
        settings: Settings,
        tallies: Tallies,
    ) -> Self {
        Model {
            materials,
            geometry,
            settings,
            tallies,
        }
    }

    /// Write all engine input files into `dir`. Tallies are skipped when
    /// none were requested.
    pub fn export_to_xml(&self, dir: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let dir = dir.as_ref();
        self.materials.export_to_xml(dir)?;
        self.geometry.export_to_xml(dir)?;
        self.settings.export_to_xml(dir)?;
        if !self.tallies.is_empty() {
            self.tallies.export_to_xml(dir)?;
        }
        Ok(())
    }

    /// Export the input files and launch the engine in `dir`, blocking
    /// until it finishes. The cross-section index path (from the global
    /// configuration) is passed through the engine's environment variable.
    pub fn run(&self, dir: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let dir = dir.as_ref();
        self.export_to_xml(dir)?;

        let (executable, cross_sections) = {
            let config = Config::global();
            (config.executable.clone(), config.cross_sections.clone())
        };

        let mut command = Command::new(&executable);
        command.current_dir(dir);
        if let Some(path) = &cross_sections {
            command.env(CROSS_SECTIONS_ENV, path);
        }

        info!("running '{}' in {}", executable, dir.display());
        let status = command.status().map_err(|e| {
            format!("failed to launch '{}': {}", executable, e)
        })?;
        if !status.success() {
            return Err(format!("'{}' exited with {}", executable, status).into());
        }
        info!("'{}' finished successfully", executable);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::material::{FractionType, Material};
    use crate::source::IndependentSource;
    use crate::surface::{BoundaryType, HalfspaceExt, Surface};
    use crate::universe::Universe;
    use std::fs;
    use std::sync::Arc;

    fn simple_model() -> Model {
        let mut water = Material::new();
        water.set_name("Water");
        water
            .add_nuclide("H1", 2.0, FractionType::Atom)
            .unwrap();
        water
            .add_nuclide("O16", 1.0, FractionType::Atom)
            .unwrap();
        water.set_density("g/cm3", 1.0).unwrap();
        let water = Arc::new(water);

        let cylinder = Arc::new(
            Surface::z_cylinder(0.0, 0.0, 5.0).with_boundary_type(BoundaryType::Vacuum),
        );
        let cell = Cell::with_material(cylinder.below(), "Water Cell", Arc::clone(&water));
        let mut root = Universe::new();
        root.add_cell(cell);
        let geometry = Geometry::new(root).unwrap();

        let materials = Materials::from_geometry(&geometry);
        let settings =
            Settings::new(10, 2, 100, IndependentSource::default()).unwrap();
        Model::new(materials, geometry, settings, Tallies::new())
    }

    #[test]
    fn test_export_writes_input_files() {
        let model = simple_model();
        let dir = std::env::temp_dir().join("model_export_test");
        model.export_to_xml(&dir).unwrap();

        for filename in ["materials.xml", "geometry.xml", "settings.xml"] {
            let path = dir.join(filename);
            assert!(path.exists(), "{} missing", filename);
            let content = fs::read_to_string(&path).unwrap();
            assert!(content.starts_with("<?xml version='1.0' encoding='utf-8'?>"));
        }
        // no tallies requested, so no tallies.xml
        assert!(!dir.join("tallies.xml").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_run_fails_for_missing_executable() {
        let model = simple_model();
        {
            let mut config = Config::global();
            config.set_executable("nonexistent-transport-engine");
        }
        let dir = std::env::temp_dir().join("model_run_test");
        let result = model.run(&dir);
        {
            let mut config = Config::global();
            config.clear();
        }
        assert!(result.is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
