use crate::config::Config;
use crate::export::{write_document, XmlElement};
use crate::geometry::Geometry;
use crate::material::Material;
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Ordered collection of [`Material`] instances for export.
///
/// `Materials` behaves like a simple growable list. The optional
/// `cross_sections` path is written into `materials.xml` so engine-side
/// tooling can find the data library without consulting the environment;
/// when unset, the global [`Config`] value is used instead.
#[derive(Debug, Clone)]
pub struct Materials {
    materials: Vec<Arc<Material>>,
    /// Path to the cross-section index file recorded in the export
    pub cross_sections: Option<String>,
}

impl Materials {
    /// Create a new empty materials collection
    pub fn new() -> Self {
        Materials {
            materials: Vec::new(),
            cross_sections: None,
        }
    }

    /// Collect the unique materials of a geometry, in traversal order.
    /// Geometry construction has already assigned their ids.
    pub fn from_geometry(geometry: &Geometry) -> Self {
        Materials {
            materials: geometry.materials(),
            cross_sections: None,
        }
    }

    /// Append a material to the collection (like a list)
    pub fn append(&mut self, material: Arc<Material>) {
        self.materials.push(material);
    }

    /// Get a reference to a material by index
    pub fn get(&self, index: usize) -> Option<&Arc<Material>> {
        self.materials.get(index)
    }

    /// Get the number of materials in the collection
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Get an iterator over the materials
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Material>> {
        self.materials.iter()
    }

    /// Record the cross-section index path in the export
    pub fn set_cross_sections(&mut self, path: impl Into<String>) {
        self.cross_sections = Some(path.into());
    }

    /// Serialize to the engine's `<materials>` element. Every material must
    /// carry an id and a density.
    pub fn to_xml_element(&self) -> Result<XmlElement, String> {
        let mut elem = XmlElement::new("materials");
        let cross_sections = self
            .cross_sections
            .clone()
            .or_else(|| Config::global().cross_sections.clone());
        if let Some(path) = cross_sections {
            elem.push_child(XmlElement::new("cross_sections").text(path));
        }
        for material in &self.materials {
            elem.push_child(material.to_xml_element()?);
        }
        Ok(elem)
    }

    /// Write `materials.xml` into `dir`.
    pub fn export_to_xml(&self, dir: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let elem = self.to_xml_element()?;
        debug!("writing materials.xml ({} materials)", self.materials.len());
        Ok(write_document(dir.as_ref(), "materials.xml", &elem)?)
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}
