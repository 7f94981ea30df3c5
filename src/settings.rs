use crate::export::{write_document, XmlElement};
use crate::source::IndependentSource;
use log::debug;
use std::path::Path;

/// Scalar run controls plus the source definition. The total number of
/// histories is `batches * particles`; the first `inactive` batches converge
/// the fission source and are excluded from tally statistics.
#[derive(Debug, Clone)]
pub struct Settings {
    pub batches: usize,
    pub inactive: usize,
    pub particles: usize,
    pub source: IndependentSource,
}

impl Settings {
    pub fn new(
        batches: usize,
        inactive: usize,
        particles: usize,
        source: IndependentSource,
    ) -> Result<Self, String> {
        if batches == 0 {
            return Err(String::from("batches must be positive"));
        }
        if particles == 0 {
            return Err(String::from("particles must be positive"));
        }
        if inactive >= batches {
            return Err(format!(
                "inactive batches ({}) must be fewer than total batches ({})",
                inactive, batches
            ));
        }
        Ok(Settings {
            batches,
            inactive,
            particles,
            source,
        })
    }

    /// Serialize to the engine's `<settings>` element (eigenvalue run mode).
    pub fn to_xml_element(&self) -> XmlElement {
        XmlElement::new("settings")
            .child(XmlElement::new("run_mode").text("eigenvalue"))
            .child(XmlElement::new("particles").text(self.particles))
            .child(XmlElement::new("batches").text(self.batches))
            .child(XmlElement::new("inactive").text(self.inactive))
            .child(self.source.to_xml_element())
    }

    /// Write `settings.xml` into `dir`.
    pub fn export_to_xml(&self, dir: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        debug!(
            "writing settings.xml (batches={}, inactive={}, particles={})",
            self.batches, self.inactive, self.particles
        );
        Ok(write_document(
            dir.as_ref(),
            "settings.xml",
            &self.to_xml_element(),
        )?)
    }
}
