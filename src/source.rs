use crate::export::{join_numbers, XmlElement};
use crate::stats::SpatialDistribution;

/// An independent (fixed) source definition: where source particles start.
#[derive(Debug, Clone)]
pub struct IndependentSource {
    pub space: SpatialDistribution,
    pub strength: f64,
}

impl IndependentSource {
    pub fn new(space: SpatialDistribution) -> Self {
        Self {
            space,
            strength: 1.0,
        }
    }

    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        self.space.sample(rng)
    }

    /// Serialize to the engine's `<source>` element.
    pub fn to_xml_element(&self) -> XmlElement {
        XmlElement::new("source")
            .attr("strength", self.strength)
            .attr("particle", "neutron")
            .child(
                XmlElement::new("space")
                    .attr("type", self.space.type_str())
                    .child(
                        XmlElement::new("parameters")
                            .text(join_numbers(&self.space.parameters())),
                    ),
            )
    }
}

impl Default for IndependentSource {
    fn default() -> Self {
        Self::new(SpatialDistribution::new_point(0.0, 0.0, 0.0))
    }
}
