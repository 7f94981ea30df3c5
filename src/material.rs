use crate::export::XmlElement;

/// How a composition fraction is interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionType {
    /// Atom fraction ("ao")
    Atom,
    /// Weight fraction ("wo")
    Weight,
}

impl FractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FractionType::Atom => "ao",
            FractionType::Weight => "wo",
        }
    }

    /// Parse a fraction type from a string, returning None for invalid strings
    pub fn from_str_option(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ao" => Some(FractionType::Atom),
            "wo" => Some(FractionType::Weight),
            _ => None,
        }
    }
}

impl Default for FractionType {
    fn default() -> Self {
        FractionType::Atom
    }
}

/// One entry in a material's composition. Elements are kept as elements and
/// expanded to their isotopes by the engine, which owns the abundance data.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionEntry {
    Nuclide {
        name: String,
        fraction: f64,
        fraction_type: FractionType,
    },
    Element {
        symbol: String,
        fraction: f64,
        fraction_type: FractionType,
        /// Uranium enrichment in weight-percent U235, when requested.
        enrichment: Option<f64>,
    },
}

impl CompositionEntry {
    pub fn fraction(&self) -> f64 {
        match self {
            CompositionEntry::Nuclide { fraction, .. } => *fraction,
            CompositionEntry::Element { fraction, .. } => *fraction,
        }
    }

    pub fn fraction_type(&self) -> FractionType {
        match self {
            CompositionEntry::Nuclide { fraction_type, .. } => *fraction_type,
            CompositionEntry::Element { fraction_type, .. } => *fraction_type,
        }
    }
}

/// A homogeneous mixture handed to the engine: name, density, composition
/// entries and optional thermal-scattering tables.
///
/// A `Material` starts empty; users add elements with [`Material::add_element`]
/// (or [`Material::add_element_enriched`] for enriched uranium) and nuclides
/// with [`Material::add_nuclide`], then set the density. All interpretation of
/// the composition (isotopic expansion, number densities, cross-section
/// lookup) happens inside the engine; this type only records the literal
/// values and serializes them.
#[derive(Debug, Clone)]
pub struct Material {
    /// Optional name of the material
    pub name: Option<String>,
    /// Unique identifier for the material
    pub material_id: Option<u32>,
    /// Composition entries, kept in insertion order
    pub composition: Vec<CompositionEntry>,
    /// Density value, in `density_units`
    pub density: Option<f64>,
    /// Density unit (default: g/cm³)
    pub density_units: String,
    /// Thermal scattering table names (e.g. "c_H_in_H2O")
    pub sab: Vec<String>,
}

impl Material {
    pub fn new() -> Self {
        Material {
            name: None,
            material_id: None,
            composition: Vec::new(),
            density: None,
            density_units: String::from("g/cm3"),
            sab: Vec::new(),
        }
    }

    /// Create a new material with a specific ID
    pub fn with_id(material_id: u32) -> Self {
        Material {
            material_id: Some(material_id),
            ..Material::new()
        }
    }

    /// Set the name of the material
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Get the name of the material
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the material ID
    pub fn set_material_id(&mut self, material_id: u32) {
        self.material_id = Some(material_id);
    }

    /// Get the material ID
    pub fn get_material_id(&self) -> Option<u32> {
        self.material_id
    }

    pub fn set_density(&mut self, unit: impl AsRef<str>, value: f64) -> Result<(), String> {
        if value <= 0.0 {
            return Err(String::from("Density must be positive"));
        }
        self.density = Some(value);
        self.density_units = String::from(unit.as_ref());
        Ok(())
    }

    /// The engine requires one fraction type per material.
    fn check_fraction_type(&self, fraction_type: FractionType) -> Result<(), String> {
        if let Some(entry) = self.composition.first() {
            if entry.fraction_type() != fraction_type {
                return Err(format!(
                    "Cannot mix '{}' and '{}' fractions in one material",
                    entry.fraction_type().as_str(),
                    fraction_type.as_str()
                ));
            }
        }
        Ok(())
    }

    pub fn add_nuclide(
        &mut self,
        nuclide: impl AsRef<str>,
        fraction: f64,
        fraction_type: FractionType,
    ) -> Result<(), String> {
        if fraction < 0.0 {
            return Err(String::from("Fraction cannot be negative"));
        }
        self.check_fraction_type(fraction_type)?;
        self.composition.push(CompositionEntry::Nuclide {
            name: String::from(nuclide.as_ref()),
            fraction,
            fraction_type,
        });
        Ok(())
    }

    /// Add an element by natural composition. The engine expands it to
    /// isotopes using its own abundance data.
    pub fn add_element(
        &mut self,
        symbol: impl AsRef<str>,
        fraction: f64,
        fraction_type: FractionType,
    ) -> Result<(), String> {
        if fraction < 0.0 {
            return Err(String::from("Fraction cannot be negative"));
        }
        self.check_fraction_type(fraction_type)?;
        self.composition.push(CompositionEntry::Element {
            symbol: String::from(symbol.as_ref()),
            fraction,
            fraction_type,
            enrichment: None,
        });
        Ok(())
    }

    /// Add uranium with a given enrichment in weight-percent U235.
    pub fn add_element_enriched(
        &mut self,
        symbol: impl AsRef<str>,
        fraction: f64,
        fraction_type: FractionType,
        enrichment: f64,
    ) -> Result<(), String> {
        let symbol = symbol.as_ref();
        if symbol != "U" {
            return Err(format!(
                "Enrichment is only supported for U, got '{}'",
                symbol
            ));
        }
        if fraction < 0.0 {
            return Err(String::from("Fraction cannot be negative"));
        }
        if !(0.0..=100.0).contains(&enrichment) {
            return Err(String::from(
                "Enrichment must be between 0 and 100 weight-percent",
            ));
        }
        self.check_fraction_type(fraction_type)?;
        self.composition.push(CompositionEntry::Element {
            symbol: String::from(symbol),
            fraction,
            fraction_type,
            enrichment: Some(enrichment),
        });
        Ok(())
    }

    /// Attach a thermal scattering table (S(alpha, beta)) by name.
    pub fn add_s_alpha_beta(&mut self, name: impl Into<String>) {
        self.sab.push(name.into());
    }

    /// Whether the material contains any fissionable element or nuclide.
    /// Used by the source distribution's `only_fissionable` restriction;
    /// the check is nominal (symbol-based), the engine does the real one.
    pub fn is_fissionable(&self) -> bool {
        const FISSIONABLE: &[&str] = &["U", "Pu", "Th", "Np", "Am", "Cm"];
        self.composition.iter().any(|entry| match entry {
            CompositionEntry::Element { symbol, .. } => FISSIONABLE.contains(&symbol.as_str()),
            CompositionEntry::Nuclide { name, .. } => FISSIONABLE
                .iter()
                .any(|sym| name.starts_with(sym) && name.len() > sym.len()),
        })
    }

    /// Serialize to the engine's `<material>` element. The id must have been
    /// assigned (explicitly or by collection export) before calling this.
    pub fn to_xml_element(&self) -> Result<XmlElement, String> {
        let id = self
            .material_id
            .ok_or("Material has no id; assign one before export")?;
        let density = self
            .density
            .ok_or_else(|| format!("Material {} has no density set", id))?;
        let mut elem = XmlElement::new("material").attr("id", id);
        if let Some(name) = &self.name {
            elem = elem.attr("name", name);
        }
        elem.push_child(
            XmlElement::new("density")
                .attr("units", &self.density_units)
                .attr("value", density),
        );
        for entry in &self.composition {
            let child = match entry {
                CompositionEntry::Nuclide {
                    name,
                    fraction,
                    fraction_type,
                } => XmlElement::new("nuclide")
                    .attr("name", name)
                    .attr(fraction_type.as_str(), *fraction),
                CompositionEntry::Element {
                    symbol,
                    fraction,
                    fraction_type,
                    enrichment,
                } => {
                    let mut e = XmlElement::new("element")
                        .attr("name", symbol)
                        .attr(fraction_type.as_str(), *fraction);
                    if let Some(enrichment) = enrichment {
                        e = e.attr("enrichment", *enrichment);
                    }
                    e
                }
            };
            elem.push_child(child);
        }
        for sab in &self.sab {
            elem.push_child(XmlElement::new("sab").attr("name", sab));
        }
        Ok(elem)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_creation() {
        let mat = Material::new();
        assert_eq!(mat.material_id, None);
        assert_eq!(mat.density, None);
        assert_eq!(mat.density_units, "g/cm3");
        assert!(mat.composition.is_empty());
    }

    #[test]
    fn test_with_id() {
        let mat = Material::with_id(7);
        assert_eq!(mat.get_material_id(), Some(7));
    }

    #[test]
    fn test_set_density() {
        let mut mat = Material::new();
        mat.set_density("g/cm3", 10.313).unwrap();
        assert_eq!(mat.density, Some(10.313));
        assert_eq!(mat.density_units, "g/cm3");
    }

    #[test]
    fn test_set_density_rejects_nonpositive() {
        let mut mat = Material::new();
        assert!(mat.set_density("g/cm3", 0.0).is_err());
        assert!(mat.set_density("g/cm3", -1.0).is_err());
    }

    #[test]
    fn test_add_element_fractions() {
        let mut mat = Material::new();
        mat.add_element("Zr", 0.98335, FractionType::Weight).unwrap();
        mat.add_element("Sn", 0.014, FractionType::Weight).unwrap();
        assert_eq!(mat.composition.len(), 2);
        assert_eq!(mat.composition[0].fraction(), 0.98335);
        assert_eq!(mat.composition[1].fraction_type(), FractionType::Weight);
    }

    #[test]
    fn test_mixed_fraction_types_rejected() {
        let mut mat = Material::new();
        mat.add_element("Zr", 0.98335, FractionType::Weight).unwrap();
        let result = mat.add_element("O", 2.0, FractionType::Atom);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Cannot mix"));
    }

    #[test]
    fn test_negative_fraction_rejected() {
        let mut mat = Material::new();
        assert!(mat.add_element("O", -2.0, FractionType::Atom).is_err());
        assert!(mat
            .add_nuclide("U235", -1.0, FractionType::Atom)
            .is_err());
    }

    #[test]
    fn test_enriched_uranium() {
        let mut mat = Material::new();
        mat.add_element_enriched("U", 1.0, FractionType::Atom, 1.5)
            .unwrap();
        match &mat.composition[0] {
            CompositionEntry::Element { enrichment, .. } => {
                assert_eq!(*enrichment, Some(1.5));
            }
            _ => panic!("Not an element entry"),
        }
    }

    #[test]
    fn test_enrichment_only_for_uranium() {
        let mut mat = Material::new();
        let result = mat.add_element_enriched("Zr", 1.0, FractionType::Atom, 1.5);
        assert!(result.is_err());
    }

    #[test]
    fn test_enrichment_range() {
        let mut mat = Material::new();
        assert!(mat
            .add_element_enriched("U", 1.0, FractionType::Atom, 101.0)
            .is_err());
        assert!(mat
            .add_element_enriched("U", 1.0, FractionType::Atom, -0.1)
            .is_err());
    }

    #[test]
    fn test_fissionable_detection() {
        let mut fuel = Material::new();
        fuel.add_element_enriched("U", 1.0, FractionType::Atom, 1.5)
            .unwrap();
        fuel.add_element("O", 2.0, FractionType::Atom).unwrap();
        assert!(fuel.is_fissionable());

        let mut water = Material::new();
        water.add_element("H", 2.0, FractionType::Atom).unwrap();
        water.add_element("O", 1.0, FractionType::Atom).unwrap();
        assert!(!water.is_fissionable());

        let mut nuclide_fuel = Material::new();
        nuclide_fuel
            .add_nuclide("U235", 1.0, FractionType::Atom)
            .unwrap();
        assert!(nuclide_fuel.is_fissionable());
    }

    #[test]
    fn test_to_xml_element() {
        let mut mat = Material::with_id(3);
        mat.set_name("H2O Moderator");
        mat.set_density("g/cm3", 0.7405).unwrap();
        mat.add_element("H", 2.0, FractionType::Atom).unwrap();
        mat.add_element("O", 1.0, FractionType::Atom).unwrap();
        mat.add_s_alpha_beta("c_H_in_H2O");

        let doc = mat.to_xml_element().unwrap().to_document();
        assert!(doc.contains("<material id=\"3\" name=\"H2O Moderator\">"));
        assert!(doc.contains("<density units=\"g/cm3\" value=\"0.7405\"/>"));
        assert!(doc.contains("<element name=\"H\" ao=\"2\"/>"));
        assert!(doc.contains("<sab name=\"c_H_in_H2O\"/>"));
    }

    #[test]
    fn test_to_xml_requires_id_and_density() {
        let mat = Material::new();
        assert!(mat.to_xml_element().is_err());

        let mut with_id = Material::with_id(1);
        assert!(with_id.to_xml_element().is_err());
        with_id.set_density("g/cm3", 1.0).unwrap();
        assert!(with_id.to_xml_element().is_ok());
    }
}
