use crate::export::{write_document, XmlElement};
use crate::filters::Filter;
use log::debug;
use std::collections::HashSet;
use std::path::Path;

/// Physical quantities the engine can score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Flux,
    Fission,
    NuFission,
    Absorption,
    Scatter,
}

impl Score {
    pub fn as_str(&self) -> &'static str {
        match self {
            Score::Flux => "flux",
            Score::Fission => "fission",
            Score::NuFission => "nu-fission",
            Score::Absorption => "absorption",
            Score::Scatter => "scatter",
        }
    }

    /// Parse a score from a string, returning None for invalid strings
    pub fn from_str_option(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flux" => Some(Score::Flux),
            "fission" => Some(Score::Fission),
            "nu-fission" => Some(Score::NuFission),
            "absorption" => Some(Score::Absorption),
            "scatter" => Some(Score::Scatter),
            _ => None,
        }
    }
}

/// A named measurement request: filters select the phase-space of events,
/// scores pick the quantities accumulated over them.
#[derive(Debug, Clone)]
pub struct Tally {
    pub tally_id: Option<u32>,
    pub name: Option<String>,
    pub scores: Vec<Score>,
    pub filters: Vec<Filter>,
}

impl Tally {
    /// Create a new tally specification
    pub fn new() -> Self {
        Self {
            tally_id: None,
            name: None,
            scores: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            tally_id: None,
            name: Some(name.into()),
            scores: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn add_score(&mut self, score: Score) {
        self.scores.push(score);
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Get the display name of the tally
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| "Unnamed Tally".to_string())
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered collection of tallies. Export assigns ids to tallies, filters
/// and meshes that lack them, then writes the engine's `tallies.xml` with
/// mesh elements first, filter elements second, tally elements last.
#[derive(Debug, Clone, Default)]
pub struct Tallies {
    tallies: Vec<Tally>,
}

impl Tallies {
    pub fn new() -> Self {
        Tallies {
            tallies: Vec::new(),
        }
    }

    /// Append a tally to the collection (like a list)
    pub fn append(&mut self, tally: Tally) {
        self.tallies.push(tally);
    }

    pub fn get(&self, index: usize) -> Option<&Tally> {
        self.tallies.get(index)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tally> {
        self.tallies.iter()
    }

    /// Explicit ids in the collection, checked for uniqueness. Auto-assigned
    /// ids skip over this set, as in geometry construction.
    fn used_ids(
        explicit: impl Iterator<Item = Option<u32>>,
        entity: &str,
    ) -> Result<HashSet<u32>, String> {
        let mut used = HashSet::new();
        for id in explicit.flatten() {
            if !used.insert(id) {
                return Err(format!(
                    "Duplicate {} id {} found. All {} IDs must be unique.",
                    entity, id, entity
                ));
            }
        }
        Ok(used)
    }

    fn next_free_id(used: &mut HashSet<u32>, next: &mut u32) -> u32 {
        while used.contains(next) {
            *next += 1;
        }
        used.insert(*next);
        let id = *next;
        *next += 1;
        id
    }

    /// Serialize to the engine's `<tallies>` element. Every tally must have
    /// at least one score; explicit mesh and tally ids must be unique, and
    /// auto-assigned ids never collide with them.
    pub fn to_xml_element(&self) -> Result<XmlElement, String> {
        let mut elem = XmlElement::new("tallies");
        let mut mesh_elems = Vec::new();
        let mut filter_elems = Vec::new();
        let mut tally_elems = Vec::new();

        let mut used_mesh_ids = Self::used_ids(
            self.tallies.iter().flat_map(|tally| {
                tally.filters.iter().map(|filter| match filter {
                    Filter::Mesh(mesh_filter) => mesh_filter.mesh.mesh_id,
                    Filter::Cell(_) => None,
                })
            }),
            "mesh",
        )?;
        let mut used_tally_ids =
            Self::used_ids(self.tallies.iter().map(|tally| tally.tally_id), "tally")?;
        let mut next_mesh_id = 1u32;
        let mut next_filter_id = 1u32;
        let mut next_tally_id = 1u32;

        for tally in &self.tallies {
            if tally.scores.is_empty() {
                return Err(format!(
                    "Tally '{}' has no scores",
                    tally.display_name()
                ));
            }
            let mut filter_ids = Vec::new();
            for filter in &tally.filters {
                let filter_id = next_filter_id;
                next_filter_id += 1;
                filter_ids.push(filter_id);
                match filter {
                    Filter::Mesh(mesh_filter) => {
                        let mesh_id = mesh_filter.mesh.mesh_id.unwrap_or_else(|| {
                            Self::next_free_id(&mut used_mesh_ids, &mut next_mesh_id)
                        });
                        let mut mesh = mesh_filter.mesh.clone();
                        mesh.mesh_id = Some(mesh_id);
                        mesh_elems.push(mesh.to_xml_element()?);
                        filter_elems.push(
                            XmlElement::new("filter")
                                .attr("id", filter_id)
                                .attr("type", filter.type_str())
                                .child(XmlElement::new("bins").text(mesh_id)),
                        );
                    }
                    Filter::Cell(cell_filter) => {
                        filter_elems.push(
                            XmlElement::new("filter")
                                .attr("id", filter_id)
                                .attr("type", filter.type_str())
                                .child(XmlElement::new("bins").text(cell_filter.cell_id)),
                        );
                    }
                }
            }

            let tally_id = tally.tally_id.unwrap_or_else(|| {
                Self::next_free_id(&mut used_tally_ids, &mut next_tally_id)
            });
            let mut tally_elem = XmlElement::new("tally").attr("id", tally_id);
            if let Some(name) = &tally.name {
                tally_elem = tally_elem.attr("name", name);
            }
            if !filter_ids.is_empty() {
                tally_elem = tally_elem.child(
                    XmlElement::new("filters").text(
                        filter_ids
                            .iter()
                            .map(|id| id.to_string())
                            .collect::<Vec<_>>()
                            .join(" "),
                    ),
                );
            }
            tally_elem = tally_elem.child(
                XmlElement::new("scores").text(
                    tally
                        .scores
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
            );
            tally_elems.push(tally_elem);
        }

        for mesh_elem in mesh_elems {
            elem.push_child(mesh_elem);
        }
        for filter_elem in filter_elems {
            elem.push_child(filter_elem);
        }
        for tally_elem in tally_elems {
            elem.push_child(tally_elem);
        }
        Ok(elem)
    }

    /// Write `tallies.xml` into `dir`.
    pub fn export_to_xml(&self, dir: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let elem = self.to_xml_element()?;
        debug!("writing tallies.xml ({} tallies)", self.tallies.len());
        Ok(write_document(dir.as_ref(), "tallies.xml", &elem)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::MeshFilter;
    use crate::mesh::RegularMesh;

    fn flux_tally() -> Tally {
        let mesh =
            RegularMesh::new(vec![100, 100], vec![-0.6, -0.6], vec![0.6, 0.6]).unwrap();
        let mut tally = Tally::with_name("Flux");
        tally.add_filter(Filter::Mesh(MeshFilter::new(mesh)));
        tally.add_score(Score::Flux);
        tally.add_score(Score::Fission);
        tally
    }

    #[test]
    fn test_score_strings() {
        assert_eq!(Score::Flux.as_str(), "flux");
        assert_eq!(Score::from_str_option("fission"), Some(Score::Fission));
        assert_eq!(Score::from_str_option("NU-FISSION"), Some(Score::NuFission));
        assert_eq!(Score::from_str_option("invalid"), None);
    }

    #[test]
    fn test_tally_construction() {
        let tally = flux_tally();
        assert_eq!(tally.display_name(), "Flux");
        assert_eq!(tally.scores, vec![Score::Flux, Score::Fission]);
        assert_eq!(tally.filters.len(), 1);
    }

    #[test]
    fn test_tallies_collection() {
        let mut tallies = Tallies::new();
        assert!(tallies.is_empty());
        tallies.append(flux_tally());
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies.get(0).unwrap().display_name(), "Flux");
    }

    #[test]
    fn test_tallies_xml() {
        let mut tallies = Tallies::new();
        tallies.append(flux_tally());
        let doc = tallies.to_xml_element().unwrap().to_document();
        assert!(doc.contains("<mesh id=\"1\">"));
        assert!(doc.contains("<dimension>100 100</dimension>"));
        assert!(doc.contains("<filter id=\"1\" type=\"mesh\">"));
        assert!(doc.contains("<bins>1</bins>"));
        assert!(doc.contains("<tally id=\"1\" name=\"Flux\">"));
        assert!(doc.contains("<filters>1</filters>"));
        assert!(doc.contains("<scores>flux fission</scores>"));
    }

    #[test]
    fn test_tally_without_scores_rejected() {
        let mut tallies = Tallies::new();
        tallies.append(Tally::with_name("empty"));
        let result = tallies.to_xml_element();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("no scores"));
    }

    #[test]
    fn test_explicit_ids_preserved() {
        let mesh = RegularMesh::new(vec![10, 10], vec![-1.0, -1.0], vec![1.0, 1.0])
            .unwrap()
            .with_id(5);
        let mut tally = Tally::with_name("Custom");
        tally.tally_id = Some(9);
        tally.add_filter(Filter::Mesh(MeshFilter::new(mesh)));
        tally.add_score(Score::Flux);

        let mut tallies = Tallies::new();
        tallies.append(tally);
        let doc = tallies.to_xml_element().unwrap().to_document();
        assert!(doc.contains("<mesh id=\"5\">"));
        assert!(doc.contains("<tally id=\"9\" name=\"Custom\">"));
        assert!(doc.contains("<bins>5</bins>"));
    }

    #[test]
    fn test_auto_ids_skip_explicit_ids() {
        let explicit_mesh = RegularMesh::new(vec![10, 10], vec![-1.0, -1.0], vec![1.0, 1.0])
            .unwrap()
            .with_id(1);
        let mut first = Tally::with_name("Explicit");
        first.tally_id = Some(1);
        first.add_filter(Filter::Mesh(MeshFilter::new(explicit_mesh)));
        first.add_score(Score::Flux);

        let auto_mesh =
            RegularMesh::new(vec![20, 20], vec![-2.0, -2.0], vec![2.0, 2.0]).unwrap();
        let mut second = Tally::with_name("Auto");
        second.add_filter(Filter::Mesh(MeshFilter::new(auto_mesh)));
        second.add_score(Score::Fission);

        let mut tallies = Tallies::new();
        tallies.append(first);
        tallies.append(second);
        let doc = tallies.to_xml_element().unwrap().to_document();

        assert_eq!(doc.matches("<mesh id=\"1\">").count(), 1);
        assert_eq!(doc.matches("<tally id=\"1\"").count(), 1);
        assert!(doc.contains("<mesh id=\"2\">"));
        assert!(doc.contains("<tally id=\"2\""));
    }

    #[test]
    fn test_duplicate_explicit_ids_rejected() {
        let mut first = flux_tally();
        first.tally_id = Some(3);
        let mut second = flux_tally();
        second.tally_id = Some(3);
        let mut tallies = Tallies::new();
        tallies.append(first);
        tallies.append(second);
        let result = tallies.to_xml_element();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Duplicate tally id 3"));

        let mesh = RegularMesh::new(vec![10, 10], vec![-1.0, -1.0], vec![1.0, 1.0])
            .unwrap()
            .with_id(4);
        let mut tallies = Tallies::new();
        for name in ["a", "b"] {
            let mut tally = Tally::with_name(name);
            tally.add_filter(Filter::Mesh(MeshFilter::new(mesh.clone())));
            tally.add_score(Score::Flux);
            tallies.append(tally);
        }
        let result = tallies.to_xml_element();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Duplicate mesh id 4"));
    }
}
