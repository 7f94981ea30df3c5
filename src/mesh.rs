use crate::export::{join_numbers, XmlElement};

/// A structured mesh overlaid on the geometry to spatially discretize a
/// tally. Dimension and bounds may be 2-d (x, y) or 3-d.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularMesh {
    pub mesh_id: Option<u32>,
    /// Number of bins along each axis
    pub dimension: Vec<usize>,
    pub lower_left: Vec<f64>,
    pub upper_right: Vec<f64>,
}

impl RegularMesh {
    pub fn new(
        dimension: Vec<usize>,
        lower_left: Vec<f64>,
        upper_right: Vec<f64>,
    ) -> Result<Self, String> {
        if dimension.len() != 2 && dimension.len() != 3 {
            return Err(String::from("Mesh dimension must be 2-d or 3-d"));
        }
        if lower_left.len() != dimension.len() || upper_right.len() != dimension.len() {
            return Err(String::from(
                "Mesh bounds must have the same length as the dimension",
            ));
        }
        if dimension.iter().any(|&n| n == 0) {
            return Err(String::from("Mesh dimension entries must be positive"));
        }
        for axis in 0..dimension.len() {
            if lower_left[axis] >= upper_right[axis] {
                return Err(format!(
                    "Mesh lower_left must be strictly below upper_right on axis {}",
                    axis
                ));
            }
        }
        Ok(RegularMesh {
            mesh_id: None,
            dimension,
            lower_left,
            upper_right,
        })
    }

    pub fn with_id(mut self, mesh_id: u32) -> Self {
        self.mesh_id = Some(mesh_id);
        self
    }

    /// Total number of mesh bins
    pub fn num_bins(&self) -> usize {
        self.dimension.iter().product()
    }

    /// Serialize to the engine's `<mesh>` element. The id must have been
    /// assigned (explicitly or by [`crate::tally::Tallies`] export).
    pub fn to_xml_element(&self) -> Result<XmlElement, String> {
        let id = self
            .mesh_id
            .ok_or("Mesh has no id; assign one before export")?;
        Ok(XmlElement::new("mesh")
            .attr("id", id)
            .child(XmlElement::new("dimension").text(join_numbers(&self.dimension)))
            .child(XmlElement::new("lower_left").text(join_numbers(&self.lower_left)))
            .child(XmlElement::new("upper_right").text(join_numbers(&self.upper_right))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mesh = RegularMesh::new(
            vec![100, 100],
            vec![-0.6, -0.6],
            vec![0.6, 0.6],
        )
        .unwrap();
        assert_eq!(mesh.num_bins(), 10_000);
        assert_eq!(mesh.mesh_id, None);
    }

    #[test]
    fn test_mesh_validation() {
        // wrong rank
        assert!(RegularMesh::new(vec![100], vec![-0.6], vec![0.6]).is_err());
        // mismatched bounds length
        assert!(RegularMesh::new(vec![100, 100], vec![-0.6], vec![0.6, 0.6]).is_err());
        // zero bins
        assert!(RegularMesh::new(vec![0, 100], vec![-0.6, -0.6], vec![0.6, 0.6]).is_err());
        // inverted bounds
        let result = RegularMesh::new(vec![100, 100], vec![0.6, -0.6], vec![-0.6, 0.6]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("axis 0"));
    }

    #[test]
    fn test_3d_mesh() {
        let mesh = RegularMesh::new(
            vec![10, 10, 10],
            vec![-1.0, -1.0, -1.0],
            vec![1.0, 1.0, 1.0],
        )
        .unwrap();
        assert_eq!(mesh.num_bins(), 1000);
    }

    #[test]
    fn test_mesh_xml() {
        let mesh = RegularMesh::new(vec![100, 100], vec![-0.6, -0.6], vec![0.6, 0.6])
            .unwrap()
            .with_id(1);
        let doc = mesh.to_xml_element().unwrap().to_document();
        assert!(doc.contains("<mesh id=\"1\">"));
        assert!(doc.contains("<dimension>100 100</dimension>"));
        assert!(doc.contains("<lower_left>-0.6 -0.6</lower_left>"));
        assert!(doc.contains("<upper_right>0.6 0.6</upper_right>"));
    }

    #[test]
    fn test_mesh_xml_requires_id() {
        let mesh =
            RegularMesh::new(vec![100, 100], vec![-0.6, -0.6], vec![0.6, 0.6]).unwrap();
        assert!(mesh.to_xml_element().is_err());
    }
}
