use crate::material::Material;
use crate::region::Region;
use crate::universe::Universe;
use std::sync::Arc;

/// What occupies the space of a cell.
#[derive(Debug, Clone)]
pub enum Fill {
    /// Homogeneous material fill
    Material(Arc<Material>),
    /// Nested universe fill
    Universe(Universe),
    /// Empty space
    Void,
}

/// A region of space paired with what fills it. Cells are defined by:
/// - A region (combination of surfaces using boolean operations)
/// - A fill (material, nested universe, or void)
/// - A name for identification
#[derive(Debug, Clone)]
pub struct Cell {
    pub cell_id: Option<u32>,
    pub name: Option<String>,
    pub region: Region,
    pub fill: Fill,
}

impl Cell {
    /// Create a new cell with a region and fill
    pub fn new(cell_id: Option<u32>, region: Region, name: Option<String>, fill: Fill) -> Self {
        Cell {
            cell_id,
            name,
            region,
            fill,
        }
    }

    /// Convenience constructor for a material-filled cell
    pub fn with_material(
        region: Region,
        name: impl Into<String>,
        material: Arc<Material>,
    ) -> Self {
        Cell::new(None, region, Some(name.into()), Fill::Material(material))
    }

    /// Convenience constructor for a universe-filled cell
    pub fn with_universe(region: Region, name: impl Into<String>, universe: Universe) -> Self {
        Cell::new(None, region, Some(name.into()), Fill::Universe(universe))
    }

    pub fn set_cell_id(&mut self, cell_id: u32) {
        self.cell_id = Some(cell_id);
    }

    pub fn get_cell_id(&self) -> Option<u32> {
        self.cell_id
    }

    /// Check if a point is inside this cell's region
    pub fn contains(&self, point: (f64, f64, f64)) -> bool {
        self.region.contains(point)
    }

    /// The material fill, if any
    pub fn material(&self) -> Option<&Arc<Material>> {
        match &self.fill {
            Fill::Material(material) => Some(material),
            _ => None,
        }
    }

    /// The universe fill, if any
    pub fn fill_universe(&self) -> Option<&Universe> {
        match &self.fill {
            Fill::Universe(universe) => Some(universe),
            _ => None,
        }
    }
}
