use crate::cell::Cell;
use crate::mesh::RegularMesh;

/// Mesh filter for tallies - bins events by the mesh element they occur in
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFilter {
    pub mesh: RegularMesh,
}

impl MeshFilter {
    pub fn new(mesh: RegularMesh) -> Self {
        Self { mesh }
    }

    /// Number of filter bins (one per mesh element)
    pub fn num_bins(&self) -> usize {
        self.mesh.num_bins()
    }
}

/// Cell filter for tallies - filters events based on which cell they occur in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellFilter {
    /// The cell ID to filter on
    pub cell_id: u32,
}

impl CellFilter {
    /// Create a CellFilter from a Cell object
    ///
    /// # Panics
    /// Panics if the cell has no cell_id (None cells can't be filtered)
    pub fn new(cell: &Cell) -> Self {
        let cell_id = cell
            .cell_id
            .expect("Cannot create CellFilter for cell with no ID - assign a cell_id first");
        Self { cell_id }
    }

    /// Check if this filter matches a given cell ID
    pub fn matches(&self, cell_id: u32) -> bool {
        self.cell_id == cell_id
    }
}

/// Unified filter enum for tallies
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Mesh(MeshFilter),
    Cell(CellFilter),
}

impl Filter {
    /// Engine filter type string
    pub fn type_str(&self) -> &'static str {
        match self {
            Filter::Mesh(_) => "mesh",
            Filter::Cell(_) => "cell",
        }
    }
}
