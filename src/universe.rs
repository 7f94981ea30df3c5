use crate::cell::Cell;

/// A collection of cells that can fill another cell, giving the nested
/// containment hierarchy of the model (pin universe inside a root cell
/// inside the root universe).
#[derive(Debug, Clone)]
pub struct Universe {
    pub universe_id: Option<u32>,
    pub name: Option<String>,
    pub cells: Vec<Cell>,
}

impl Universe {
    pub fn new() -> Self {
        Universe {
            universe_id: None,
            name: None,
            cells: Vec::new(),
        }
    }

    pub fn with_id(universe_id: u32) -> Self {
        Universe {
            universe_id: Some(universe_id),
            name: None,
            cells: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}
