use crate::cell::{Cell, Fill};
use crate::export::{write_document, XmlElement};
use crate::material::Material;
use crate::surface::Surface;
use crate::universe::Universe;
use log::debug;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// The full cell hierarchy rooted in a single universe.
///
/// Construction validates the model: explicit cell, universe, surface and
/// material ids must be unique, and missing ids are auto-assigned from the
/// smallest free value. Surfaces are shared (`Arc`) between regions, so their
/// assigned ids live in a lookup table on the geometry rather than in the
/// surfaces themselves.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub root: Universe,
    surface_ids: Vec<(Arc<Surface>, u32)>,
}

impl Geometry {
    /// Create a new geometry with automatic cell, universe, surface and
    /// material ID validation and generation.
    pub fn new(mut root: Universe) -> Result<Self, String> {
        Self::assign_cell_ids(&mut root)?;
        Self::assign_universe_ids(&mut root)?;
        Self::assign_material_ids(&mut root)?;
        let surface_ids = Self::assign_surface_ids(&root)?;
        Ok(Geometry { root, surface_ids })
    }

    fn for_each_cell_mut(universe: &mut Universe, f: &mut dyn FnMut(&mut Cell)) {
        for cell in &mut universe.cells {
            f(cell);
            if let Fill::Universe(inner) = &mut cell.fill {
                Self::for_each_cell_mut(inner, f);
            }
        }
    }

    fn for_each_cell<'a>(universe: &'a Universe, f: &mut dyn FnMut(&'a Universe, &'a Cell)) {
        for cell in &universe.cells {
            f(universe, cell);
            if let Fill::Universe(inner) = &cell.fill {
                Self::for_each_cell(inner, f);
            }
        }
    }

    fn assign_cell_ids(root: &mut Universe) -> Result<(), String> {
        // First, validate that all specified cell IDs are unique
        let mut used_ids = HashSet::new();
        let mut duplicate = None;
        Self::for_each_cell_mut(root, &mut |cell| {
            if let Some(id) = cell.cell_id {
                if !used_ids.insert(id) {
                    duplicate = Some(id);
                }
            }
        });
        if let Some(id) = duplicate {
            return Err(format!(
                "Duplicate cell_id {} found. All cell IDs must be unique.",
                id
            ));
        }
        // Generate IDs for cells that need them (cell_id == None)
        let mut next_id = 1;
        Self::for_each_cell_mut(root, &mut |cell| {
            if cell.cell_id.is_none() {
                while used_ids.contains(&next_id) {
                    next_id += 1;
                }
                cell.set_cell_id(next_id);
                used_ids.insert(next_id);
                next_id += 1;
            }
        });
        Ok(())
    }

    fn assign_universe_ids(root: &mut Universe) -> Result<(), String> {
        fn for_each_universe_mut(universe: &mut Universe, f: &mut dyn FnMut(&mut Universe)) {
            f(universe);
            for cell in &mut universe.cells {
                if let Fill::Universe(inner) = &mut cell.fill {
                    for_each_universe_mut(inner, f);
                }
            }
        }
        let mut used_ids = HashSet::new();
        let mut duplicate = None;
        for_each_universe_mut(root, &mut |universe| {
            if let Some(id) = universe.universe_id {
                if !used_ids.insert(id) {
                    duplicate = Some(id);
                }
            }
        });
        if let Some(id) = duplicate {
            return Err(format!(
                "Duplicate universe_id {} found. All universe IDs must be unique.",
                id
            ));
        }
        let mut next_id = 0;
        for_each_universe_mut(root, &mut |universe| {
            if universe.universe_id.is_none() {
                while used_ids.contains(&next_id) {
                    next_id += 1;
                }
                universe.universe_id = Some(next_id);
                used_ids.insert(next_id);
                next_id += 1;
            }
        });
        Ok(())
    }

    fn assign_material_ids(root: &mut Universe) -> Result<(), String> {
        // Unique materials by Arc pointer, in traversal order
        let mut seen_ptrs = HashSet::new();
        let mut used_ids = HashSet::new();
        let mut duplicate = None;
        Self::for_each_cell_mut(root, &mut |cell| {
            if let Fill::Material(material) = &cell.fill {
                if seen_ptrs.insert(Arc::as_ptr(material)) {
                    if let Some(id) = material.material_id {
                        if !used_ids.insert(id) {
                            duplicate = Some(id);
                        }
                    }
                }
            }
        });
        if let Some(id) = duplicate {
            return Err(format!(
                "Duplicate material_id {} found. All material IDs must be unique across all cells.",
                id
            ));
        }
        // Generate IDs for materials that need them. The material Arc is
        // cloned, given an id, and re-wrapped; every cell sharing the old Arc
        // gets the same replacement so the sharing survives.
        let mut replacements: Vec<(*const Material, Arc<Material>)> = Vec::new();
        let mut next_id = 1;
        Self::for_each_cell_mut(root, &mut |cell| {
            if let Fill::Material(material) = &mut cell.fill {
                let ptr = Arc::as_ptr(material);
                if let Some((_, replacement)) =
                    replacements.iter().find(|(old, _)| *old == ptr)
                {
                    *material = replacement.clone();
                } else if material.material_id.is_none() {
                    let mut updated = (**material).clone();
                    while used_ids.contains(&next_id) {
                        next_id += 1;
                    }
                    updated.set_material_id(next_id);
                    used_ids.insert(next_id);
                    next_id += 1;
                    let updated = Arc::new(updated);
                    replacements.push((ptr, updated.clone()));
                    *material = updated;
                }
            }
        });
        Ok(())
    }

    fn assign_surface_ids(root: &Universe) -> Result<Vec<(Arc<Surface>, u32)>, String> {
        // Collect unique surfaces used in the geometry using Arc pointer
        // addresses, in traversal order
        let mut seen_ptrs = HashSet::new();
        let mut unique_surfaces = Vec::new();
        Self::for_each_cell(root, &mut |_universe, cell| {
            for (surface, _sense) in cell.region.surfaces_with_sense() {
                if seen_ptrs.insert(Arc::as_ptr(&surface)) {
                    unique_surfaces.push(surface);
                }
            }
        });

        let mut used_ids = HashSet::new();
        for surface in &unique_surfaces {
            if let Some(id) = surface.surface_id {
                if !used_ids.insert(id) {
                    return Err(format!(
                        "Duplicate surface_id {} found. All surface IDs must be unique.",
                        id
                    ));
                }
            }
        }

        let mut next_id = 1;
        let mut table = Vec::with_capacity(unique_surfaces.len());
        for surface in unique_surfaces {
            let id = match surface.surface_id {
                Some(id) => id,
                None => {
                    while used_ids.contains(&next_id) {
                        next_id += 1;
                    }
                    used_ids.insert(next_id);
                    let id = next_id;
                    next_id += 1;
                    id
                }
            };
            table.push((surface, id));
        }
        Ok(table)
    }

    /// The id this geometry assigned to a surface, or None for a surface
    /// not part of the geometry.
    pub fn surface_id_of(&self, surface: &Arc<Surface>) -> Option<u32> {
        let ptr = Arc::as_ptr(surface);
        self.surface_ids
            .iter()
            .find(|(s, _)| Arc::as_ptr(s) == ptr)
            .map(|(_, id)| *id)
    }

    /// Unique surfaces of the geometry with their assigned ids, in
    /// traversal order.
    pub fn surfaces(&self) -> &[(Arc<Surface>, u32)] {
        &self.surface_ids
    }

    /// Unique materials of the geometry, in traversal order. All carry ids
    /// after construction.
    pub fn materials(&self) -> Vec<Arc<Material>> {
        let mut seen_ptrs = HashSet::new();
        let mut materials = Vec::new();
        Self::for_each_cell(&self.root, &mut |_universe, cell| {
            if let Fill::Material(material) = &cell.fill {
                if seen_ptrs.insert(Arc::as_ptr(material)) {
                    materials.push(material.clone());
                }
            }
        });
        materials
    }

    /// Find the innermost cell containing the given point, resolving
    /// through nested universe fills.
    pub fn find_cell(&self, point: (f64, f64, f64)) -> Option<&Cell> {
        fn descend(universe: &Universe, point: (f64, f64, f64)) -> Option<&Cell> {
            let cell = universe.cells.iter().find(|cell| cell.contains(point))?;
            match &cell.fill {
                Fill::Universe(inner) => descend(inner, point).or(Some(cell)),
                _ => Some(cell),
            }
        }
        descend(&self.root, point)
    }

    /// Serialize all cells and unique surfaces to the engine's
    /// `<geometry>` element.
    pub fn to_xml_element(&self) -> Result<XmlElement, String> {
        let mut elem = XmlElement::new("geometry");
        let resolve = |surf: &Arc<Surface>| self.surface_id_of(surf);

        let mut cell_elems = Vec::new();
        let mut error = None;
        Self::for_each_cell(&self.root, &mut |universe, cell| {
            if error.is_some() {
                return;
            }
            match Self::cell_element(universe, cell, &resolve) {
                Ok(e) => cell_elems.push(e),
                Err(e) => error = Some(e),
            }
        });
        if let Some(e) = error {
            return Err(e);
        }
        for cell_elem in cell_elems {
            elem.push_child(cell_elem);
        }

        for (surface, id) in &self.surface_ids {
            let mut surface = (**surface).clone();
            surface.surface_id = Some(*id);
            elem.push_child(surface.to_xml_element()?);
        }
        Ok(elem)
    }

    fn cell_element(
        universe: &Universe,
        cell: &Cell,
        resolve: &dyn Fn(&Arc<Surface>) -> Option<u32>,
    ) -> Result<XmlElement, String> {
        let cell_id = cell
            .cell_id
            .ok_or("Cell has no id; construct the geometry before export")?;
        let universe_id = universe
            .universe_id
            .ok_or("Universe has no id; construct the geometry before export")?;
        let mut elem = XmlElement::new("cell")
            .attr("id", cell_id)
            .attr("universe", universe_id);
        if let Some(name) = &cell.name {
            elem = elem.attr("name", name);
        }
        match &cell.fill {
            Fill::Material(material) => {
                let material_id = material
                    .material_id
                    .ok_or("Material has no id; construct the geometry before export")?;
                elem = elem.attr("material", material_id);
            }
            Fill::Universe(inner) => {
                let fill_id = inner
                    .universe_id
                    .ok_or("Universe has no id; construct the geometry before export")?;
                elem = elem.attr("fill", fill_id);
            }
            Fill::Void => {
                elem = elem.attr("material", "void");
            }
        }
        elem = elem.attr("region", cell.region.to_region_string_resolved(resolve)?);
        Ok(elem)
    }

    /// Write `geometry.xml` into `dir`.
    pub fn export_to_xml(&self, dir: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let elem = self.to_xml_element()?;
        debug!(
            "writing geometry.xml ({} surfaces)",
            self.surface_ids.len()
        );
        write_document(dir.as_ref(), "geometry.xml", &elem).map_err(|e: io::Error| e.into())
    }
}
