use crate::export::{join_numbers, XmlElement};
use crate::region::{HalfspaceType, Region};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryType {
    Transmission,
    Vacuum,
    Reflective,
}

impl Default for BoundaryType {
    fn default() -> Self {
        BoundaryType::Transmission
    }
}

impl BoundaryType {
    /// Parse a boundary type from a string, returning None for invalid strings
    pub fn from_str_option(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "transmission" => Some(BoundaryType::Transmission),
            "vacuum" => Some(BoundaryType::Vacuum),
            "reflective" => Some(BoundaryType::Reflective),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryType::Transmission => "transmission",
            BoundaryType::Vacuum => "vacuum",
            BoundaryType::Reflective => "reflective",
        }
    }
}

/// A quadric surface dividing space into two halfspaces. Regions are built
/// by boolean composition of surface halfspaces; see [`crate::region::Region`].
#[derive(Clone, Debug)]
pub struct Surface {
    pub surface_id: Option<u32>,
    pub name: Option<String>,
    pub kind: SurfaceKind,
    pub boundary_type: BoundaryType,
}

#[derive(Clone, Debug)]
pub enum SurfaceKind {
    /// Plane x = x0
    XPlane { x0: f64 },
    /// Plane y = y0
    YPlane { y0: f64 },
    /// Plane z = z0
    ZPlane { z0: f64 },
    /// General plane ax + by + cz = d
    Plane { a: f64, b: f64, c: f64, d: f64 },
    /// Infinite cylinder along the Z axis centred at (x0, y0)
    ZCylinder { x0: f64, y0: f64, radius: f64 },
}

impl Surface {
    pub fn x_plane(x0: f64) -> Self {
        Surface {
            surface_id: None,
            name: None,
            kind: SurfaceKind::XPlane { x0 },
            boundary_type: BoundaryType::default(),
        }
    }

    pub fn y_plane(y0: f64) -> Self {
        Surface {
            surface_id: None,
            name: None,
            kind: SurfaceKind::YPlane { y0 },
            boundary_type: BoundaryType::default(),
        }
    }

    pub fn z_plane(z0: f64) -> Self {
        Surface {
            surface_id: None,
            name: None,
            kind: SurfaceKind::ZPlane { z0 },
            boundary_type: BoundaryType::default(),
        }
    }

    pub fn plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Surface {
            surface_id: None,
            name: None,
            kind: SurfaceKind::Plane { a, b, c, d },
            boundary_type: BoundaryType::default(),
        }
    }

    /// Create a cylinder oriented along the Z axis, centred at (x0, y0)
    pub fn z_cylinder(x0: f64, y0: f64, radius: f64) -> Self {
        Surface {
            surface_id: None,
            name: None,
            kind: SurfaceKind::ZCylinder { x0, y0, radius },
            boundary_type: BoundaryType::default(),
        }
    }

    pub fn with_id(mut self, surface_id: u32) -> Self {
        self.surface_id = Some(surface_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_boundary_type(mut self, boundary_type: BoundaryType) -> Self {
        self.boundary_type = boundary_type;
        self
    }

    /// Get the boundary type of the surface
    pub fn boundary_type(&self) -> &BoundaryType {
        &self.boundary_type
    }

    /// Set the boundary type of the surface
    pub fn set_boundary_type(&mut self, boundary_type: BoundaryType) {
        self.boundary_type = boundary_type;
    }

    /// Signed sense of a point with respect to the surface: negative inside
    /// (below), positive outside (above), zero on the surface.
    pub fn evaluate(&self, point: (f64, f64, f64)) -> f64 {
        match &self.kind {
            SurfaceKind::XPlane { x0 } => point.0 - x0,
            SurfaceKind::YPlane { y0 } => point.1 - y0,
            SurfaceKind::ZPlane { z0 } => point.2 - z0,
            SurfaceKind::Plane { a, b, c, d } => a * point.0 + b * point.1 + c * point.2 - d,
            SurfaceKind::ZCylinder { x0, y0, radius } => {
                let dx = point.0 - x0;
                let dy = point.1 - y0;
                (dx * dx + dy * dy).sqrt() - radius
            }
        }
    }

    /// Engine type string for this surface kind.
    pub fn type_str(&self) -> &'static str {
        match &self.kind {
            SurfaceKind::XPlane { .. } => "x-plane",
            SurfaceKind::YPlane { .. } => "y-plane",
            SurfaceKind::ZPlane { .. } => "z-plane",
            SurfaceKind::Plane { .. } => "plane",
            SurfaceKind::ZCylinder { .. } => "z-cylinder",
        }
    }

    /// Coefficients in the order the engine's schema expects.
    pub fn coefficients(&self) -> Vec<f64> {
        match &self.kind {
            SurfaceKind::XPlane { x0 } => vec![*x0],
            SurfaceKind::YPlane { y0 } => vec![*y0],
            SurfaceKind::ZPlane { z0 } => vec![*z0],
            SurfaceKind::Plane { a, b, c, d } => vec![*a, *b, *c, *d],
            SurfaceKind::ZCylinder { x0, y0, radius } => vec![*x0, *y0, *radius],
        }
    }

    /// Serialize to the engine's `<surface>` element. The id must have been
    /// assigned (explicitly or by [`crate::geometry::Geometry::new`]).
    pub fn to_xml_element(&self) -> Result<XmlElement, String> {
        let id = self
            .surface_id
            .ok_or("Surface has no id; assign one before export")?;
        let mut elem = XmlElement::new("surface")
            .attr("id", id)
            .attr("type", self.type_str())
            .attr("coeffs", join_numbers(&self.coefficients()));
        if let Some(name) = &self.name {
            elem = elem.attr("name", name);
        }
        if self.boundary_type != BoundaryType::Transmission {
            elem = elem.attr("boundary", self.boundary_type.as_str());
        }
        Ok(elem)
    }
}

/// Halfspace shorthands on shared surfaces. `below` is the region where the
/// surface sense is negative (inside a cylinder), `above` where it is
/// positive.
pub trait HalfspaceExt {
    fn below(&self) -> Region;
    fn above(&self) -> Region;
}

impl HalfspaceExt for Arc<Surface> {
    fn below(&self) -> Region {
        Region::new_from_halfspace(HalfspaceType::Below(self.clone()))
    }

    fn above(&self) -> Region {
        Region::new_from_halfspace(HalfspaceType::Above(self.clone()))
    }
}
