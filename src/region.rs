use crate::surface::{BoundaryType, Surface};
use std::sync::Arc;

/// A region of space defined by boolean composition of surface halfspaces.
#[derive(Clone, Debug)]
pub struct Region {
    pub expr: RegionExpr,
}

#[derive(Clone, Debug)]
pub enum HalfspaceType {
    /// Positive surface sense
    Above(Arc<Surface>),
    /// Negative surface sense
    Below(Arc<Surface>),
}

#[derive(Clone, Debug)]
pub enum RegionExpr {
    Halfspace(HalfspaceType),
    Union(Box<RegionExpr>, Box<RegionExpr>),
    Intersection(Box<RegionExpr>, Box<RegionExpr>),
    Complement(Box<RegionExpr>),
}

impl Region {
    pub fn new_from_halfspace(halfspace_type: HalfspaceType) -> Self {
        Region {
            expr: RegionExpr::Halfspace(halfspace_type),
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Region {
            expr: RegionExpr::Intersection(
                Box::new(self.expr.clone()),
                Box::new(other.expr.clone()),
            ),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Region {
            expr: RegionExpr::Union(Box::new(self.expr.clone()), Box::new(other.expr.clone())),
        }
    }

    pub fn complement(&self) -> Self {
        Region {
            expr: RegionExpr::Complement(Box::new(self.expr.clone())),
        }
    }

    /// The open rectangular prism of the pincell: `width` along x and
    /// `height` along y, centred on the origin, infinite along z. All four
    /// bounding planes carry the given boundary type.
    pub fn rectangular_prism(width: f64, height: f64, boundary_type: BoundaryType) -> Self {
        let left = Arc::new(
            Surface::x_plane(-width / 2.0).with_boundary_type(boundary_type.clone()),
        );
        let right = Arc::new(
            Surface::x_plane(width / 2.0).with_boundary_type(boundary_type.clone()),
        );
        let bottom = Arc::new(
            Surface::y_plane(-height / 2.0).with_boundary_type(boundary_type.clone()),
        );
        let top = Arc::new(Surface::y_plane(height / 2.0).with_boundary_type(boundary_type));

        Region::new_from_halfspace(HalfspaceType::Above(left))
            .intersection(&Region::new_from_halfspace(HalfspaceType::Below(right)))
            .intersection(&Region::new_from_halfspace(HalfspaceType::Above(bottom)))
            .intersection(&Region::new_from_halfspace(HalfspaceType::Below(top)))
    }

    pub fn contains(&self, point: (f64, f64, f64)) -> bool {
        self.expr.evaluate_contains(point)
    }

    /// Recursively collect all surfaces and their sense (true=Above,
    /// false=Below) in the region
    pub fn surfaces_with_sense(&self) -> Vec<(Arc<Surface>, bool)> {
        fn collect(expr: &RegionExpr, surfaces: &mut Vec<(Arc<Surface>, bool)>, sense: bool) {
            match expr {
                RegionExpr::Halfspace(hs) => match hs {
                    HalfspaceType::Above(surf) => surfaces.push((surf.clone(), sense)),
                    HalfspaceType::Below(surf) => surfaces.push((surf.clone(), !sense)),
                },
                RegionExpr::Union(a, b) | RegionExpr::Intersection(a, b) => {
                    collect(a, surfaces, sense);
                    collect(b, surfaces, sense);
                }
                RegionExpr::Complement(inner) => collect(inner, surfaces, !sense),
            }
        }
        let mut result = Vec::new();
        collect(&self.expr, &mut result, true);
        result
    }

    /// Render the region in the engine's infix form: signed surface ids,
    /// whitespace for intersection, `|` for union, `~` for complement.
    /// Fails if any referenced surface has no id yet.
    pub fn to_region_string(&self) -> Result<String, String> {
        self.to_region_string_resolved(&|surf| surf.surface_id)
    }

    /// Same as [`Region::to_region_string`] but with the surface id supplied
    /// by a resolver, so geometry export can use ids it assigned without
    /// mutating shared surfaces.
    pub fn to_region_string_resolved(
        &self,
        resolve: &dyn Fn(&Arc<Surface>) -> Option<u32>,
    ) -> Result<String, String> {
        fn render(
            expr: &RegionExpr,
            parenthesize: bool,
            resolve: &dyn Fn(&Arc<Surface>) -> Option<u32>,
        ) -> Result<String, String> {
            let surface_id = |surf: &Arc<Surface>| {
                resolve(surf).ok_or_else(|| {
                    String::from("Surface in region has no id; assign one before export")
                })
            };
            match expr {
                RegionExpr::Halfspace(HalfspaceType::Above(surf)) => {
                    Ok(format!("{}", surface_id(surf)?))
                }
                RegionExpr::Halfspace(HalfspaceType::Below(surf)) => {
                    Ok(format!("-{}", surface_id(surf)?))
                }
                RegionExpr::Intersection(a, b) => Ok(format!(
                    "{} {}",
                    render(a, true, resolve)?,
                    render(b, true, resolve)?
                )),
                RegionExpr::Union(a, b) => {
                    let rendered = format!(
                        "{} | {}",
                        render(a, true, resolve)?,
                        render(b, true, resolve)?
                    );
                    if parenthesize {
                        Ok(format!("({})", rendered))
                    } else {
                        Ok(rendered)
                    }
                }
                RegionExpr::Complement(inner) => {
                    Ok(format!("~({})", render(inner, false, resolve)?))
                }
            }
        }
        render(&self.expr, false, resolve)
    }
}

impl RegionExpr {
    pub fn evaluate_contains(&self, point: (f64, f64, f64)) -> bool {
        match self {
            RegionExpr::Halfspace(hs) => match hs {
                HalfspaceType::Above(surf) => surf.evaluate(point) > 0.0,
                HalfspaceType::Below(surf) => surf.evaluate(point) < 0.0,
            },
            RegionExpr::Union(a, b) => a.evaluate_contains(point) || b.evaluate_contains(point),
            RegionExpr::Intersection(a, b) => {
                a.evaluate_contains(point) && b.evaluate_contains(point)
            }
            RegionExpr::Complement(inner) => !inner.evaluate_contains(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HalfspaceExt;

    #[test]
    fn test_region_contains_cylinder() {
        let cyl = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.375));
        let inside = cyl.below();
        assert!(inside.contains((0.0, 0.0, 0.0)));
        assert!(inside.contains((0.3, 0.0, 50.0)));
        assert!(!inside.contains((0.5, 0.0, 0.0)));

        let outside = cyl.above();
        assert!(!outside.contains((0.0, 0.0, 0.0)));
        assert!(outside.contains((0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_annulus_intersection() {
        let fuel_or = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.375));
        let clad_or = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.4));
        let annulus = fuel_or.above().intersection(&clad_or.below());
        assert!(annulus.contains((0.39, 0.0, 0.0)));
        assert!(!annulus.contains((0.0, 0.0, 0.0)));
        assert!(!annulus.contains((0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_union_and_complement() {
        let c1 = Arc::new(Surface::z_cylinder(0.0, 0.0, 1.0));
        let c2 = Arc::new(Surface::z_cylinder(3.0, 0.0, 1.0));
        let either = c1.below().union(&c2.below());
        assert!(either.contains((0.0, 0.0, 0.0)));
        assert!(either.contains((3.0, 0.0, 0.0)));
        assert!(!either.contains((1.5, 0.0, 0.0)));

        let neither = either.complement();
        assert!(!neither.contains((0.0, 0.0, 0.0)));
        assert!(neither.contains((1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_rectangular_prism_contains() {
        let prism = Region::rectangular_prism(1.2, 1.2, BoundaryType::Reflective);
        assert!(prism.contains((0.0, 0.0, 0.0)));
        assert!(prism.contains((0.59, -0.59, 100.0)));
        assert!(!prism.contains((0.61, 0.0, 0.0)));
        assert!(!prism.contains((0.0, -0.61, 0.0)));
    }

    #[test]
    fn test_rectangular_prism_boundary() {
        let prism = Region::rectangular_prism(1.2, 1.2, BoundaryType::Reflective);
        let surfaces = prism.surfaces_with_sense();
        assert_eq!(surfaces.len(), 4);
        for (surface, _sense) in surfaces {
            assert_eq!(*surface.boundary_type(), BoundaryType::Reflective);
        }
    }

    #[test]
    fn test_surfaces_with_sense() {
        let fuel_or = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.375));
        let clad_or = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.4));
        let annulus = fuel_or.above().intersection(&clad_or.below());
        let surfaces = annulus.surfaces_with_sense();
        assert_eq!(surfaces.len(), 2);
        assert!(surfaces[0].1); // above fuel_or
        assert!(!surfaces[1].1); // below clad_or
    }

    #[test]
    fn test_complement_flips_sense() {
        let cyl = Arc::new(Surface::z_cylinder(0.0, 0.0, 1.0));
        let surfaces = cyl.below().complement().surfaces_with_sense();
        assert_eq!(surfaces.len(), 1);
        assert!(surfaces[0].1);
    }

    #[test]
    fn test_region_string() {
        let fuel_or = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.375).with_id(1));
        let clad_or = Arc::new(Surface::z_cylinder(0.0, 0.0, 0.4).with_id(2));
        assert_eq!(fuel_or.below().to_region_string().unwrap(), "-1");
        assert_eq!(
            fuel_or
                .above()
                .intersection(&clad_or.below())
                .to_region_string()
                .unwrap(),
            "1 -2"
        );
        assert_eq!(
            fuel_or
                .below()
                .union(&clad_or.above())
                .to_region_string()
                .unwrap(),
            "-1 | 2"
        );
        assert_eq!(
            fuel_or.below().complement().to_region_string().unwrap(),
            "~(-1)"
        );
    }

    #[test]
    fn test_region_string_parenthesizes_nested_union() {
        let a = Arc::new(Surface::z_cylinder(0.0, 0.0, 1.0).with_id(1));
        let b = Arc::new(Surface::z_cylinder(2.0, 0.0, 1.0).with_id(2));
        let c = Arc::new(Surface::x_plane(0.0).with_id(3));
        let region = a.below().union(&b.below()).intersection(&c.above());
        assert_eq!(region.to_region_string().unwrap(), "(-1 | -2) 3");
    }

    #[test]
    fn test_region_string_requires_ids() {
        let cyl = Arc::new(Surface::z_cylinder(0.0, 0.0, 1.0));
        assert!(cyl.below().to_region_string().is_err());
    }
}
