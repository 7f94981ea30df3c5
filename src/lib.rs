// Typed configuration model for an OpenMC-compatible Monte Carlo transport
// engine. The crate builds materials, CSG geometry, run settings and tallies,
// serializes each to the engine's XML input files, and launches the engine.
pub mod cell;
pub mod config;
pub mod export;
pub mod filters;
pub mod geometry;
pub mod material;
pub mod materials;
pub mod mesh;
pub mod model;
pub mod region;
pub mod settings;
pub mod source;
pub mod stats;
pub mod surface;
pub mod tally;
pub mod universe;

pub use cell::{Cell, Fill};
pub use config::Config;
pub use filters::{CellFilter, Filter, MeshFilter};
pub use geometry::Geometry;
pub use material::{CompositionEntry, FractionType, Material};
pub use materials::Materials;
pub use mesh::RegularMesh;
pub use model::Model;
pub use region::{HalfspaceType, Region, RegionExpr};
pub use settings::Settings;
pub use source::IndependentSource;
pub use stats::SpatialDistribution;
pub use surface::{BoundaryType, HalfspaceExt, Surface, SurfaceKind};
pub use tally::{Score, Tallies, Tally};
pub use universe::Universe;
