use pincell_mc::config::CROSS_SECTIONS_ENV;
use pincell_mc::{
    BoundaryType, Cell, Config, Filter, FractionType, Geometry, HalfspaceExt,
    IndependentSource, Material, Materials, MeshFilter, Model, Region, RegularMesh,
    Score, Settings, SpatialDistribution, Surface, Tallies, Tally, Universe,
};
use log::info;
use std::sync::Arc;

const PITCH: f64 = 1.2;

fn build_materials() -> Result<(Arc<Material>, Arc<Material>, Arc<Material>), String> {
    let mut fuel = Material::new();
    fuel.set_name("UO2 Fuel Enriched 1.5%");
    fuel.set_density("g/cm3", 10.313)?;
    fuel.add_element_enriched("U", 1.0, FractionType::Atom, 1.5)?;
    fuel.add_element("O", 2.0, FractionType::Atom)?;

    let mut cladding = Material::new();
    cladding.set_name("Zircaloy Cladding");
    cladding.set_density("g/cm3", 6.55)?;
    cladding.add_element("Zr", 0.98335, FractionType::Weight)?;
    cladding.add_element("Sn", 0.014, FractionType::Weight)?;
    cladding.add_element("Fe", 0.00165, FractionType::Weight)?;
    cladding.add_element("Cr", 0.001, FractionType::Weight)?;

    let mut moderator = Material::new();
    moderator.set_name("H2O Moderator");
    moderator.set_density("g/cm3", 0.7405)?;
    moderator.add_element("H", 2.0, FractionType::Atom)?;
    moderator.add_element("O", 1.0, FractionType::Atom)?;
    moderator.add_s_alpha_beta("c_H_in_H2O");

    Ok((Arc::new(fuel), Arc::new(cladding), Arc::new(moderator)))
}

fn build_geometry(
    fuel: Arc<Material>,
    cladding: Arc<Material>,
    moderator: Arc<Material>,
) -> Result<Geometry, String> {
    let fuel_outer = Arc::new(
        Surface::z_cylinder(0.0, 0.0, 0.375).with_name("Fuel Outer Radius"),
    );
    let clad_outer = Arc::new(
        Surface::z_cylinder(0.0, 0.0, 0.4).with_name("Cladding Outer Radius"),
    );

    let mut pin_universe = Universe::new().with_name("Fuel Pin Universe");
    pin_universe.add_cell(Cell::with_material(
        fuel_outer.below(),
        "Fuel Cell",
        fuel,
    ));
    pin_universe.add_cell(Cell::with_material(
        fuel_outer.above().intersection(&clad_outer.below()),
        "Cladding Cell",
        cladding,
    ));
    pin_universe.add_cell(Cell::with_material(
        clad_outer.above(),
        "Moderator Cell",
        moderator,
    ));

    let bound_box = Region::rectangular_prism(PITCH, PITCH, BoundaryType::Reflective);
    let mut root_universe = Universe::with_id(0).with_name("Root Universe");
    root_universe.add_cell(Cell::with_universe(bound_box, "Root Cell", pin_universe));

    Geometry::new(root_universe)
}

fn build_settings() -> Result<Settings, String> {
    let half = PITCH / 2.0;
    let space = SpatialDistribution::new_box(
        [-half, -half, -half],
        [half, half, half],
        true,
    )?;
    Settings::new(100, 10, 5000, IndependentSource::new(space))
}

fn build_tallies() -> Result<Tallies, String> {
    let half = PITCH / 2.0;
    let mesh = RegularMesh::new(
        vec![100, 100],
        vec![-half, -half],
        vec![half, half],
    )?;
    let mut flux = Tally::with_name("Flux");
    flux.add_filter(Filter::Mesh(MeshFilter::new(mesh)));
    flux.add_score(Score::Flux);
    flux.add_score(Score::Fission);

    let mut tallies = Tallies::new();
    tallies.append(flux);
    Ok(tallies)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (fuel, cladding, moderator) = build_materials()?;
    let geometry = build_geometry(fuel, cladding, moderator)?;

    let mut materials = Materials::from_geometry(&geometry);
    if let Ok(path) = std::env::var(CROSS_SECTIONS_ENV) {
        materials.set_cross_sections(path.clone());
        Config::global().set_cross_sections(path);
    }

    let model = Model::new(materials, geometry, build_settings()?, build_tallies()?);

    info!("exporting pincell input files and launching the engine");
    model.run(".")?;
    Ok(())
}
