use rand::Rng;

/// Spatial distribution types for source sampling - simplified enum approach
#[derive(Debug, Clone)]
pub enum SpatialDistribution {
    /// A single point
    Point { xyz: [f64; 3] },
    /// Uniform over an axis-aligned box. With `only_fissionable` the engine
    /// rejection-samples until the site lands in fissionable material.
    Box {
        lower_left: [f64; 3],
        upper_right: [f64; 3],
        only_fissionable: bool,
    },
}

impl SpatialDistribution {
    /// Create a point distribution
    pub fn new_point(x: f64, y: f64, z: f64) -> Self {
        Self::Point { xyz: [x, y, z] }
    }

    /// Create a uniform box distribution
    pub fn new_box(
        lower_left: [f64; 3],
        upper_right: [f64; 3],
        only_fissionable: bool,
    ) -> Result<Self, String> {
        for axis in 0..3 {
            if lower_left[axis] >= upper_right[axis] {
                return Err(format!(
                    "Box lower_left must be strictly below upper_right on every axis (axis {})",
                    axis
                ));
            }
        }
        Ok(Self::Box {
            lower_left,
            upper_right,
            only_fissionable,
        })
    }

    /// Sample a position from this distribution. The `only_fissionable`
    /// restriction is applied by the engine at run time, not here.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        match self {
            SpatialDistribution::Point { xyz } => *xyz,
            SpatialDistribution::Box {
                lower_left,
                upper_right,
                ..
            } => {
                let mut position = [0.0; 3];
                for axis in 0..3 {
                    position[axis] = rng.gen_range(lower_left[axis]..upper_right[axis]);
                }
                position
            }
        }
    }

    /// Engine space type string: a fissionable-restricted box serializes as
    /// the `fission` space type.
    pub fn type_str(&self) -> &'static str {
        match self {
            SpatialDistribution::Point { .. } => "point",
            SpatialDistribution::Box {
                only_fissionable: true,
                ..
            } => "fission",
            SpatialDistribution::Box { .. } => "box",
        }
    }

    /// Flat parameter list in the engine's schema order.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            SpatialDistribution::Point { xyz } => xyz.to_vec(),
            SpatialDistribution::Box {
                lower_left,
                upper_right,
                ..
            } => {
                let mut params = lower_left.to_vec();
                params.extend_from_slice(upper_right);
                params
            }
        }
    }
}
