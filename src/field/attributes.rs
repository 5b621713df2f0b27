use chrono::NaiveDateTime;
use std::fmt::Display;

/// Physical identity of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// GRIB short name, e.g. `"T"` or `"HHL"`.
    pub short_name: String,
    /// Descriptive name, e.g. `"Temperature"`.
    pub name: String,
    /// Unit string, e.g. `"K"`.
    pub units: String,
}

impl Parameter {
    /// Create a new parameter description.
    pub fn new<S, N, U>(short_name: S, name: N, units: U) -> Self
    where
        S: Into<String>,
        N: Into<String>,
        U: Into<String>,
    {
        Parameter {
            short_name: short_name.into(),
            name: name.into(),
            units: units.into(),
        }
    }
}

/// The kind of vertical coordinate a field is defined on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelType {
    /// Model levels, either layer interfaces or layer mid points depending on `origin_z`.
    ModelLevel,
    /// Isobaric surfaces.
    Pressure,
    /// Isentropic surfaces.
    Theta,
    /// Single level at the earth's surface.
    Surface,
    /// Fixed height above ground.
    HeightAboveGround,
    /// Any other named vertical coordinate, e.g. isosurfaces of an arbitrary field.
    Named(String),
}

impl LevelType {
    /// The name used for the vertical axis of fields on this level type.
    pub fn name(&self) -> &str {
        match self {
            LevelType::ModelLevel => "model_level",
            LevelType::Pressure => "pressure",
            LevelType::Theta => "theta",
            LevelType::Surface => "surface",
            LevelType::HeightAboveGround => "height_above_ground",
            LevelType::Named(name) => name,
        }
    }
}

impl Default for LevelType {
    fn default() -> Self {
        LevelType::ModelLevel
    }
}

impl Display for LevelType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reference frame of horizontal vector components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorReference {
    /// Components relative to the native (possibly rotated) model grid.
    Native,
    /// Components relative to geographic north.
    Geo,
}

impl Default for VectorReference {
    fn default() -> Self {
        VectorReference::Native
    }
}

/// Metadata attached to a field.
///
/// The operators only interpret the level type and the staggering offsets, everything else is
/// passed through to the output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAttrs {
    /// Physical identity of the field.
    pub parameter: Parameter,
    /// Vertical coordinate type.
    pub level_type: LevelType,
    /// Staggering along x, 0.0 on mass points, 0.5 on cell faces.
    pub origin_x: f64,
    /// Staggering along y, 0.0 on mass points, 0.5 on cell faces.
    pub origin_y: f64,
    /// Staggering along z, 0.0 on layer mid points (full levels), -0.5 on layer interfaces (half
    /// levels).
    pub origin_z: f64,
    /// Vector reference for wind components.
    pub vref: VectorReference,
    /// Valid time of the data.
    pub valid_time: Option<NaiveDateTime>,
}

impl FieldAttrs {
    /// Attributes for a field on full model levels.
    pub fn model_level(parameter: Parameter) -> Self {
        FieldAttrs {
            parameter,
            ..FieldAttrs::default()
        }
    }

    /// Attributes for a field on half model levels (layer interfaces).
    pub fn half_level(parameter: Parameter) -> Self {
        FieldAttrs {
            parameter,
            origin_z: -0.5,
            ..FieldAttrs::default()
        }
    }

    /// Attributes for a single level surface field.
    pub fn surface(parameter: Parameter) -> Self {
        FieldAttrs {
            parameter,
            level_type: LevelType::Surface,
            ..FieldAttrs::default()
        }
    }

    /// Copy these attributes, replacing the short name of the parameter.
    pub fn with_short_name<S: Into<String>>(&self, short_name: S) -> Self {
        let mut attrs = self.clone();
        attrs.parameter.short_name = short_name.into();
        attrs
    }

    /// Copy these attributes, replacing the level type.
    pub fn with_level_type(&self, level_type: LevelType) -> Self {
        let mut attrs = self.clone();
        attrs.level_type = level_type;
        attrs
    }

    /// Whether the field is on horizontally staggered points.
    pub fn is_staggered_horizontal(&self) -> bool {
        self.origin_x != 0.0 || self.origin_y != 0.0
    }
}
