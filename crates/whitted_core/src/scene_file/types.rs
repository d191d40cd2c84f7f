//! Parsed scene-file contents.

use std::path::PathBuf;

use whitted_math::{Vec2, Vec3};

use crate::{Camera, Color, Light, MaterialId};

/// Boolean operation of a CSG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsgOp {
    /// Points inside either operand
    Union,
    /// Points inside both operands
    Intersect,
    /// Points inside the left operand but not the right
    Difference,
    /// Like `Intersect`, but exit distances are measured from the exit points
    IntersectSurfacePoint,
}

impl CsgOp {
    /// Operation for a scene-file op code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Union),
            1 => Some(Self::Intersect),
            2 => Some(Self::Difference),
            3 => Some(Self::IntersectSurfacePoint),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Union => 0,
            Self::Intersect => 1,
            Self::Difference => 2,
            Self::IntersectSurfacePoint => 3,
        }
    }
}

/// A material as written in the scene file. The texture is a path to be
/// loaded later.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub diffuse: Color,
    pub specular: Color,
    pub specular_exponent: f64,
    pub reflection: f64,
    pub refraction_index: f64,
    pub opacity: f64,
    pub texture: Option<PathBuf>,
}

/// A geometric object from the scene file.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectDesc {
    Sphere {
        material: MaterialId,
        center: Vec3,
        radius: f64,
    },
    Triangle {
        material: MaterialId,
        vertices: [Vec3; 3],
        tex_coords: [Vec2; 3],
    },
    Cuboid {
        material: MaterialId,
        min: Vec3,
        max: Vec3,
    },
    Mesh {
        material: MaterialId,
        min: Vec3,
        max: Vec3,
        path: PathBuf,
    },
    Csg {
        op: CsgOp,
        left: Box<ObjectDesc>,
        right: Box<ObjectDesc>,
    },
}

impl ObjectDesc {
    /// Every material id used by this object and its operands.
    pub fn material_ids(&self) -> Vec<MaterialId> {
        match self {
            Self::Sphere { material, .. }
            | Self::Triangle { material, .. }
            | Self::Cuboid { material, .. }
            | Self::Mesh { material, .. } => vec![*material],
            Self::Csg { left, right, .. } => {
                let mut ids = left.material_ids();
                ids.extend(right.material_ids());
                ids
            }
        }
    }

    /// Short name of the object kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Triangle { .. } => "triangle",
            Self::Cuboid { .. } => "box",
            Self::Mesh { .. } => "mesh",
            Self::Csg { .. } => "csg",
        }
    }
}

/// Everything a scene file declares.
#[derive(Debug, Clone)]
pub struct SceneDescription {
    pub camera: Option<Camera>,
    pub background: Color,
    pub background_image: Option<PathBuf>,
    pub ambient: Color,
    pub materials: Vec<MaterialDesc>,
    pub lights: Vec<Light>,
    pub objects: Vec<ObjectDesc>,
}

impl SceneDescription {
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            camera: None,
            background: Color::ZERO,
            background_image: None,
            ambient: Color::ZERO,
            materials: Vec::new(),
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }
}
