//! Line-oriented scene-file parser.
//!
//! Each line is split on whitespace into a keyword and its arguments. Lines
//! that cannot be understood are logged and skipped so that one typo does not
//! throw away a whole scene. `BTREE` lines are the exception: a bad operand
//! would leave the object list inconsistent, so those are hard errors.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use whitted_math::{Vec2, Vec3};

use super::types::*;
use crate::{Camera, Color, Light};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: BTREE operand {index} does not name an object (have {count})")]
    OperandOutOfRange { line: usize, index: i64, count: usize },

    #[error("Line {line}: BTREE operand {index} is already part of another BTREE")]
    OperandAbsorbed { line: usize, index: usize },

    #[error("Line {line}: BTREE operand {index} names an object line that was skipped")]
    OperandSkipped { line: usize, index: usize },

    #[error("Line {line}: BTREE combines object {index} with itself")]
    SameOperand { line: usize, index: usize },

    #[error("Line {line}: unknown BTREE operation {code}")]
    UnknownOperation { line: usize, code: i64 },
}

/// Result type for scene-file operations.
pub type SceneFileResult<T> = Result<T, SceneFileError>;

/// Read and parse a scene file.
///
/// Relative texture, background and mesh paths are resolved against the
/// directory containing the scene file.
pub fn load_scene_file(path: impl AsRef<Path>) -> SceneFileResult<SceneDescription> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SceneFileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or(Path::new(""));
    let description = parse_scene(&source, base_dir)?;

    log::info!(
        "Loaded scene {}: {} materials, {} lights, {} objects",
        path.display(),
        description.materials.len(),
        description.lights.len(),
        description.object_count()
    );

    Ok(description)
}

/// Parse scene-file text. Relative paths are joined onto `base_dir`.
pub fn parse_scene(source: &str, base_dir: &Path) -> SceneFileResult<SceneDescription> {
    let mut scene = SceneDescription::default();

    // Every object line takes a slot, even when it is skipped or later
    // absorbed by a BTREE, so BTREE indices count lines as written.
    let mut slots: Vec<Slot> = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let mut parts = text.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        let Some(arity) = expected_arity(keyword) else {
            log::warn!("Line {}: ignoring unknown command: {}", line, text);
            continue;
        };
        if args.len() != arity {
            if is_object_keyword(keyword) {
                slots.push(Slot::Skipped);
            }
            log::warn!(
                "Line {}: {} expects {} arguments, found {}; ignoring",
                line,
                keyword,
                arity,
                args.len()
            );
            continue;
        }

        let mut tokens = Tokens::new(&args, base_dir);
        let parsed = match keyword {
            "RT" => tokens.number::<f64>().map(|_| ()),
            "CAMERA" => parse_camera(&mut tokens).map(|camera| {
                if scene.camera.is_some() {
                    log::debug!("Line {}: replacing earlier camera", line);
                }
                scene.camera = Some(camera);
            }),
            "SCENE" => parse_settings(&mut tokens).map(|(background, ambient, image)| {
                scene.background = background;
                scene.ambient = ambient;
                scene.background_image = image;
            }),
            "MATERIAL" => parse_material(&mut tokens).map(|material| scene.materials.push(material)),
            "LIGHT" => parse_light(&mut tokens).map(|light| scene.lights.push(light)),
            "SPHERE" | "TRIANGLE" | "BOX" | "MESH" => {
                parse_object(keyword, &mut tokens).map(|object| slots.push(Slot::Object(object)))
            }
            "BTREE" => match parse_btree(&mut tokens) {
                Some((left, right, code)) => {
                    let object = combine(&mut slots, line, left, right, code)?;
                    slots.push(Slot::Object(object));
                    Some(())
                }
                None => None,
            },
            _ => None,
        };

        if parsed.is_none() {
            if is_object_keyword(keyword) {
                slots.push(Slot::Skipped);
            }
            log::warn!("Line {}: malformed {} command; ignoring", line, keyword);
        }
    }

    scene.objects = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Object(object) => Some(object),
            Slot::Absorbed | Slot::Skipped => None,
        })
        .collect();
    Ok(scene)
}

/// Number of arguments each command takes.
fn expected_arity(keyword: &str) -> Option<usize> {
    match keyword {
        "RT" => Some(1),
        "CAMERA" => Some(14),
        "SCENE" => Some(7),
        "MATERIAL" => Some(11),
        "LIGHT" => Some(6),
        "SPHERE" => Some(5),
        "TRIANGLE" => Some(16),
        "BOX" => Some(7),
        "MESH" => Some(8),
        "BTREE" => Some(3),
        _ => None,
    }
}

/// Sequential reader over one line's arguments.
struct Tokens<'a> {
    args: std::slice::Iter<'a, &'a str>,
    base_dir: &'a Path,
}

impl<'a> Tokens<'a> {
    fn new(args: &'a [&'a str], base_dir: &'a Path) -> Self {
        Self {
            args: args.iter(),
            base_dir,
        }
    }

    fn number<T: FromStr>(&mut self) -> Option<T> {
        self.args.next()?.parse().ok()
    }

    fn vec3(&mut self) -> Option<Vec3> {
        Some(Vec3::new(self.number()?, self.number()?, self.number()?))
    }

    fn vec2(&mut self) -> Option<Vec2> {
        Some(Vec2::new(self.number()?, self.number()?))
    }

    /// RGB written as 0-255.
    fn color(&mut self) -> Option<Color> {
        Some(self.vec3()? / 255.0)
    }

    /// A file path, or `None` for the literal `null`.
    fn optional_path(&mut self) -> Option<Option<PathBuf>> {
        let token = *self.args.next()?;
        if token == "null" {
            return Some(None);
        }
        Some(Some(self.resolve(token)))
    }

    fn path(&mut self) -> Option<PathBuf> {
        let token = *self.args.next()?;
        Some(self.resolve(token))
    }

    fn resolve(&self, token: &str) -> PathBuf {
        let path = Path::new(token);
        if path.is_relative() {
            self.base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

fn parse_camera(tokens: &mut Tokens) -> Option<Camera> {
    let eye = tokens.vec3()?;
    let at = tokens.vec3()?;
    let up = tokens.vec3()?;
    let fovy = tokens.number()?;
    let near: f64 = tokens.number()?;
    let far = tokens.number()?;
    let width: u32 = tokens.number()?;
    let height: u32 = tokens.number()?;

    if width == 0 || height == 0 || near <= 0.0 {
        return None;
    }

    Some(Camera::new(eye, at, up, fovy, near, far, width, height))
}

fn parse_settings(tokens: &mut Tokens) -> Option<(Color, Color, Option<PathBuf>)> {
    let background = tokens.color()?;
    let ambient = tokens.color()?;
    let image = tokens.optional_path()?;
    Some((background, ambient, image))
}

fn parse_material(tokens: &mut Tokens) -> Option<MaterialDesc> {
    Some(MaterialDesc {
        diffuse: tokens.color()?,
        specular: tokens.color()?,
        specular_exponent: tokens.number()?,
        reflection: tokens.number()?,
        refraction_index: tokens.number()?,
        opacity: tokens.number()?,
        texture: tokens.optional_path()?,
    })
}

fn parse_light(tokens: &mut Tokens) -> Option<Light> {
    let position = tokens.vec3()?;
    let color = tokens.color()?;
    Some(Light::new(position, color))
}

fn parse_object(keyword: &str, tokens: &mut Tokens) -> Option<ObjectDesc> {
    let material = tokens.number()?;

    match keyword {
        "SPHERE" => {
            let radius: f64 = tokens.number()?;
            let center = tokens.vec3()?;
            (radius > 0.0).then_some(ObjectDesc::Sphere {
                material,
                center,
                radius,
            })
        }
        "TRIANGLE" => Some(ObjectDesc::Triangle {
            material,
            vertices: [tokens.vec3()?, tokens.vec3()?, tokens.vec3()?],
            tex_coords: [tokens.vec2()?, tokens.vec2()?, tokens.vec2()?],
        }),
        "BOX" => Some(ObjectDesc::Cuboid {
            material,
            min: tokens.vec3()?,
            max: tokens.vec3()?,
        }),
        "MESH" => Some(ObjectDesc::Mesh {
            material,
            min: tokens.vec3()?,
            max: tokens.vec3()?,
            path: tokens.path()?,
        }),
        _ => None,
    }
}

fn parse_btree(tokens: &mut Tokens) -> Option<(i64, i64, i64)> {
    Some((tokens.number()?, tokens.number()?, tokens.number()?))
}

/// One object line of the scene file.
enum Slot {
    Object(ObjectDesc),
    /// Taken as an operand by a later BTREE
    Absorbed,
    /// The line was malformed and ignored
    Skipped,
}

fn is_object_keyword(keyword: &str) -> bool {
    matches!(keyword, "SPHERE" | "TRIANGLE" | "BOX" | "MESH" | "BTREE")
}

/// Take two operands out of the slot list and build a CSG node from them.
fn combine(
    slots: &mut [Slot],
    line: usize,
    left: i64,
    right: i64,
    code: i64,
) -> SceneFileResult<ObjectDesc> {
    let op = CsgOp::from_code(code).ok_or(SceneFileError::UnknownOperation { line, code })?;

    let left = operand_index(slots, line, left)?;
    let right = operand_index(slots, line, right)?;
    if left == right {
        return Err(SceneFileError::SameOperand { line, index: left });
    }

    let left_object = take_operand(slots, line, left)?;
    let right_object = match take_operand(slots, line, right) {
        Ok(object) => object,
        Err(err) => {
            slots[left] = Slot::Object(left_object);
            return Err(err);
        }
    };

    log::debug!(
        "Line {}: {:?} of {} #{} and {} #{}",
        line,
        op,
        left_object.kind(),
        left,
        right_object.kind(),
        right
    );

    Ok(ObjectDesc::Csg {
        op,
        left: Box::new(left_object),
        right: Box::new(right_object),
    })
}

fn take_operand(slots: &mut [Slot], line: usize, index: usize) -> SceneFileResult<ObjectDesc> {
    match std::mem::replace(&mut slots[index], Slot::Absorbed) {
        Slot::Object(object) => Ok(object),
        Slot::Absorbed => Err(SceneFileError::OperandAbsorbed { line, index }),
        Slot::Skipped => {
            slots[index] = Slot::Skipped;
            Err(SceneFileError::OperandSkipped { line, index })
        }
    }
}

fn operand_index(slots: &[Slot], line: usize, index: i64) -> SceneFileResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < slots.len())
        .ok_or(SceneFileError::OperandOutOfRange {
            line,
            index,
            count: slots.len(),
        })
}
