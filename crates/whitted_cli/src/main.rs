//! whitted CLI - render scene files to images
//!
//! `whitted render` traces a scene file and writes a PNG (or any format the
//! `image` crate infers from the output extension). `whitted info` prints a
//! summary of a scene file without loading textures or meshes.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use whitted_core::{load_scene_file, ObjectDesc};
use whitted_renderer::{render, MeshHitMode, RenderConfig, Scene};

#[derive(Parser)]
#[command(name = "whitted")]
#[command(about = "Recursive Whitted-style ray tracer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene file to an image
    Render(RenderArgs),
    /// Display information about a scene file
    Info {
        /// Path to the scene file
        scene: PathBuf,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Input scene file
    scene: PathBuf,

    /// Output image (format determined by extension)
    #[arg(short, long)]
    output: PathBuf,

    /// JSON render configuration; flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Render row by row on a single thread
    #[arg(long)]
    sequential: bool,

    /// Use the nearest triangle hit for meshes instead of the first one found
    #[arg(long)]
    nearest_mesh_hits: bool,

    /// Override the camera's image width
    #[arg(long)]
    width: Option<u32>,

    /// Override the camera's image height
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render_scene(&args)?,
        Commands::Info { scene } => show_info(&scene)?,
    }

    Ok(())
}

fn render_scene(args: &RenderArgs) -> Result<()> {
    let config = render_config(args)?;

    let scene = Scene::load(&args.scene, config.mesh_hit_mode)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let mut camera = scene
        .camera()
        .cloned()
        .with_context(|| format!("{} declares no CAMERA", args.scene.display()))?;
    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(camera.screen_width());
        let height = args.height.unwrap_or(camera.screen_height());
        camera = camera.with_resolution(width, height);
    }

    let image = render(&scene, &camera, &config);
    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Wrote {}", args.output.display());
    Ok(())
}

/// Build the render configuration from an optional JSON file plus flags.
fn render_config(args: &RenderArgs) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid render config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    if let Some(samples) = args.samples {
        anyhow::ensure!(samples > 0, "--samples must be at least 1");
        config.samples_per_pixel = samples;
    }
    if args.sequential {
        config.parallel = false;
    }
    if args.nearest_mesh_hits {
        config.mesh_hit_mode = MeshHitMode::Nearest;
    }

    Ok(config)
}

fn show_info(path: &Path) -> Result<()> {
    let desc = load_scene_file(path)
        .with_context(|| format!("Failed to load scene {}", path.display()))?;

    println!("Scene: {}", path.display());

    match &desc.camera {
        Some(camera) => {
            println!(
                "Camera: eye {:?} at {:?} up {:?}",
                camera.eye().to_array(),
                camera.at().to_array(),
                camera.up().to_array()
            );
            println!(
                "  fovy {}  near {}  far {}  {}x{}",
                camera.fovy(),
                camera.near(),
                camera.far(),
                camera.screen_width(),
                camera.screen_height()
            );
        }
        None => println!("Camera: none"),
    }

    println!("Background: {:?}", desc.background.to_array());
    if let Some(image) = &desc.background_image {
        println!("  image {}", image.display());
    }
    println!("Ambient: {:?}", desc.ambient.to_array());

    println!("Materials: {}", desc.materials.len());
    for (id, material) in desc.materials.iter().enumerate() {
        print!(
            "  [{}] diffuse {:?} reflection {} ior {} opacity {}",
            id,
            material.diffuse.to_array(),
            material.reflection,
            material.refraction_index,
            material.opacity
        );
        match &material.texture {
            Some(texture) => println!(" texture {}", texture.display()),
            None => println!(),
        }
    }

    println!("Lights: {}", desc.lights.len());
    println!("Objects: {}", desc.object_count());
    for object in &desc.objects {
        print_object(object, 1);
    }

    Ok(())
}

fn print_object(object: &ObjectDesc, indent: usize) {
    let pad = "  ".repeat(indent);
    match object {
        ObjectDesc::Csg { op, left, right } => {
            println!("{}csg {:?}", pad, op);
            print_object(left, indent + 1);
            print_object(right, indent + 1);
        }
        other => println!("{}{} {:?}", pad, other.kind(), other.material_ids()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_render(args: &[&str]) -> RenderArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Render(args) => args,
            Commands::Info { .. } => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn test_render_flags_override_defaults() {
        let args = parse_render(&[
            "whitted",
            "render",
            "scene.txt",
            "-o",
            "out.png",
            "--samples",
            "4",
            "--sequential",
            "--nearest-mesh-hits",
        ]);
        let config = render_config(&args).unwrap();

        assert_eq!(config.samples_per_pixel, 4);
        assert!(!config.parallel);
        assert_eq!(config.mesh_hit_mode, MeshHitMode::Nearest);
        assert_eq!(config.bucket_size, RenderConfig::default().bucket_size);
    }

    #[test]
    fn test_render_defaults() {
        let args = parse_render(&["whitted", "render", "scene.txt", "--output", "out.png"]);
        let config = render_config(&args).unwrap();

        assert_eq!(config.samples_per_pixel, 1);
        assert!(config.parallel);
        assert_eq!(config.mesh_hit_mode, MeshHitMode::FirstHit);
        assert!(args.width.is_none());
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = std::env::temp_dir().join(format!("whitted_cli_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, r#"{ "samples_per_pixel": 8, "seed": 7 }"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let args = parse_render(&[
            "whitted", "render", "scene.txt", "-o", "out.png", "--config", &path_str,
            "--samples", "2",
        ]);
        let config = render_config(&args).unwrap();

        assert_eq!(config.samples_per_pixel, 2);
        assert_eq!(config.seed, 7);
        assert!(config.parallel);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_samples_rejected() {
        let args = parse_render(&["whitted", "render", "s.txt", "-o", "o.png", "--samples", "0"]);
        assert!(render_config(&args).is_err());
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["whitted", "render", "scene.txt"]).is_err());
    }
}
