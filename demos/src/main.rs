//! navigate: generate a hilly terrain and run every terranav stage on it.
//!
//! Usage: `navigate [SEED] [SIZE]`. Set `RUST_LOG=debug` (or `trace`) to see
//! the library's own logging.

mod terrain;

use std::error::Error;

use terranav_core::{Position, TerrainMesh};
use terranav_mesh::contour::contour_vertices;
use terranav_mesh::{ContourConfig, build_nav_mesh, extract_contours};
use terranav_paths::{
    AnisotropicParams, GraphVariant, GridParams, PathError, SplineConfig, TerrainGraph, find_path,
};

use terrain::{DemoConfig, generate_height_field};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DemoConfig::from_args(std::env::args().skip(1))?;
    log::info!(
        "seed {} size {}x{} multiplier {}",
        config.seed,
        config.size,
        config.size,
        config.height_multiplier
    );

    let field = generate_height_field(&config)?;
    let terrain = TerrainMesh::from_height_field(&field, config.height_multiplier);
    log::info!(
        "terrain mesh: {} vertices, {} triangles",
        terrain.vertices.len(),
        terrain.triangle_count()
    );

    let last = config.size - 1;
    let start = terrain.vertex(0, 0).ok_or("terrain has no start corner")?;
    let goal = terrain.vertex(last, last).ok_or("terrain has no goal corner")?;

    for variant in [
        GraphVariant::Grid(GridParams::default()),
        GraphVariant::Anisotropic(AnisotropicParams::default()),
    ] {
        let graph = TerrainGraph::from_terrain(&terrain, variant)?;
        search(&graph, start, goal)?;
    }

    let contour_config = ContourConfig {
        height_multiplier: config.height_multiplier,
        ..ContourConfig::default()
    };
    let contours = extract_contours(&field, &contour_config)?;
    let points = contour_vertices(&contours);
    log::info!("contours: {} polylines, {} vertices", contours.len(), points.len());

    let nav = build_nav_mesh(&points)?;
    log::info!(
        "nav mesh: {} vertices, {} triangles",
        nav.vertices.len(),
        nav.triangle_count()
    );

    let mesh_start = nav.nearest_vertex(start).ok_or("nav mesh is empty")?;
    let mesh_goal = nav.nearest_vertex(goal).ok_or("nav mesh is empty")?;
    let graph = TerrainGraph::from_mesh(nav.mesh);
    search(&graph, mesh_start, mesh_goal)?;

    Ok(())
}

/// Search one graph and report the raw and smoothed path. A missing path is
/// reported, not treated as a failure.
fn search(graph: &TerrainGraph, start: Position, goal: Position) -> Result<(), PathError> {
    match find_path(graph, start, goal) {
        Ok(path) => {
            let smoothed = path.smoothed(&SplineConfig::default());
            log::info!(
                "{}: {} -> {} cost {:.2}, {} positions, {} after smoothing",
                graph.name(),
                start,
                goal,
                path.cost,
                path.len(),
                smoothed.len()
            );
            Ok(())
        }
        Err(err @ PathError::NoPathFound { .. }) => {
            log::warn!("{}: {err}", graph.name());
            Ok(())
        }
        Err(err) => Err(err),
    }
}
