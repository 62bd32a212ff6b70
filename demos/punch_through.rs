//! Punch-through raycast demo
//!
//! Builds a small world from an inline definition, stacks glass on stone
//! and casts rays with and without transparent punch-through.
//!
//! Run with `RUST_LOG=debug cargo run --example punch_through`.

use hearth_voxel::{
    cgmath::{Point3, Vector3},
    ChunkPos, VoxelId, VoxelIndex, WorldContext, WorldDefinition,
};

const DEFINITION: &str = r#"
[settings]
chunk_size = [16, 16, 16]
material_count = 2

[[voxels]]
name = "air"
transparency = "transparent"
collider = "none"

[[voxels]]
name = "stone"
textures = [[1.0, 0.0]]

[[voxels]]
name = "glass"
transparency = "semi_transparent"
submesh_index = 1
textures = [[3.0, 1.0]]
"#;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut world = WorldContext::from_definition(WorldDefinition::from_toml_str(DEFINITION)?)?;
    let stone = world
        .registry()
        .id_of("stone")
        .ok_or_else(|| anyhow::anyhow!("stone missing from definition"))?;
    let glass = world
        .registry()
        .id_of("glass")
        .ok_or_else(|| anyhow::anyhow!("glass missing from definition"))?;

    let origin_chunk = ChunkPos::new(0, 0, 0);
    let chunk = world.new_chunk(origin_chunk);
    world.chunks_mut().insert(chunk)?;

    let index = *world.index();
    world
        .chunks_mut()
        .set_voxel_at(&index, origin_chunk, VoxelIndex::new(8, 0, 8), stone)?;
    for y in 1..=3 {
        world
            .chunks_mut()
            .set_voxel_at(&index, origin_chunk, VoxelIndex::new(8, y, 8), glass)?;
    }

    let origin = Point3::new(8.0, 12.0, 8.0);
    let down = Vector3::new(0.0, -1.0, 0.0);

    for ignore_transparent in [false, true] {
        let outcome =
            world.raycast_traced(&world.grid_caster(), origin, down, 32.0, ignore_transparent);
        match outcome.voxel_info() {
            Some(info) => {
                let id = world.voxel_id(&info).unwrap_or(VoxelId::EMPTY);
                println!(
                    "ignore_transparent={}: hit '{}' at {} in chunk {} (adjacent {}) after {} queries",
                    ignore_transparent,
                    world.voxel_type(id).name,
                    info.index,
                    info.chunk,
                    info.adjacent,
                    outcome.queries
                );
            }
            None => println!(
                "ignore_transparent={}: no hit ({:?})",
                ignore_transparent, outcome.terminal
            ),
        }
    }

    Ok(())
}
