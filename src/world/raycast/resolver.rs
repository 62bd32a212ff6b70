//! Voxel Raycast Resolver
//!
//! Turns geometric ray hits from a [`RayQuery`] into voxel addresses. With
//! `ignore_transparent` set, a hit on a non-solid voxel restarts the query
//! straight down from half a unit below the hit point, with the range
//! reduced by the distance already travelled. The continuation does not
//! follow the original ray direction.

use crate::world::core::{
    ChunkPos, Ray, RayHit, RayQuery, VoxelId, VoxelIndex, VoxelTypeRegistry,
};
use crate::world::error::WorldError;
use crate::world::storage::ChunkLookup;
use crate::world::world_index::WorldIndex;
use cgmath::{InnerSpace, Point3, Vector3};

/// Vertical drop applied to the hit point before a punch-through continuation
pub const PUNCH_THROUGH_DROP: f32 = 0.5;

/// Result of a voxel raycast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelInfo {
    /// Struck voxel, local to `chunk`
    pub index: VoxelIndex,
    /// Voxel in front of the struck face, relative to `chunk`; may lie in a
    /// neighbouring chunk
    pub adjacent: VoxelIndex,
    pub chunk: ChunkPos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NonChunkSurface,
    ChunkNotResident(ChunkPos),
}

#[derive(Debug, Clone, Copy)]
pub enum RaycastState {
    Querying {
        origin: Point3<f32>,
        direction: Vector3<f32>,
        range: f32,
    },
    ResolvedTransparentRecurse {
        hit: RayHit,
        remaining: f32,
    },
    ResolvedOpaque(VoxelInfo),
    Rejected(RejectReason),
    Exhausted,
}

impl RaycastState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RaycastState::ResolvedOpaque(_) | RaycastState::Rejected(_) | RaycastState::Exhausted
        )
    }
}

/// Terminal state of a raycast plus how much work it took
#[derive(Debug, Clone, Copy)]
pub struct RaycastOutcome {
    pub terminal: RaycastState,
    /// Calls made to the underlying ray query
    pub queries: u32,
}

impl RaycastOutcome {
    pub fn voxel_info(&self) -> Option<VoxelInfo> {
        match self.terminal {
            RaycastState::ResolvedOpaque(info) => Some(info),
            _ => None,
        }
    }
}

pub struct VoxelRaycastResolver<'w> {
    index: &'w WorldIndex,
    chunks: &'w ChunkLookup,
    registry: &'w VoxelTypeRegistry,
    max_punch_through: u32,
}

impl<'w> VoxelRaycastResolver<'w> {
    pub fn new(
        index: &'w WorldIndex,
        chunks: &'w ChunkLookup,
        registry: &'w VoxelTypeRegistry,
        max_punch_through: u32,
    ) -> Self {
        Self {
            index,
            chunks,
            registry,
            max_punch_through,
        }
    }

    pub fn raycast<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_range: f32,
        ignore_transparent: bool,
    ) -> Option<VoxelInfo> {
        self.raycast_traced(query, origin, direction, max_range, ignore_transparent)
            .voxel_info()
    }

    /// [`raycast`](Self::raycast) from a prepared [`Ray`]
    pub fn raycast_ray<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        ray: &Ray,
        max_range: f32,
        ignore_transparent: bool,
    ) -> Option<VoxelInfo> {
        self.raycast(query, ray.origin, ray.direction, max_range, ignore_transparent)
    }

    /// Run the raycast state machine to a terminal state
    pub fn raycast_traced<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_range: f32,
        ignore_transparent: bool,
    ) -> RaycastOutcome {
        let mut queries = 0u32;
        let mut punches = 0u32;

        let length2 = direction.magnitude2();
        if !length2.is_finite() || length2 == 0.0 {
            log::debug!("[VoxelRaycastResolver::raycast] Degenerate direction {:?}", direction);
            return RaycastOutcome {
                terminal: RaycastState::Exhausted,
                queries,
            };
        }

        let mut state = RaycastState::Querying {
            origin,
            direction: direction.normalize(),
            range: max_range,
        };

        while !state.is_terminal() {
            state = match state {
                RaycastState::Querying {
                    origin,
                    direction,
                    range,
                } => self.query(query, origin, direction, range, ignore_transparent, &mut queries),
                RaycastState::ResolvedTransparentRecurse { hit, remaining } => {
                    punches += 1;
                    if punches > self.max_punch_through {
                        log::warn!(
                            "[VoxelRaycastResolver::raycast] Gave up after {} punch-through steps",
                            self.max_punch_through
                        );
                        RaycastState::Exhausted
                    } else {
                        let mut origin = hit.point;
                        origin.y -= PUNCH_THROUGH_DROP;
                        RaycastState::Querying {
                            origin,
                            direction: Vector3::new(0.0, -1.0, 0.0),
                            range: remaining,
                        }
                    }
                }
                terminal => terminal,
            };
            log::trace!("[VoxelRaycastResolver::raycast] -> {:?}", state);
        }

        RaycastOutcome {
            terminal: state,
            queries,
        }
    }

    fn query<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        range: f32,
        ignore_transparent: bool,
        queries: &mut u32,
    ) -> RaycastState {
        // Also catches NaN
        if !(range > 0.0) {
            return RaycastState::Exhausted;
        }

        *queries += 1;
        let Some(hit) = query.cast(origin, direction, range) else {
            return RaycastState::Exhausted;
        };

        let Some(chunk_pos) = hit.surface.chunk() else {
            log::debug!("[VoxelRaycastResolver::query] {}", WorldError::NonChunkSurfaceHit);
            return RaycastState::Rejected(RejectReason::NonChunkSurface);
        };

        if !self.chunks.is_resident(chunk_pos) {
            log::debug!(
                "[VoxelRaycastResolver::query] {}",
                WorldError::ChunkNotResident { pos: chunk_pos }
            );
            return RaycastState::Rejected(RejectReason::ChunkNotResident(chunk_pos));
        }

        let index = self
            .index
            .surface_to_voxel_index(chunk_pos, hit.point, hit.normal, false);

        if ignore_transparent {
            // Voxels in chunks that are not resident read as unset, i.e. empty
            let voxel = self
                .chunks
                .voxel_at(self.index, chunk_pos, index)
                .unwrap_or(VoxelId::UNSET);

            if !self.registry.get_type(voxel).is_solid() {
                return RaycastState::ResolvedTransparentRecurse {
                    hit,
                    remaining: range - hit.distance,
                };
            }
        }

        RaycastState::ResolvedOpaque(VoxelInfo {
            index,
            adjacent: self
                .index
                .surface_to_voxel_index(chunk_pos, hit.point, hit.normal, true),
            chunk: chunk_pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::core::{ChunkSize, HitSurface, TextureOffset, Transparency, VoxelType};
    use crate::world::raycast::GridRayCaster;
    use crate::world::settings::CellRounding;
    use crate::world::storage::Chunk;
    use std::cell::Cell;

    const STONE: VoxelId = VoxelId(1);
    const GLASS: VoxelId = VoxelId(2);

    struct Fixture {
        index: WorldIndex,
        chunks: ChunkLookup,
        registry: VoxelTypeRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let registry = VoxelTypeRegistry::new(
                vec![
                    VoxelType::empty(),
                    VoxelType::solid("stone", TextureOffset::ZERO),
                    VoxelType::solid("glass", TextureOffset::ZERO)
                        .with_transparency(Transparency::SemiTransparent),
                ],
                1,
            )
            .unwrap();
            let size = ChunkSize::cubic(8);
            let mut chunks = ChunkLookup::new(size);
            chunks.insert(Chunk::new(ChunkPos::new(0, 0, 0), size)).unwrap();
            let index =
                WorldIndex::new(size, Vector3::new(1.0, 1.0, 1.0), CellRounding::TiesToEven)
                    .unwrap();
            Self {
                index,
                chunks,
                registry,
            }
        }

        fn set(&mut self, x: i32, y: i32, z: i32, id: VoxelId) {
            self.chunks
                .set_voxel_at(&self.index, ChunkPos::new(0, 0, 0), VoxelIndex::new(x, y, z), id)
                .unwrap();
        }

        fn resolver(&self, max_punch_through: u32) -> VoxelRaycastResolver<'_> {
            VoxelRaycastResolver::new(&self.index, &self.chunks, &self.registry, max_punch_through)
        }

        fn caster(&self) -> GridRayCaster<'_> {
            GridRayCaster::new(&self.index, &self.chunks, &self.registry)
        }
    }

    /// Wraps a query and counts calls
    struct Counting<Q> {
        inner: Q,
        calls: Cell<u32>,
    }

    impl<Q: RayQuery> Counting<Q> {
        fn new(inner: Q) -> Self {
            Self {
                inner,
                calls: Cell::new(0),
            }
        }
    }

    impl<Q: RayQuery> RayQuery for Counting<Q> {
        fn cast(
            &self,
            origin: Point3<f32>,
            direction: Vector3<f32>,
            max_distance: f32,
        ) -> Option<RayHit> {
            self.calls.set(self.calls.get() + 1);
            self.inner.cast(origin, direction, max_distance)
        }
    }

    /// Always reports the same hit
    struct FixedHit(RayHit);

    impl RayQuery for FixedHit {
        fn cast(&self, _: Point3<f32>, _: Vector3<f32>, _: f32) -> Option<RayHit> {
            Some(self.0)
        }
    }

    fn top_face_hit(x: f32, y: f32, z: f32, surface: HitSurface) -> RayHit {
        RayHit {
            point: Point3::new(x, y + 0.5, z),
            normal: Vector3::new(0.0, 1.0, 0.0),
            distance: 1.0,
            surface,
        }
    }

    fn down() -> Vector3<f32> {
        Vector3::new(0.0, -1.0, 0.0)
    }

    #[test]
    fn test_miss_costs_one_query() {
        let fixture = Fixture::new();
        let query = Counting::new(fixture.caster());
        let outcome = fixture.resolver(16).raycast_traced(
            &query,
            Point3::new(3.0, 6.0, 3.0),
            down(),
            20.0,
            true,
        );
        assert!(matches!(outcome.terminal, RaycastState::Exhausted));
        assert_eq!(outcome.queries, 1);
        assert_eq!(query.calls.get(), 1);
    }

    #[test]
    fn test_opaque_hit_returns_voxel_and_adjacent() {
        let mut fixture = Fixture::new();
        fixture.set(3, 2, 3, STONE);
        let info = fixture
            .resolver(16)
            .raycast(&fixture.caster(), Point3::new(3.0, 6.0, 3.0), down(), 20.0, false)
            .unwrap();
        assert_eq!(info.chunk, ChunkPos::new(0, 0, 0));
        assert_eq!(info.index, VoxelIndex::new(3, 2, 3));
        assert_eq!(info.adjacent, VoxelIndex::new(3, 3, 3));
    }

    #[test]
    fn test_transparent_stack_costs_n_plus_one_queries() {
        for n in 0..5 {
            let mut fixture = Fixture::new();
            fixture.set(2, 0, 2, STONE);
            for y in 1..=n {
                fixture.set(2, y, 2, GLASS);
            }

            let query = Counting::new(fixture.caster());
            let outcome = fixture.resolver(16).raycast_traced(
                &query,
                Point3::new(2.0, 7.0, 2.0),
                down(),
                20.0,
                true,
            );
            let info = outcome.voxel_info().expect("stone should be hit");
            assert_eq!(info.index, VoxelIndex::new(2, 0, 2));
            assert_eq!(outcome.queries, n as u32 + 1);
            assert_eq!(query.calls.get(), n as u32 + 1);
        }
    }

    #[test]
    fn test_transparent_voxel_hit_when_not_ignoring() {
        let mut fixture = Fixture::new();
        fixture.set(2, 0, 2, STONE);
        fixture.set(2, 1, 2, GLASS);
        let info = fixture
            .resolver(16)
            .raycast(&fixture.caster(), Point3::new(2.0, 7.0, 2.0), down(), 20.0, false)
            .unwrap();
        assert_eq!(info.index, VoxelIndex::new(2, 1, 2));
    }

    #[test]
    fn test_punch_through_continues_straight_down() {
        let mut fixture = Fixture::new();
        fixture.set(2, 1, 2, GLASS);
        fixture.set(2, 0, 2, STONE);
        // Along the original diagonal the ray would reach this one next
        fixture.set(3, 1, 2, STONE);
        fixture.set(3, 0, 2, STONE);

        let info = fixture
            .resolver(16)
            .raycast(
                &fixture.caster(),
                Point3::new(0.2, 3.0, 2.0),
                Vector3::new(1.0, -1.0, 0.0),
                20.0,
                true,
            )
            .unwrap();
        assert_eq!(info.index, VoxelIndex::new(2, 0, 2));
        assert_eq!(info.adjacent, VoxelIndex::new(2, 1, 2));
    }

    #[test]
    fn test_range_is_reduced_by_travelled_distance() {
        let mut fixture = Fixture::new();
        fixture.set(2, 0, 2, STONE);
        fixture.set(2, 4, 2, GLASS);
        // Glass top at 4.5 is 2.5 away; stone top at 0.5 needs another 3.5
        let resolver = fixture.resolver(16);
        let origin = Point3::new(2.0, 7.0, 2.0);
        assert!(resolver
            .raycast(&fixture.caster(), origin, down(), 5.5, true)
            .is_none());
        assert!(resolver
            .raycast(&fixture.caster(), origin, down(), 6.5, true)
            .is_some());
    }

    #[test]
    fn test_zero_range_terminates_without_query() {
        let fixture = Fixture::new();
        let query = Counting::new(fixture.caster());
        for range in [0.0, -1.0, f32::NAN] {
            let outcome =
                fixture
                    .resolver(16)
                    .raycast_traced(&query, Point3::new(0.0, 5.0, 0.0), down(), range, true);
            assert!(matches!(outcome.terminal, RaycastState::Exhausted));
            assert_eq!(outcome.queries, 0);
        }
        assert_eq!(query.calls.get(), 0);
    }

    #[test]
    fn test_degenerate_direction() {
        let fixture = Fixture::new();
        let outcome = fixture.resolver(16).raycast_traced(
            &fixture.caster(),
            Point3::new(0.0, 5.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            10.0,
            true,
        );
        assert!(matches!(outcome.terminal, RaycastState::Exhausted));
        assert_eq!(outcome.queries, 0);
    }

    #[test]
    fn test_non_chunk_surface_rejected() {
        let fixture = Fixture::new();
        let query = FixedHit(top_face_hit(1.0, 1.0, 1.0, HitSurface::Other));
        let outcome =
            fixture
                .resolver(16)
                .raycast_traced(&query, Point3::new(1.0, 5.0, 1.0), down(), 10.0, true);
        assert!(matches!(
            outcome.terminal,
            RaycastState::Rejected(RejectReason::NonChunkSurface)
        ));
        assert_eq!(outcome.queries, 1);
    }

    #[test]
    fn test_mesh_container_resolves_to_parent_chunk() {
        let mut fixture = Fixture::new();
        fixture.set(1, 1, 1, STONE);
        let query = FixedHit(top_face_hit(
            1.0,
            1.0,
            1.0,
            HitSurface::MeshContainer {
                parent: ChunkPos::new(0, 0, 0),
            },
        ));
        let info = fixture
            .resolver(16)
            .raycast(&query, Point3::new(1.0, 5.0, 1.0), down(), 10.0, true)
            .unwrap();
        assert_eq!(info.chunk, ChunkPos::new(0, 0, 0));
        assert_eq!(info.index, VoxelIndex::new(1, 1, 1));
    }

    #[test]
    fn test_hit_on_missing_chunk_rejected() {
        let fixture = Fixture::new();
        let missing = ChunkPos::new(5, 0, 0);
        let query = FixedHit(top_face_hit(41.0, 1.0, 1.0, HitSurface::Chunk(missing)));
        let outcome =
            fixture
                .resolver(16)
                .raycast_traced(&query, Point3::new(41.0, 5.0, 1.0), down(), 10.0, false);
        assert!(matches!(
            outcome.terminal,
            RaycastState::Rejected(RejectReason::ChunkNotResident(pos)) if pos == missing
        ));
    }

    #[test]
    fn test_punch_through_step_limit() {
        let mut fixture = Fixture::new();
        fixture.set(1, 1, 1, GLASS);
        // A provider that keeps reporting the same glass voxel at zero distance
        let query = Counting::new(FixedHit(RayHit {
            distance: 0.0,
            ..top_face_hit(1.0, 1.0, 1.0, HitSurface::Chunk(ChunkPos::new(0, 0, 0)))
        }));
        let outcome =
            fixture
                .resolver(3)
                .raycast_traced(&query, Point3::new(1.0, 5.0, 1.0), down(), 10.0, true);
        assert!(matches!(outcome.terminal, RaycastState::Exhausted));
        assert_eq!(outcome.queries, 4);
    }

    #[test]
    fn test_ray_overload_matches_origin_direction() {
        let mut fixture = Fixture::new();
        fixture.set(4, 1, 4, VoxelId(1));
        fixture.set(4, 3, 4, VoxelId(2));
        let resolver = fixture.resolver(16);
        let caster = fixture.caster();

        let ray = Ray::new(Point3::new(4.0, 7.0, 4.0), Vector3::new(0.0, -3.0, 0.0));
        for ignore_transparent in [false, true] {
            assert_eq!(
                resolver.raycast_ray(&caster, &ray, 20.0, ignore_transparent),
                resolver.raycast(&caster, ray.origin, down(), 20.0, ignore_transparent)
            );
        }
        assert_eq!(
            resolver.raycast_ray(&caster, &ray, 20.0, true),
            Some(VoxelInfo {
                index: VoxelIndex::new(4, 1, 4),
                adjacent: VoxelIndex::new(4, 2, 4),
                chunk: ChunkPos::new(0, 0, 0),
            })
        );

        let degenerate = Ray::new(Point3::new(4.0, 7.0, 4.0), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(resolver.raycast_ray(&caster, &degenerate, 20.0, false), None);
    }
}
