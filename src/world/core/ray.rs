use super::ChunkPos;
use cgmath::{InnerSpace, Point3, Vector3};

/// A ray with a unit direction. A zero direction normalizes to NaN, which
/// raycasts treat as a miss.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

/// Side of a voxel. The ordinal selects the texture in a voxel type's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up = 0,      // +Y
    Down = 1,    // -Y
    Right = 2,   // +X
    Left = 3,    // -X
    Forward = 4, // +Z
    Back = 5,    // -Z
}

impl Facing {
    pub const ALL: [Facing; 6] = [
        Facing::Up,
        Facing::Down,
        Facing::Right,
        Facing::Left,
        Facing::Forward,
        Facing::Back,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn normal(&self) -> Vector3<f32> {
        match self {
            Facing::Up => Vector3::new(0.0, 1.0, 0.0),
            Facing::Down => Vector3::new(0.0, -1.0, 0.0),
            Facing::Right => Vector3::new(1.0, 0.0, 0.0),
            Facing::Left => Vector3::new(-1.0, 0.0, 0.0),
            Facing::Forward => Vector3::new(0.0, 0.0, 1.0),
            Facing::Back => Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Facing whose normal is closest to `normal` (dominant axis wins,
    /// ties resolve in x, y, z order). Returns `None` for a zero or
    /// non-finite vector.
    pub fn from_normal(normal: Vector3<f32>) -> Option<Facing> {
        let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
        if !(ax.is_finite() && ay.is_finite() && az.is_finite()) {
            return None;
        }
        if ax == 0.0 && ay == 0.0 && az == 0.0 {
            return None;
        }

        let facing = if ax >= ay && ax >= az {
            if normal.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if ay >= az {
            if normal.y > 0.0 {
                Facing::Up
            } else {
                Facing::Down
            }
        } else if normal.z > 0.0 {
            Facing::Forward
        } else {
            Facing::Back
        };
        Some(facing)
    }
}

/// What a ray query struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSurface {
    /// A chunk's own collider
    Chunk(ChunkPos),
    /// A mesh container child object; the owning chunk is its parent
    MeshContainer { parent: ChunkPos },
    /// Any geometry that is not chunk terrain
    Other,
}

impl HitSurface {
    /// Owning chunk, if the surface belongs to chunk geometry
    pub fn chunk(&self) -> Option<ChunkPos> {
        match *self {
            HitSurface::Chunk(pos) => Some(pos),
            HitSurface::MeshContainer { parent } => Some(parent),
            HitSurface::Other => None,
        }
    }
}

/// Geometric result of a single ray query
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
    pub distance: f32,
    pub surface: HitSurface,
}

/// Collision query supplied by the host (physics engine, grid walker, ...).
///
/// Implementations return the nearest hit within `max_distance` along
/// `direction` from `origin`, ignoring any collider that contains `origin`.
pub trait RayQuery {
    fn cast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit>;
}

impl<T: RayQuery + ?Sized> RayQuery for &T {
    fn cast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance)
    }
}
