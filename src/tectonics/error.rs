//! Plate error type.

use std::fmt;

use thiserror::Error;

use crate::geometry::PlateRect;

/// Public plate operations, used to annotate failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SetCrust,
    ContinentAt,
    AddCollision,
    CollisionInfo,
    ContinentArea,
    Collide,
    AggregateCrust,
    AddCrustByCollision,
    Subduct,
    Move,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SetCrust => "set_crust",
            Operation::ContinentAt => "continent_at",
            Operation::AddCollision => "add_collision",
            Operation::CollisionInfo => "collision_info",
            Operation::ContinentArea => "continent_area",
            Operation::Collide => "collide",
            Operation::AggregateCrust => "aggregate_crust",
            Operation::AddCrustByCollision => "add_crust_by_collision",
            Operation::Subduct => "subduct",
            Operation::Move => "move",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by plate construction and plate operations.
///
/// Everything except the construction variants means the plate's geometry
/// or bookkeeping is corrupt; callers should abort the simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlateError {
    #[error("Heightmap is empty")]
    EmptyHeightmap,
    #[error("Plate dimensions must be positive and fit the {world_width}x{world_height} world, got {width}x{height}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        world_width: usize,
        world_height: usize,
    },
    #[error("Heightmap has {actual} cells, expected {expected}")]
    HeightmapSize { expected: usize, actual: usize },
    #[error("Heightmap value {value} at cell {index} is not a finite number")]
    InvalidHeight { index: usize, value: f32 },
    #[error("Plate position ({left}, {top}) is outside the world")]
    OutsideWorld { left: f32, top: f32 },
    #[error("Point ({x}, {y}) is outside plate {bounds}")]
    OutOfBounds { x: usize, y: usize, bounds: PlateRect },
    #[error("Plate {bounds} cannot grow to contain ({x}, {y})")]
    GrowthExhausted { x: usize, y: usize, bounds: PlateRect },
    #[error("No continent could be resolved at ({x}, {y})")]
    UnresolvedContinent { x: usize, y: usize },
    #[error("{op} failed at ({x}, {y}): {source}")]
    Failed {
        op: Operation,
        x: usize,
        y: usize,
        #[source]
        source: Box<PlateError>,
    },
}

impl PlateError {
    /// Wraps this error with the operation and point it occurred at.
    pub fn during(self, op: Operation, x: usize, y: usize) -> Self {
        PlateError::Failed {
            op,
            x,
            y,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping operation annotations.
    pub fn root_cause(&self) -> &PlateError {
        match self {
            PlateError::Failed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
