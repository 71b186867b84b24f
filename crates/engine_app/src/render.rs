//! Text renderer.
//!
//! Reads the render system's membership set between ticks and rasterises
//! each member's [`Sprite`] at its [`Position`] into a character grid. It
//! only reads the world.

use engine_ecs::{Ecs, SystemId};

use crate::components::{Position, Sprite};

/// A fixed-size character canvas.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

/// Draw every entity in `render_system`'s membership set.
///
/// Entities outside the viewport are clipped. When two sprites land on the
/// same cell, the one with the higher entity ID wins.
#[must_use]
pub fn render_frame(ecs: &Ecs, render_system: SystemId, viewport: Viewport) -> String {
    let mut grid = vec![vec!['.'; viewport.width]; viewport.height];

    let world = ecs.world();
    for &entity in ecs.matching_entities(render_system).into_iter().flatten() {
        let (Some(position), Some(sprite)) = (
            world.component::<Position>(entity),
            world.component::<Sprite>(entity),
        ) else {
            continue;
        };
        let (x, y) = (position.0.x.floor(), position.0.y.floor());
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (col, row) = (x as usize, y as usize);
        if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = sprite.glyph;
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
