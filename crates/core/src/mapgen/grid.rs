//! Grid and tile-space primitives used by carving, reachability and stair placement.

use crate::types::Pos;

pub(super) fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub(super) fn cardinal_neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
}

/// Tiles on the Bresenham line from `start` to `end`, both endpoints included.
pub fn bresenham_line(start: Pos, end: Pos) -> Vec<Pos> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let step_x = if start.x < end.x { 1 } else { -1 };
    let step_y = if start.y < end.y { 1 } else { -1 };

    let mut line = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let mut current = start;
    let mut error = dx + dy;
    loop {
        line.push(current);
        if current == end {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            current.x += step_x;
        }
        if doubled <= dx {
            error += dx;
            current.y += step_y;
        }
    }
    line
}

/// Farthest candidate from `origin`, ties broken towards the larger `(y, x)`.
pub(super) fn farthest_from<'a>(origin: Pos, candidates: impl IntoIterator<Item = &'a Pos>) -> Pos {
    let mut best = origin;
    let mut best_distance = 0_u32;
    for &pos in candidates {
        let distance = manhattan(origin, pos);
        if distance > best_distance || (distance == best_distance && (pos.y, pos.x) > (best.y, best.x))
        {
            best = pos;
            best_distance = distance;
        }
    }
    best
}
