//! Binary space partitioning of the map into room rectangles
//!
//! Rectangles are split breadth-first so the target count is reached with
//! partitions of similar size rather than one deep corner of tiny rooms.

use std::collections::VecDeque;

use tracing::debug;

use crate::geom::Rect;
use crate::rng::DungeonRng;

/// Split `root` into at most `target` non-overlapping rectangles
///
/// A rectangle whose sides are both below `2 * min_size` is final. Otherwise it
/// is cut across its longer side (a square is cut along x) at a position drawn
/// from `min_size..=side - min_size`, so both halves keep at least `min_size`.
/// Splitting stops as soon as final plus queued rectangles reach `target`;
/// anything still queued then becomes a room as-is.
pub fn partition(root: Rect, min_size: i32, target: usize, rng: &mut DungeonRng) -> Vec<Rect> {
    let mut queue = VecDeque::from([root]);
    // `target` comes straight from the config and may be huge
    let mut rooms = Vec::new();

    while rooms.len() + queue.len() < target {
        let Some(rect) = queue.pop_front() else {
            break;
        };

        match split(rect, min_size, rng) {
            Some((first, second)) => {
                queue.push_back(first);
                queue.push_back(second);
            }
            None => rooms.push(rect),
        }
    }

    while rooms.len() < target {
        let Some(rect) = queue.pop_front() else {
            break;
        };
        rooms.push(rect);
    }

    debug!(
        requested = target,
        produced = rooms.len(),
        root = %root,
        "partitioned map"
    );
    rooms
}

/// Cut one rectangle in two, or `None` if it is too small to split
fn split(rect: Rect, min_size: i32, rng: &mut DungeonRng) -> Option<(Rect, Rect)> {
    let threshold = min_size * 2;
    if rect.width < threshold && rect.height < threshold {
        return None;
    }

    if rect.width >= rect.height {
        let cut = rng.range_inclusive(min_size, rect.width - min_size);
        let left = Rect::new(rect.x, rect.y, cut, rect.height);
        let right = Rect::new(rect.x + cut, rect.y, rect.width - cut, rect.height);
        Some((left, right))
    } else {
        let cut = rng.range_inclusive(min_size, rect.height - min_size);
        let bottom = Rect::new(rect.x, rect.y, rect.width, cut);
        let top = Rect::new(rect.x, rect.y + cut, rect.width, rect.height - cut);
        Some((bottom, top))
    }
}
