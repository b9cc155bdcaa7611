//! Work queues for the two relaxation passes.

use std::collections::VecDeque;

use voxlight_core::{BlockPos, MAX_LIGHT};

/// Frontier entry: a position and the light level it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightNode {
    pub pos: BlockPos,
    pub level: u8,
}

/// FIFO frontier for the decrease pass.
///
/// Each entry carries the light the position held *before* it was cleared.
#[derive(Debug, Default)]
pub struct DecreaseFrontier {
    queue: VecDeque<LightNode>,
}

impl DecreaseFrontier {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(256),
        }
    }

    pub fn push(&mut self, pos: BlockPos, old_level: u8) {
        self.queue.push_back(LightNode {
            pos,
            level: old_level,
        });
    }

    pub fn pop(&mut self) -> Option<LightNode> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Priority frontier for the increase pass, popping the brightest candidate
/// first.
///
/// Levels are bounded by `MAX_LIGHT`, so one bucket per level replaces a
/// heap. `top` is an upper bound on the highest non-empty bucket.
#[derive(Debug)]
pub struct IncreaseFrontier {
    buckets: [Vec<BlockPos>; MAX_LIGHT as usize + 1],
    top: usize,
    len: usize,
}

impl Default for IncreaseFrontier {
    fn default() -> Self {
        Self::new()
    }
}

impl IncreaseFrontier {
    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            top: 0,
            len: 0,
        }
    }

    /// Queue `pos` with a candidate level. Zero-level candidates can raise
    /// nothing and are ignored; levels above `MAX_LIGHT` are clamped.
    pub fn push(&mut self, pos: BlockPos, level: u8) {
        if level == 0 {
            return;
        }
        let level = level.min(MAX_LIGHT) as usize;
        self.buckets[level].push(pos);
        self.top = self.top.max(level);
        self.len += 1;
    }

    /// Remove a candidate with the highest level.
    pub fn pop(&mut self) -> Option<LightNode> {
        while self.len > 0 {
            if let Some(pos) = self.buckets[self.top].pop() {
                self.len -= 1;
                return Some(LightNode {
                    pos,
                    level: self.top as u8,
                });
            }
            if self.top == 0 {
                break;
            }
            self.top -= 1;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32) -> BlockPos {
        BlockPos::new(x, 0, 0)
    }

    #[test]
    fn decrease_frontier_is_fifo() {
        let mut frontier = DecreaseFrontier::new();
        frontier.push(p(1), 9);
        frontier.push(p(2), 3);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop(), Some(LightNode { pos: p(1), level: 9 }));
        assert_eq!(frontier.pop(), Some(LightNode { pos: p(2), level: 3 }));
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn increase_frontier_pops_brightest_first() {
        let mut frontier = IncreaseFrontier::new();
        frontier.push(p(0), 4);
        frontier.push(p(1), 14);
        frontier.push(p(2), 9);
        frontier.push(p(3), 0);
        assert_eq!(frontier.len(), 3);

        let levels: Vec<u8> = std::iter::from_fn(|| frontier.pop())
            .map(|node| node.level)
            .collect();
        assert_eq!(levels, vec![14, 9, 4]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn increase_frontier_accepts_pushes_while_draining() {
        let mut frontier = IncreaseFrontier::new();
        frontier.push(p(0), 10);
        let first = frontier.pop().unwrap();
        frontier.push(p(1), first.level - 1);
        frontier.push(p(2), 12);
        assert_eq!(frontier.pop().unwrap().level, 12);
        assert_eq!(frontier.pop().unwrap().level, 9);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn increase_frontier_clamps_to_max_light() {
        let mut frontier = IncreaseFrontier::new();
        frontier.push(p(0), 200);
        assert_eq!(frontier.pop().unwrap().level, MAX_LIGHT);
    }
}
