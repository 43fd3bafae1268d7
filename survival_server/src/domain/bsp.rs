// Binary space partitioning of a building footprint into rooms.

use rand::Rng;

/// Room rectangle in building-local units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    #[cfg(test)]
    pub fn overlaps(&self, other: &Room) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

pub const MIN_ROOM_SIZE: i32 = 40;
pub const ROOM_PADDING: i32 = 10;
// Force a split along the long axis past this aspect ratio.
const MAX_ASPECT: f32 = 1.25;

#[derive(Debug, Clone)]
struct Node {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    children: Option<(usize, usize)>,
}

/// Arena-backed BSP tree; node 0 is the root.
#[derive(Debug, Clone)]
pub struct SpacePartitioner {
    nodes: Vec<Node>,
    min_room_size: i32,
    padding: i32,
}

impl SpacePartitioner {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            nodes: vec![Node {
                x: 0,
                y: 0,
                width,
                height,
                children: None,
            }],
            min_room_size: MIN_ROOM_SIZE,
            padding: ROOM_PADDING,
        }
    }

    /// Runs `splits` split attempts, each on a randomly chosen current leaf.
    pub fn partition<R: Rng + ?Sized>(mut self, splits: usize, rng: &mut R) -> Self {
        let mut leaves = vec![0usize];
        for _ in 0..splits {
            let pick = rng.gen_range(0..leaves.len());
            let node = leaves[pick];
            if let Some((left, right)) = self.split(node, rng) {
                leaves.swap_remove(pick);
                leaves.push(left);
                leaves.push(right);
            }
        }
        self
    }

    /// Bisects a leaf; `None` when it is already split or too small.
    pub fn split<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Option<(usize, usize)> {
        let node = self.nodes.get(index)?.clone();
        if node.children.is_some() || node.width <= 0 || node.height <= 0 {
            return None;
        }

        let mut horizontal = rng.gen_bool(0.5);
        let (w, h) = (node.width as f32, node.height as f32);
        if w > h && w / h >= MAX_ASPECT {
            horizontal = false;
        } else if h > w && h / w >= MAX_ASPECT {
            horizontal = true;
        }

        let span = if horizontal { node.height } else { node.width };
        let max = span - self.min_room_size;
        if max <= self.min_room_size {
            return None;
        }
        let offset = rng.gen_range(self.min_room_size..max);

        let (first, second) = if horizontal {
            (
                Node {
                    height: offset,
                    children: None,
                    ..node
                },
                Node {
                    y: node.y + offset,
                    height: node.height - offset,
                    children: None,
                    ..node
                },
            )
        } else {
            (
                Node {
                    width: offset,
                    children: None,
                    ..node
                },
                Node {
                    x: node.x + offset,
                    width: node.width - offset,
                    children: None,
                    ..node
                },
            )
        };

        let left = self.nodes.len();
        self.nodes.push(first);
        self.nodes.push(second);
        self.nodes[index].children = Some((left, left + 1));
        Some((left, left + 1))
    }

    /// Leaf node indices, depth first, left child before right.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            match self.nodes[index].children {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => out.push(index),
            }
        }
        out
    }

    /// One padded room per leaf, in leaf order.
    pub fn rooms(&self) -> Vec<Room> {
        self.leaves()
            .into_iter()
            .map(|index| {
                let node = &self.nodes[index];
                // Tiny partitions shrink the padding instead of producing empty rooms.
                let pad_x = self.padding.min((node.width - 1).max(0) / 2);
                let pad_y = self.padding.min((node.height - 1).max(0) / 2);
                Room {
                    x: node.x + pad_x,
                    y: node.y + pad_y,
                    width: (node.width - pad_x * 2).max(1),
                    height: (node.height - pad_y * 2).max(1),
                }
            })
            .collect()
    }
}
