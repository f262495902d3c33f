use log::debug;

use crate::renderer::software::wallsprite::VisibleSprite;

/// Index of a record in the frame arena, tagged with the frame it was
/// allocated in.  Handles from an earlier frame resolve to `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteHandle {
    index: u32,
    generation: u32,
}

/// Per-frame bump storage for visible-sprite records.
///
/// Records are never freed one by one; `reset` drops them all and bumps the
/// generation so stale handles stop resolving.  The backing `Vec` keeps its
/// capacity across frames.
#[derive(Default)]
pub struct FrameArena {
    records: Vec<VisibleSprite>,
    generation: u32,
}

impl FrameArena {
    pub fn alloc(&mut self, record: VisibleSprite) -> SpriteHandle {
        let index = self.records.len() as u32;
        self.records.push(record);
        SpriteHandle {
            index,
            generation: self.generation,
        }
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&VisibleSprite> {
        if handle.generation != self.generation {
            return None;
        }
        self.records.get(handle.index as usize)
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The frame's visible sprites plus the order the compositor draws them in.
///
/// Insertion order is kept as-is unless `sort_back_to_front` imposes a
/// depth order.
#[derive(Default)]
pub struct VisibleSpriteList {
    arena: FrameArena,
    order: Vec<SpriteHandle>,
}

impl VisibleSpriteList {
    pub fn push(&mut self, record: VisibleSprite) -> SpriteHandle {
        let handle = self.arena.alloc(record);
        self.order.push(handle);
        handle
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&VisibleSprite> {
        self.arena.get(handle)
    }

    /// Drop every record of the frame; call once after compositing.
    pub fn reset(&mut self) {
        debug!("visible sprite list reset ({} records)", self.arena.len());
        self.arena.reset();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn handles(&self) -> &[SpriteHandle] {
        &self.order
    }

    /// Records in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &VisibleSprite> + '_ {
        self.order.iter().filter_map(|&h| self.arena.get(h))
    }

    /// Farthest first (smallest `idepth`); ties keep insertion order.
    pub fn sort_back_to_front(&mut self) {
        let arena = &self.arena;
        self.order.sort_by(|&a, &b| {
            let da = arena.get(a).map_or(0.0, |s| s.idepth);
            let db = arena.get(b).map_or(0.0, |s| s.idepth);
            da.total_cmp(&db)
        });
    }
}
