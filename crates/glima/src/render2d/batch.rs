//! # SpriteBatch — Collect, Sort, Merge, Upload
//!
//! The CPU-side heart of the renderer. Each frame:
//!
//! 1. `begin(policy)` clears the previous frame's lists.
//! 2. `draw(...)` calls append glyphs — O(1) amortized, no GPU work, so a
//!    frame can submit arbitrarily many quads without stalling.
//! 3. `end()` stable-sorts an index view over the glyphs, merges adjacent
//!    same-texture runs into [`RenderBatch`]es in one linear pass, and
//!    expands every glyph into six vertices in sorted order.
//! 4. `upload()` replaces the persistent GPU vertex buffer's contents with
//!    the frame's vertex array in a single bulk transfer.
//!
//! ## Sorting
//!
//! The sort reorders a `Vec<u32>` of indices, never the glyph storage
//! itself, so nothing dangles if the store is observed elsewhere. All three
//! policies use a *stable* sort: glyphs with equal keys keep their
//! submission order, which makes "last submitted draws on top" hold
//! deterministically for same-depth or same-texture sprites.
//!
//! ## Batch merging
//!
//! One walk over the sorted view. A glyph whose texture matches the previous
//! glyph's extends the current batch by six vertices; any texture change
//! closes the batch and opens a new one at the current offset. Batch count
//! is therefore the number of adjacent texture transitions plus one (zero
//! for an empty frame), and every batch's vertex count is a multiple of six.
//!
//! ## Buffer lifecycle
//!
//! The GPU buffer is created lazily, persists across frames, and only grows
//! (doubling) when a frame needs more room. `Queue::write_buffer` stages the
//! copy and orders it before the next submission, so the previous frame's
//! in-flight render never observes a partial write — the same guarantee GL
//! code gets from orphaning the buffer before rewriting it.

use glam::Vec2;

use super::glyph::{Glyph, Rect};
use super::texture::TextureHandle;
use super::vertex::SpriteVertex;
use super::Color;

/// How `end()` orders the frame's glyphs. A closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    /// Ascending depth.
    FrontToBack,
    /// Descending depth (painter's algorithm).
    BackToFront,
    /// Ascending texture handle — maximizes batch merging.
    #[default]
    Texture,
}

/// One draw call's worth of quads: a contiguous range of the frame's vertex
/// buffer sharing a single texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBatch {
    pub texture: TextureHandle,
    /// First vertex in the shared buffer.
    pub vertex_offset: u32,
    /// Always a multiple of 6.
    pub vertex_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchState {
    Idle,
    Accumulating,
    Ended,
}

/// Collects a frame's quads and turns them into render batches plus one
/// contiguous GPU vertex buffer.
///
/// Lifecycle: `begin → draw* → end → upload → render`, repeated each frame.
/// Calling out of order is a programming error and panics with a message
/// naming the violated precondition.
pub struct SpriteBatch {
    glyphs: Vec<Glyph>,
    /// Reorderable view over `glyphs`; stable indices, not pointers, so the
    /// sort can never dangle into reallocated storage.
    order: Vec<u32>,
    vertices: Vec<SpriteVertex>,
    batches: Vec<RenderBatch>,
    policy: SortPolicy,
    state: BatchState,
    buffer: Option<wgpu::Buffer>,
    buffer_capacity: u64,
}

impl SpriteBatch {
    /// Create an empty batch. No GPU resources are allocated until the
    /// first [`upload`](Self::upload).
    pub fn new() -> Self {
        Self {
            glyphs: Vec::new(),
            order: Vec::new(),
            vertices: Vec::new(),
            batches: Vec::new(),
            policy: SortPolicy::default(),
            state: BatchState::Idle,
            buffer: None,
            buffer_capacity: 0,
        }
    }

    /// Start a new frame: discard the previous frame's glyphs and batches
    /// and record the sort policy.
    pub fn begin(&mut self, policy: SortPolicy) {
        assert!(
            self.state != BatchState::Accumulating,
            "SpriteBatch::begin called twice without end"
        );
        self.policy = policy;
        self.glyphs.clear();
        self.order.clear();
        self.vertices.clear();
        self.batches.clear();
        self.state = BatchState::Accumulating;
    }

    /// Queue one axis-aligned quad.
    pub fn draw(
        &mut self,
        dest: Rect,
        uv: Rect,
        texture: TextureHandle,
        depth: f32,
        color: Color,
    ) {
        self.push(Glyph::new(dest, uv, texture, depth, color));
    }

    /// Queue one quad rotated by `angle` radians around its center.
    pub fn draw_rotated(
        &mut self,
        dest: Rect,
        uv: Rect,
        texture: TextureHandle,
        depth: f32,
        color: Color,
        angle: f32,
    ) {
        self.push(Glyph::rotated(dest, uv, texture, depth, color, angle));
    }

    /// Queue one quad rotated to face `dir` (see [`Glyph::with_direction`]
    /// for the sign convention).
    pub fn draw_with_direction(
        &mut self,
        dest: Rect,
        uv: Rect,
        texture: TextureHandle,
        depth: f32,
        color: Color,
        dir: Vec2,
    ) {
        self.push(Glyph::with_direction(dest, uv, texture, depth, color, dir));
    }

    fn push(&mut self, glyph: Glyph) {
        assert!(
            self.state == BatchState::Accumulating,
            "SpriteBatch::draw called outside begin/end"
        );
        self.glyphs.push(glyph);
    }

    /// Finalize the frame: sort, merge into batches, expand vertices.
    ///
    /// Pure CPU work; pair with [`upload`](Self::upload) before rendering.
    pub fn end(&mut self) {
        match self.state {
            BatchState::Accumulating => {}
            BatchState::Idle => panic!("SpriteBatch::end called without begin"),
            BatchState::Ended => panic!("SpriteBatch::end called twice without begin"),
        }
        self.state = BatchState::Ended;

        self.order.clear();
        self.order.extend(0..self.glyphs.len() as u32);
        self.sort_glyphs();
        self.build_batches();
    }

    fn sort_glyphs(&mut self) {
        let glyphs = &self.glyphs;
        match self.policy {
            SortPolicy::FrontToBack => self.order.sort_by(|&a, &b| {
                glyphs[a as usize]
                    .depth
                    .partial_cmp(&glyphs[b as usize].depth)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortPolicy::BackToFront => self.order.sort_by(|&a, &b| {
                glyphs[b as usize]
                    .depth
                    .partial_cmp(&glyphs[a as usize].depth)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortPolicy::Texture => self
                .order
                .sort_by_key(|&i| glyphs[i as usize].texture),
        }
    }

    /// Single linear pass over the sorted view: merge adjacent same-texture
    /// glyphs and emit the expanded vertex array in sorted order.
    fn build_batches(&mut self) {
        self.vertices.reserve(self.glyphs.len() * 6);

        let mut offset = 0u32;
        for &i in &self.order {
            let glyph = &self.glyphs[i as usize];

            match self.batches.last_mut() {
                Some(last) if last.texture == glyph.texture => last.vertex_count += 6,
                _ => self.batches.push(RenderBatch {
                    texture: glyph.texture,
                    vertex_offset: offset,
                    vertex_count: 6,
                }),
            }
            offset += 6;

            // Two triangles: (TL, BL, BR) and (BR, TR, TL).
            self.vertices.push(glyph.top_left);
            self.vertices.push(glyph.bottom_left);
            self.vertices.push(glyph.bottom_right);
            self.vertices.push(glyph.bottom_right);
            self.vertices.push(glyph.top_right);
            self.vertices.push(glyph.top_left);
        }
    }

    /// Replace the GPU buffer's contents with this frame's vertices in one
    /// bulk transfer. Must follow [`end`](Self::end); a no-op for an empty
    /// frame. The buffer persists across frames and grows by doubling.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        assert!(
            self.state == BatchState::Ended,
            "SpriteBatch::upload called before end"
        );
        if self.vertices.is_empty() {
            return;
        }

        let needed = (self.vertices.len() * std::mem::size_of::<SpriteVertex>()) as u64;
        if self.buffer.is_none() || self.buffer_capacity < needed {
            let capacity = needed.next_power_of_two();
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("sprite batch vertex buffer"),
                size: capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.buffer_capacity = capacity;
        }

        // write_buffer stages the copy; the previous frame's draw can never
        // read a partially written buffer.
        let buffer = self.buffer.as_ref().unwrap();
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&self.vertices));
    }

    /// The finalized batch list, in draw order. Valid after [`end`](Self::end).
    pub fn batches(&self) -> &[RenderBatch] {
        assert!(
            self.state == BatchState::Ended,
            "SpriteBatch::batches queried before end"
        );
        &self.batches
    }

    /// The expanded vertex stream, in batch order. Valid after `end`.
    pub fn vertices(&self) -> &[SpriteVertex] {
        assert!(
            self.state == BatchState::Ended,
            "SpriteBatch::vertices queried before end"
        );
        &self.vertices
    }

    /// The persistent GPU vertex buffer, if any frame has uploaded yet.
    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Number of glyphs queued this frame.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: TextureHandle = TextureHandle(1);
    const B: TextureHandle = TextureHandle(2);
    const C: TextureHandle = TextureHandle(3);

    fn quad(batch: &mut SpriteBatch, texture: TextureHandle, depth: f32, tag: u8) {
        // Encode a submission tag in the red channel so stability is
        // observable in the output stream.
        batch.draw(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::FULL_UV,
            texture,
            depth,
            Color::rgba(tag, 0, 0, 255),
        );
    }

    fn total_vertices(batch: &SpriteBatch) -> u32 {
        batch.batches().iter().map(|b| b.vertex_count).sum()
    }

    #[test]
    fn empty_frame_produces_no_batches() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        batch.end();
        assert!(batch.batches().is_empty());
        assert!(batch.vertices().is_empty());
        // No upload has happened, so no GPU buffer exists either.
        assert!(batch.vertex_buffer().is_none());
    }

    #[test]
    fn vertex_count_is_six_per_glyph() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        for i in 0..7 {
            quad(&mut batch, if i % 2 == 0 { A } else { B }, i as f32, i);
        }
        batch.end();
        assert_eq!(total_vertices(&batch), 42);
        assert_eq!(batch.vertices().len(), 42);
    }

    #[test]
    fn same_texture_merges_into_one_batch() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::FrontToBack);
        quad(&mut batch, A, 0.0, 0);
        quad(&mut batch, A, 0.0, 1);
        quad(&mut batch, A, 0.0, 2);
        batch.end();
        let batches = batch.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].vertex_count, 18);
        assert_eq!(batches[0].vertex_offset, 0);
        assert_eq!(batches[0].texture, A);
    }

    #[test]
    fn adjacency_break_splits_batches() {
        // A, B, A at equal depth under FrontToBack: the stable sort keeps
        // submission order, so B breaks adjacency and A does not remerge.
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::FrontToBack);
        quad(&mut batch, A, 1.0, 0);
        quad(&mut batch, B, 1.0, 1);
        quad(&mut batch, A, 1.0, 2);
        batch.end();
        let batches = batch.batches();
        assert_eq!(batches.len(), 3);
        for b in batches {
            assert_eq!(b.vertex_count, 6);
        }
        assert_eq!(batches[0].texture, A);
        assert_eq!(batches[1].texture, B);
        assert_eq!(batches[2].texture, A);
        assert_eq!(batches[1].vertex_offset, 6);
        assert_eq!(batches[2].vertex_offset, 12);
    }

    #[test]
    fn by_texture_sort_regroups_split_textures() {
        // Same A, B, A submission under the Texture policy: both A glyphs
        // become adjacent and merge, leaving two batches.
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        quad(&mut batch, A, 1.0, 0);
        quad(&mut batch, B, 2.0, 1);
        quad(&mut batch, A, 3.0, 2);
        batch.end();
        let batches = batch.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].texture, A);
        assert_eq!(batches[0].vertex_count, 12);
        assert_eq!(batches[1].texture, B);
        assert_eq!(batches[1].vertex_count, 6);
    }

    #[test]
    fn batch_count_is_transitions_plus_one() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::FrontToBack);
        // Equal depths, so sorted order == submission order.
        for (i, &tex) in [A, A, B, C, C, C, A].iter().enumerate() {
            quad(&mut batch, tex, 0.0, i as u8);
        }
        batch.end();
        // Transitions: A→B, B→C, C→A = 3, plus one.
        assert_eq!(batch.batches().len(), 4);
        assert_eq!(total_vertices(&batch), 42);
    }

    #[test]
    fn front_to_back_sorts_ascending_depth() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::FrontToBack);
        quad(&mut batch, A, 3.0, 0);
        quad(&mut batch, A, 1.0, 1);
        quad(&mut batch, A, 2.0, 2);
        batch.end();
        // Tags come out in depth order 1.0, 2.0, 3.0.
        let tags: Vec<u8> = batch.vertices().iter().step_by(6).map(|v| v.color[0]).collect();
        assert_eq!(tags, vec![1, 2, 0]);
    }

    #[test]
    fn back_to_front_sorts_descending_depth() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::BackToFront);
        quad(&mut batch, A, 3.0, 0);
        quad(&mut batch, A, 1.0, 1);
        quad(&mut batch, A, 2.0, 2);
        batch.end();
        let tags: Vec<u8> = batch.vertices().iter().step_by(6).map(|v| v.color[0]).collect();
        assert_eq!(tags, vec![0, 2, 1]);
    }

    #[test]
    fn equal_keys_keep_submission_order() {
        for policy in [SortPolicy::FrontToBack, SortPolicy::BackToFront, SortPolicy::Texture] {
            let mut batch = SpriteBatch::new();
            batch.begin(policy);
            for tag in 0..8 {
                quad(&mut batch, A, 5.0, tag);
            }
            batch.end();
            let tags: Vec<u8> =
                batch.vertices().iter().step_by(6).map(|v| v.color[0]).collect();
            assert_eq!(tags, (0..8).collect::<Vec<u8>>(), "policy {policy:?}");
        }
    }

    #[test]
    fn texture_sort_is_stable_within_handle() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        quad(&mut batch, B, 0.0, 0);
        quad(&mut batch, A, 0.0, 1);
        quad(&mut batch, B, 0.0, 2);
        quad(&mut batch, A, 0.0, 3);
        batch.end();
        let tags: Vec<u8> = batch.vertices().iter().step_by(6).map(|v| v.color[0]).collect();
        // A glyphs first (in submission order), then B glyphs.
        assert_eq!(tags, vec![1, 3, 0, 2]);
        assert_eq!(batch.batches().len(), 2);
    }

    #[test]
    fn vertex_stream_triangulation_order() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        batch.draw(Rect::new(0.0, 0.0, 2.0, 2.0), Rect::FULL_UV, A, 0.0, Color::WHITE);
        batch.end();
        let v = batch.vertices();
        // (TL, BL, BR) then (BR, TR, TL)
        assert_eq!(v[0].position, [0.0, 2.0]);
        assert_eq!(v[1].position, [0.0, 0.0]);
        assert_eq!(v[2].position, [2.0, 0.0]);
        assert_eq!(v[3].position, [2.0, 0.0]);
        assert_eq!(v[4].position, [2.0, 2.0]);
        assert_eq!(v[5].position, [0.0, 2.0]);
    }

    #[test]
    fn begin_resets_previous_frame() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        quad(&mut batch, A, 0.0, 0);
        quad(&mut batch, B, 0.0, 1);
        batch.end();
        assert_eq!(batch.batches().len(), 2);

        batch.begin(SortPolicy::Texture);
        quad(&mut batch, C, 0.0, 0);
        batch.end();
        assert_eq!(batch.batches().len(), 1);
        assert_eq!(batch.batches()[0].texture, C);
        assert_eq!(batch.vertices().len(), 6);
    }

    #[test]
    #[should_panic(expected = "draw called outside begin")]
    fn draw_before_begin_panics() {
        let mut batch = SpriteBatch::new();
        quad(&mut batch, A, 0.0, 0);
    }

    #[test]
    #[should_panic(expected = "end called without begin")]
    fn end_without_begin_panics() {
        let mut batch = SpriteBatch::new();
        batch.end();
    }

    #[test]
    #[should_panic(expected = "end called twice")]
    fn double_end_panics() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        batch.end();
        batch.end();
    }

    #[test]
    #[should_panic(expected = "begin called twice")]
    fn double_begin_panics() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortPolicy::Texture);
        batch.begin(SortPolicy::Texture);
    }
}
