use std::collections::HashMap;

use egui::{Context, TextureHandle, TextureId, TextureOptions};
use uuid::Uuid;

use crate::bitmap::Bitmap;

/// Uploads bitmaps to egui once and keeps the handles alive between frames.
///
/// Bitmaps are immutable, so the bitmap id alone is the cache key. Textures not
/// drawn in the previous frame are released when the next frame begins; above
/// that, eviction is least-recently-used by frame counter.
pub struct TextureManager {
    /// Cached textures by bitmap id
    texture_cache: HashMap<Uuid, TextureHandle>,
    /// Frame each texture was last drawn in
    last_used: HashMap<Uuid, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter and drops textures the last frame did not draw.
    /// Call once at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
        self.release_stale();
    }

    fn release_stale(&mut self) {
        let oldest_kept = self.current_frame.saturating_sub(1);
        let stale: Vec<Uuid> = self
            .last_used
            .iter()
            .filter(|(_, frame)| **frame < oldest_kept)
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            self.texture_cache.remove(id);
            self.last_used.remove(id);
        }
        if !stale.is_empty() {
            log::debug!("Released {} stale textures", stale.len());
        }
    }

    /// Returns the texture for `bitmap`, uploading it on first use.
    pub fn texture_for(&mut self, bitmap: &Bitmap, ctx: &Context) -> TextureId {
        let key = bitmap.id();

        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return handle.id();
        }

        self.prune_cache_if_needed();

        log::debug!(
            "Uploading texture for bitmap {} ({}x{})",
            key,
            bitmap.width(),
            bitmap.height()
        );
        let handle = ctx.load_texture(
            format!("bitmap_{key}"),
            bitmap.to_color_image(),
            TextureOptions::LINEAR,
        );
        let id = handle.id();
        self.texture_cache.insert(key, handle);
        self.last_used.insert(key, self.current_frame);
        id
    }

    pub fn invalidate(&mut self, bitmap_id: Uuid) {
        self.texture_cache.remove(&bitmap_id);
        self.last_used.remove(&bitmap_id);
    }

    /// Drops the oldest entries so one more texture fits under the limit.
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<(Uuid, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() + 1 - self.max_cache_size;
        for (id, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(id);
            self.last_used.remove(id);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn contains(&self, bitmap_id: Uuid) -> bool {
        self.texture_cache.contains_key(&bitmap_id)
    }
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(32)
    }
}
