use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::engine::render::AssetLoader;

/// Decoded slide images plus their GPU textures.
///
/// Navigation decodes the current slide's images and those of its
/// neighbours; textures are uploaded lazily the first time a frame draws
/// them. Images that fail to load are remembered as missing so they are not
/// retried every frame.
pub struct ImageCache {
    base_path: PathBuf,
    slide_images: Vec<Vec<PathBuf>>,
    decoded: HashMap<PathBuf, Option<egui::ColorImage>>,
    textures: RefCell<HashMap<PathBuf, egui::TextureHandle>>,
}

impl ImageCache {
    /// `slide_images[i]` lists every image slide `i` can show.
    pub fn new(base_path: PathBuf, slide_images: Vec<Vec<PathBuf>>) -> Self {
        Self {
            base_path,
            slide_images,
            decoded: HashMap::new(),
            textures: RefCell::new(HashMap::new()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_path.join(p)
        }
    }

    fn decode(&mut self, path: &Path) {
        if self.decoded.contains_key(path) {
            return;
        }
        let image = match image::open(path) {
            Ok(img) => {
                let rgba = img.into_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                tracing::debug!(path = %path.display(), ?size, "decoded image");
                Some(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot load image: {e}");
                None
            }
        };
        self.decoded.insert(path.to_path_buf(), image);
    }

    fn decode_slide(&mut self, slide: usize) {
        let paths = self.slide_images.get(slide).cloned().unwrap_or_default();
        for path in paths {
            self.decode(&path);
        }
    }

    /// Texture for `path` as written in the deck, or `None` when the image
    /// is missing or not decoded yet.
    pub fn get_or_load(&self, ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        let resolved = self.resolve(path);
        if let Some(texture) = self.textures.borrow().get(&resolved) {
            return Some(texture.clone());
        }
        let image = self.decoded.get(&resolved)?.as_ref()?;
        let texture = ctx.load_texture(
            resolved.to_string_lossy(),
            image.clone(),
            egui::TextureOptions::LINEAR,
        );
        self.textures
            .borrow_mut()
            .insert(resolved, texture.clone());
        Some(texture)
    }

    #[cfg(test)]
    pub fn is_decoded(&self, path: &Path) -> bool {
        self.decoded.contains_key(path)
    }
}

impl AssetLoader for ImageCache {
    fn load_for_slide(&mut self, slide: usize) {
        self.decode_slide(slide);
    }

    fn preload_adjacent(&mut self, prev: usize, next: usize) {
        self.decode_slide(prev);
        self.decode_slide(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_slide_and_neighbours_only() {
        let dir = tempfile::tempdir().expect("temp dir");
        let png = dir.path().join("dot.png");
        image::RgbaImage::new(2, 2).save(&png).expect("write png");
        let missing = dir.path().join("missing.png");

        let mut cache = ImageCache::new(
            dir.path().to_path_buf(),
            vec![vec![png.clone()], vec![], vec![missing.clone()], vec![]],
        );
        cache.load_for_slide(1);
        cache.preload_adjacent(0, 2);
        assert!(cache.is_decoded(&png));
        assert!(cache.is_decoded(&missing));
        assert!(cache.decoded[&missing].is_none());

        let mut fresh = ImageCache::new(dir.path().to_path_buf(), vec![vec![png.clone()]]);
        fresh.load_for_slide(3);
        assert!(!fresh.is_decoded(&png));
    }
}
