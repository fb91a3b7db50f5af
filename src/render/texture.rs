//! Repository of textures referenced by triangle styles.
//!
//! Faces store a `TextureId`; the bank owns the pixels. Id **0** is
//! always the checkerboard fallback.

use std::collections::HashMap;

use super::color::{Rgba, rgb};

/// Runtime handle for a texture in this bank, stable for the bank's
/// lifetime.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side 0x00RRGGBB pixels in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

impl Texture {
    /// Sample at texture-space (u, v) in [0, 1], clamped at the borders.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let x = (u.clamp(0.0, 1.0) * (self.w - 1) as f32).round() as usize;
        let y = (v.clamp(0.0, 1.0) * (self.h - 1) as f32).round() as usize;
        self.pixels[y * self.w + x]
    }
}

/// Convenience checkerboard 8x8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = rgb(0xC0, 0xC0, 0xC0);
        const DARK: Rgba = rgb(0x40, 0x40, 0x40);
        let mut pix = vec![0; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// One copy of every named texture; lookups by id are infallible for ids
/// the bank handed out.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("CHECKER".into(), NO_TEXTURE);
        TextureBank {
            by_name,
            data: vec![Texture::default()],
        }
    }
}

impl TextureBank {
    pub fn insert(&mut self, name: String, tex: Texture) -> Result<TextureId, TextureError> {
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.by_name.insert(name, id);
        self.data.push(tex);
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Unknown ids resolve to the checkerboard fallback.
    pub fn get(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.data[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_is_rejected() {
        let mut bank = TextureBank::default();
        let tex = Texture::default();
        bank.insert("wall".into(), tex.clone()).unwrap();
        assert_eq!(
            bank.insert("wall".into(), tex),
            Err(TextureError::Duplicate("wall".into()))
        );
    }

    #[test]
    fn unknown_id_falls_back_to_checker() {
        let bank = TextureBank::default();
        assert_eq!(bank.get(999).name, "CHECKER");
    }

    #[test]
    fn sample_clamps_uv() {
        let tex = Texture {
            name: "t".into(),
            w: 2,
            h: 2,
            pixels: vec![1, 2, 3, 4],
        };
        assert_eq!(tex.sample(0.0, 0.0), 1);
        assert_eq!(tex.sample(1.0, 1.0), 4);
        assert_eq!(tex.sample(-5.0, 2.0), 3);
    }
}
