//! Background color selection from a rendered image.
//!
//! Pixels are clustered in CIELAB with k-means (Hamerly's algorithm, K-means++
//! initialization) into a bounded set of swatches. The background is picked
//! from those swatches: dominant, then vibrant, then muted, then a neutral
//! default.

use image::imageops::FilterType;
use kmeans_colors::get_kmeans_hamerly;
use palette::{FromColor, IntoColor, Lab, Oklch, Srgb};

/// Used when the palette offers no dominant, vibrant or muted swatch.
pub const NEUTRAL_BACKGROUND: Srgb<u8> = Srgb::new(0x9E, 0x9E, 0x9E);

const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5

const VIBRANT_MIN_CHROMA: f32 = 0.09;
const VIBRANT_LIGHTNESS: (f32, f32) = (0.3, 0.85);
const MUTED_LIGHTNESS: (f32, f32) = (0.25, 0.75);

#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// Upper bound on candidate colors (k for k-means).
    pub max_colors: usize,
    /// Images are shrunk to fit this square before sampling.
    pub max_dimension: u32,
    /// Pixels below this alpha are ignored.
    pub min_alpha: u8,
    pub seed: u64,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_colors: 20,
            max_dimension: 112,
            min_alpha: 128,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no rendered image for {0}")]
    NotRendered(String),
    #[error("undecodable image: {0}")]
    Decode(String),
    #[error("image has no opaque pixels")]
    EmptyPalette,
}

/// A candidate color with the share of sampled pixels it represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub color: Srgb<u8>,
    pub weight: f32,
}

impl Swatch {
    fn oklch(&self) -> Oklch {
        self.color.into_format::<f32>().into_color()
    }
}

/// Swatches sorted by weight, heaviest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    pub swatches: Vec<Swatch>,
}

impl Palette {
    pub fn dominant(&self) -> Option<Swatch> {
        self.swatches
            .iter()
            .copied()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
    }

    /// Most chromatic swatch of medium lightness.
    pub fn vibrant(&self) -> Option<Swatch> {
        self.swatches
            .iter()
            .map(|swatch| (swatch, swatch.oklch()))
            .filter(|(_, lch)| {
                lch.chroma >= VIBRANT_MIN_CHROMA
                    && (VIBRANT_LIGHTNESS.0..=VIBRANT_LIGHTNESS.1).contains(&lch.l)
            })
            .max_by(|(_, a), (_, b)| a.chroma.total_cmp(&b.chroma))
            .map(|(swatch, _)| *swatch)
    }

    /// Heaviest low-chroma swatch of medium lightness.
    pub fn muted(&self) -> Option<Swatch> {
        self.swatches
            .iter()
            .filter(|swatch| {
                let lch = swatch.oklch();
                lch.chroma < VIBRANT_MIN_CHROMA
                    && (MUTED_LIGHTNESS.0..=MUTED_LIGHTNESS.1).contains(&lch.l)
            })
            .copied()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
    }

    pub fn background(&self) -> Srgb<u8> {
        self.dominant()
            .or_else(|| self.vibrant())
            .or_else(|| self.muted())
            .map(|swatch| swatch.color)
            .unwrap_or(NEUTRAL_BACKGROUND)
    }
}

pub trait ColorExtractor: Send + Sync {
    /// Picks a background color from encoded image bytes.
    fn extract(&self, encoded: &[u8]) -> Result<Srgb<u8>, ExtractError>;
}

#[derive(Debug, Clone, Default)]
pub struct KmeansColorExtractor {
    settings: ExtractorSettings,
}

impl KmeansColorExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    pub fn palette_from_bytes(&self, encoded: &[u8]) -> Result<Palette, ExtractError> {
        let image = image::load_from_memory(encoded)
            .map_err(|err| ExtractError::Decode(err.to_string()))?;
        self.palette(&image)
    }

    pub fn palette(&self, image: &image::DynamicImage) -> Result<Palette, ExtractError> {
        let pixels = self.sample(image);
        if pixels.is_empty() {
            return Err(ExtractError::EmptyPalette);
        }
        Ok(cluster(&pixels, self.settings.max_colors, self.settings.seed))
    }

    fn sample(&self, image: &image::DynamicImage) -> Vec<Lab> {
        let max_dim = self.settings.max_dimension;
        let image = if image.width() > max_dim || image.height() > max_dim {
            image.resize(max_dim, max_dim, FilterType::Triangle)
        } else {
            image.clone()
        };

        let rgba = image.to_rgba8();
        rgba.pixels()
            .filter(|p| p[3] >= self.settings.min_alpha)
            .map(|p| {
                let srgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
                srgb.into_color()
            })
            .collect()
    }
}

impl ColorExtractor for KmeansColorExtractor {
    fn extract(&self, encoded: &[u8]) -> Result<Srgb<u8>, ExtractError> {
        Ok(self.palette_from_bytes(encoded)?.background())
    }
}

fn cluster(pixels: &[Lab], max_colors: usize, seed: u64) -> Palette {
    let k = max_colors.clamp(1, 255).min(pixels.len());
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, seed);

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[usize::from(idx)] += 1;
    }

    let total = pixels.len() as f32;
    let mut weighted: Vec<(Lab, f32)> = result
        .centroids
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|(lab, count)| (*lab, *count as f32 / total))
        .collect();

    merge_similar(&mut weighted);
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

    Palette {
        swatches: weighted
            .into_iter()
            .map(|(lab, weight)| Swatch {
                color: lab_to_srgb(lab),
                weight,
            })
            .collect(),
    }
}

/// Folds centroids closer than ΔE 5 into the first one seen.
fn merge_similar(colors: &mut Vec<(Lab, f32)>) {
    let mut i = 0;
    while i < colors.len() {
        let mut j = i + 1;
        while j < colors.len() {
            let (a, b) = (colors[i].0, colors[j].0);
            let delta_e_sq = (a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                colors[i].1 += colors[j].1;
                colors.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

fn lab_to_srgb(lab: Lab) -> Srgb<u8> {
    let srgb: Srgb<f32> = Srgb::from_color(lab);
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Srgb::new(channel(srgb.red), channel(srgb.green), channel(srgb.blue))
}
