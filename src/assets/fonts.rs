use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{EmojifyError, EmojifyResult};

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Opaque, cheaply clonable handle to loaded font data.
///
/// The file bytes live in one shared blob; the rasterizer and the shaper both get handles to
/// it, never copies.
#[derive(Clone)]
pub struct FontResource {
    font: vello_cpu::peniko::FontData,
}

impl FontResource {
    /// Take ownership of raw font file bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let blob = vello_cpu::peniko::Blob::new(Arc::new(bytes));
        Self {
            font: vello_cpu::peniko::FontData::new(blob, 0),
        }
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        self.font.data.data()
    }

    /// Shared handle to the font file, for registration with the shaper.
    pub(crate) fn blob(&self) -> vello_cpu::peniko::Blob<u8> {
        self.font.data.clone()
    }

    pub(crate) fn to_vello_font(&self) -> vello_cpu::peniko::FontData {
        self.font.clone()
    }
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("blob_id", &self.font.data.id())
            .field("bytes_len", &self.font.data.len())
            .finish()
    }
}

/// One catalog entry.
#[derive(Clone, Debug)]
pub struct FontAsset {
    /// Stable identifier clients pass as `font_id`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Source file, if the asset was loaded from disk.
    pub path: Option<PathBuf>,
    /// Loaded font data.
    pub resource: FontResource,
}

/// Immutable map from font id to loaded font, built once at startup and shared by reference.
///
/// Lookups never substitute a fallback: an unknown id is always [`EmojifyError::FontNotFound`].
#[derive(Clone, Debug, Default)]
pub struct FontCatalog {
    fonts: BTreeMap<String, FontAsset>,
}

impl FontCatalog {
    /// Build from caller-supplied `(id, resource)` pairs. Later duplicates are ignored.
    pub fn from_assets(assets: impl IntoIterator<Item = FontAsset>) -> Self {
        let mut fonts = BTreeMap::new();
        for asset in assets {
            if fonts.contains_key(&asset.id) {
                tracing::warn!(font_id = %asset.id, "duplicate font id ignored");
                continue;
            }
            fonts.insert(asset.id.clone(), asset);
        }
        Self { fonts }
    }

    /// Load every `.ttf`/`.otf`/`.ttc` file in `dir` (non-recursive).
    ///
    /// Files are visited in name order, so id collisions resolve deterministically to the
    /// first file. A missing directory yields an empty catalog.
    pub fn scan_dir(dir: impl AsRef<Path>) -> EmojifyResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "font directory does not exist");
            return Ok(Self::default());
        }

        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("read font directory '{}'", dir.display()))?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_font_extension(path))
            .collect::<Vec<_>>();
        paths.sort();

        let mut assets = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable font");
                    continue;
                }
            };
            let id = font_id_from_stem(stem);
            tracing::info!(font_id = %id, file = %path.display(), "loaded font");
            assets.push(FontAsset {
                id,
                name: display_name_from_stem(stem),
                path: Some(path.clone()),
                resource: FontResource::from_bytes(bytes),
            });
        }

        let catalog = Self::from_assets(assets);
        tracing::info!(count = catalog.len(), "font catalog ready");
        Ok(catalog)
    }

    /// Resolve `id`.
    pub fn lookup(&self, id: &str) -> EmojifyResult<&FontAsset> {
        self.fonts
            .get(id)
            .ok_or_else(|| EmojifyError::font_not_found(id))
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.fonts.contains_key(id)
    }

    /// All ids in ascending order.
    pub fn list(&self) -> Vec<&str> {
        self.fonts.keys().map(String::as_str).collect()
    }

    /// All assets in ascending id order.
    pub fn assets(&self) -> impl Iterator<Item = &FontAsset> {
        self.fonts.values()
    }

    /// Number of fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the catalog holds no fonts.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            FONT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// `Noto Sans-JP--Bold` -> `noto_sans_jp_bold`.
pub fn font_id_from_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    for c in stem.chars().flat_map(char::to_lowercase) {
        let c = if c == ' ' || c == '-' { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// `noto_sans-jp` -> `Noto Sans Jp`.
pub fn display_name_from_stem(stem: &str) -> String {
    stem.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
