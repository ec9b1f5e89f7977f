use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::texture::{FilterMode, Texture2D};
use shamble_rendering::{ImageHandle, ResourceProvider};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Returns the default manifest path relative to the repository root.
#[must_use]
pub fn default_manifest_path() -> PathBuf {
    PathBuf::from("assets/manifest.toml")
}

/// Reads the manifest at `path`, resolving image paths against its directory.
pub(crate) fn read_manifest(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read texture manifest at {}", path.display()))?;
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse_manifest(&contents, &base)
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    images: BTreeMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(String, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse texture manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported texture manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }
    if manifest.images.is_empty() {
        bail!("texture manifest lists no images");
    }

    Ok(manifest
        .images
        .into_iter()
        .map(|(name, relative_path)| (name, base_path.join(relative_path)))
        .collect())
}

/// Loads the image at `path` as a pixel-art texture.
pub(crate) fn default_loader(path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read texture asset at {}", path.display()))?;
    let texture = Texture2D::from_file_with_format(&bytes, None);
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

/// Textures loaded one per frame so the loading screen can report progress.
///
/// Images that fail to load are logged and left out; consumers fall back to
/// flat colors for them.
#[derive(Debug)]
pub(crate) struct TextureStore {
    pending: VecDeque<(String, PathBuf)>,
    total: usize,
    textures: Vec<Texture2D>,
    handles: HashMap<String, ImageHandle>,
}

impl TextureStore {
    pub(crate) fn new(entries: Vec<(String, PathBuf)>) -> Self {
        Self {
            total: entries.len(),
            pending: entries.into(),
            textures: Vec::new(),
            handles: HashMap::new(),
        }
    }

    /// Loads the next pending image. Returns whether an entry was processed.
    pub(crate) fn load_next<L>(&mut self, loader: L) -> bool
    where
        L: FnOnce(&Path) -> Result<Texture2D>,
    {
        let Some((name, path)) = self.pending.pop_front() else {
            return false;
        };

        match loader(&path)
            .with_context(|| format!("failed to load texture `{name}` from {}", path.display()))
        {
            Ok(texture) => {
                let id = u32::try_from(self.textures.len()).unwrap_or(u32::MAX);
                let handle = ImageHandle::new(id, texture.width() as u32, texture.height() as u32);
                self.textures.push(texture);
                tracing::debug!(%name, width = handle.width(), height = handle.height(), "texture loaded");
                let _ = self.handles.insert(name, handle);
            }
            Err(error) => {
                tracing::warn!(%name, error = %format!("{error:#}"), "texture unavailable");
            }
        }
        true
    }

    pub(crate) fn texture(&self, image: ImageHandle) -> Option<Texture2D> {
        let index = usize::try_from(image.id()).ok()?;
        self.textures.get(index).copied()
    }
}

impl ResourceProvider for TextureStore {
    fn is_fully_loaded(&self) -> bool {
        self.pending.is_empty()
    }

    fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.pending.len()) as f32 / self.total as f32
    }

    fn resource(&self, name: &str) -> Option<ImageHandle> {
        self.handles.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest = r#"
            version = 1

            [images]
            zombie_l = "images/zombie_l.png"
            tileset = "images/tileset.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        assert_eq!(
            parsed,
            vec![
                ("tileset".to_owned(), PathBuf::from("root/images/tileset.png")),
                ("zombie_l".to_owned(), PathBuf::from("root/images/zombie_l.png")),
            ]
        );
    }

    #[test]
    fn manifest_rejects_unknown_versions() {
        let manifest = r#"
            version = 2

            [images]
            tileset = "tileset.png"
        "#;
        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_requires_images() {
        let manifest = "version = 1\n[images]\n";
        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn store_loads_one_entry_per_call_and_reports_progress() {
        let mut store = TextureStore::new(vec![
            ("tileset".to_owned(), PathBuf::from("tileset.png")),
            ("hero_l".to_owned(), PathBuf::from("hero_l.png")),
        ]);
        assert!(!store.is_fully_loaded());
        assert_eq!(store.progress(), 0.0);

        let visited = RefCell::new(Vec::new());
        assert!(store.load_next(|path| {
            visited.borrow_mut().push(path.to_path_buf());
            Ok(Texture2D::empty())
        }));
        assert_eq!(store.progress(), 0.5);
        assert!(store.resource("tileset").is_some());

        assert!(store.load_next(|path| {
            visited.borrow_mut().push(path.to_path_buf());
            Ok(Texture2D::empty())
        }));
        assert!(store.is_fully_loaded());
        assert!(!store.load_next(|_| Ok(Texture2D::empty())));
        assert_eq!(
            visited.into_inner(),
            vec![PathBuf::from("tileset.png"), PathBuf::from("hero_l.png")]
        );
    }

    #[test]
    fn failed_textures_are_skipped_without_blocking_the_load() {
        let mut store = TextureStore::new(vec![("hero_r".to_owned(), PathBuf::from("missing.png"))]);
        assert!(store.load_next(|_| Err(anyhow!("no such file"))));

        assert!(store.is_fully_loaded());
        assert_eq!(store.progress(), 1.0);
        assert_eq!(store.resource("hero_r"), None);
    }

    #[test]
    fn empty_store_is_loaded() {
        let store = TextureStore::new(Vec::new());
        assert!(store.is_fully_loaded());
        assert_eq!(store.progress(), 1.0);
    }
}
