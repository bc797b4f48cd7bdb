use std::collections::HashMap;

use pharcobial_core::{GraphicCatalog, GraphicKey};

use crate::GraphicError;

/// Backend hook that loads graphics and derives mirrored variants.
pub trait GraphicSource {
    /// Backend-specific graphic handle.
    type Graphic: Clone;

    /// Loads the graphic stored under `id`.
    fn load(&mut self, id: &str) -> Result<Self::Graphic, GraphicError>;

    /// Derives a horizontally flipped copy of `graphic`.
    fn mirror(&mut self, graphic: &Self::Graphic) -> Self::Graphic;
}

/// Memoizes graphics by key, deriving mirrored variants on first use.
///
/// Failed lookups are remembered too, so a missing asset is only looked for
/// (and reported) once.
#[derive(Debug)]
pub struct GraphicsCache<S: GraphicSource> {
    source: S,
    graphics: HashMap<GraphicKey, Result<S::Graphic, GraphicError>>,
}

impl<S: GraphicSource> GraphicsCache<S> {
    /// Creates an empty cache over `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            graphics: HashMap::new(),
        }
    }

    /// Returns the graphic for `key`, loading it on first request.
    pub fn get(&mut self, key: &GraphicKey) -> Result<S::Graphic, GraphicError> {
        if let Some(cached) = self.graphics.get(key) {
            return cached.clone();
        }

        let loaded = if key.is_mirrored() {
            self.get(&key.unmirrored())
                .map(|graphic| self.source.mirror(&graphic))
        } else {
            self.source.load(key.id())
        };
        if let Err(error) = &loaded {
            log::warn!("{error}");
        }

        let _ = self.graphics.insert(key.clone(), loaded.clone());
        loaded
    }

    /// Number of keys looked up so far, including failed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    /// Whether nothing has been looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    /// Empties the cache, yielding every graphic that loaded.
    ///
    /// Mirrored variants are yielded alongside their base graphic.
    pub fn drain(&mut self) -> impl Iterator<Item = (GraphicKey, S::Graphic)> + '_ {
        self.graphics
            .drain()
            .filter_map(|(key, graphic)| graphic.ok().map(|graphic| (key, graphic)))
    }
}

impl<S: GraphicSource> GraphicCatalog for GraphicsCache<S> {
    fn contains(&mut self, key: &GraphicKey) -> bool {
        self.get(key).is_ok()
    }
}
