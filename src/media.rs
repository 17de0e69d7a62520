//! Gallery media list.

/// One gallery asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Location of the image
    pub uri: String,
}

impl MediaItem {
    /// Create an item from its location.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Ordered, immutable list of gallery media.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCatalog {
    items: Vec<MediaItem>,
}

impl MediaCatalog {
    /// Build a catalog from media locations, keeping their order.
    pub fn new<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: uris.into_iter().map(MediaItem::new).collect(),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Iterate over items in order.
    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_order() {
        let catalog = MediaCatalog::new(["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).map(|m| m.uri.as_str()), Some("b.jpg"));
        assert!(catalog.get(3).is_none());
        let uris: Vec<_> = catalog.iter().map(|m| m.uri.as_str()).collect();
        assert_eq!(uris, ["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = MediaCatalog::new(Vec::<String>::new());
        assert!(catalog.is_empty());
    }
}
