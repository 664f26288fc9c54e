//! Image preloading with progress events.

use tracing::debug;

use crate::event::EventEmitter;
use crate::ui::native::NativeBackend;

/// Progress of an [`ImageLoader`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Count of loaded URLs.
    pub count: usize,
    /// Total URLs.
    pub total: usize,
    /// Percent of loaded URLs.
    pub percent: f64,
}

/// Preloads a set of images by URL.
///
/// Loading starts at construction through the native boundary; the embedding
/// reports each completion with [`image_loaded`](ImageLoader::image_loaded).
/// A URL that never completes silently never finishes the count; image
/// loading failure is not handled.
///
/// # Examples
///
/// ```ignore
/// let mut loader = ImageLoader::new(vec!["a.png".into(), "b.png".into()], &mut native);
/// loader.on_progress.listen(|e| println!("{}/{}", e.count, e.total));
/// loader.on_load.listen(|_| println!("done"));
/// ```
pub struct ImageLoader {
    /// Emitted when the loader is done loading all its URLs.
    pub on_load: EventEmitter<()>,
    /// Emitted when the loader is done loading a single URL.
    pub on_progress: EventEmitter<ProgressEvent>,
    urls: Vec<String>,
    pending: Vec<String>,
    loaded: bool,
}

impl ImageLoader {
    /// Begin loading every URL.
    pub fn new(urls: Vec<String>, native: &mut dyn NativeBackend) -> Self {
        for url in &urls {
            native.load_image(url);
        }
        Self {
            on_load: EventEmitter::new(),
            on_progress: EventEmitter::new(),
            pending: urls.clone(),
            urls,
            loaded: false,
        }
    }

    /// The URLs this loader was created with.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Whether all the URLs are loaded.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Count of completed URLs.
    pub fn completed(&self) -> usize {
        self.urls.len() - self.pending.len()
    }

    /// Record the completion of one URL, emitting progress and, once every
    /// URL completed, the load event. Unknown or already-counted URLs are
    /// ignored.
    pub fn image_loaded(&mut self, url: &str) {
        let Some(index) = self.pending.iter().position(|pending| pending == url) else {
            return;
        };
        self.pending.remove(index);

        let count = self.completed();
        let total = self.urls.len();
        debug!(url, count, total, "image loaded");
        self.on_progress.emit(&ProgressEvent {
            count,
            total,
            percent: (count as f64 / total as f64) * 100.0,
        });
        if count >= total {
            self.loaded = true;
            self.on_load.emit(&());
        }
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("urls", &self.urls)
            .field("pending", &self.pending)
            .field("loaded", &self.loaded)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HeadlessDocument;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn loader(urls: &[&str], doc: &mut HeadlessDocument) -> ImageLoader {
        ImageLoader::new(urls.iter().map(|s| (*s).to_owned()).collect(), doc)
    }

    #[test]
    fn construction_starts_every_url() {
        let mut doc = HeadlessDocument::new();
        let loader = loader(&["a.png", "b.png"], &mut doc);
        assert_eq!(doc.images(), ["a.png", "b.png"]);
        assert!(!loader.loaded());
        assert_eq!(loader.completed(), 0);
    }

    #[test]
    fn progress_per_completed_url() {
        let mut doc = HeadlessDocument::new();
        let mut loader = loader(&["a.png", "b.png"], &mut doc);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        loader.on_progress.listen(move |e| sink.borrow_mut().push(*e));

        loader.image_loaded("a.png");
        assert!(!loader.loaded());
        loader.image_loaded("b.png");
        assert!(loader.loaded());

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].count, 1);
        assert_eq!(events[0].total, 2);
        assert_eq!(events[0].percent, 50.0);
        assert_eq!(events[1].count, 2);
        assert_eq!(events[1].percent, 100.0);
    }

    #[test]
    fn load_fires_once_at_completion() {
        let mut doc = HeadlessDocument::new();
        let mut loader = loader(&["a.png"], &mut doc);
        let loads = Rc::new(RefCell::new(0));
        let count = Rc::clone(&loads);
        loader.on_load.listen(move |_| *count.borrow_mut() += 1);

        loader.image_loaded("a.png");
        // Duplicate completions are ignored.
        loader.image_loaded("a.png");
        assert_eq!(*loads.borrow(), 1);
    }

    #[test]
    fn unknown_urls_are_ignored() {
        let mut doc = HeadlessDocument::new();
        let mut loader = loader(&["a.png"], &mut doc);
        loader.image_loaded("other.png");
        assert_eq!(loader.completed(), 0);
        assert!(!loader.loaded());
    }

    #[test]
    fn never_completing_url_never_finishes() {
        // A URL that never loads leaves the loader incomplete forever; there
        // is no failure path.
        let mut doc = HeadlessDocument::new();
        let mut loader = loader(&["a.png", "missing.png"], &mut doc);
        loader.image_loaded("a.png");
        assert_eq!(loader.completed(), 1);
        assert!(!loader.loaded());
    }
}
