//! Caller-facing input types: picked files and the category → file set.

use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Where a picked file's bytes can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A file on the local file system.
    Path(PathBuf),
    /// An `http://` or `https://` URL, fetched with GET.
    Url(String),
    /// An RFC 2397 `data:` URI carrying the content inline.
    DataUri(String),
    /// Bytes already held in memory.
    Inline(Bytes),
}

/// A user-selected file, as handed over by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    /// Declared size in bytes, if the picker reported one.
    pub size: Option<u64>,
    pub mime_type: Option<String>,
    pub locator: Locator,
}

impl PickedFile {
    /// A local file. The name is taken from the final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            size: None,
            mime_type: None,
            locator: Locator::Path(path.to_path_buf()),
        }
    }

    /// Classify a URI string: `data:`, `http(s)://`, `file://`, or a plain path.
    pub fn from_uri(name: impl Into<String>, uri: &str) -> Self {
        let locator = if uri.starts_with("data:") {
            Locator::DataUri(uri.to_string())
        } else if is_url(uri) {
            Locator::Url(uri.to_string())
        } else if let Some(rest) = uri.strip_prefix("file://") {
            Locator::Path(PathBuf::from(rest))
        } else {
            Locator::Path(PathBuf::from(uri))
        };
        Self {
            name: name.into(),
            size: None,
            mime_type: None,
            locator,
        }
    }

    /// Content already in memory. The declared size is set from the buffer.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: Some(bytes.len() as u64),
            mime_type: None,
            locator: Locator::Inline(bytes),
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Category label → optional picked file, in insertion order.
///
/// Absent entries model a document slot the user left empty; they are
/// skipped when the batch is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    entries: Vec<(String, Option<PickedFile>)>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file for `category`. An existing category keeps its position.
    pub fn insert(&mut self, category: impl Into<String>, file: Option<PickedFile>) {
        let category = category.into();
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some(slot) => slot.1 = file,
            None => self.entries.push((category, file)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, category: impl Into<String>, file: Option<PickedFile>) -> Self {
        self.insert(category, file);
        self
    }

    pub fn get(&self, category: &str) -> Option<&PickedFile> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .and_then(|(_, f)| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with a file present, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &PickedFile)> {
        self.entries
            .iter()
            .filter_map(|(c, f)| f.as_ref().map(|f| (c.as_str(), f)))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<PickedFile>)> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = (K, Option<PickedFile>)>>(iter: I) -> Self {
        let mut set = DocumentSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("file:///tmp/doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn from_uri_classifies_locators() {
        let f = PickedFile::from_uri("a.png", "data:image/png;base64,AAAA");
        assert!(matches!(f.locator, Locator::DataUri(_)));

        let f = PickedFile::from_uri("a.pdf", "https://example.com/a.pdf");
        assert!(matches!(f.locator, Locator::Url(_)));

        let f = PickedFile::from_uri("a.pdf", "file:///tmp/a.pdf");
        assert_eq!(f.locator, Locator::Path(PathBuf::from("/tmp/a.pdf")));

        let f = PickedFile::from_uri("a.pdf", "relative/a.pdf");
        assert_eq!(f.locator, Locator::Path(PathBuf::from("relative/a.pdf")));
    }

    #[test]
    fn from_path_uses_file_name() {
        let f = PickedFile::from_path("/var/tmp/passport scan.jpg");
        assert_eq!(f.name, "passport scan.jpg");
        assert_eq!(f.size, None);
    }

    #[test]
    fn from_bytes_declares_size() {
        let f = PickedFile::from_bytes("a.txt", &b"hello"[..]);
        assert_eq!(f.size, Some(5));
    }

    #[test]
    fn insertion_order_is_kept_and_reinsert_replaces_in_place() {
        let mut set = DocumentSet::new();
        set.insert("id", Some(PickedFile::from_bytes("id.jpg", &b"1"[..])));
        set.insert("proofOfAddress", None);
        set.insert("selfie", Some(PickedFile::from_bytes("me.jpg", &b"2"[..])));
        set.insert("id", Some(PickedFile::from_bytes("id2.jpg", &b"3"[..])));

        assert_eq!(set.len(), 3);
        let present: Vec<_> = set.present().map(|(c, f)| (c, f.name.as_str())).collect();
        assert_eq!(present, vec![("id", "id2.jpg"), ("selfie", "me.jpg")]);
        assert!(set.get("proofOfAddress").is_none());
    }

    #[test]
    fn collects_from_iterator() {
        let set: DocumentSet = vec![("a", None), ("b", None)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.present().count(), 0);
    }
}
