/// Access to the named streams of a compound document.
///
/// Reading the compound file itself (allocation tables, directory) is the
/// caller's job; the decoder only needs whole streams by name.
use bytes::Bytes;
use std::collections::HashMap;

/// Name of the stream holding the FIB, the text and the FKP pages.
pub const WORD_DOCUMENT_STREAM: &str = "WordDocument";

/// Something that can hand over a stream's bytes by name.
pub trait StreamSource {
    /// Contents of the stream, or `None` when it does not exist.
    fn stream(&self, name: &str) -> Option<Bytes>;
}

/// Streams held in memory.
///
/// # Examples
///
/// ```
/// use docstream::ole::doc::{MemoryStorage, StreamSource};
///
/// let mut storage = MemoryStorage::new();
/// storage.insert("1Table", vec![0u8; 4]);
/// assert_eq!(storage.stream("1Table").map(|s| s.len()), Some(4));
/// assert!(storage.stream("0Table").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    streams: HashMap<String, Bytes>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a stream.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.streams.insert(name.into(), data.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.streams.contains_key(name)
    }
}

impl StreamSource for MemoryStorage {
    fn stream(&self, name: &str) -> Option<Bytes> {
        self.streams.get(name).cloned()
    }
}

impl<S: StreamSource + ?Sized> StreamSource for &S {
    fn stream(&self, name: &str) -> Option<Bytes> {
        (**self).stream(name)
    }
}
