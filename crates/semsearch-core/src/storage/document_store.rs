use super::{DocumentStore, SAMPLE_DOCUMENTS};
use crate::search::types::{DocId, Document};

/// Document store backed by a `Vec` built once at construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Vec<Document>,
}

impl InMemoryDocumentStore {
    /// Builds a store from texts in corpus order. Ids are assigned by position.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Document::new(DocId::from_index(i), text))
            .collect();
        Self { documents }
    }

    /// The built-in demo corpus.
    pub fn sample() -> Self {
        Self::from_texts(SAMPLE_DOCUMENTS.iter().copied())
    }

    /// Borrowed view of the documents, in corpus order.
    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_all(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn get(&self, id: DocId) -> Option<Document> {
        self.documents.get(id.index()).cloned()
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_texts_assigns_positional_ids() {
        let store = InMemoryDocumentStore::from_texts(["first", "second", "third"]);
        let docs = store.get_all();
        assert_eq!(docs.len(), 3);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.id.index(), i);
        }
        assert_eq!(docs[1].text, "second");
    }

    #[test]
    fn test_get_all_is_stable() {
        let store = InMemoryDocumentStore::sample();
        assert_eq!(store.get_all(), store.get_all());
    }

    #[test]
    fn test_get_out_of_range() {
        let store = InMemoryDocumentStore::from_texts(["only"]);
        assert!(store.get(DocId::from_index(0)).is_some());
        assert!(store.get(DocId::from_index(1)).is_none());
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryDocumentStore::default();
        assert!(store.is_empty());
        assert_eq!(store.stats().document_count, 0);
        assert_eq!(store.stats().total_words, 0);
    }

    #[test]
    fn test_stats() {
        let store = InMemoryDocumentStore::from_texts(["cat sat on mat", "dog ran in park"]);
        let stats = store.stats();
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.total_words, 8);
    }

    #[test]
    fn test_sample_corpus() {
        let store = InMemoryDocumentStore::sample();
        assert_eq!(store.len(), 20);
        assert_eq!(
            store.get(DocId::from_index(0)).map(|d| d.text),
            Some("Artificial intelligence is transforming how we work and live".to_string())
        );
    }
}
