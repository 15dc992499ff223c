//! Ranked full-text search over the configured index locations.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// One matching document and its relevance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub document_name: String,
    pub rank: u32,
}

impl QueryResult {
    pub fn new(document_name: impl Into<String>, rank: u32) -> Self {
        Self { document_name: document_name.into(), rank }
    }
}

/// Answers a query with documents ordered by descending relevance.
///
/// Terms arrive already lower-cased and split. Backend failures surface as an empty list.
#[cfg_attr(test, mockall::automock)]
pub trait QueryProcessor: Send + Sync {
    fn process_query(&self, terms: &[String]) -> Vec<QueryResult>;
}

/// An in-memory inverted index built once at startup.
///
/// A document matches when it contains every query term; its rank is the total number of
/// occurrences of the query terms in it. Ties are broken by document name.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    documents: Vec<String>,
    // term -> document id -> occurrences
    postings: HashMap<String, HashMap<usize, u32>>,
}

impl DocumentIndex {
    /// Indexes every document found at `locations`, each a file or a directory walked
    /// recursively.
    ///
    /// Documents below `static_root` are named relative to it so they can be linked under
    /// `/static/`; anything else keeps its full path. Unreadable documents and locations
    /// are logged and skipped.
    pub async fn load(locations: &[PathBuf], static_root: &Path) -> Self {
        let static_root = tokio::fs::canonicalize(static_root).await.ok();
        let mut index = Self::default();

        for location in locations {
            let files = match collect_files(location).await {
                Ok(files) => files,
                Err(e) => {
                    warn!(location = %location.display(), cause = %e, "can't read index location, skipping");
                    continue;
                }
            };

            for file in files {
                match tokio::fs::read(&file).await {
                    Ok(contents) => {
                        let name = document_name(&file, static_root.as_deref()).await;
                        debug!(document = %name, bytes = contents.len(), "indexing document");
                        index.add_document(name, &String::from_utf8_lossy(&contents));
                    }
                    Err(e) => warn!(document = %file.display(), cause = %e, "can't read document, skipping"),
                }
            }
        }

        info!(documents = index.len(), terms = index.postings.len(), "search index ready");
        index
    }

    /// Adds a document under `name` and indexes the words of `text`.
    pub fn add_document(&mut self, name: impl Into<String>, text: &str) {
        let id = self.documents.len();
        self.documents.push(name.into());

        for word in words(text) {
            *self.postings.entry(word).or_default().entry(id).or_default() += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl QueryProcessor for DocumentIndex {
    fn process_query(&self, terms: &[String]) -> Vec<QueryResult> {
        let Some((first, rest)) = terms.split_first() else {
            return Vec::new();
        };
        let Some(candidates) = self.postings.get(first) else {
            return Vec::new();
        };

        let mut results: Vec<QueryResult> = candidates
            .iter()
            .filter_map(|(&id, &count)| {
                rest.iter()
                    .try_fold(count, |rank, term| self.postings.get(term)?.get(&id).map(|n| rank + n))
                    .map(|rank| QueryResult::new(self.documents[id].as_str(), rank))
            })
            .collect();

        results.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| a.document_name.cmp(&b.document_name)));
        results
    }
}

/// Splits text into lower-cased runs of alphabetic characters.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic()).filter(|word| !word.is_empty()).map(str::to_lowercase)
}

async fn collect_files(location: &Path) -> io::Result<Vec<PathBuf>> {
    if !tokio::fs::metadata(location).await?.is_dir() {
        return Ok(vec![location.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut pending = vec![location.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
            } else {
                files.push(entry.path());
            }
        }
    }
    files.sort();
    Ok(files)
}

async fn document_name(file: &Path, static_root: Option<&Path>) -> String {
    let canonical = tokio::fs::canonicalize(file).await.unwrap_or_else(|_| file.to_path_buf());
    match static_root.and_then(|root| canonical.strip_prefix(root).ok()) {
        Some(relative) => relative.iter().map(|part| part.to_string_lossy()).collect::<Vec<_>>().join("/"),
        None => file.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(query: &str) -> Vec<String> {
        query.split_whitespace().map(str::to_owned).collect()
    }

    fn sample_index() -> DocumentIndex {
        let mut index = DocumentIndex::default();
        index.add_document("books/moby.txt", "Call me Ishmael. The whale, the WHALE!");
        index.add_document("books/ahab.txt", "Ahab hunts the whale");
        index.add_document("notes.txt", "nothing to see here");
        index
    }

    #[test]
    fn splits_on_non_alphabetic() {
        let words: Vec<_> = words("Don't stop-me now, 42times").collect();
        assert_eq!(words, ["don", "t", "stop", "me", "now", "times"]);
    }

    #[test]
    fn ranks_by_occurrences() {
        let results = sample_index().process_query(&terms("whale"));
        assert_eq!(results, vec![QueryResult::new("books/moby.txt", 2), QueryResult::new("books/ahab.txt", 1)]);
    }

    #[test]
    fn every_term_must_match() {
        let index = sample_index();
        assert_eq!(index.process_query(&terms("whale ahab")), vec![QueryResult::new("books/ahab.txt", 2)]);
        assert!(index.process_query(&terms("whale nothing")).is_empty());
    }

    #[test]
    fn rank_ties_are_ordered_by_name() {
        let results = sample_index().process_query(&terms("the"));
        assert_eq!(results, vec![QueryResult::new("books/moby.txt", 2), QueryResult::new("books/ahab.txt", 1)]);

        let mut index = DocumentIndex::default();
        index.add_document("b", "tie");
        index.add_document("a", "tie");
        let names: Vec<_> = index.process_query(&terms("tie")).into_iter().map(|r| r.document_name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn empty_or_unknown_terms_match_nothing() {
        let index = sample_index();
        assert!(index.process_query(&[]).is_empty());
        assert!(index.process_query(&terms("kraken")).is_empty());
    }

    #[tokio::test]
    async fn loads_documents_relative_to_static_root() {
        let dir = std::env::temp_dir().join(format!("searchd-index-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("static/docs/deep")).unwrap();
        std::fs::create_dir_all(dir.join("elsewhere")).unwrap();
        std::fs::write(dir.join("static/docs/a.txt"), "rust rust").unwrap();
        std::fs::write(dir.join("static/docs/deep/b.txt"), "rust").unwrap();
        std::fs::write(dir.join("elsewhere/c.txt"), "rust rust rust").unwrap();

        let locations = vec![dir.join("static/docs"), dir.join("elsewhere/c.txt"), dir.join("missing")];
        let index = DocumentIndex::load(&locations, &dir.join("static")).await;
        let results = index.process_query(&terms("rust"));

        assert_eq!(index.len(), 3);
        assert_eq!(results[0].rank, 3);
        assert!(results[0].document_name.ends_with("c.txt"));
        assert!(Path::new(&results[0].document_name).is_absolute());
        assert_eq!(results[1], QueryResult::new("docs/a.txt", 2));
        assert_eq!(results[2], QueryResult::new("docs/deep/b.txt", 1));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
