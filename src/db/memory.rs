use super::{Document, DocumentStore, Filter, Sort};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-process document store. Serves as the test double for the external
/// store and honors the same last-write-wins update semantics.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match (x, y) {
            (Value::String(s1), Value::String(s2)) => s1.cmp(s2),
            (Value::Number(n1), Value::Number(n2)) => n1
                .as_f64()
                .partial_cmp(&n2.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::Bool(b1), Value::Bool(b2)) => b1.cmp(b2),
            _ => Ordering::Equal,
        },
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let collections = self.collections.read().unwrap();
        let Some(docs) = collections.get(collection) else {
            return Ok(None);
        };
        for doc in docs {
            if filter.matches(doc)? {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>> {
        let collections = self.collections.read().unwrap();
        let mut result = Vec::new();
        if let Some(docs) = collections.get(collection) {
            for doc in docs {
                if filter.matches(doc)? {
                    result.push(doc.clone());
                }
            }
        }
        if let Some(sort) = sort {
            result.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        Ok(result)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn update_one(&self, collection: &str, filter: &Filter, set: Document) -> Result<u64> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            for doc in docs.iter_mut() {
                if filter.matches(doc)? {
                    for (key, value) in set {
                        doc.insert(key, value);
                    }
                    return Ok(1);
                }
            }
        }
        Ok(0)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            for (index, doc) in docs.iter().enumerate() {
                if filter.matches(doc)? {
                    docs.remove(index);
                    return Ok(1);
                }
            }
        }
        Ok(0)
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().unwrap();
        let mut count = 0;
        if let Some(docs) = collections.get(collection) {
            for doc in docs {
                if filter.matches(doc)? {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
