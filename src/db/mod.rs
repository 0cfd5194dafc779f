use crate::config::StoreConfig;
use crate::error::Error;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub mod memory;
pub mod models;
pub mod repositories;

/// A stored record: a flat JSON object map
pub type Document = serde_json::Map<String, Value>;

/// Field-level predicate
#[derive(Debug, Clone)]
pub enum Predicate {
    Eq(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    /// Case-insensitive substring/regex match on string fields
    Regex(String),
}

/// One conjunct of a filter
#[derive(Debug, Clone)]
pub enum Clause {
    Field(String, Predicate),
    /// Disjunction over field predicates
    Any(Vec<(String, Predicate)>),
}

/// Conjunctive query filter over document fields
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses
            .push(Clause::Field(field.to_string(), Predicate::Eq(value.into())));
        self
    }

    pub fn is_in(mut self, field: &str, values: Vec<Value>) -> Self {
        self.clauses
            .push(Clause::Field(field.to_string(), Predicate::In(values)));
        self
    }

    pub fn not_in(mut self, field: &str, values: Vec<Value>) -> Self {
        self.clauses
            .push(Clause::Field(field.to_string(), Predicate::NotIn(values)));
        self
    }

    pub fn regex(mut self, field: &str, pattern: &str) -> Self {
        self.clauses.push(Clause::Field(
            field.to_string(),
            Predicate::Regex(pattern.to_string()),
        ));
        self
    }

    pub fn any(mut self, alternatives: Vec<(String, Predicate)>) -> Self {
        self.clauses.push(Clause::Any(alternatives));
        self
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, doc: &Document) -> Result<bool> {
        for clause in &self.clauses {
            let hit = match clause {
                Clause::Field(field, predicate) => predicate_matches(predicate, doc.get(field))?,
                Clause::Any(alternatives) => {
                    let mut any = false;
                    for (field, predicate) in alternatives {
                        if predicate_matches(predicate, doc.get(field))? {
                            any = true;
                            break;
                        }
                    }
                    any
                }
            };
            if !hit {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn predicate_matches(predicate: &Predicate, value: Option<&Value>) -> Result<bool> {
    match predicate {
        Predicate::Eq(expected) => Ok(value == Some(expected)),
        Predicate::In(set) => Ok(value.map_or(false, |v| set.contains(v))),
        Predicate::NotIn(set) => Ok(value.map_or(true, |v| !set.contains(v))),
        Predicate::Regex(pattern) => {
            let re = regex::RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::InvalidInput(format!("Bad filter pattern: {}", e)))?;
            Ok(value
                .and_then(Value::as_str)
                .map_or(false, |s| re.is_match(s)))
        }
    }
}

/// Sort order for find queries
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }
}

/// Abstract document store: the sole point of truth and serialization.
/// Updates are last-write-wins on single documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()>;

    /// Merge `set` fields into the first matching document, returning the
    /// number of documents matched (0 or 1)
    async fn update_one(&self, collection: &str, filter: &Filter, set: Document) -> Result<u64>;

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64>;

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64>;
}

/// Shared store handle injected into services at startup
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Store service owning the connect/disconnect lifecycle
pub struct StoreService {
    pub handle: StoreHandle,
}

impl std::fmt::Debug for StoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreService").finish_non_exhaustive()
    }
}

impl StoreService {
    /// Connect to the configured store backend
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        info!("Connecting to document store: {}", config.url);

        if config.url.starts_with("memory://") {
            return Ok(Self {
                handle: Arc::new(memory::MemoryStore::new()),
            });
        }

        // Real deployments plug in an external store adapter here
        Err(Error::Config(format!("Unsupported store backend: {}", config.url)).into())
    }

    /// Release the store handle; memory backends have nothing to flush
    pub async fn disconnect(&self) -> Result<()> {
        info!("Disconnecting from document store");
        Ok(())
    }
}
