//! CLI command implementations
//!
//! The CLI is a collaborator around the engine: it owns the data file,
//! stamps elapsed times onto plans, logs events, and renders JSON
//! responses. The engine itself never touches the filesystem or the clock.

use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::advisor::{ExecutionPlan, ExplainReport, Hint, IndexAdvisor, IndexDefinition};
use crate::document::{doc_id, Document};
use crate::executor::QueryExecutor;
use crate::observability::Logger;
use crate::pipeline::{parse_pipeline, PipelineEngine};
use crate::query::{
    parse_direction, parse_filter, parse_projection, parse_sort, InvalidQueryError, PageSpec,
    QuerySpec,
};
use crate::store::{seed_documents, DocumentStore, MemoryStore};

use super::args::{Cli, Command, IndexAction};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// On-disk state: documents plus index declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFile {
    /// Last save time (RFC 3339), stamped by the CLI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl DataFile {
    /// Load the data file; a missing file is an empty store
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::data_error(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| CliError::data_error(format!("invalid data file {}: {}", path.display(), e)))
    }

    /// Save the data file, stamping `saved_at`
    pub fn save(&mut self, path: &Path) -> CliResult<()> {
        self.saved_at = Some(Utc::now().to_rfc3339());
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| CliError::data_error(format!("failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn store(&self) -> MemoryStore {
        MemoryStore::with_contents(self.documents.clone(), self.indexes.clone())
    }

    fn absorb(&mut self, store: &MemoryStore) {
        self.documents = store.fetch_all();
        self.indexes = store.fetch_indexes();
    }
}

/// Dispatches a parsed command line
pub fn dispatch(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Seed => cmd_seed(&cli.data),
        Command::Insert { document } => cmd_insert(&cli.data, &document),
        Command::Query {
            filter,
            project,
            sort,
            skip,
            limit,
            hint,
            explain,
        } => cmd_query(
            &cli.data,
            &filter,
            project.as_deref(),
            sort.as_deref(),
            skip,
            limit,
            hint.as_deref(),
            explain,
        ),
        Command::Update { filter, set } => cmd_update(&cli.data, &filter, &set),
        Command::Delete { filter } => cmd_delete(&cli.data, &filter),
        Command::Aggregate { pipeline } => cmd_aggregate(&cli.data, &pipeline),
        Command::Index { action } => match action {
            IndexAction::Create { keys, name } => cmd_index_create(&cli.data, &keys, name),
            IndexAction::List => cmd_index_list(&cli.data),
            IndexAction::Explain { filter, sort, hint } => {
                cmd_index_explain(&cli.data, &filter, sort.as_deref(), hint.as_deref())
            }
        },
    }
}

fn cmd_seed(path: &Path) -> CliResult<()> {
    let mut store = MemoryStore::new();
    let inserted = store.insert(seed_documents());

    let mut data = DataFile::default();
    data.absorb(&store);
    data.save(path)?;

    Logger::info("SEED_COMPLETE", &[("inserted", &inserted.to_string())]);
    write_response(json!({ "inserted": inserted }))
}

fn cmd_insert(path: &Path, document: &str) -> CliResult<()> {
    let value: Value = serde_json::from_str(document)?;
    let doc = match value {
        Value::Object(map) => map,
        _ => {
            return Err(InvalidQueryError::invalid_filter("document must be a JSON object").into())
        }
    };

    let mut data = DataFile::load(path)?;
    let mut store = data.store();
    let inserted = store.insert(vec![doc]);
    let id = store
        .fetch_all()
        .last()
        .and_then(doc_id)
        .map(str::to_string);
    data.absorb(&store);
    data.save(path)?;

    Logger::info("INSERT_COMPLETE", &[("inserted", &inserted.to_string())]);
    write_response(json!({ "inserted": inserted, "id": id }))
}

#[allow(clippy::too_many_arguments)]
fn cmd_query(
    path: &Path,
    filter: &str,
    project: Option<&str>,
    sort: Option<&str>,
    skip: usize,
    limit: Option<usize>,
    hint: Option<&str>,
    explain: bool,
) -> CliResult<()> {
    let query = build_query(filter, project, sort, skip, limit)?;
    let hint = parse_hint(hint);

    let data = DataFile::load(path)?;
    let started = Instant::now();
    let mut result = QueryExecutor::execute(&data.documents, &data.indexes, &query, &hint)?;
    result.plan.elapsed_ms = Some(started.elapsed().as_millis() as u64);

    Logger::info(
        "QUERY_COMPLETE",
        &[
            ("access_path", &result.plan.access_path.describe()),
            ("examined", &result.plan.docs_examined.to_string()),
            ("returned", &result.plan.docs_returned.to_string()),
        ],
    );

    if explain {
        write_response(plan_json(&result.plan))
    } else {
        write_response(json!({
            "count": result.len(),
            "documents": result.documents,
        }))
    }
}

fn cmd_update(path: &Path, filter: &str, set: &str) -> CliResult<()> {
    let predicates = parse_filter(&serde_json::from_str(filter)?)?;
    let setters = match serde_json::from_str(set)? {
        Value::Object(map) => map,
        _ => {
            return Err(InvalidQueryError::invalid_filter("setters must be a JSON object").into())
        }
    };

    let mut data = DataFile::load(path)?;
    let mut store = data.store();
    let outcome = store.update_where(&predicates, &setters);
    data.absorb(&store);
    data.save(path)?;

    Logger::info(
        "UPDATE_COMPLETE",
        &[
            ("matched", &outcome.matched.to_string()),
            ("modified", &outcome.modified.to_string()),
        ],
    );
    write_response(json!({ "matched": outcome.matched, "modified": outcome.modified }))
}

fn cmd_delete(path: &Path, filter: &str) -> CliResult<()> {
    let predicates = parse_filter(&serde_json::from_str(filter)?)?;

    let mut data = DataFile::load(path)?;
    let mut store = data.store();
    let deleted = store.delete_where(&predicates);
    data.absorb(&store);
    data.save(path)?;

    Logger::info("DELETE_COMPLETE", &[("deleted", &deleted.to_string())]);
    write_response(json!({ "deleted": deleted }))
}

fn cmd_aggregate(path: &Path, pipeline: &str) -> CliResult<()> {
    let stages = parse_pipeline(&serde_json::from_str(pipeline)?)?;

    let data = DataFile::load(path)?;
    let rows = PipelineEngine::run(data.documents, &stages)?;

    Logger::info(
        "AGGREGATE_COMPLETE",
        &[
            ("rows", &rows.len().to_string()),
            ("stages", &stages.len().to_string()),
        ],
    );
    write_response(json!({ "count": rows.len(), "results": rows }))
}

fn cmd_index_create(path: &Path, keys: &str, name: Option<String>) -> CliResult<()> {
    let value: Value = serde_json::from_str(keys)?;
    let object = value
        .as_object()
        .ok_or_else(|| InvalidQueryError::invalid_filter("index keys must be a JSON object"))?;
    if object.is_empty() {
        return Err(InvalidQueryError::invalid_filter("index keys must not be empty").into());
    }

    let mut parsed = Vec::with_capacity(object.len());
    for (field, direction) in object {
        parsed.push((field.clone(), parse_direction(field, direction)?));
    }

    let index = match name {
        Some(name) => IndexDefinition::new(name, parsed),
        None => IndexDefinition::with_derived_name(parsed),
    };
    let created = index.name.clone();

    let mut data = DataFile::load(path)?;
    let mut store = data.store();
    store.create_index(index);
    data.absorb(&store);
    data.save(path)?;

    Logger::info("INDEX_CREATED", &[("name", &created)]);
    write_response(json!({ "name": created }))
}

fn cmd_index_list(path: &Path) -> CliResult<()> {
    let data = DataFile::load(path)?;

    let indexes: Vec<Value> = data
        .indexes
        .iter()
        .map(|index| {
            let mut key = Document::new();
            for (field, direction) in &index.keys {
                key.insert(field.clone(), json!(direction.as_i64()));
            }
            json!({ "name": index.name, "key": key })
        })
        .collect();

    write_response(json!({ "indexes": indexes }))
}

fn cmd_index_explain(
    path: &Path,
    filter: &str,
    sort: Option<&str>,
    hint: Option<&str>,
) -> CliResult<()> {
    let query = build_query(filter, None, sort, 0, None)?;
    let hint = parse_hint(hint);

    let data = DataFile::load(path)?;
    let started = Instant::now();
    let mut plan: ExecutionPlan =
        IndexAdvisor::simulate(&query, &data.indexes, &hint, &data.documents)?;
    plan.elapsed_ms = Some(started.elapsed().as_millis() as u64);

    let report = ExplainReport::from_plan(&plan, &query);
    write_response(json!({
        "accepted": report.accepted,
        "access_path": report.access_path,
        "docs_examined": report.docs_examined,
        "docs_returned": report.docs_returned,
        "elapsed_ms": report.elapsed_ms,
        "rendered": report.to_string(),
    }))
}

fn plan_json(plan: &ExecutionPlan) -> Value {
    json!({
        "access_path": plan.access_path.describe(),
        "docs_examined": plan.docs_examined,
        "docs_returned": plan.docs_returned,
        "elapsed_ms": plan.elapsed_ms,
    })
}

fn build_query(
    filter: &str,
    project: Option<&str>,
    sort: Option<&str>,
    skip: usize,
    limit: Option<usize>,
) -> CliResult<QuerySpec> {
    let mut query = QuerySpec::new().with_page(PageSpec::new(skip, limit));
    query.predicates = parse_filter(&serde_json::from_str(filter)?)?;

    if let Some(projection) = project {
        query.projection = Some(parse_projection(&serde_json::from_str(projection)?)?);
    }
    if let Some(sort) = sort {
        query.sort = Some(parse_sort(&serde_json::from_str(sort)?)?);
    }
    Ok(query)
}

fn parse_hint(hint: Option<&str>) -> Hint {
    match hint {
        None => Hint::Auto,
        Some("$natural") => Hint::Natural,
        Some(name) => Hint::Index(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortDirection;
    use tempfile::tempdir;

    #[test]
    fn test_data_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shelfdb.json");

        let mut store = MemoryStore::new();
        store.insert(seed_documents());
        store.create_index(IndexDefinition::with_derived_name(vec![(
            "title".into(),
            SortDirection::Asc,
        )]));

        let mut data = DataFile::default();
        data.absorb(&store);
        data.save(&path).unwrap();

        let loaded = DataFile::load(&path).unwrap();
        assert_eq!(loaded.documents.len(), 10);
        assert_eq!(loaded.indexes.len(), 1);
        assert_eq!(loaded.indexes[0].name, "title_1");
        assert!(loaded.saved_at.is_some());
    }

    #[test]
    fn test_missing_data_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let loaded = DataFile::load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.documents.is_empty());
        assert!(loaded.indexes.is_empty());
    }

    #[test]
    fn test_corrupt_data_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shelfdb.json");
        fs::write(&path, "not json").unwrap();

        let err = DataFile::load(&path).unwrap_err();
        assert_eq!(err.code(), "SHELF_CLI_DATA_ERROR");
    }

    #[test]
    fn test_build_query() {
        let query = build_query(
            r#"{"published_year": {"$gt": 2000}}"#,
            Some(r#"{"_id": 0, "title": 1}"#),
            Some(r#"{"price": -1}"#),
            5,
            Some(5),
        )
        .unwrap();

        assert_eq!(query.predicates.len(), 1);
        assert!(query.projection.is_some());
        assert!(query.sort.is_some());
        assert_eq!(query.page.skip, 5);
        assert_eq!(query.page.limit, Some(5));
    }

    #[test]
    fn test_parse_hint() {
        assert_eq!(parse_hint(None), Hint::Auto);
        assert_eq!(parse_hint(Some("$natural")), Hint::Natural);
        assert_eq!(parse_hint(Some("title_1")), Hint::Index("title_1".into()));
    }
}
