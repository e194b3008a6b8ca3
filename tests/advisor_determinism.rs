//! Access-path selection invariants over the sample corpus
//!
//! - The compound prefix rule picks the best usable index
//! - $natural forces a full scan whatever is declared
//! - Unknown index names are surfaced, never ignored
//! - Examined and returned counts are reported separately

use serde_json::json;

use shelfdb::advisor::{AccessPath, Hint, IndexAdvisor, IndexDefinition};
use shelfdb::executor::QueryExecutor;
use shelfdb::query::{parse_filter, QuerySpec, SortDirection};
use shelfdb::store::{seed_documents, DocumentStore, MemoryStore};

fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(seed_documents());
    store
}

fn title_and_compound_indexes() -> Vec<IndexDefinition> {
    vec![
        IndexDefinition::with_derived_name(vec![("title".into(), SortDirection::Asc)]),
        IndexDefinition::with_derived_name(vec![
            ("author".into(), SortDirection::Asc),
            ("published_year".into(), SortDirection::Asc),
        ]),
    ]
}

fn query_from(filter: serde_json::Value) -> QuerySpec {
    let mut query = QuerySpec::new();
    query.predicates = parse_filter(&filter).unwrap();
    query
}

#[test]
fn compound_index_wins_over_unusable_single_field_index() {
    let query = query_from(json!({
        "author": "Margaret Atwood",
        "published_year": {"$gt": 1980}
    }));

    let plan = IndexAdvisor::choose_plan(&query, &title_and_compound_indexes(), &Hint::Auto)
        .unwrap();
    assert_eq!(
        plan.access_path,
        AccessPath::IndexScan("author_1_published_year_1".into())
    );
}

#[test]
fn title_query_uses_title_index() {
    let query = query_from(json!({"title": "Dune"}));

    let plan = IndexAdvisor::choose_plan(&query, &title_and_compound_indexes(), &Hint::Auto)
        .unwrap();
    assert_eq!(plan.access_path, AccessPath::IndexScan("title_1".into()));
}

#[test]
fn natural_hint_forces_full_scan_despite_indexes() {
    let store = seeded_store();
    let query = query_from(json!({"title": "Dune"}));

    let plan = IndexAdvisor::simulate(
        &query,
        &title_and_compound_indexes(),
        &Hint::Natural,
        &store.fetch_all(),
    )
    .unwrap();

    assert_eq!(plan.access_path, AccessPath::FullScan);
    // The full scan examines the whole corpus for a single row.
    assert_eq!(plan.docs_examined, 10);
    assert_eq!(plan.docs_returned, 1);
}

#[test]
fn unknown_index_hint_is_an_error() {
    let query = query_from(json!({"title": "Dune"}));

    let err = IndexAdvisor::choose_plan(
        &query,
        &title_and_compound_indexes(),
        &Hint::Index("isbn_1".into()),
    )
    .unwrap_err();

    assert_eq!(err.code(), "SHELF_UNKNOWN_INDEX");
    assert_eq!(err.name(), "isbn_1");
}

#[test]
fn score_ties_go_to_declaration_order() {
    let query = query_from(json!({"title": "Dune", "genre": "Science Fiction"}));

    let declared = vec![
        IndexDefinition::with_derived_name(vec![("genre".into(), SortDirection::Asc)]),
        IndexDefinition::with_derived_name(vec![("title".into(), SortDirection::Asc)]),
    ];
    let plan = IndexAdvisor::choose_plan(&query, &declared, &Hint::Auto).unwrap();
    assert_eq!(plan.access_path, AccessPath::IndexScan("genre_1".into()));

    let reversed: Vec<IndexDefinition> = declared.into_iter().rev().collect();
    let plan = IndexAdvisor::choose_plan(&query, &reversed, &Hint::Auto).unwrap();
    assert_eq!(plan.access_path, AccessPath::IndexScan("title_1".into()));
}

#[test]
fn examined_is_reported_separately_from_returned() {
    let store = seeded_store();
    let indexes = vec![IndexDefinition::with_derived_name(vec![(
        "genre".into(),
        SortDirection::Asc,
    )])];

    // The index narrows to the three Science Fiction rows; the residual
    // predicates narrow further to one.
    let query = query_from(json!({
        "genre": "Science Fiction",
        "price": {"$gt": 13}
    }));

    let plan = IndexAdvisor::simulate(&query, &indexes, &Hint::Auto, &store.fetch_all()).unwrap();
    assert_eq!(plan.access_path, AccessPath::IndexScan("genre_1".into()));
    assert_eq!(plan.docs_examined, 3);
    assert_eq!(plan.docs_returned, 1);
}

#[test]
fn executor_carries_plan_statistics() {
    let store = seeded_store();
    let indexes = title_and_compound_indexes();

    let query = query_from(json!({"title": "Dune"}));
    let result =
        QueryExecutor::execute(&store.fetch_all(), &indexes, &query, &Hint::Auto).unwrap();

    assert_eq!(result.plan.access_path, AccessPath::IndexScan("title_1".into()));
    assert_eq!(result.plan.docs_examined, 1);
    assert_eq!(result.len(), 1);
    // The engine leaves timing to the calling collaborator.
    assert_eq!(result.plan.elapsed_ms, None);
}

#[test]
fn store_registry_feeds_the_advisor() {
    let mut store = seeded_store();
    store.create_index(IndexDefinition::with_derived_name(vec![(
        "title".into(),
        SortDirection::Asc,
    )]));
    store.create_index(IndexDefinition::with_derived_name(vec![
        ("author".into(), SortDirection::Asc),
        ("published_year".into(), SortDirection::Asc),
    ]));

    let query = query_from(json!({
        "author": "Margaret Atwood",
        "published_year": {"$gt": 1980}
    }));
    let result = QueryExecutor::execute(
        &store.fetch_all(),
        &store.fetch_indexes(),
        &query,
        &Hint::Auto,
    )
    .unwrap();

    assert_eq!(
        result.plan.access_path,
        AccessPath::IndexScan("author_1_published_year_1".into())
    );
    assert_eq!(result.plan.docs_examined, 1);
    assert_eq!(result.len(), 1);
}
