//! Resolve, fallback and pipeline against a small in-memory corpus

use async_trait::async_trait;
use datagov_config::ExpansionTable;
use datagov_core::{
    Corpus, Dataset, FetchError, FetchRequest, Field, FieldAvailability, Record, RecordPage,
    RecordSource, Resource, ResourceFormat, Schema,
};
use datagov_retrieval::{
    rephrase, ColumnAggregate, ConfidenceLevel, QueryData, QueryOutcome, QueryPipeline,
    ResourceResolver, ScoringWeights, SearchOutcome, SynonymIndex,
};
use datagov_text_processing::Gazetteer;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn resource(id: &str, format: &str) -> Resource {
    Resource {
        id: id.to_string(),
        title: String::new(),
        name: format!("{id}.{}", format.to_lowercase()),
        format: ResourceFormat::parse(format),
        schema: None,
    }
}

fn dataset(id: &str, title: &str, tags: &[&str], resources: Vec<Resource>) -> Dataset {
    Dataset {
        id: id.to_string(),
        title: title.to_string(),
        name: id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        organization: String::new(),
        keywords: vec![],
        categories: vec![],
        resources,
    }
}

fn resolver(datasets: Vec<Dataset>) -> ResourceResolver {
    ResourceResolver::new(
        Corpus::new(datasets).unwrap(),
        ExpansionTable::builtin(),
        Gazetteer::default(),
    )
}

fn hospital_corpus() -> Vec<Dataset> {
    vec![
        dataset(
            "hospitals",
            "בתי חולים ציבוריים",
            &["health", "hospital"],
            vec![resource("hosp-csv", "CSV")],
        ),
        dataset(
            "roads",
            "Road Maintenance",
            &[],
            vec![resource("road-csv", "CSV")],
        ),
    ]
}

/// Returns canned records and remembers every request
struct TableSource {
    page: RecordPage,
    requests: Mutex<Vec<FetchRequest>>,
}

impl TableSource {
    fn new(records: Vec<Value>, fields: Vec<Field>) -> Self {
        let records: Vec<Record> = records
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Self {
            page: RecordPage {
                total: Some(records.len() as u64),
                records,
                fields,
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> FetchRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl RecordSource for TableSource {
    async fn search(&self, request: &FetchRequest) -> Result<RecordPage, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.page.clone())
    }

    fn name(&self) -> &str {
        "table"
    }
}

#[test]
fn test_hospitals_in_jerusalem() {
    let resolver = resolver(hospital_corpus());
    let result = resolver.resolve("hospitals in jerusalem", 5);

    assert_eq!(result.decomposition.subject_tokens, vec!["hospitals"]);
    assert_eq!(result.decomposition.location_tokens, vec!["jerusalem"]);

    assert_eq!(result.candidates.len(), 1);
    let top = &result.candidates[0];
    assert_eq!(top.resource_id, "hosp-csv");
    assert_eq!(top.location_score, 0.0);
    assert!(top.subject_score >= 0.15);
    // subject share plus the CSV bonus, before any keyword bonus
    assert!(top.score + 0.001 >= 0.7 * top.subject_score + 0.15);

    let templates = &result.templates[0];
    assert!(templates
        .datastore_search_get
        .url
        .contains("resource_id=hosp-csv&limit=100&offset=0"));
    assert!(templates.package_show.url.ends_with("package_show?id=hospitals"));
}

#[test]
fn test_short_hebrew_stem_does_not_match_unrelated_title() {
    let resolver = ResourceResolver::new(
        Corpus::new(vec![dataset(
            "d1",
            "הוצאות ממשלה",
            &[],
            vec![resource("r1", "CSV")],
        )])
        .unwrap(),
        ExpansionTable::new(),
        Gazetteer::default(),
    );
    let result = resolver.resolve("שמות", 5);
    assert_eq!(result.decomposition.subject_tokens, vec!["שמות"]);
    assert!(result.candidates.is_empty());
    assert_eq!(result.total_matched, 0);
}

#[test]
fn test_location_alone_never_matches() {
    let resolver = resolver(vec![dataset(
        "parking",
        "Jerusalem Parking Lots",
        &["jerusalem"],
        vec![resource("park-csv", "CSV")],
    )]);
    let result = resolver.resolve("xyzzy jerusalem", 5);
    assert_eq!(result.decomposition.subject_tokens, vec!["xyzzy"]);
    assert!(result.candidates.is_empty());
    assert_eq!(result.total_matched, 0);
    assert!(result.message.is_some());
}

#[test]
fn test_title_match_raises_subject_score() {
    let resolver = resolver(vec![
        dataset("a", "Schools", &[], vec![resource("with", "CSV")]),
        dataset("b", "Registry", &[], vec![resource("without", "CSV")]),
    ]);
    let weights = resolver.weights();
    let decomposition = resolver.decompose("schools");
    let with = weights.subject_match(
        &decomposition.subject_tokens,
        &decomposition.expanded_subjects,
        "Schools a",
    );
    let without = weights.subject_match(
        &decomposition.subject_tokens,
        &decomposition.expanded_subjects,
        "Registry b",
    );
    assert!(with > without);
}

#[test]
fn test_synonym_groups_merge_symmetrically() {
    let table: ExpansionTable = vec![
        ("clinic".to_string(), vec!["מרפאה".to_string()]),
        ("מרפאה".to_string(), vec!["health center".to_string()]),
    ]
    .into_iter()
    .collect();
    let index = SynonymIndex::build(&table);

    let clinic = index.synonyms("clinic");
    let hebrew = index.synonyms("מרפאה");
    assert!(clinic.contains(&"מרפאה".to_string()));
    assert!(hebrew.contains(&"clinic".to_string()));
    assert!(hebrew.contains(&"health center".to_string()));
    assert!(index.synonyms("health center").contains(&"מרפאה".to_string()));
    assert_eq!(index.synonyms("unknown"), vec!["unknown"]);
}

#[test]
fn test_fallback_outcomes() {
    let resolver = resolver(hospital_corpus());
    assert!(matches!(
        resolver.resolve_with_fallback("hospitals", 5),
        SearchOutcome::Found { .. }
    ));
    assert!(matches!(
        resolver.resolve_with_fallback("מה יש", 5),
        SearchOutcome::TooVague { .. }
    ));
    match resolver.resolve_with_fallback("submarines", 5) {
        SearchOutcome::NotFound { attempted, .. } => {
            assert!(attempted.len() <= 3);
            assert!(attempted.iter().all(|a| a != "submarines"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_fallback_stops_at_first_confident_rephrasing() {
    let resolver = resolver(vec![dataset(
        "d1",
        "health centers",
        &[],
        vec![resource("centers-csv", "CSV")],
    )]);
    let query = "בריאות qqqq wwww zzzz";
    let threshold = resolver.weights().confidence_threshold;

    let first = resolver.resolve(query, 5);
    assert!(first.top_score() < threshold);

    let expected = rephrase(
        query,
        resolver.gazetteer(),
        resolver.synonyms(),
        resolver.weights().max_rephrasings,
    )
    .into_iter()
    .find(|alternative| resolver.resolve(alternative, 5).top_score() >= threshold)
    .expect("some rephrasing clears the threshold");

    match resolver.resolve_with_fallback(query, 5) {
        SearchOutcome::Found {
            result,
            rephrased_query,
        } => {
            assert_eq!(rephrased_query.as_deref(), Some(expected.as_str()));
            assert_ne!(expected, query);
            assert_eq!(result.query, expected);
            assert_eq!(result.candidates[0].resource_id, "centers-csv");
            assert!(result.top_score() >= threshold);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// PDF report on top, CSV table well below it. Only the format bonus
/// separates the two resources of a dataset.
fn report_and_table_pipeline(confidence: f64, medium: f64) -> QueryPipeline {
    let weights = ScoringWeights {
        subject_weight: 0.3,
        resource_title_weight: 0.0,
        format_pdf: 0.9,
        format_csv: 0.0,
        keyword_index_factor: 0.0,
        confidence_threshold: confidence,
        medium_confidence_threshold: medium,
        ..ScoringWeights::default()
    };
    let resolver = ResourceResolver::new(
        Corpus::new(vec![
            dataset(
                "hospitals",
                "Hospitals",
                &[],
                vec![resource("report-pdf", "PDF"), resource("table-csv", "CSV")],
            ),
            dataset(
                "archive",
                "Hospitals Archive",
                &[],
                vec![resource("archive-pdf", "PDF")],
            ),
        ])
        .unwrap(),
        ExpansionTable::new(),
        Gazetteer::default(),
    )
    .with_weights(weights);
    let source = Arc::new(TableSource::new(vec![], vec![]));
    QueryPipeline::new(Arc::new(resolver), source)
}

async fn run_for_data(pipeline: &QueryPipeline, query: &str) -> QueryData {
    match pipeline.run(query, None, 0).await.unwrap() {
        QueryOutcome::Data(data) => *data,
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_low_confidence_warning_lists_alternatives() {
    let pipeline = report_and_table_pipeline(0.5, 0.6);
    let data = run_for_data(&pipeline, "hospitals").await;

    // the table is chosen over the better-scoring report
    assert_eq!(data.metadata.resource_id, "table-csv");
    assert!((data.metadata.score - 0.3).abs() < 1e-9);

    let warning = data.confidence_warning.unwrap();
    assert_eq!(warning.level, ConfidenceLevel::Low);
    assert!(warning.message.starts_with("No dataset closely matches"));
    assert!((warning.score - 0.3).abs() < 1e-9);
    assert!(!warning.alternatives.is_empty() && warning.alternatives.len() <= 3);
    assert!(warning.alternatives.contains(&"Hospitals".to_string()));
    assert!(warning.alternatives.contains(&"Hospitals Archive".to_string()));
}

#[tokio::test]
async fn test_medium_confidence_warning() {
    let pipeline = report_and_table_pipeline(0.25, 0.6);
    let data = run_for_data(&pipeline, "hospitals").await;

    assert_eq!(data.metadata.resource_id, "table-csv");
    let warning = data.confidence_warning.unwrap();
    assert_eq!(warning.level, ConfidenceLevel::Medium);
    assert!(warning.message.starts_with("Partial match found"));
    assert!(warning.alternatives.is_empty());
}

#[tokio::test]
async fn test_no_warning_above_medium_band() {
    let pipeline = report_and_table_pipeline(0.2, 0.29);
    let data = run_for_data(&pipeline, "hospitals").await;

    assert_eq!(data.metadata.resource_id, "table-csv");
    assert!(data.confidence_warning.is_none());
}

#[tokio::test]
async fn test_count_query_sums_numeric_columns() {
    let resolver = resolver(vec![dataset(
        "ev",
        "רכבים חשמליים",
        &["vehicle", "electric"],
        vec![resource("ev-csv", "CSV")],
    )]);
    let source = Arc::new(TableSource::new(
        vec![
            json!({"_id": 1, "city": "חיפה", "count": "1,200"}),
            json!({"_id": 2, "city": "לוד", "count": 300}),
            json!({"_id": 3, "city": "אילת", "count": null}),
            json!({"_id": 4, "city": "ערד", "count": "unknown"}),
        ],
        vec![
            Field::new("_id", "int"),
            Field::new("city", "text"),
            Field::new("count", "int"),
        ],
    ));
    let pipeline = QueryPipeline::new(Arc::new(resolver), source.clone());

    let outcome = pipeline.run("כמה רכבים חשמליים", Some(10), 0).await.unwrap();
    let data = match outcome {
        QueryOutcome::Data(data) => data,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert!(data.metadata.is_count_query);
    assert_eq!(source.last_request().limit, 100);
    assert_eq!(data.fields, vec!["city", "count"]);
    assert_eq!(data.total, 4);
    assert!(!data.metadata.has_more);

    let aggregates = data.aggregates.unwrap();
    assert_eq!(aggregates.len(), 1);
    assert_eq!(aggregates["count"], ColumnAggregate { sum: 1500.0, count: 2 });
}

#[tokio::test]
async fn test_location_becomes_plain_text_filter() {
    let resolver = resolver(vec![dataset(
        "schools",
        "בתי ספר",
        &["education", "schools"],
        vec![resource("school-csv", "CSV")],
    )]);
    let source = Arc::new(TableSource::new(vec![json!({"_id": 1, "name": "א"})], vec![]));
    let pipeline = QueryPipeline::new(Arc::new(resolver), source.clone());

    let outcome = pipeline.run("בתי ספר ירושלים", Some(500), 20).await.unwrap();
    let QueryOutcome::Data(data) = outcome else {
        panic!("expected data");
    };

    let request = source.last_request();
    assert_eq!(request.limit, 100);
    assert_eq!(request.offset, 20);
    assert_eq!(request.q.as_deref(), Some("ירושלים"));
    assert_eq!(request.plain, Some(true));
    assert!(data.metadata.filter_applied);
    assert_eq!(data.metadata.location_filter, vec!["ירושלים"]);
    assert!(data.aggregates.is_none());
}

#[tokio::test]
async fn test_missing_fields_degrade_gracefully() {
    let mut no_phone = resource("hosp-csv", "CSV");
    let mut schema = Schema::new(vec![
        Field::new("_id", "int"),
        Field::new("שם_בית_חולים", "text"),
        Field::new("כתובת", "text"),
    ]);
    schema.field_availability = FieldAvailability {
        has_phone: false,
        ..Default::default()
    };
    no_phone.schema = Some(schema);

    let resolver = resolver(vec![dataset(
        "hospitals",
        "בתי חולים hospitals phone address",
        &["health", "hospital"],
        vec![no_phone],
    )]);
    let source = Arc::new(TableSource::new(vec![], vec![]));
    let pipeline = QueryPipeline::new(Arc::new(resolver), source.clone());

    let outcome = pipeline.run("hospitals phone address", None, 0).await.unwrap();
    let QueryOutcome::Data(data) = outcome else {
        panic!("expected data");
    };

    // the only candidate lacks phones but is kept
    assert_eq!(data.metadata.resource_id, "hosp-csv");
    let warning = data.field_warning.unwrap();
    // "address" also implies "addresses" and "כתובת"; "phone" implies
    // "phones", "טלפון" and "contact"
    assert_eq!(warning.missing_intents, vec!["phone", "phones", "טלפון", "contact"]);
    assert_eq!(warning.matched_fields, vec!["כתובת"]);
    assert_eq!(source.last_request().fields, vec!["כתובת"]);
    assert_eq!(source.last_request().limit, 20);
    assert!(data.aggregates.is_none());
}

#[tokio::test]
async fn test_pipeline_rejects_empty_query() {
    let resolver = resolver(hospital_corpus());
    let source = Arc::new(TableSource::new(vec![], vec![]));
    let pipeline = QueryPipeline::new(Arc::new(resolver), source);
    assert!(pipeline.run("   ", None, 0).await.is_err());
}

#[tokio::test]
async fn test_pipeline_reports_not_found() {
    let resolver = resolver(hospital_corpus());
    let source = Arc::new(TableSource::new(vec![], vec![]));
    let pipeline = QueryPipeline::new(Arc::new(resolver), source.clone());
    let outcome = pipeline.run("submarines", None, 0).await.unwrap();
    assert!(matches!(outcome, QueryOutcome::NotFound { .. }));
    assert!(source.requests.lock().unwrap().is_empty());
}

#[test]
fn test_medium_confidence_levels_serialize() {
    let value = serde_json::to_value(ConfidenceLevel::Medium).unwrap();
    assert_eq!(value, json!("medium"));
}
