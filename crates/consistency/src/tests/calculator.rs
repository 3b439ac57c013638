use crate::{
    algorithm::{AlgorithmKind, CalculateAlgorithm, data_match::DataMatchAlgorithm},
    cancel::CheckCancellation,
    result::{CalculatedResult, RecordSetResult},
    tests::utils::{order_table_adapter, order_table_param},
};
use model::{
    core::value::Value,
    execution::properties::Properties,
    pagination::range::QueryRange,
};
use std::sync::Arc;

fn chunked_algorithm(chunk_size: i64) -> DataMatchAlgorithm {
    let mut properties = Properties::new();
    properties.insert("chunk-size", Value::Int(chunk_size));
    DataMatchAlgorithm::new(&properties)
}

fn chunk_ids(result: &RecordSetResult) -> Vec<i64> {
    result
        .records()
        .iter()
        .map(|row| row.get_value("id").as_i64().expect("integer id"))
        .collect()
}

async fn expect_records(
    stream: &mut crate::algorithm::CalculationStream,
) -> Option<RecordSetResult> {
    stream
        .next()
        .await
        .expect("chunk calculation")
        .map(|result| match result {
            CalculatedResult::Records(records) => records,
            CalculatedResult::Checksum(_) => panic!("expected record chunk"),
        })
}

#[tokio::test]
async fn test_2500_rows_yield_three_chunks_and_cover_every_row() {
    let adapter = Arc::new(order_table_adapter(2500));
    let algorithm = chunked_algorithm(1000);
    let mut stream = algorithm.calculate(order_table_param(adapter));

    let mut all_ids = Vec::new();
    let mut counts = Vec::new();
    let mut max_keys = Vec::new();
    while let Some(chunk) = expect_records(&mut stream).await {
        counts.push(chunk.records_count());
        max_keys.push(chunk.max_unique_key_value().clone());
        all_ids.extend(chunk_ids(&chunk));
    }

    assert_eq!(counts, vec![1000, 1000, 500]);
    assert_eq!(
        max_keys,
        vec![Value::Int(1000), Value::Int(2000), Value::Int(2500)]
    );
    // Every row exactly once, in full ascending key order.
    assert_eq!(all_ids, (1..=2500).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_exhausted_stream_keeps_reporting_exhaustion() {
    let adapter = Arc::new(order_table_adapter(5));
    let algorithm = chunked_algorithm(10);
    let mut stream = algorithm.calculate(order_table_param(adapter));

    assert!(expect_records(&mut stream).await.is_some());
    assert!(expect_records(&mut stream).await.is_none());
    assert!(expect_records(&mut stream).await.is_none());
}

#[tokio::test]
async fn test_empty_table_is_immediately_exhausted() {
    let adapter = Arc::new(order_table_adapter(0));
    let algorithm = chunked_algorithm(1000);
    let mut stream = algorithm.calculate(order_table_param(adapter));
    assert!(expect_records(&mut stream).await.is_none());
}

#[tokio::test]
async fn test_resumed_run_completes_an_interrupted_walk() {
    let adapter = Arc::new(order_table_adapter(2500));
    let algorithm = chunked_algorithm(1000);

    let mut first_run = algorithm.calculate(order_table_param(adapter.clone()));
    let first_chunk = expect_records(&mut first_run).await.expect("first chunk");
    let mut ids = chunk_ids(&first_chunk);
    let resume_position = first_chunk.max_unique_key_value().clone();
    drop(first_run);

    // A resume happens in a fresh process with a fresh algorithm instance.
    let resumed_algorithm = chunked_algorithm(1000);
    let param = order_table_param(adapter)
        .with_query_range(QueryRange::resuming_after(resume_position));
    let mut resumed = resumed_algorithm.calculate(param);
    while let Some(chunk) = expect_records(&mut resumed).await {
        ids.extend(chunk_ids(&chunk));
    }

    assert_eq!(ids, (1..=2500).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_inclusive_upper_bound_stops_the_walk() {
    let adapter = Arc::new(order_table_adapter(2500));
    let algorithm = chunked_algorithm(1000);
    let param = order_table_param(adapter)
        .with_query_range(QueryRange::new(None, false, Some(Value::Int(1500))));
    let mut stream = algorithm.calculate(param);

    let mut counts = Vec::new();
    let mut last_max = Value::Null;
    while let Some(chunk) = expect_records(&mut stream).await {
        counts.push(chunk.records_count());
        last_max = chunk.max_unique_key_value().clone();
    }
    assert_eq!(counts, vec![1000, 500]);
    assert_eq!(last_max, Value::Int(1500));
}

#[tokio::test]
async fn test_point_query_is_a_single_chunk() {
    let adapter = Arc::new(order_table_adapter(100));
    let algorithm = chunked_algorithm(1000);
    let param = order_table_param(adapter).with_point_query(vec![Value::Int(42)]);
    let mut stream = algorithm.calculate(param);

    let chunk = expect_records(&mut stream).await.expect("point result");
    assert_eq!(chunk.records_count(), 1);
    assert_eq!(chunk.max_unique_key_value(), &Value::Int(42));
    assert!(expect_records(&mut stream).await.is_none());
}

#[tokio::test]
async fn test_cancellation_mid_chunk_is_visible_not_empty() {
    let adapter = Arc::new(order_table_adapter(2500).with_cancel_after_rows(500));
    let algorithm = chunked_algorithm(1000);
    let mut stream = algorithm.calculate(order_table_param(adapter));

    let outcome = stream.next().await;
    match outcome {
        Err(error) => assert!(error.is_cancelled()),
        Ok(result) => panic!("expected cancellation, got {result:?}"),
    }
}

#[tokio::test]
async fn test_cancel_handle_fires_once_and_attempts_statement_cancel() {
    let adapter = Arc::new(order_table_adapter(10));
    let cancellation = CheckCancellation::new();

    cancellation.cancel(adapter.as_ref()).await;
    cancellation.cancel(adapter.as_ref()).await;

    assert!(cancellation.is_cancelled());
    assert_eq!(adapter.cancel_calls(), 1);
}

#[tokio::test]
async fn test_pre_cancelled_parameter_never_queries() {
    let adapter = Arc::new(order_table_adapter(10));
    let cancellation = CheckCancellation::new();
    let algorithm = chunked_algorithm(5);
    let param = order_table_param(adapter).with_cancel(cancellation.token());

    cancellation.cancel(param.adapter.as_ref()).await;
    let mut stream = algorithm.calculate(param);
    assert!(stream.next().await.is_err_and(|e| e.is_cancelled()));
}

#[test]
fn test_registry_builds_a_data_match_instance() {
    let algorithm = AlgorithmKind::DataMatch.new_algorithm(&Properties::new());
    assert_eq!(algorithm.kind(), AlgorithmKind::DataMatch);
}
