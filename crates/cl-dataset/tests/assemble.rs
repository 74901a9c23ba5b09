use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use cl_dataset::{AssembleError, DatasetKind, Value, assemble, read_result_file};

const ID: &str = "run-row14-workload-microAllReduce.txt-system-ring_ring.txt-network-ring64_ring64.json-commscale-2-unitscount-4 4-passes-10";

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn end_to_end_csv() -> String {
    format!(
        "RunName,CommsTime,TotalPayloadSize,PayloadSize_Dim0,PayloadSize_Dim1,Cost\n\
         {ID},4,800,600,200,1000\n\
         ,,,,,\n"
    )
}

#[test]
fn merges_files_and_keeps_duplicates() {
    let root = unique_temp_dir("cl_dataset_merge");
    write(&root.join("a/backend_end_to_end.csv"), &end_to_end_csv());
    write(&root.join("b/nested/backend_end_to_end.csv"), &end_to_end_csv());
    write(&root.join("b/backend_dim_info.csv"), "RunName,DimensionIndex\n");
    write(&root.join("c/other.csv"), "garbage");

    let table = assemble(&root, DatasetKind::EndToEnd).expect("assembly should succeed");
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0], table.rows()[1]);

    let row = &table.rows()[0];
    assert_eq!(row.run.row, "row14");
    assert_eq!(row.run.topology, "ring64_ring64");
    assert_eq!(row.get("CommsTime"), Some(Value::Float(4.0)));
    assert_eq!(row.get("RunName"), None);

    assert_eq!(
        table.raw_columns(),
        &[
            "CommsTime",
            "TotalPayloadSize",
            "PayloadSize_Dim0",
            "PayloadSize_Dim1",
            "Cost"
        ]
    );
    assert_eq!(table.payload_dimensions(), vec![0, 1]);
}

#[test]
fn selects_file_by_kind() {
    let root = unique_temp_dir("cl_dataset_kind");
    write(&root.join("backend_end_to_end.csv"), &end_to_end_csv());
    write(
        &root.join("backend_dim_info.csv"),
        &format!("RunName,DimensionIndex,AverageChunkLatency\n{ID},0,12.5\n{ID},1,30\n"),
    );

    let layer = assemble(&root, DatasetKind::LayerWise).unwrap();
    assert_eq!(layer.len(), 2);
    assert_eq!(layer.rows()[1].number("AverageChunkLatency"), Some(30.0));
}

#[test]
fn empty_tree_gives_empty_table() {
    let root = unique_temp_dir("cl_dataset_empty");
    let table = assemble(&root, DatasetKind::EndToEnd).unwrap();
    assert!(table.is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let root = unique_temp_dir("cl_dataset_missing").join("does-not-exist");
    let err = assemble(&root, DatasetKind::EndToEnd).unwrap_err();
    assert!(matches!(err, AssembleError::SearchRootMissing { .. }));
}

#[test]
fn malformed_identifier_aborts_assembly() {
    let root = unique_temp_dir("cl_dataset_malformed");
    write(&root.join("a/backend_end_to_end.csv"), &end_to_end_csv());
    write(
        &root.join("b/backend_end_to_end.csv"),
        "RunName,CommsTime\nrun-short-id,4\n",
    );

    let err = assemble(&root, DatasetKind::EndToEnd).unwrap_err();
    match err {
        AssembleError::Decode { path, line, .. } => {
            assert!(path.ends_with("b/backend_end_to_end.csv"));
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_without_identifier_column_is_rejected() {
    let root = unique_temp_dir("cl_dataset_no_id");
    let path = root.join("backend_end_to_end.csv");
    write(&path, "CommsTime,TotalPayloadSize\n4,800\n");
    let err = read_result_file(&path).unwrap_err();
    assert!(matches!(err, AssembleError::MissingIdentifierColumn { .. }));
}
