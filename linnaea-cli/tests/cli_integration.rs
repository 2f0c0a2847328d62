//! End-to-end runs of the `linnaea` binary against a temporary database

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NODES: &str = "\
1\t|\t1\t|\tno rank\t|\t\t|\t8\t|\t0\t|\t1\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
2\t|\t1\t|\tsuperkingdom\t|\t\t|\t0\t|\t0\t|\t11\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
1224\t|\t2\t|\tphylum\t|\t\t|\t0\t|\t0\t|\t11\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
";

const ACCESSIONS: &str = "\
accession\taccession.version\ttaxid\tgi
A00001\tA00001.1\t1224\t1
A00002\tA00002.1\t9913\t2
";

fn loaded_db(dir: &TempDir) -> PathBuf {
    let nodes = dir.path().join("nodes.dmp");
    fs::write(&nodes, NODES).unwrap();
    let db = dir.path().join("taxonomy.sqlite");

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["load", "--db"])
        .arg(&db)
        .arg("--nodes")
        .arg(&nodes)
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes: 3 rows"));

    db
}

#[test]
fn query_parents_only_prints_lineage() {
    let dir = TempDir::new().unwrap();
    let db = loaded_db(&dir);

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["query", "--db"])
        .arg(&db)
        .args(["-t", "1224", "--no-children", "--parents"])
        .assert()
        .success()
        .stdout("1224\n2\n1\n");
}

#[test]
fn query_children_default_prints_subtree() {
    let dir = TempDir::new().unwrap();
    let db = loaded_db(&dir);

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["query", "--db"])
        .arg(&db)
        .args(["-t", "1"])
        .assert()
        .success()
        .stdout("1\n2\n1224\n");
}

#[test]
fn query_unknown_taxid_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let db = loaded_db(&dir);

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["query", "--db"])
        .arg(&db)
        .args(["-t", "999999"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn query_rejects_malformed_taxid_before_store_access() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("never-created.sqlite");

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["query", "--db"])
        .arg(&db)
        .args(["-t", "12x4"])
        .assert()
        .failure()
        .code(2);

    // Sanitization failed first, so the store was never opened
    assert!(!db.exists());
}

#[test]
fn query_json_format() {
    let dir = TempDir::new().unwrap();
    let db = loaded_db(&dir);

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["query", "--db"])
        .arg(&db)
        .args(["-t", "1224", "--no-children", "--parents", "--format", "json"])
        .assert()
        .success()
        .stdout("[1224,2,1]\n");
}

#[test]
fn filter_prints_matching_accessions() {
    let dir = TempDir::new().unwrap();
    let db = loaded_db(&dir);
    let mapping = dir.path().join("sample.accession2taxid");
    fs::write(&mapping, ACCESSIONS).unwrap();

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["filter", "--db"])
        .arg(&db)
        .args(["-t", "2", "-f"])
        .arg(&mapping)
        .assert()
        .success()
        .stdout("A00001\n");

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["filter", "--db"])
        .arg(&db)
        .args(["-t", "2", "--invert", "-f"])
        .arg(&mapping)
        .assert()
        .success()
        .stdout("A00002\n");
}

#[test]
fn export_round_trips_nodes() {
    let dir = TempDir::new().unwrap();
    let db = loaded_db(&dir);

    Command::cargo_bin("linnaea")
        .unwrap()
        .args(["export", "--db"])
        .arg(&db)
        .args(["--table", "nodes"])
        .assert()
        .success()
        .stdout(NODES);
}
