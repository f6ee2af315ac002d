#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn fixture_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jsonapi-view"));
    cmd.env_remove("RUST_LOG")
        .env_remove("JSONAPI_VIEW_CONFIG_FILE")
        .env_remove("JSONAPI_VIEW__RENDER__DEBUG")
        .env_remove("JSONAPI_VIEW__RENDER__URL_PREFIX");
    cmd
}

const ARTICLE_FIXTURE: &str = r#"{
    "directives": {
        "entities": ["Article"],
        "fieldSets": {"articles": ["title", "author"]},
        "pagination": {"self": "/articles?page=1"},
        "debugQueryLog": true
    },
    "vars": {
        "articles": [
            {"entity": "Article", "id": 1, "attributes": {"title": "Hello", "body": "..."},
             "relationships": {"author": {"entity": "Person", "id": 9, "attributes": {"name": "Ada"}}}}
        ]
    },
    "schemas": {
        "Article": {"includePaths": ["author"]}
    },
    "queryLog": [{"query": "SELECT * FROM articles", "took": 3}]
}"#;

#[test]
fn renders_fixture_to_stdout() {
    let fixture = fixture_file(ARTICLE_FIXTURE);
    cli()
        .arg("render")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(
            r#"{"links":{"self":"/articles?page=1"},"data":[{"type":"articles","id":"1","attributes":{"title":"Hello"},"relationships":{"author":{"data":{"type":"people","id":"9"}}}}],"included":[{"type":"people","id":"9","attributes":{"name":"Ada"}}]}
"#,
        );
}

#[test]
fn debug_flag_adds_query_log_and_self_links() {
    let fixture = fixture_file(ARTICLE_FIXTURE);
    let assert = cli()
        .arg("render")
        .arg("--debug")
        .arg("--url-prefix")
        .arg("https://api.test")
        .arg(fixture.path())
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let document: serde_json::Value = serde_json::from_str(&output).expect("stdout is json");
    assert_eq!(document["query"][0]["took"], 3);
    assert_eq!(
        document["data"][0]["links"]["self"],
        "https://api.test/articles/1"
    );
}

#[test]
fn empty_body_prints_nothing() {
    let fixture = fixture_file(r#"{"vars": {"articles": []}}"#);
    cli()
        .arg("render")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn unknown_entity_fails_with_its_name() {
    let fixture = fixture_file(r#"{"directives": {"entities": ["Ghost"]}}"#);
    cli()
        .arg("render")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(contains("Ghost"));
}

#[test]
fn missing_fixture_fails_fast() {
    cli()
        .arg("render")
        .arg("/nonexistent/fixture.json")
        .assert()
        .failure()
        .stderr(contains("fixture"));
}

#[test]
fn invalid_url_prefix_is_a_configuration_error() {
    let fixture = fixture_file(ARTICLE_FIXTURE);
    cli()
        .arg("render")
        .arg("--url-prefix")
        .arg("api/v1")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(contains("render.url_prefix"));
}
