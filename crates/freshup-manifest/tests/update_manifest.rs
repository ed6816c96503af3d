//! End-to-end manifest update against temporary project directories

use freshup_manifest::{update_manifest, ManifestError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const LEGACY: &str = r#"{
  "lock": false,
  "tasks": {
    "start": "deno run -A --watch=static/,routes/ dev.ts",
    "preview": "deno run -A main.ts",
    "update": "deno run -A -r https://fresh.deno.dev/update ."
  },
  "imports": {
    "$fresh/": "https://deno.land/x/fresh@1.7.3/",
    "preact": "https://esm.sh/preact@10.22.0"
  }
}
"#;

const UPGRADED: &str = r#"{
  "tasks": {
    "start": "deno run -A --watch=static/,routes/ dev.ts",
    "preview": "deno serve -A _fresh/server.js"
  },
  "imports": {
    "preact": "npm:preact@^10.26.9",
    "fresh": "jsr:@fresh/core@^2.0.0",
    "@preact/signals": "npm:@preact/signals@^2.2.1"
  }
}
"#;

#[tokio::test]
async fn missing_manifest_is_skipped() {
    let dir = TempDir::new().unwrap();
    let update = update_manifest(dir.path()).await.unwrap();
    assert_eq!(update.path, None);
    assert!(!update.written);
}

#[tokio::test]
async fn deno_json_is_upgraded_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deno.json");
    tokio::fs::write(&path, LEGACY).await.unwrap();

    let first = update_manifest(dir.path()).await.unwrap();
    assert_eq!(first.path.as_deref(), Some(path.as_path()));
    assert!(first.written);
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), UPGRADED);

    let second = update_manifest(dir.path()).await.unwrap();
    assert!(!second.written);
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), UPGRADED);
}

#[tokio::test]
async fn deno_jsonc_with_comments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deno.jsonc");
    tokio::fs::write(
        &path,
        "{\n  // project tasks\n  \"tasks\": { \"preview\": \"deno run -A main.ts\", },\n}\n",
    )
    .await
    .unwrap();

    let update = update_manifest(dir.path()).await.unwrap();
    assert!(update.written);
    let text = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(text.contains("\"preview\": \"deno serve -A _fresh/server.js\""));
    assert!(text.contains("\"fresh\": \"jsr:@fresh/core@^2.0.0\""));
}

#[tokio::test]
async fn deno_json_wins_over_jsonc() {
    let dir = TempDir::new().unwrap();
    tokio::fs::write(dir.path().join("deno.json"), "{}").await.unwrap();
    tokio::fs::write(dir.path().join("deno.jsonc"), "{}").await.unwrap();

    let update = update_manifest(dir.path()).await.unwrap();
    assert_eq!(update.path, Some(dir.path().join("deno.json")));
    assert_eq!(
        tokio::fs::read_to_string(dir.path().join("deno.jsonc")).await.unwrap(),
        "{}"
    );
}

#[tokio::test]
async fn malformed_manifest_is_an_error() {
    let dir = TempDir::new().unwrap();
    tokio::fs::write(dir.path().join("deno.json"), "{ \"tasks\": ")
        .await
        .unwrap();
    let err = update_manifest(dir.path()).await.unwrap_err();
    assert!(matches!(err, ManifestError::Syntax { .. }));
}
