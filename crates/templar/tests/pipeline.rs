//! End to end runs against a scratch directory

use pretty_assertions::assert_eq;
use std::path::Path;
use templar::dump::{Detail, DumpFormat, DumpOptions};
use templar::pipeline::{Error, Job, ManifestEncoding, Pipeline, Settings};
use templar::provider::{EnvPolicy, Format};

fn settings(workdir: &Path) -> Settings {
    Settings {
        workdir: workdir.to_path_buf(),
        policy: EnvPolicy::Clear,
        ..Default::default()
    }
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

/// Run a single job, returning what was written to the shared output
fn run(settings: Settings, job: Job) -> Result<String, Error> {
    let mut input = std::io::empty();
    let mut output = Vec::new();
    Pipeline::new(settings, &mut input, &mut output).run(&job)?;
    Ok(String::from_utf8(output).unwrap())
}

fn run_batch(settings: Settings, manifest: &str, encoding: ManifestEncoding) -> Result<String, Error> {
    let mut input = manifest.as_bytes();
    let mut output = Vec::new();
    let mut pipeline = Pipeline::new(settings, &mut input, &mut output);
    let manifest = pipeline.read_manifest("", encoding)?;
    pipeline.run_batch(&manifest)?;
    Ok(String::from_utf8(output).unwrap())
}

#[test]
fn key_value_input_to_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vars.env", "FOO=bar\nNUM=5\n");
    write(dir.path(), "t.tpl", "{{.FOO}}-{{.NUM}}");

    let stdout = run(
        settings(dir.path()),
        Job {
            template: "t.tpl".into(),
            input: "vars.env".into(),
            format: Format::Env,
            output: "out.txt".into(),
        },
    )
    .unwrap();

    assert_eq!(stdout, "");
    assert_eq!(read(dir.path(), "out.txt"), "bar-5");
}

#[test]
fn json_input_to_shared_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vars.json", r#"{"user": {"name": "John"}}"#);
    write(dir.path(), "t.tpl", "Hi {{ .user.name }}");

    let stdout = run(
        settings(dir.path()),
        Job {
            template: "t.tpl".into(),
            input: "vars.json".into(),
            format: Format::Json,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(stdout, "Hi John");
}

#[test]
fn environment_overrides_literal_input() {
    std::env::set_var("TEMPLAR_TEST_E2E_LAYERED", "from-env");
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "vars.env",
        "TEMPLAR_TEST_E2E_LAYERED=from-file\nONLY_FILE=kept",
    );
    write(dir.path(), "t.tpl", "{{ .TEMPLAR_TEST_E2E_LAYERED }} {{ .ONLY_FILE }}");

    let stdout = run(
        Settings {
            policy: EnvPolicy::Layered,
            ..settings(dir.path())
        },
        Job {
            template: "t.tpl".into(),
            input: "vars.env".into(),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(stdout, "from-env kept");
}

#[test]
fn empty_input_file_with_clear_policy_renders_without_variables() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vars.env", "");
    write(dir.path(), "t.tpl", r#"{{ default "none" .FOO }}"#);

    let stdout = run(
        settings(dir.path()),
        Job {
            template: "t.tpl".into(),
            input: "vars.env".into(),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(stdout, "none");
}

#[test]
fn malformed_input_names_provider() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vars.json", "{ not json");
    write(dir.path(), "t.tpl", "x");

    let error = run(
        settings(dir.path()),
        Job {
            template: "t.tpl".into(),
            input: "vars.json".into(),
            format: Format::Json,
            ..Default::default()
        },
    )
    .unwrap_err();

    assert!(matches!(error, Error::Resolve(_)));
    let chain: Vec<String> = std::iter::successors(
        Some(&error as &dyn std::error::Error),
        |e| e.source(),
    )
    .map(|e| e.to_string())
    .collect();
    assert!(chain.iter().any(|message| message.contains("json")), "{chain:?}");
}

#[test]
fn absolute_paths_ignore_workdir() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    write(other.path(), "t.tpl", "absolute");

    let template = other.path().join("t.tpl");
    let stdout = run(
        settings(dir.path()),
        Job {
            template: template.to_string_lossy().into_owned(),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(stdout, "absolute");
}

#[test]
fn skip_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t.tpl", "new");
    write(dir.path(), "out.txt", "old");

    let job = Job {
        template: "t.tpl".into(),
        output: "out.txt".into(),
        ..Default::default()
    };

    run(
        Settings {
            skip_existing: true,
            ..settings(dir.path())
        },
        job.clone(),
    )
    .unwrap();
    assert_eq!(read(dir.path(), "out.txt"), "old");

    run(settings(dir.path()), job).unwrap();
    assert_eq!(read(dir.path(), "out.txt"), "new");
}

#[test]
fn empty_template_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "empty.tpl", "");

    let error = run(
        settings(dir.path()),
        Job {
            template: "empty.tpl".into(),
            ..Default::default()
        },
    )
    .unwrap_err();

    let Error::NoTemplateContent { template } = &error else {
        panic!("expected missing template content, got {error:?}");
    };
    assert_eq!(template, &dir.path().join("empty.tpl"));
}

#[test]
fn dump_json_of_input() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vars.json", r#"{"foo": "myJSON", "user": {"age": 42}}"#);

    let stdout = run(
        Settings {
            dump: Some(DumpOptions {
                format: DumpFormat::Json,
                detail: Detail::Debug,
                compact: true,
            }),
            ..settings(dir.path())
        },
        Job {
            template: "never-read.tpl".into(),
            input: "vars.json".into(),
            format: Format::Json,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(stdout, "{\"foo\":\"myJSON\",\"user\":{\"age\":42}}\n");
}

#[test]
fn batch_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t.tpl", r#"{{ .foo }}/{{ default "none" .size }}"#);

    let manifest = r#"{
        "defaults": {"template": "t.tpl", "variables": {"foo": "bar", "size": 42}},
        "items": [
            {"output": "one.txt", "variables": {"foo": "baz"}},
            {"output": "two.txt"}
        ]
    }"#;

    let stdout = run_batch(settings(dir.path()), manifest, ManifestEncoding::Document).unwrap();

    assert_eq!(stdout, "");
    // item variables replace the default variables as a whole
    assert_eq!(read(dir.path(), "one.txt"), "baz/none");
    assert_eq!(read(dir.path(), "two.txt"), "bar/42");
}

#[test]
fn batch_item_input_replaces_default_variables() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t.tpl", r#"{{ default "unset" .foo }} {{ .own }}"#);
    write(dir.path(), "own.env", "own=file");

    let manifest = r#"{
        "defaults": {"template": "t.tpl", "variables": {"foo": "bar"}},
        "items": [{"input": "own.env", "output": "out.txt"}]
    }"#;

    run_batch(settings(dir.path()), manifest, ManifestEncoding::Document).unwrap();

    assert_eq!(read(dir.path(), "out.txt"), "unset file");
}

#[test]
fn json_lines_batch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.tpl", "A{{ .n }}");
    write(dir.path(), "b.tpl", "B{{ .n }}");

    let manifest = r#"{"template": "a.tpl", "variables": {"n": 1}}

{"template": "b.tpl", "variables": {"n": 2}}
"#;

    let stdout = run_batch(settings(dir.path()), manifest, ManifestEncoding::Lines).unwrap();

    assert_eq!(stdout, "A1B2");
}

#[test]
fn batch_fails_fast_and_keeps_earlier_outputs() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ok.tpl", "ok");

    let manifest = r#"{"items": [
        {"template": "ok.tpl", "output": "first.txt"},
        {"info": "broken", "template": "missing.tpl", "output": "second.txt"},
        {"template": "ok.tpl", "output": "third.txt"}
    ]}"#;

    let error = run_batch(settings(dir.path()), manifest, ManifestEncoding::Document).unwrap_err();

    let Error::Item { number, info, .. } = &error else {
        panic!("expected item error, got {error:?}");
    };
    assert_eq!(*number, 2);
    assert_eq!(info, "broken");
    assert_eq!(error.to_string(), "batch item 2 (broken) failed");

    assert_eq!(read(dir.path(), "first.txt"), "ok");
    assert!(!dir.path().join("third.txt").exists());
}

#[test]
fn batch_without_items() {
    let dir = tempfile::tempdir().unwrap();

    let error = run_batch(settings(dir.path()), r#"{"items": []}"#, ManifestEncoding::Document)
        .unwrap_err();

    assert!(matches!(error, Error::Manifest(_)));
}

#[test]
fn batch_dump_lists_each_item() {
    let dir = tempfile::tempdir().unwrap();

    let manifest = r#"{
        "defaults": {"variables": {"shared": 1}},
        "items": [{"variables": {"a": 1}}, {}]
    }"#;

    let stdout = run_batch(
        Settings {
            dump: Some(DumpOptions::default()),
            ..settings(dir.path())
        },
        manifest,
        ManifestEncoding::Document,
    )
    .unwrap();

    assert_eq!(stdout, "a\nshared\n");
}

#[test]
fn batch_item_with_empty_input_ignores_default_variables() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t.tpl", r#"{{ default "unset" .foo }}"#);
    write(dir.path(), "empty.env", "");

    let manifest = r#"{
        "defaults": {"template": "t.tpl", "variables": {"foo": "bar"}},
        "items": [
            {"input": "empty.env", "output": "own.txt"},
            {"output": "inherited.txt"}
        ]
    }"#;

    run_batch(settings(dir.path()), manifest, ManifestEncoding::Document).unwrap();

    assert_eq!(read(dir.path(), "own.txt"), "unset");
    assert_eq!(read(dir.path(), "inherited.txt"), "bar");
}
