//! End-to-end pipeline tests against stub external tools.
//!
//! The fetch and render tools are replaced by small shell scripts, so the
//! whole merge/reorder/backup/compare flow runs for real on a temp tree.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use bdfr_merge::document::assemble;
use bdfr_merge::pipeline::{Pipeline, RunOutcome};
use bdfr_merge::settings::Settings;

fn record(id: &str, subreddit: &str) -> String {
    // The multi-attribute shape bdfrtohtml actually emits.
    format!(
        "<div class=\"post\" id=\"{id}\" data-score=\"42\">\
         <a class=\"subreddit-link\" href=\"https://reddit.com/r/{subreddit}\" target=\"_blank\">r/{subreddit}</a>\
         <a class=\"post-link\" href=\"{id}.html\" target=\"_blank\">{id}</a></div>"
    )
}

/// Write an executable shell script and return its path.
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A render stub that copies a prepared index into its --output_folder and
/// adds a stylesheet plus one per-post page.
fn render_stub(dir: &Path, fixture_index: &Path, post_file: &str) -> PathBuf {
    let body = format!(
        "#!/bin/sh\n\
         out=\"\"\n\
         while [ $# -gt 0 ]; do\n\
         \tcase \"$1\" in --output_folder) out=\"$2\";; esac\n\
         \tshift\n\
         done\n\
         mkdir -p \"$out\"\n\
         cp \"{fixture}\" \"$out/index.html\"\n\
         printf 'generated styles' > \"$out/style.css\"\n\
         printf 'post page' > \"$out/{post}\"\n",
        fixture = fixture_index.display(),
        post = post_file,
    );
    write_script(dir, "render_stub.sh", &body)
}

struct Harness {
    _temp: TempDir,
    root: PathBuf,
    existing: PathBuf,
    pipeline: Pipeline,
}

/// Existing output: records a@foo and b@bar. Generated output: record c@foo.
fn harness() -> Harness {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("work");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("my_config.cfg"), "[DEFAULT]\n").unwrap();

    let existing = temp.path().join("html");
    fs::create_dir_all(&existing).unwrap();
    fs::write(
        existing.join("index.html"),
        assemble(&format!("{}{}", record("a", "foo"), record("b", "bar"))),
    )
    .unwrap();
    fs::write(existing.join("style.css"), "existing styles").unwrap();
    fs::write(existing.join("a.html"), "post a").unwrap();
    fs::write(existing.join("b.html"), "post b").unwrap();

    let fixture = temp.path().join("generated_index.html");
    fs::write(&fixture, assemble(&record("c", "foo"))).unwrap();
    let render = render_stub(temp.path(), &fixture, "c.html");

    let settings = Settings {
        fetch_command: vec!["true".to_string()],
        render_command: vec![render.display().to_string()],
        ..Settings::default()
    };
    let pipeline = Pipeline::new(settings, root.clone(), false);

    Harness {
        _temp: temp,
        root,
        existing,
        pipeline,
    }
}

#[test]
fn full_run_merges_reorders_and_reports() {
    let h = harness();

    let outcome = h.pipeline.run(Some(&h.existing)).unwrap();
    let (snapshot, report, stats) = match outcome {
        RunOutcome::Merged {
            snapshot,
            report,
            stats,
        } => (snapshot, report, stats),
        other => panic!("expected merged outcome, got {other:?}"),
    };

    assert_eq!(stats.records_in, 3);
    assert_eq!(stats.records_out, 3);

    // Groups ordered bar < foo; foo holds a then c.
    let index = fs::read_to_string(h.existing.join("index.html")).unwrap();
    let bar = index.find("Subreddit Below = r/bar").unwrap();
    let foo = index.find("Subreddit Below = r/foo").unwrap();
    assert!(bar < foo);
    let pos_a = index.find("id=\"a\"").unwrap();
    let pos_c = index.find("id=\"c\"").unwrap();
    assert!(foo < pos_a && pos_a < pos_c);

    // The existing stylesheet survives; the generated one is dropped.
    assert_eq!(
        fs::read_to_string(h.existing.join("style.css")).unwrap(),
        "existing styles"
    );
    // The new per-post page moved across, the generated dir is gone.
    assert!(h.existing.join("c.html").exists());
    assert!(!h.root.join("html_pages").exists());

    // The snapshot holds the pre-merge index.
    let snapshot_index = fs::read_to_string(snapshot.join("index.html")).unwrap();
    assert!(snapshot_index.contains("id=\"a\""));
    assert!(!snapshot_index.contains("id=\"c\""));

    // The report mentions the page that only exists post-merge.
    let report_text = fs::read_to_string(&report).unwrap();
    assert!(report_text.contains("c.html only in"));
}

#[test]
fn second_run_is_idempotent() {
    let h = harness();

    h.pipeline.run(Some(&h.existing)).unwrap();
    let index_after_first = fs::read_to_string(h.existing.join("index.html")).unwrap();

    // Snapshot and report names have one-second resolution.
    std::thread::sleep(std::time::Duration::from_secs(1));

    // The stale archive dir is reused; the render stub regenerates the same
    // page, so the second merge introduces only duplicates.
    let outcome = h.pipeline.run(Some(&h.existing)).unwrap();
    let stats = match outcome {
        RunOutcome::Merged { stats, .. } => stats,
        other => panic!("expected merged outcome, got {other:?}"),
    };

    assert_eq!(stats.records_in, 4);
    assert_eq!(stats.records_out, 3);

    let index_after_second = fs::read_to_string(h.existing.join("index.html")).unwrap();
    assert_eq!(index_after_first, index_after_second);

    // One snapshot per merging run.
    let snapshots = fs::read_dir(h.root.join("backups")).unwrap().count();
    assert_eq!(snapshots, 2);
    let reports = fs::read_dir(h.root.join("reports")).unwrap().count();
    assert_eq!(reports, 2);
}

#[test]
fn malformed_generated_index_aborts_without_touching_existing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("work");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("my_config.cfg"), "[DEFAULT]\n").unwrap();

    let existing = temp.path().join("html");
    fs::create_dir_all(&existing).unwrap();
    let original_index = assemble(&record("a", "foo"));
    fs::write(existing.join("index.html"), &original_index).unwrap();

    // Generated index has no content region at all.
    let fixture = temp.path().join("generated_index.html");
    fs::write(&fixture, "<html><body><p>broken</p></body></html>").unwrap();
    let render = render_stub(temp.path(), &fixture, "c.html");

    let settings = Settings {
        fetch_command: vec!["true".to_string()],
        render_command: vec![render.display().to_string()],
        ..Settings::default()
    };
    let pipeline = Pipeline::new(settings, root, false);

    let result = pipeline.run(Some(&existing));
    assert!(result.is_err());

    let on_disk = fs::read_to_string(existing.join("index.html")).unwrap();
    assert_eq!(on_disk, original_index);
}
