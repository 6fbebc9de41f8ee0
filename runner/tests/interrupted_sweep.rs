// Writes and then executes its stand-in tools, so it has to live in its own test binary: a fork
// from a concurrently running test can otherwise hold the script open (ETXTBSY).
use sketchbench_runner::{
    database::read_all,
    executors::Tools,
    grid::ParameterGrid,
    sweep::{Sweep, SweepError},
};
use std::{fs, os::unix::fs::PermissionsExt, path::Path};

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn rows_before_a_launch_failure_survive() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records");
    let reference = dir.path().join("reference");
    let candidate = dir.path().join("candidate");

    // the reference removes the candidate once it reaches k=31, the candidate launch then fails
    write_script(
        &reference,
        &format!(
            "case \"$4\" in k=31,*) rm -f '{}' ;; esac\nexit 0",
            candidate.display()
        ),
    );
    write_script(&candidate, "exit 0");

    let sweep = Sweep::new(
        Path::new("sample.fa"),
        ParameterGrid::new(vec![1, 10], vec![21, 31]),
        42,
        Tools::Sourmash { exec: reference },
        Tools::FracKmc { exec: candidate },
    );

    assert!(matches!(
        sweep.run_to(&records),
        Err(SweepError::Executor { .. })
    ));

    let stored = read_all(&records).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.rows[0].point.kmer_size, 21);
    assert_eq!(stored.rows[0].point.scaled, 1);
}
