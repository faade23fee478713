use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const LOCKFILE: &str = r#"{
  "pex_version": "1.0.0",
  "resolver_version": "pip-2020-resolver",
  "requirements": ["foo"],
  "constraints": [],
  "allow_prereleases": false,
  "allow_wheels": true,
  "allow_builds": true,
  "transitive": true,
  "locked_resolves": [
    {
      "platform_tag": ["cp311", "cp311", "manylinux_2_17_x86_64"],
      "locked_requirements": [
        {
          "project_name": "foo",
          "version": "1.0",
          "requires_dists": [],
          "artifacts": [
            {
              "url": "https://example.com/foo-1.0-cp311-cp311-manylinux_2_17_x86_64.whl",
              "algorithm": "sha256",
              "hash": "deadbeef"
            }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn selects_the_matching_resolve() {
    let dir = assert_fs::TempDir::new().unwrap();
    let lockfile = dir.child("px.lock.json");
    lockfile.write_str(LOCKFILE).unwrap();

    Command::cargo_bin("px")
        .unwrap()
        .arg("select-lock")
        .arg(lockfile.path())
        .arg("--platform")
        .arg("cp311:cp311:manylinux_2_17_x86_64")
        .assert()
        .success()
        .stdout(predicate::str::contains("manylinux_2_17_x86_64"));
}

#[test]
fn reports_failure_for_an_unrankable_target() {
    let dir = assert_fs::TempDir::new().unwrap();
    let lockfile = dir.child("px.lock.json");
    lockfile.write_str(LOCKFILE).unwrap();

    Command::cargo_bin("px")
        .unwrap()
        .arg("select-lock")
        .arg(lockfile.path())
        .arg("--platform")
        .arg("cp27:cp27mu:manylinux_2_17_x86_64")
        .assert()
        .success()
        .stderr(predicate::str::contains("no locked resolve applies"));
}

#[test]
fn requires_at_least_one_platform() {
    let dir = assert_fs::TempDir::new().unwrap();
    let lockfile = dir.child("px.lock.json");
    lockfile.write_str(LOCKFILE).unwrap();

    Command::cargo_bin("px")
        .unwrap()
        .arg("select-lock")
        .arg(lockfile.path())
        .assert()
        .failure();
}
