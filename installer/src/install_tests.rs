//! Unit tests for the two-phase installer.

use super::*;
use crate::artefact::WORKFLOW_PATH;
use crate::config::{Endpoints, Protocol};
use crate::repo_slug::RepoSlug;
use crate::transport::{FetchError, FetchResult, MockTransport, TransportKind};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const RESOLVER_BODY: &[u8] = b"#!/usr/bin/env python3\nprint('resolve')\n";
const WORKFLOW_BODY: &[u8] = b"name: dogfood\non: [push]\n";

struct Consumer {
    _temp: TempDir,
    config: InstallConfig,
}

impl Consumer {
    fn path(&self, relative: &str) -> Utf8PathBuf {
        self.config.root.join(relative)
    }

    fn read(&self, relative: &str) -> Vec<u8> {
        std::fs::read(self.path(relative)).expect("file should exist")
    }
}

fn consumer(protocol: Protocol) -> Consumer {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 temp path");
    Consumer {
        _temp: temp,
        config: InstallConfig {
            git_ref: "1.2.0".to_owned(),
            repo: RepoSlug::try_from("o/gd").expect("valid slug"),
            install_dir: Utf8PathBuf::from(".dogfood"),
            manifest_path: None,
            auth_token: None,
            protocol,
            root,
            endpoints: Endpoints::default(),
        },
    }
}

#[fixture]
fn legacy() -> Consumer {
    consumer(Protocol::Legacy)
}

fn serve_both(transport: &mut MockTransport, expected_fetches: usize) {
    transport
        .expect_kind()
        .return_const(TransportKind::Anonymous);
    transport
        .expect_fetch()
        .times(expected_fetches)
        .returning(|_, _, remote_path| match remote_path {
            "resolve" => Ok(FetchResult::new(remote_path, RESOLVER_BODY.to_vec())),
            "templates/github/workflows/dogfood.yml" => {
                Ok(FetchResult::new(remote_path, WORKFLOW_BODY.to_vec()))
            }
            other => Err(FetchError::NotFound {
                url: other.to_owned(),
            }),
        });
}

fn installed_paths(report: &InstallReport) -> Vec<&str> {
    report
        .installed()
        .iter()
        .map(InstalledFileRecord::as_str)
        .collect()
}

#[rstest]
fn fresh_legacy_install_writes_every_artefact(legacy: Consumer) {
    let mut transport = MockTransport::new();
    serve_both(&mut transport, 2);
    let mut out = Vec::new();

    let report = install(&legacy.config, &transport, &mut out).expect("install succeeds");

    assert_eq!(
        installed_paths(&report),
        [".dogfood/resolve", WORKFLOW_PATH, ".dogfood/.version"]
    );
    assert!(report.skipped().is_empty());
    assert_eq!(legacy.read(".dogfood/resolve"), RESOLVER_BODY);
    assert_eq!(legacy.read(WORKFLOW_PATH), WORKFLOW_BODY);
    assert_eq!(legacy.read(".dogfood/.version"), b"1.2.0\n");

    let printed = String::from_utf8(out).expect("UTF-8 output");
    assert!(printed.contains("Installed .dogfood/resolve"));
    assert!(printed.contains("Installed .github/workflows/dogfood.yml"));
}

#[test]
fn environment_install_omits_version_stamp() {
    let env = consumer(Protocol::Environment);
    let mut transport = MockTransport::new();
    serve_both(&mut transport, 2);

    let report = install(&env.config, &transport, &mut Vec::new()).expect("install succeeds");

    assert_eq!(installed_paths(&report), [".dogfood/resolve", WORKFLOW_PATH]);
    assert!(!env.path(".dogfood/.version").exists());
}

#[rstest]
fn existing_workflow_is_neither_fetched_nor_recorded(legacy: Consumer) {
    let workflow = legacy.path(WORKFLOW_PATH);
    std::fs::create_dir_all(workflow.parent().expect("workflow has a parent"))
        .expect("create workflow dir");
    std::fs::write(&workflow, b"custom: true\n").expect("seed workflow");

    let mut transport = MockTransport::new();
    serve_both(&mut transport, 1);
    let mut out = Vec::new();

    let report = install(&legacy.config, &transport, &mut out).expect("install succeeds");

    assert_eq!(
        installed_paths(&report),
        [".dogfood/resolve", ".dogfood/.version"]
    );
    assert_eq!(report.skipped(), [WORKFLOW_PATH.to_owned()]);
    assert_eq!(legacy.read(WORKFLOW_PATH), b"custom: true\n");

    let printed = String::from_utf8(out).expect("UTF-8 output");
    assert!(printed.contains(".github/workflows/dogfood.yml already exists, skipping"));
}

#[rstest]
fn resolver_is_replaced_on_every_run(legacy: Consumer) {
    std::fs::create_dir_all(legacy.path(".dogfood")).expect("create install dir");
    std::fs::write(legacy.path(".dogfood/resolve"), b"stale").expect("seed resolver");

    let mut transport = MockTransport::new();
    serve_both(&mut transport, 2);

    install(&legacy.config, &transport, &mut Vec::new()).expect("install succeeds");

    assert_eq!(legacy.read(".dogfood/resolve"), RESOLVER_BODY);
}

#[rstest]
fn fetch_failure_leaves_the_filesystem_untouched(legacy: Consumer) {
    let mut transport = MockTransport::new();
    transport
        .expect_kind()
        .return_const(TransportKind::Anonymous);
    transport
        .expect_fetch()
        .returning(|_, _, remote_path| match remote_path {
            "resolve" => Ok(FetchResult::new(remote_path, RESOLVER_BODY.to_vec())),
            other => Err(FetchError::NotFound {
                url: format!("https://raw.example/{other}"),
            }),
        });

    let err = install(&legacy.config, &transport, &mut Vec::new())
        .expect_err("missing workflow should abort the run");

    assert!(matches!(err, InstallerError::Fetch(FetchError::NotFound { .. })));
    assert!(!legacy.path(".dogfood").exists());
    assert!(!legacy.path(".github").exists());
}

#[rstest]
fn fetches_use_configured_repo_and_ref(legacy: Consumer) {
    let mut transport = MockTransport::new();
    transport
        .expect_kind()
        .return_const(TransportKind::Authenticated);
    transport
        .expect_fetch()
        .times(2)
        .returning(|repo, git_ref, remote_path| {
            assert_eq!(repo.as_str(), "o/gd");
            assert_eq!(git_ref, "1.2.0");
            Ok(FetchResult::new(remote_path, Vec::new()))
        });

    install(&legacy.config, &transport, &mut Vec::new()).expect("install succeeds");
}

#[test]
fn custom_install_dir_is_created() {
    let mut env = consumer(Protocol::Environment);
    env.config.install_dir = Utf8PathBuf::from("tools/gd");
    let mut transport = MockTransport::new();
    serve_both(&mut transport, 2);

    let report = install(&env.config, &transport, &mut Vec::new()).expect("install succeeds");

    assert_eq!(installed_paths(&report).first(), Some(&"tools/gd/resolve"));
    assert_eq!(env.read("tools/gd/resolve"), RESOLVER_BODY);
}

#[cfg(unix)]
#[rstest]
fn resolver_is_executable(legacy: Consumer) {
    use std::os::unix::fs::PermissionsExt;

    let mut transport = MockTransport::new();
    serve_both(&mut transport, 2);

    install(&legacy.config, &transport, &mut Vec::new()).expect("install succeeds");

    let mode = std::fs::metadata(legacy.path(".dogfood/resolve"))
        .expect("failed to read metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
    let workflow_mode = std::fs::metadata(legacy.path(WORKFLOW_PATH))
        .expect("failed to read metadata")
        .permissions()
        .mode();
    assert_eq!(workflow_mode & 0o111, 0);
}
