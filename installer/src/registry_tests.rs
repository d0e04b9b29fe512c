//! Tests for vendor registry merging.

use super::*;
use crate::config::{Endpoints, Protocol};
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

struct Consumer {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Consumer {
    fn seed(&self, body: &str) -> Utf8PathBuf {
        let path = registry_path(&self.root);
        std::fs::create_dir_all(path.parent().expect("registry has a parent"))
            .expect("create registry dir");
        std::fs::write(&path, body).expect("seed registry");
        path
    }
}

#[fixture]
fn consumer() -> Consumer {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 temp path");
    Consumer { _temp: temp, root }
}

#[fixture]
fn entry() -> VendorRegistryEntry {
    VendorRegistryEntry {
        repo: RepoSlug::try_from("o/gd").expect("valid slug"),
        install_branch: INSTALL_BRANCH.to_owned(),
        protected: vec![".dogfood/**".to_owned(), WORKFLOW_PATH.to_owned()],
    }
}

#[rstest]
#[case::default(".dogfood", ".dogfood/**")]
#[case::custom("tools/gd", "tools/gd/**")]
#[case::dotted("./vendor/gd/", "vendor/gd/**")]
fn entry_protects_install_dir_and_workflow(#[case] install_dir: &str, #[case] glob: &str) {
    let config = InstallConfig {
        git_ref: "1.0.0".to_owned(),
        repo: RepoSlug::try_from("o/gd").expect("valid slug"),
        install_dir: Utf8PathBuf::from(install_dir),
        manifest_path: None,
        auth_token: None,
        protocol: Protocol::Legacy,
        root: Utf8PathBuf::from("/work/consumer"),
        endpoints: Endpoints::default(),
    };

    let entry = VendorRegistryEntry::for_install(&config);

    assert_eq!(entry.install_branch, "chore/install-git-dogfood");
    assert_eq!(entry.protected, [glob, ".github/workflows/dogfood.yml"]);
}

#[rstest]
fn missing_registry_is_skipped_and_not_created(consumer: Consumer, entry: VendorRegistryEntry) {
    let path = registry_path(&consumer.root);

    let outcome = merge_registry(&path, &entry).expect("merge succeeds");

    assert_eq!(outcome, RegistryOutcome::Skipped);
    assert!(!path.exists());
    assert!(!consumer.root.join(".vendored").exists());
}

#[rstest]
fn merges_into_empty_vendors(consumer: Consumer, entry: VendorRegistryEntry) {
    let path = consumer.seed("{\n  \"vendors\": {}\n}\n");

    let outcome = merge_registry(&path, &entry).expect("merge succeeds");

    assert_eq!(outcome, RegistryOutcome::Updated { path: path.clone() });
    let text = std::fs::read_to_string(&path).expect("registry exists");
    assert!(text.ends_with("}\n"));
    let document: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(
        document["vendors"]["git-dogfood"],
        json!({
            "repo": "o/gd",
            "install_branch": "chore/install-git-dogfood",
            "protected": [".dogfood/**", ".github/workflows/dogfood.yml"]
        })
    );
}

#[rstest]
fn preserves_other_vendors_and_key_order(consumer: Consumer, entry: VendorRegistryEntry) {
    let path = consumer.seed(
        r#"{"schema": 2, "vendors": {"zeta": {"repo": "o/z"}, "alpha": {"repo": "o/a"}}, "extra": true}"#,
    );

    merge_registry(&path, &entry).expect("merge succeeds");

    let text = std::fs::read_to_string(&path).expect("registry exists");
    let document: Value = serde_json::from_str(&text).expect("valid JSON");
    let top: Vec<&str> = document
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(top, ["schema", "vendors", "extra"]);
    let vendors: Vec<&str> = document["vendors"]
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(vendors, ["zeta", "alpha", "git-dogfood"]);
    assert_eq!(document["vendors"]["zeta"], json!({"repo": "o/z"}));
}

#[rstest]
fn replaces_existing_entry_in_place(entry: VendorRegistryEntry) {
    let document = json!({
        "vendors": {
            "git-dogfood": {"repo": "old/gd", "stale": true},
            "other": {}
        }
    });

    let merged = merge_document(document, &entry).expect("merge succeeds");

    let vendors: Vec<&str> = merged["vendors"]
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(vendors, ["git-dogfood", "other"]);
    assert_eq!(merged["vendors"]["git-dogfood"]["repo"], "o/gd");
    assert!(merged["vendors"]["git-dogfood"].get("stale").is_none());
}

#[rstest]
fn creates_vendors_key_when_absent(entry: VendorRegistryEntry) {
    let merged = merge_document(json!({"schema": 1}), &entry).expect("merge succeeds");
    assert_eq!(merged["schema"], 1);
    assert_eq!(merged["vendors"]["git-dogfood"]["repo"], "o/gd");
}

#[rstest]
#[case::array_top_level(json!([1, 2]), "top level must be an object")]
#[case::string_vendors(json!({"vendors": "nope"}), "\"vendors\" must be an object")]
#[case::null_vendors(json!({"vendors": null}), "\"vendors\" must be an object")]
fn rejects_malformed_documents(
    entry: VendorRegistryEntry,
    #[case] document: Value,
    #[case] expected: &str,
) {
    let reason = merge_document(document, &entry).expect_err("merge should fail");
    assert!(reason.contains(expected), "unexpected reason: {reason}");
}

#[rstest]
#[case::invalid_json("{ not json")]
#[case::wrong_shape("[]")]
fn unusable_registry_is_left_untouched(
    consumer: Consumer,
    entry: VendorRegistryEntry,
    #[case] body: &str,
) {
    let path = consumer.seed(body);

    let err = merge_registry(&path, &entry).expect_err("merge should fail");

    assert!(matches!(err, InstallerError::RegistryParse { .. }));
    assert_eq!(std::fs::read_to_string(&path).expect("registry exists"), body);
}

#[cfg(unix)]
#[rstest]
fn keeps_registry_permissions(consumer: Consumer, entry: VendorRegistryEntry) {
    use std::os::unix::fs::PermissionsExt;

    let path = consumer.seed("{}");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640))
        .expect("set permissions");

    merge_registry(&path, &entry).expect("merge succeeds");

    let mode = std::fs::metadata(&path)
        .expect("failed to read metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o640);
}

#[cfg(unix)]
#[rstest]
fn symlinked_registry_is_updated_through_the_link(consumer: Consumer, entry: VendorRegistryEntry) {
    let shared = consumer.root.join("shared-config.json");
    std::fs::write(&shared, "{\"vendors\": {}}\n").expect("seed shared registry");
    let link = registry_path(&consumer.root);
    std::fs::create_dir_all(link.parent().expect("registry has a parent"))
        .expect("create registry dir");
    std::os::unix::fs::symlink(&shared, &link).expect("create registry symlink");

    merge_registry(&link, &entry).expect("merge succeeds");

    let link_meta = std::fs::symlink_metadata(&link).expect("link metadata");
    assert!(link_meta.file_type().is_symlink(), "registry link was replaced");
    let merged: Value =
        serde_json::from_str(&std::fs::read_to_string(&shared).expect("shared registry exists"))
            .expect("valid JSON");
    assert_eq!(merged["vendors"]["git-dogfood"]["repo"], "o/gd");
}
