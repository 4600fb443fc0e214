//! Integration tests for CLI commands

use serde_json::Value;
use std::process::Command;

/// Helper to run fn-protection with a clean environment
fn fn_protection(args: &[&str]) -> std::process::Output {
    fn_protection_with_env(args, &[])
}

fn fn_protection_with_env(args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fn-protection"));
    cmd.args(args)
        .env_remove("FN_PROTECTION_CACHE_TTL")
        .env_remove("FN_PROTECTION_ENABLE_V1_MODE")
        .env_remove("FN_PROTECTION_LOG");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute fn-protection")
}

/// Path of a request fixture
fn request(name: &str) -> String {
    format!(
        "{}/../../fixtures/requests/{}.yaml",
        env!("CARGO_MANIFEST_DIR"),
        name
    )
}

/// Render a fixture as JSON and parse the response
fn render_json(name: &str, extra: &[&str]) -> Value {
    let path = request(name);
    let mut args = vec!["render", path.as_str(), "-o", "json"];
    args.extend_from_slice(extra);

    let output = fn_protection(&args);
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Output should be valid JSON")
}

mod render_command {
    use super::*;

    #[test]
    fn test_no_labels_passes_desired_through() {
        let rsp = render_json("no-labels", &[]);

        assert_eq!(rsp["meta"]["tag"], "no-labels");
        assert_eq!(rsp["meta"]["ttl"], "1m");
        assert!(rsp["results"].as_array().unwrap().is_empty());

        let resources = rsp["desired"]["resources"].as_object().unwrap();
        assert_eq!(resources.len(), 1);
        let composed = &resources["ready-composed-resource"];
        assert_eq!(composed["resource"]["spec"]["size"], "small");
        assert_eq!(composed["ready"], "READY_TRUE");
    }

    #[test]
    fn test_composite_labeled_in_desired_state() {
        let rsp = render_json("composite-labeled", &[]);

        assert_eq!(rsp["meta"]["ttl"], "5m");
        let usage = &rsp["desired"]["resources"]["xr-my-test-xr-usage"]["resource"];
        assert_eq!(usage["apiVersion"], "protection.crossplane.io/v1beta1");
        assert_eq!(usage["kind"], "ClusterUsage");
        assert_eq!(usage["metadata"]["name"], "testxr-my-test-xr-23c942-fn-protection");
        assert!(usage["metadata"].get("namespace").is_none());
        assert_eq!(usage["spec"]["of"]["kind"], "TestXR");
        assert_eq!(usage["spec"]["of"]["resourceRef"]["name"], "my-test-xr");
        assert_eq!(
            usage["spec"]["reason"],
            "created by function-deletion-protection via label protection.fn.crossplane.io/block-deletion"
        );
    }

    #[test]
    fn test_composed_label_cascades_to_composite() {
        let rsp = render_json("composed-cascade", &[]);
        let resources = rsp["desired"]["resources"].as_object().unwrap();

        assert!(!resources.contains_key("plain-composed-resource-usage"));

        let child = &resources["ready-composed-resource-usage"]["resource"];
        assert_eq!(child["kind"], "Usage");
        assert_eq!(child["metadata"]["namespace"], "test");
        assert_eq!(
            child["metadata"]["name"],
            "testcomposed-my-test-composed-80b1f8-fn-protection"
        );

        let parent = &resources["xr-my-test-xr-usage"]["resource"];
        assert_eq!(parent["kind"], "Usage");
        assert_eq!(parent["metadata"]["name"], "testxr-my-test-xr-a23dbe-fn-protection");
        assert_eq!(
            parent["spec"]["reason"],
            "created by function-deletion-protection because a composed resource is protected"
        );
    }

    #[test]
    fn test_required_resources() {
        let rsp = render_json("watched", &[]);
        let resources = rsp["desired"]["resources"].as_object().unwrap();

        assert_eq!(resources.len(), 3);

        let watched = &resources["TestResource-watched-resource-1--required-resource-fn-protection"]["resource"];
        assert_eq!(watched["kind"], "ClusterUsage");
        assert_eq!(
            watched["metadata"]["name"],
            "testresource-watched-resource-1-915899-fn-protection"
        );
        assert_eq!(
            watched["spec"]["reason"],
            "created by function-deletion-protection by a WatchOperation"
        );

        let namespaced = &resources
            ["TestResource-test-watched-resource-test-namespace-required-resource-fn-protection"]
            ["resource"];
        assert_eq!(namespaced["kind"], "Usage");
        assert_eq!(namespaced["metadata"]["namespace"], "test-namespace");
        assert_eq!(
            namespaced["metadata"]["name"],
            "testresource-test-watched-resource-fdf38b-fn-protection"
        );

        let labeled = &resources["TestResource-labeled-resource--required-resource-fn-protection"]["resource"];
        assert_eq!(
            labeled["spec"]["reason"],
            "created by function-deletion-protection by an Operation"
        );
    }

    #[test]
    fn test_legacy_mode_from_input() {
        let rsp = render_json("legacy", &[]);
        let usage = &rsp["desired"]["resources"]["xr-my-test-xr-usage"]["resource"];

        assert_eq!(usage["apiVersion"], "apiextensions.crossplane.io/v1beta1");
        assert_eq!(usage["kind"], "Usage");
        assert_eq!(usage["metadata"]["name"], "testxr-my-test-xr-23c942-fn-protection");
    }

    #[test]
    fn test_legacy_mode_from_flag() {
        let rsp = render_json("composite-labeled", &["--enable-v1-mode"]);
        let usage = &rsp["desired"]["resources"]["xr-my-test-xr-usage"]["resource"];

        assert_eq!(usage["apiVersion"], "apiextensions.crossplane.io/v1beta1");
        assert_eq!(usage["kind"], "Usage");
    }

    #[test]
    fn test_env_can_disable_legacy_mode() {
        let path = request("legacy");
        let output = fn_protection_with_env(
            &["render", &path, "-o", "json"],
            &[("FN_PROTECTION_ENABLE_V1_MODE", "false")],
        );

        assert!(output.status.success());
        let rsp: Value = serde_json::from_slice(&output.stdout).unwrap();
        let usage = &rsp["desired"]["resources"]["xr-my-test-xr-usage"]["resource"];
        assert_eq!(usage["apiVersion"], "protection.crossplane.io/v1beta1");
        assert_eq!(usage["kind"], "ClusterUsage");
    }

    #[test]
    fn test_flag_can_disable_legacy_mode() {
        let rsp = render_json("legacy", &["--enable-v1-mode=false"]);
        let usage = &rsp["desired"]["resources"]["xr-my-test-xr-usage"]["resource"];

        assert_eq!(usage["apiVersion"], "protection.crossplane.io/v1beta1");
    }

    #[test]
    fn test_cache_ttl_from_env() {
        let path = request("no-labels");
        let output = fn_protection_with_env(
            &["render", &path, "-o", "json"],
            &[("FN_PROTECTION_CACHE_TTL", "90s")],
        );

        assert!(output.status.success());
        let rsp: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(rsp["meta"]["ttl"], "1m 30s");
    }

    #[test]
    fn test_yaml_output() {
        let output = fn_protection(&["render", &request("composite-labeled")]);

        assert!(output.status.success());
        let rsp: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
        assert_eq!(rsp["meta"]["tag"].as_str(), Some("composite-labeled"));
        assert!(rsp["desired"]["resources"]["xr-my-test-xr-usage"].is_mapping());
    }

    #[test]
    fn test_invalid_ttl_is_a_fatal_result() {
        let rsp = render_json("bad-ttl", &[]);

        assert_eq!(rsp["meta"]["ttl"], "1m");
        assert!(rsp.get("desired").is_none());

        let results = rsp["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["severity"], "SEVERITY_FATAL");
        assert_eq!(results[0]["target"], "TARGET_COMPOSITE");
        assert!(results[0]["message"].as_str().unwrap().starts_with("cannot set cacheTTL: "));
    }

    #[test]
    fn test_fail_on_fatal() {
        let output = fn_protection(&["render", &request("bad-ttl"), "--fail-on-fatal"]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("cannot set cacheTTL"));
    }

    #[test]
    fn test_missing_request_file() {
        let output = fn_protection(&["render", "/nonexistent/request.yaml"]);
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_unparseable_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.yaml");
        std::fs::write(&path, "meta: {tag: [unclosed").unwrap();

        let output = fn_protection(&["render", path.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(1));
    }
}

mod inspect_command {
    use super::*;

    #[test]
    fn test_inspect_table() {
        let output = fn_protection(&["inspect", &request("composed-cascade")]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("TestComposed/my-test-composed"));
        assert!(stdout.contains("child-resource-triggered"));
        assert!(stdout.contains("2 resource(s) protected"));
    }

    #[test]
    fn test_inspect_nothing_to_protect() {
        let output = fn_protection(&["inspect", &request("no-labels")]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Nothing to protect"));
    }

    #[test]
    fn test_inspect_json() {
        let output = fn_protection(&["inspect", &request("watched"), "--json"]);

        assert!(output.status.success());
        let report: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["tag"], "watched");
        assert_eq!(report["protectedCount"], 3);

        let decisions = report["decisions"].as_array().unwrap();
        assert_eq!(decisions.len(), 3);
        assert!(decisions.iter().all(|d| d["phase"] == "required"));
    }

    #[test]
    fn test_inspect_fatal() {
        let output = fn_protection(&["inspect", &request("bad-ttl")]);
        assert_eq!(output.status.code(), Some(2));
    }
}

mod name_command {
    use super::*;

    #[test]
    fn test_cluster_scoped_name() {
        let output = fn_protection(&["name", "TestXR", "my-test-xr"]);

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "testxr-my-test-xr-23c942-fn-protection"
        );
    }

    #[test]
    fn test_namespaced_name() {
        let output = fn_protection(&["name", "TestComposed", "my-test-composed", "-n", "test"]);

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "testcomposed-my-test-composed-80b1f8-fn-protection"
        );
    }

    #[test]
    fn test_missing_arguments_is_usage_error() {
        let output = fn_protection(&["name", "TestXR"]);
        assert_eq!(output.status.code(), Some(64));
    }
}
