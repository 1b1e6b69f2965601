use crate::cli::{Backend, Cli};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_cli_parsing_positionals() {
    let args = vec!["collect-logs", "ephemeral-x1y2z3", "/tmp/artifacts"];
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.namespace, "ephemeral-x1y2z3");
    assert_eq!(cli.artifacts_dir, PathBuf::from("/tmp/artifacts"));
    assert_eq!(cli.backend, Backend::Oc);
    assert_eq!(cli.concurrency, 1);
    assert!(!cli.fail_fast);
}

#[test]
fn test_cli_parsing_missing_artifacts_dir() {
    let args = vec!["collect-logs", "ephemeral-x1y2z3"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_parsing_missing_everything() {
    let args = vec!["collect-logs"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_parsing_empty_namespace() {
    let args = vec!["collect-logs", "", "/tmp/artifacts"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_parsing_namespace_with_path_separators() {
    for namespace in ["../x", "/abs", "a/b", "ns_1", "Upper"] {
        let args = vec!["collect-logs", namespace, "/tmp/artifacts"];
        assert!(Cli::try_parse_from(args).is_err(), "{namespace} accepted");
    }
}

#[test]
fn test_cli_parsing_backend() {
    let args = vec!["collect-logs", "ns", "out", "--backend", "kube", "--context", "ci"];
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.backend, Backend::Kube);
    assert_eq!(cli.context, Some("ci".to_string()));
}

#[test]
fn test_cli_parsing_zero_concurrency() {
    let args = vec!["collect-logs", "ns", "out", "--concurrency", "0"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_collect_options() {
    let args = vec![
        "collect-logs",
        "ns",
        "out",
        "--concurrency",
        "8",
        "--fail-fast",
        "--no-report",
    ];
    let options = Cli::try_parse_from(args).unwrap().collect_options();
    assert_eq!(options.concurrency, 8);
    assert!(options.fail_fast);
    assert!(!options.write_report);
}

#[test]
fn test_cli_parsing_verbose() {
    let args = vec!["collect-logs", "ns", "out", "-v"];
    let cli = Cli::try_parse_from(args).unwrap();
    assert!(cli.verbose);
}
