//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, path_exists};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "axum::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "reqwest::",
            "axum::",
        ],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_does_not_reach_adapters_or_infrastructure() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter", "crate::infrastructure", "reqwest::", "axum::"],
    );

    assert!(
        hits.is_empty(),
        "found adapter/infrastructure imports in application layer: {hits:#?}"
    );
}

#[test]
fn sheets_and_gamma_adapters_exist() {
    assert!(path_exists("src/adapter/outbound/polymarket/client.rs"));
    assert!(path_exists("src/adapter/outbound/sheets/client.rs"));
}
