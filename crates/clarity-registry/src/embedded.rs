//! Default registry embedded at compile time with `include_str!()`.

/// Default `registry.toml`.
pub const REGISTRY: &str = include_str!("../data/registry.toml");

/// Default column synonym files, keyed by file name.
pub const COLUMNS: &[(&str, &str)] = &[
    (
        "raw_cpid_metrics.toml",
        include_str!("../data/columns/raw_cpid_metrics.toml"),
    ),
    (
        "raw_protocol_deviations.toml",
        include_str!("../data/columns/raw_protocol_deviations.toml"),
    ),
    (
        "raw_sdv_metrics.toml",
        include_str!("../data/columns/raw_sdv_metrics.toml"),
    ),
    (
        "raw_visit_projections.toml",
        include_str!("../data/columns/raw_visit_projections.toml"),
    ),
    (
        "raw_lab_issues.toml",
        include_str!("../data/columns/raw_lab_issues.toml"),
    ),
    (
        "raw_sae_safety.toml",
        include_str!("../data/columns/raw_sae_safety.toml"),
    ),
    ("raw_sae_dm.toml", include_str!("../data/columns/raw_sae_dm.toml")),
    (
        "raw_coding_meddra.toml",
        include_str!("../data/columns/raw_coding_meddra.toml"),
    ),
    (
        "raw_coding_whodra.toml",
        include_str!("../data/columns/raw_coding_whodra.toml"),
    ),
    (
        "raw_missing_pages.toml",
        include_str!("../data/columns/raw_missing_pages.toml"),
    ),
    (
        "raw_inactivated_forms.toml",
        include_str!("../data/columns/raw_inactivated_forms.toml"),
    ),
    (
        "raw_edrr_issues.toml",
        include_str!("../data/columns/raw_edrr_issues.toml"),
    ),
];

/// Looks up an embedded synonym file by name.
pub fn columns(file_name: &str) -> Option<&'static str> {
    COLUMNS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, contents)| *contents)
}
