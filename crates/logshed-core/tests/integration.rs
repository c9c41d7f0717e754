//! Integration tests for cluster configuration loading.

use std::io::Write;

use logshed_core::{ClusterConfig, LocationScope, LogId};

const CONFIG: &str = r#"
[[nodes]]
index = 0
address = "10.0.0.1:4440"
location = "rg0.dc0.cl0.row0.rk0"
weight = 2.0

[[nodes]]
index = 1
address = "10.0.0.2:4440"
location = "rg0.dc0.cl0.row0.rk1"

[[nodes]]
index = 2
address = "10.0.0.3:4440"
include_in_nodesets = false

[[log_groups]]
id = 7
name = "payments"
nodeset_size = 4
[log_groups.replication]
rack = 2
"#;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = ClusterConfig::from_file(file.path()).unwrap();
    assert_eq!(config.num_nodes(), 3);
    assert_eq!(config.storage_node_count(), 2);

    let group = config.log_group(LogId(7)).unwrap();
    assert_eq!(group.name, "payments");
    assert_eq!(group.nodeset_size, Some(4));
    assert_eq!(group.replication.sync_scope_and_factor(), (LocationScope::Rack, 2));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ClusterConfig::from_file(std::path::Path::new("/nonexistent/cluster.toml"))
        .unwrap_err();
    assert!(matches!(err, logshed_core::Error::Io(_)));
}

#[test]
fn test_parse_matches_file_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let from_file = ClusterConfig::from_file(file.path()).unwrap();
    let from_str = ClusterConfig::parse(CONFIG).unwrap();
    assert_eq!(from_file, from_str);
}
