//! 配置文件加载与校验的集成测试

use nebula_access::{AccessError, GraphConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_minimal_toml() {
    let mut file = NamedTempFile::new().expect("创建临时文件失败");
    write!(
        file,
        r#"
host = "10.0.0.1, 10.0.0.2"
port = 9669
user = "root"
password = "nebula"
space = "test_space"
"#
    )
    .expect("写入临时文件失败");

    let config = GraphConfig::load(file.path()).expect("加载配置失败");
    assert_eq!(config.hosts(), vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(config.space, "test_space");
    // 日志段缺省时使用默认值
    assert_eq!(config.log.level, "info");
}

#[test]
fn test_load_rejects_invalid_space() {
    let mut file = NamedTempFile::new().expect("创建临时文件失败");
    write!(
        file,
        r#"
host = "10.0.0.1"
port = 9669
user = "root"
password = "nebula"
space = "  "
"#
    )
    .expect("写入临时文件失败");

    let err = GraphConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, AccessError::Config(_)));
}

#[test]
fn test_save_load_round_trip() {
    let file = NamedTempFile::new().expect("创建临时文件失败");
    let config = GraphConfig {
        host: "graphd-0,graphd-1".to_string(),
        space: "prod".to_string(),
        ..Default::default()
    };
    config.save(file.path()).expect("保存配置失败");

    let loaded = GraphConfig::load(file.path()).expect("加载配置失败");
    assert_eq!(loaded.host, config.host);
    assert_eq!(loaded.space, "prod");
    assert_eq!(loaded.log.max_files, config.log.max_files);
}

#[test]
fn test_load_missing_file() {
    let err = GraphConfig::load("/no/such/config.toml").unwrap_err();
    assert!(matches!(err, AccessError::Config(_)));
}
