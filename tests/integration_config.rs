//! Configuration loading integration tests

use std::io::Write;

use ethscription_scout::config::{Config, Network};
use ethscription_scout::scanner::ScanSettings;
use ethscription_scout::sync::RetryPolicy;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
network: mainnet
api:
  per_page: 50
scan:
  concurrency: 8
retry:
  max_retries: 3
template: 'data:,{{"p":"erc-20","op":"mint","tick":"eths","id":"${{id}}","amt":"1000"}}'
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.network, Network::Mainnet);
    assert_eq!(config.api_base_url(), "https://api.ethscriptions.com/api");
    assert_eq!(config.api.per_page, 50);

    let settings = ScanSettings::from(&config);
    assert_eq!(settings.concurrency, 8);
    assert_eq!(settings.retry, RetryPolicy::bounded(3));

    let template = config.scription_template().unwrap();
    assert_eq!(
        template.render(5),
        r#"data:,{"p":"erc-20","op":"mint","tick":"eths","id":"5","amt":"1000"}"#
    );
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("/nonexistent/ethscription-scout.yaml");

    assert!(result.is_err());
}

#[test]
fn test_template_without_marker_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "template: 'data:,static'").unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert!(config.validate().is_err());
    assert!(config.scription_template().is_err());
}
