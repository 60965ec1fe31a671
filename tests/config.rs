use fanout::cli::{Cli, Scenario};
use fanout::config::Config;
use fanout::logger::LogLevel;
use std::io::Write;
use tempfile::NamedTempFile;

fn cli_with_file(toml_content: &str) -> (Cli, NamedTempFile) {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    (cli, file)
}

#[test]
fn test_load_full_valid_config() {
    let toml_content = r#"
        log_level = "debug"
        seed = 42
        [inventory]
        product_count = 10
        max_stock = 50
        low_stock_margin = 5
        validate_products = true
        [logger]
        level = "WARNING"
        message = "Disk almost full"
        [newsletter]
        first_headline = "one"
        second_headline = "two"
    "#;
    let (cli, _file) = cli_with_file(toml_content);

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.inventory.product_count, 10);
    assert_eq!(config.inventory.max_stock, 50);
    assert_eq!(config.inventory.low_stock_margin, 5);
    assert!(config.inventory.validate_products);
    assert_eq!(config.logger.level, LogLevel::Warning);
    assert_eq!(config.logger.message, "Disk almost full");
    assert_eq!(config.newsletter.first_headline, "one");
    assert_eq!(config.newsletter.second_headline, "two");
}

#[test]
fn test_load_default_values() {
    let (cli, _file) = cli_with_file("");

    let config = Config::load(&cli).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let toml_content = r#"
        [inventory]
        product_count = 7
    "#;
    let (cli, _file) = cli_with_file(toml_content);

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.inventory.product_count, 7);
    assert_eq!(config.inventory.max_stock, 100);
    assert_eq!(config.logger, Config::default().logger);
}

#[test]
fn test_listed_products() {
    let toml_content = r#"
        [inventory]
        validate_products = true
        [[inventory.products]]
        name = "Widget"
        stock = 2
        critical_stock = 9
        [[inventory.products]]
        name = "Gadget"
        stock = -1
        critical_stock = 0
    "#;
    let (cli, _file) = cli_with_file(toml_content);

    let config = Config::load(&cli).unwrap();

    let products = &config.inventory.products;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Widget");
    assert_eq!((products[0].stock, products[0].critical_stock), (2, 9));
    assert_eq!(products[1].stock, -1);
    assert!(Config::default().inventory.products.is_empty());
}

#[test]
fn test_cli_overrides_file() {
    let toml_content = r#"
        log_level = "warn"
        seed = 1
        [inventory]
        product_count = 2
    "#;
    let (mut cli, _file) = cli_with_file(toml_content);
    cli.scenario = Scenario::Inventory;
    cli.seed = Some(99);
    cli.products = Some(12);
    cli.log_level = Some("trace".to_string());

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.seed, Some(99));
    assert_eq!(config.inventory.product_count, 12);
    assert_eq!(config.log_level, "trace");
    assert_eq!(config.inventory.max_stock, 100);
}

#[test]
fn test_invalid_value_type() {
    let toml_content = r#"
        [inventory]
        product_count = "three"
    "#;
    let (cli, _file) = cli_with_file(toml_content);

    assert!(Config::load(&cli).is_err());
}

#[test]
fn test_unknown_log_level() {
    let toml_content = r#"
        [logger]
        level = "TRACE"
    "#;
    let (cli, _file) = cli_with_file(toml_content);

    assert!(Config::load(&cli).is_err());
}
