use dialdesk::cli::Cli;
use dialdesk::config::Settings;
use dialdesk_forms::FieldType;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_without_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let settings = Settings::from_root(temp_dir.path())?;

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.uploads.dir, PathBuf::from("uploads"));
    assert_eq!(settings.uploads.max_body_bytes, 26_214_400);
    assert!(settings.products.is_empty());

    Ok(())
}

#[test]
fn test_load_products_from_all_sources() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/products"))?;

    let dialdesk_toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[[products]]
id = "loans"
name = "Personal loans"

[[products.feedback_fields]]
name = "outcome"
type = "select"
options = ["Sold", "Declined"]
is_required = true
"#;
    fs::write(root.join("dialdesk.toml"), dialdesk_toml)?;

    let product_json = r#"
{
    "id": "cards",
    "name": "Credit cards",
    "feedback_fields": [
        {"name": "Rating", "type": "number", "min_value": 1, "max_value": 5},
        {"name": "Proof", "type": "file", "allowed_extensions": ["pdf"], "max_file_size": "5MB"}
    ]
}
"#;
    fs::write(root.join("config/products/cards.json"), product_json)?;

    let product_yaml = r#"
id: insurance
name: Home insurance
status: disabled
feedback_fields:
  - name: Interest
    type: checkbox
    options: [Contents, Buildings]
"#;
    fs::write(root.join("config/products/insurance.yaml"), product_yaml)?;

    let product_toml = r#"
id = "savings"
name = "Savings account"

[[feedback_fields]]
name = "Follow up"
type = "date"
"#;
    fs::write(root.join("config/products/savings.toml"), product_toml)?;
    fs::write(root.join("config/products/README.md"), "ignored")?;

    let settings = Settings::from_root(root)?;

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.products.len(), 4);

    let loans = settings.product("loans").unwrap();
    assert_eq!(loans.feedback_fields[0].field_type, FieldType::Select);
    assert!(loans.feedback_fields[0].is_required);

    let cards = settings.product("cards").unwrap();
    assert_eq!(cards.feedback_fields[0].max_value, Some(5.0));
    assert_eq!(cards.feedback_fields[1].max_file_bytes()?, Some(5 * 1024 * 1024));

    let insurance = settings.product("insurance").unwrap();
    assert_eq!(insurance.feedback_fields[0].options, vec!["Contents", "Buildings"]);

    let savings = settings.product("savings").unwrap();
    assert_eq!(savings.feedback_fields[0].field_type, FieldType::Date);

    Ok(())
}

#[test]
fn test_duplicate_product_ids_fail_validation() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/products"))?;

    let product = r#"{"id": "loans", "name": "Personal loans"}"#;
    fs::write(root.join("config/products/a.json"), product)?;
    fs::write(root.join("config/products/b.json"), product)?;

    let err = Settings::from_root(root).unwrap_err();
    assert!(err.to_string().contains("Product id 'loans' appears at indices 0 and 1"));

    Ok(())
}

#[test]
fn test_invalid_schema_fails_validation() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/products"))?;

    let product = r#"
{
    "id": "loans",
    "name": "Personal loans",
    "feedback_fields": [{"name": "Outcome", "type": "select", "options": []}]
}
"#;
    fs::write(root.join("config/products/loans.json"), product)?;

    let err = Settings::from_root(root).unwrap_err();
    assert!(err.to_string().contains("Field 'Outcome' needs at least one option"));

    Ok(())
}

#[test]
fn test_unknown_field_type_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/products"))?;

    let product = r#"
{
    "id": "loans",
    "name": "Personal loans",
    "feedback_fields": [{"name": "Channel", "type": "radio", "options": ["Phone"]}]
}
"#;
    fs::write(root.join("config/products/loans.json"), product)?;

    assert!(Settings::from_root(root).is_err());

    Ok(())
}

#[test]
fn test_cli_overrides_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let config_path = root.join("dialdesk.toml");
    fs::write(&config_path, "[server]\nhost = \"127.0.0.1\"\nport = 3000\n")?;

    let uploads = root.join("files");
    let cli = Cli {
        config: config_path,
        host: Some("0.0.0.0".to_string()),
        port: Some(9000),
        uploads_dir: Some(uploads.clone()),
    };

    let settings = Settings::new_with_cli(&cli)?;
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.uploads.dir, uploads);

    Ok(())
}
