use clap::{CommandFactory, Parser};
use lectern::config::LecternConfig;
use lectern::tooling::cli::{Cli, CliContext, Commands};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["lectern", "extract", "r.0.0.json"],
        vec!["lectern", "extract", "--generation", "1.20.4", "a.json", "b.json"],
        vec!["lectern", "extract", "--generation", "auto", "--label", "spawn", "a.json"],
        vec!["lectern", "--store", "/tmp/s", "reconcile"],
        vec!["lectern", "export", "--target", "1.12", "--target", "1.20.5", "--out", "out"],
        vec!["lectern", "export", "--no-duplicates"],
        vec!["lectern", "status", "--format", "json"],
        vec!["lectern", "--log-level", "debug", "--log-format", "json", "config"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_extract_without_files() {
    assert!(Cli::try_parse_from(["lectern", "extract"]).is_err());
    assert!(Cli::try_parse_from(["lectern", "export", "--max-depth", "3"]).is_err());
}

#[test]
fn help_lists_every_command() {
    let help = Cli::command().render_long_help().to_string();
    for name in ["extract", "reconcile", "export", "status", "config"] {
        assert!(help.contains(name), "help is missing {name}");
    }
}

fn context(temp_dir: &TempDir) -> CliContext {
    CliContext::from_config(LecternConfig::default(), Some(temp_dir.path().join("store"))).unwrap()
}

#[test]
fn status_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = cli
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(parsed.get("store_path").and_then(|v| v.as_str()).is_some());
    assert_eq!(parsed.get("unique").and_then(|v| v.as_u64()), Some(0));
    assert!(parsed.get("placement_violations").and_then(|v| v.as_u64()).is_some());
    let rows = parsed.get("rows").and_then(|v| v.as_array()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["kind"], "MultiPageDocument");
}

#[test]
fn extract_json_contract_and_auto_generation() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let path = temp_dir.path().join("player.json");
    std::fs::write(
        &path,
        json!({
            "DataVersion": 1343,
            "Inventory": [{ "id": "minecraft:writable_book", "Count": 1, "Slot": 4,
                            "tag": { "pages": ["draft"] } }]
        })
        .to_string(),
    )
    .unwrap();

    let output = cli
        .execute(&Commands::Extract {
            generation: Some("auto".to_string()),
            label: Some("alex".to_string()),
            max_depth: None,
            format: "json".to_string(),
            files: vec![path],
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let tree = &parsed["report"]["trees"][0];
    assert_eq!(tree["label"], "alex");
    assert_eq!(tree["generation"], "legacy");
    assert_eq!(tree["found"], 1);
    assert!(parsed["report"]["reconcile"]["swaps"].as_u64().is_some());
    assert!(parsed["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn config_command_renders_toml() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = cli.execute(&Commands::Config).unwrap();
    let parsed: LecternConfig = toml::from_str(&output).unwrap();
    assert_eq!(parsed, LecternConfig::default());
}
