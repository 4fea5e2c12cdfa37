use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;
use serde_json::{Value, json};

use wms_theme_merger::config::RunConfig;
use wms_theme_merger::error::ThemeError;
use wms_theme_merger::merge::merge_theme;
use wms_theme_merger::theme::build_theme_entry;

fn run_config(dir: &std::path::Path) -> RunConfig {
    RunConfig {
        capabilities_url: "http://qgis-server:8080/qgisserver?SERVICE=WMS".to_string(),
        theme_key: "parcels".to_string(),
        themes_template: Utf8PathBuf::from_path_buf(dir.join("themes.tpl.json")).unwrap(),
        config_template: Utf8PathBuf::from_path_buf(dir.join("themesConfig.tpl.json")).unwrap(),
        themes_output: Utf8PathBuf::from_path_buf(dir.join("themes.json")).unwrap(),
        config_output: Utf8PathBuf::from_path_buf(dir.join("themesConfig.json")).unwrap(),
        public_url: None,
    }
}

fn write_templates(config: &RunConfig, themes: Value, themes_config: Value) {
    fs::write(
        config.themes_template.as_std_path(),
        serde_json::to_vec_pretty(&themes).unwrap(),
    )
    .unwrap();
    fs::write(
        config.config_template.as_std_path(),
        serde_json::to_vec_pretty(&themes_config).unwrap(),
    )
    .unwrap();
}

fn read_json(path: &Utf8PathBuf) -> Value {
    serde_json::from_str(&fs::read_to_string(path.as_std_path()).unwrap()).unwrap()
}

fn records_for<'a>(items: &'a [Value], key: &str) -> Vec<&'a Value> {
    items
        .iter()
        .filter(|item| {
            item.get("id").and_then(Value::as_str) == Some(key)
                || item.get("name").and_then(Value::as_str) == Some(key)
        })
        .collect()
}

#[test]
fn repeated_merge_keeps_exactly_one_record_per_key() {
    let temp = tempfile::tempdir().unwrap();
    let config = run_config(temp.path());
    write_templates(
        &config,
        json!({"themes": {"items": [{"name": "unrelated", "custom": 1}], "subdirs": [], "backgroundLayers": []}}),
        json!({"themes": [{"id": "unrelated", "name": "unrelated", "default": false}]}),
    );

    let entry = build_theme_entry("parcels", "http://qgis-server:8080/qgisserver", &[], None);
    merge_theme(&config, entry.clone()).unwrap();
    let second = merge_theme(&config, entry).unwrap();
    assert!(second.replaced);

    let themes = read_json(&config.themes_output);
    let items = themes["themes"]["items"].as_array().unwrap();
    assert_eq!(records_for(items, "parcels").len(), 1);
    assert_eq!(records_for(items, "unrelated").len(), 1);
    assert_eq!(items.len(), 2);

    let themes_config = read_json(&config.config_output);
    let entries = themes_config["themes"].as_array().unwrap();
    assert_eq!(records_for(entries, "parcels").len(), 1);
    assert_eq!(entries.len(), 2);
}

#[test]
fn merge_replaces_prior_record_wholesale() {
    let temp = tempfile::tempdir().unwrap();
    let config = run_config(temp.path());
    write_templates(
        &config,
        json!({"themes": {"items": [
            {"name": "parcels", "manualNote": "added by hand", "tiled": true}
        ], "subdirs": [], "backgroundLayers": []}}),
        json!({"themes": [{"name": "parcels", "default": false}]}),
    );

    let entry = build_theme_entry("parcels", "http://qgis-server:8080/qgisserver", &[], None);
    let summary = merge_theme(&config, entry).unwrap();
    assert!(summary.replaced);

    let themes = read_json(&config.themes_output);
    let items = themes["themes"]["items"].as_array().unwrap();
    let records = records_for(items, "parcels");
    assert_eq!(records.len(), 1);
    assert!(records[0].get("manualNote").is_none());
    assert_eq!(records[0]["tiled"], false);

    let themes_config = read_json(&config.config_output);
    assert_eq!(themes_config["themes"][0]["default"], true);
}

#[test]
fn existing_output_is_preferred_over_template() {
    let temp = tempfile::tempdir().unwrap();
    let config = run_config(temp.path());
    write_templates(&config, json!({"themes": []}), json!({"themes": []}));
    fs::write(
        config.themes_output.as_std_path(),
        serde_json::to_vec_pretty(&json!({"themes": {"items": [{"name": "from-output"}], "subdirs": [], "backgroundLayers": []}})).unwrap(),
    )
    .unwrap();

    let entry = build_theme_entry("parcels", "http://qgis-server:8080/qgisserver", &[], None);
    merge_theme(&config, entry).unwrap();

    let themes = read_json(&config.themes_output);
    let items = themes["themes"]["items"].as_array().unwrap();
    assert_eq!(records_for(items, "from-output").len(), 1);
    assert_eq!(items.len(), 2);
}

#[test]
fn legacy_bare_sequence_template_is_canonicalized() {
    let temp = tempfile::tempdir().unwrap();
    let config = run_config(temp.path());
    write_templates(&config, json!([{"name": "legacy"}]), json!({"themes": []}));

    let entry = build_theme_entry("parcels", "http://qgis-server:8080/qgisserver", &[], None);
    merge_theme(&config, entry).unwrap();

    let themes = read_json(&config.themes_output);
    assert!(themes["themes"]["items"].is_array());
    assert!(themes["themes"]["subdirs"].as_array().unwrap().is_empty());
    assert!(
        themes["themes"]["backgroundLayers"]
            .as_array()
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        records_for(themes["themes"]["items"].as_array().unwrap(), "legacy").len(),
        1
    );
}

#[test]
fn missing_template_is_a_read_error() {
    let temp = tempfile::tempdir().unwrap();
    let config = run_config(temp.path());

    let entry = build_theme_entry("parcels", "http://qgis-server:8080/qgisserver", &[], None);
    let err = merge_theme(&config, entry).unwrap_err();
    assert_matches!(err, ThemeError::StoreRead(_));
}

#[test]
fn unparsable_store_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let config = run_config(temp.path());
    fs::write(config.themes_template.as_std_path(), b"{not json").unwrap();
    fs::write(config.config_template.as_std_path(), b"{}").unwrap();

    let entry = build_theme_entry("parcels", "http://qgis-server:8080/qgisserver", &[], None);
    let err = merge_theme(&config, entry).unwrap_err();
    assert_matches!(err, ThemeError::StoreParse(_));
}
