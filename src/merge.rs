use std::fs;
use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::RunConfig;
use crate::error::ThemeError;
use crate::theme::{ThemeEntry, ThemesConfigDocument, ThemesDocument};

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub theme: String,
    pub replaced: bool,
    pub items: usize,
    pub config_entries: usize,
}

/// Upsert-by-key: any record matching the theme key by id or name is removed
/// from both stores, then the fresh entry is appended at the tail. Both
/// stores are fully rewritten; the themes store write comes first and no
/// transaction spans the two.
pub fn merge_theme(config: &RunConfig, entry: ThemeEntry) -> Result<MergeSummary, ThemeError> {
    let themes_document: ThemesDocument =
        read_store(&config.themes_output, &config.themes_template)?;
    let mut store = themes_document.normalize();

    let config_document: ThemesConfigDocument =
        read_store(&config.config_output, &config.config_template)?;
    let mut config_themes = config_document.normalize();

    let replaced = remove_by_key(&mut store.items, &entry.name) > 0;
    remove_by_key(&mut config_themes, &entry.name);

    let summary = json!({
        "id": entry.id,
        "name": entry.name,
        "default": entry.default,
    });
    let theme = entry.name.clone();
    store.items.push(
        serde_json::to_value(&entry).map_err(|err| ThemeError::Filesystem(err.to_string()))?,
    );
    config_themes.push(summary);

    let items = store.items.len();
    let config_entries = config_themes.len();

    write_json(&config.themes_output, &json!({ "themes": store }))?;
    write_json(&config.config_output, &json!({ "themes": config_themes }))?;

    Ok(MergeSummary {
        theme,
        replaced,
        items,
        config_entries,
    })
}

fn read_store<T: DeserializeOwned>(output: &Utf8Path, template: &Utf8Path) -> Result<T, ThemeError> {
    let source = if output.as_std_path().exists() {
        output
    } else {
        template
    };
    let content = fs::read_to_string(source.as_std_path())
        .map_err(|_| ThemeError::StoreRead(source.as_std_path().to_path_buf()))?;
    serde_json::from_str(&content).map_err(|err| ThemeError::StoreParse(format!("{source}: {err}")))
}

pub fn remove_by_key(records: &mut Vec<Value>, key: &str) -> usize {
    let before = records.len();
    records.retain(|record| !matches_key(record, key));
    before - records.len()
}

fn matches_key(record: &Value, key: &str) -> bool {
    ["id", "name"]
        .iter()
        .any(|field| record.get(field).and_then(Value::as_str) == Some(key))
}

fn write_json(path: &Utf8Path, value: &Value) -> Result<(), ThemeError> {
    let mut content =
        serde_json::to_vec_pretty(value).map_err(|err| ThemeError::Filesystem(err.to_string()))?;
    content.push(b'\n');
    write_bytes_atomic(path, &content)
}

fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), ThemeError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| ThemeError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix("wms-themes")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| ThemeError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .map_err(|err| ThemeError::Filesystem(err.to_string()))?;
    if path.as_std_path().exists() {
        fs::remove_file(path.as_std_path())
            .map_err(|err| ThemeError::Filesystem(err.to_string()))?;
    }
    temp.persist(path.as_std_path())
        .map_err(|err| ThemeError::Filesystem(err.to_string()))?;
    Ok(())
}
