//! CLI override merging and list-field normalization

use super::Config;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Values given on the command line. `None` / empty means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub from_format: Option<String>,
    pub to_format: Option<String>,
    pub pattern: Option<String>,
    pub ignore_names: Option<Vec<String>>,
    pub ignore_paths: Option<Vec<PathBuf>>,
    pub toc_file_name: Option<String>,
    pub toc_template: Option<String>,
    pub toc_title: Option<String>,
    pub template_dir: Option<PathBuf>,
    pub converter: Option<PathBuf>,
    pub follow_symlinks: bool,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(v) = cli.output_dir {
        config.output_dir = v;
    }
    if let Some(v) = cli.from_format {
        config.from_format = v;
    }
    if let Some(v) = cli.to_format {
        config.to_format = v;
    }
    if let Some(v) = cli.pattern {
        config.pattern = v;
    }
    if let Some(v) = cli.ignore_names {
        config.ignore_names = v;
    }
    if let Some(v) = cli.ignore_paths {
        config.ignore_paths = v;
    }
    if let Some(v) = cli.toc_file_name {
        config.toc_file_name = Some(v);
    }
    if let Some(v) = cli.toc_template {
        config.toc_template = Some(v);
    }
    if let Some(v) = cli.toc_title {
        config.toc_title = v;
    }
    if let Some(v) = cli.template_dir {
        config.template_dir = Some(v);
    }
    if let Some(v) = cli.converter {
        config.converter = v;
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }
    config
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    Csv(String),
    List(Vec<String>),
}

impl StringOrList {
    fn into_items(self) -> Vec<String> {
        let raw = match self {
            StringOrList::Csv(s) => s.split(',').map(str::to_string).collect(),
            StringOrList::List(list) => list,
        };
        raw.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }
}

/// Accept either `"a, b"` or `["a", "b"]`.
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrList::deserialize(deserializer)?.into_items())
}

pub(crate) fn path_or_list<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_list(deserializer)?.into_iter().map(PathBuf::from).collect())
}
