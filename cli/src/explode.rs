#![deny(missing_docs)]

//! # Explode Command
//!
//! Prints the documented parameters of each handler found in a source tree,
//! with parameter objects expanded into their individual properties.

use crate::error::CliResult;
use crate::sources::load_index;
use paramdoc_core::{document_handlers, render, ExpanderConfig, OutputFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Report encodings accepted on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Yaml => OutputFormat::Yaml,
        }
    }
}

/// Arguments for the explode command.
#[derive(clap::Args, Debug, Clone)]
pub struct ExplodeArgs {
    /// Rust file or directory to scan.
    #[clap(long, default_value = "src")]
    pub src: PathBuf,

    /// Only report these handlers (`name` or `Owner::name`); repeatable.
    #[clap(long = "handler")]
    pub handlers: Vec<String>,

    /// YAML configuration (marker names, envelopes, replacements).
    #[clap(long, env = "PARAMDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output encoding.
    #[clap(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
}

/// Arguments for the list command.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Rust file or directory to scan.
    #[clap(long, default_value = "src")]
    pub src: PathBuf,

    /// YAML configuration (used for the parameter object marker).
    #[clap(long, env = "PARAMDOC_CONFIG")]
    pub config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> CliResult<ExpanderConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Ok(ExpanderConfig::load(path)?)
        }
        None => Ok(ExpanderConfig::default()),
    }
}

/// Executes the explode command, writing the report to `out`.
pub fn execute(args: &ExplodeArgs, out: &mut impl Write) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let index = load_index(&args.src)?;

    let reports = document_handlers(&index, &config, &args.handlers);
    info!(handlers = reports.len(), "expanded handlers");

    let rendered = render(&reports, args.format.into())?;
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

/// Executes the list command, one `METHOD path -> handler` line per handler.
pub fn list(args: &ListArgs, out: &mut impl Write) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let index = load_index(&args.src)?;

    for handler in index.handlers(&config.object_marker) {
        let method = handler
            .route
            .as_ref()
            .map(|r| r.method.to_ascii_uppercase())
            .unwrap_or_else(|| "-".to_string());
        let path = handler
            .route
            .as_ref()
            .and_then(|r| r.path.as_deref())
            .unwrap_or("-");
        writeln!(out, "{} {} -> {}", method, path, handler.qualified_name())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HANDLERS: &str = r#"
        pub struct UserFilter {
            name: String,
            #[param(required = false)]
            email: Option<String>,
            internal: u64,
        }

        impl UserFilter {
            pub fn name(&self) -> &str { &self.name }
            pub fn email(&self) -> Option<&str> { self.email.as_deref() }
        }

        #[get("/users/{id}")]
        async fn show(id: Path<u32>, #[parameter_object] filter: Query<UserFilter>) -> HttpResponse {
            todo!()
        }

        async fn search(#[parameter_object] filter: Query<UserFilter>) {}
    "#;

    fn write_src() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("handlers.rs"), HANDLERS).unwrap();
        dir
    }

    #[test]
    fn test_explode_json() {
        let dir = write_src();
        let args = ExplodeArgs {
            src: dir.path().to_path_buf(),
            handlers: vec!["show".into()],
            config: None,
            format: Format::Json,
        };
        let mut out = Vec::new();
        execute(&args, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let params = value[0]["parameters"].as_array().unwrap();
        let names: Vec<_> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["id", "name", "email"]);
        assert_eq!(params[2]["nullable"], true);
        assert_eq!(params[1]["nullable"], false);
    }

    #[test]
    fn test_explode_with_config_yaml() {
        let dir = write_src();
        let config = dir.path().join("paramdoc.yaml");
        fs::write(&config, "envelopes: []\n").unwrap();
        let args = ExplodeArgs {
            src: dir.path().join("handlers.rs"),
            handlers: vec!["search".into()],
            config: Some(config),
            format: Format::Yaml,
        };
        let mut out = Vec::new();
        execute(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Without envelopes `Query<UserFilter>` is not introspectable
        assert!(text.contains("handler: search"));
        assert!(text.contains("parameters: []"));
    }

    #[test]
    fn test_list_handlers() {
        let dir = write_src();
        let args = ListArgs {
            src: dir.path().to_path_buf(),
            config: None,
        };
        let mut out = Vec::new();
        list(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "GET /users/{id} -> show\n- - -> search\n");
    }

    #[test]
    fn test_missing_config_fails() {
        let dir = write_src();
        let args = ListArgs {
            src: dir.path().to_path_buf(),
            config: Some(dir.path().join("nope.yaml")),
        };
        assert!(list(&args, &mut Vec::new()).is_err());
    }
}
