//! Tests for the subcommand implementations.

use std::fs;

use anyhow::{Result, anyhow, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use propsetter::model::{ObjectKey, ObjectType};
use propsetter::service::{JsonFileHistory, RunHistory};
use propsetter::store::{DesignObjectStore, MemoryStore};
use propsetter::target::PropertyTarget;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use test_helpers::xml::flat_document;

use super::{apply, deapply, export_defaults, export_definition, normalise};
use crate::cli::{ApplyArgs, DeapplyArgs, ExportDefaultsArgs, ExportDefinitionArgs, NormaliseArgs};
use crate::error::CliError;
use crate::settings::Settings;

const DEFINITION: &str = r#"
[[handler]]
type = "content-type"
name = "Blog"

[[handler.setter]]
kind = "property"
properties = { label = "${com.Blog.label}", description = "${com.Blog.description}" }
"#;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
    settings: Settings,
}

impl Workspace {
    fn write(&self, name: &str, text: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, text)?;
        Ok(path)
    }

    fn apply_args(&self, label: &str) -> Result<ApplyArgs> {
        Ok(ApplyArgs {
            name: "blog".to_owned(),
            definition: self.write("definition.toml", DEFINITION)?,
            default_doc: self.write(
                "defaults.xml",
                &flat_document("com", "Blog", &[("label", label), ("description", "Posts")]),
            )?,
            local_doc: None,
            delta_only: false,
        })
    }

    fn label(&self) -> Result<String> {
        let store = MemoryStore::load_snapshot(&self.settings.store)?;
        let blog = store
            .load_modifiable(&ObjectKey::new(ObjectType::ContentType, "Blog"))?
            .ok_or_else(|| anyhow!("Blog missing from snapshot"))?;
        Ok(blog.get_property("label")?.to_string())
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8Path::from_path(dir.path())
        .expect("temp dir is UTF-8")
        .to_owned();
    let settings = Settings {
        store: root.join("store.json"),
        history: root.join("history.json"),
        ..Settings::default()
    };
    Workspace {
        _dir: dir,
        root,
        settings,
    }
}

fn output(buffer: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
fn apply_persists_store_and_history(workspace: Workspace) -> Result<()> {
    let mut out = Vec::new();
    apply(&workspace.settings, &workspace.apply_args("Blog post")?, &mut out)?;
    ensure!(
        output(out)? == "blog SUCCESS (1 object(s) touched)\n",
        "unexpected output"
    );
    ensure!(workspace.label()? == "Blog post", "label not persisted");
    let history = JsonFileHistory::open(&workspace.settings.history)?;
    ensure!(history.last_success("blog")?.is_some(), "history not persisted");
    Ok(())
}

#[rstest]
fn delta_only_reapply_is_skipped(workspace: Workspace) -> Result<()> {
    let mut args = workspace.apply_args("Blog post")?;
    apply(&workspace.settings, &args, &mut Vec::new())?;
    args.delta_only = true;
    let mut out = Vec::new();
    apply(&workspace.settings, &args, &mut out)?;
    ensure!(output(out)? == "blog SKIPPED (0 object(s) touched)\n", "not skipped");
    Ok(())
}

#[rstest]
fn deapply_reverts_and_second_deapply_fails(workspace: Workspace) -> Result<()> {
    apply(&workspace.settings, &workspace.apply_args("Blog post")?, &mut Vec::new())?;
    let args = DeapplyArgs {
        name: "blog".to_owned(),
    };
    deapply(&workspace.settings, &args, &mut Vec::new())?;
    ensure!(workspace.label()?.is_empty(), "label not undone");
    let again = deapply(&workspace.settings, &args, &mut Vec::new());
    ensure!(
        matches!(again, Err(CliError::Config(ref err)) if err.to_string().contains("no successful run")),
        "{again:?}"
    );
    Ok(())
}

#[rstest]
fn missing_definition_is_reported(workspace: Workspace) -> Result<()> {
    let mut args = workspace.apply_args("Blog post")?;
    args.definition = workspace.root.join("absent.toml");
    ensure!(
        apply(&workspace.settings, &args, &mut Vec::new()).is_err(),
        "missing definition accepted"
    );
    ensure!(!workspace.settings.store.exists(), "store written for a rejected run");
    Ok(())
}

#[rstest]
fn normalise_prints_json(workspace: Workspace) -> Result<()> {
    let document = workspace.write("doc.xml", &flat_document("com", "Blog", &[("label", "X")]))?;
    let mut out = Vec::new();
    normalise(&NormaliseArgs { document }, &mut out)?;
    let json: serde_json::Value = serde_json::from_slice(&out)?;
    ensure!(json["com.Blog.label"] == "X", "{json}");
    Ok(())
}

#[rstest]
#[case::without_defaults(false, "FIXME")]
#[case::with_defaults(true, "Blog post")]
fn export_defaults_fills_known_values(
    workspace: Workspace,
    #[case] with_defaults: bool,
    #[case] label: &str,
) -> Result<()> {
    let args = workspace.apply_args("Blog post")?;
    let mut out = Vec::new();
    export_defaults(
        &ExportDefaultsArgs {
            definition: args.definition,
            default_doc: with_defaults.then_some(args.default_doc),
        },
        &mut out,
    )?;
    let xml = output(out)?;
    ensure!(xml.contains(&format!(r#"value="{label}""#)), "{xml}");
    ensure!(xml.contains(r#"name="description""#), "{xml}");
    Ok(())
}

#[rstest]
fn export_definition_renders_placeholders(workspace: Workspace) -> Result<()> {
    let descriptor = workspace.write(
        "export.toml",
        r#"
prefix = "com"
solution = "Blog"

[[object]]
type = "content-type"
name = "Article"
properties = ["label"]
"#,
    )?;
    let mut out = Vec::new();
    export_definition(&ExportDefinitionArgs { descriptor }, &mut out)?;
    let toml = output(out)?;
    ensure!(toml.contains("${com.Blog.Article.label}"), "{toml}");
    Ok(())
}
