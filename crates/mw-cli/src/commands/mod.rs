pub mod build;
pub mod check;
pub mod ids;

use std::fs;
use std::path::Path;

use log::info;
use mw_build::{
    BuildConfig, BuildError, BuildInput, BuildOutput, BuildPipeline, BuildResult, DocumentSource,
    MapLoader, TemplateCatalog,
};
use mw_core::{Document, Scene, ShipState};

use crate::BuildArgs;

/// A finished build, kept together for printing.
pub struct Built {
    pub document: Document,
    pub ship: ShipState,
    pub output: BuildOutput,
}

/// Reads documents from JSON files; the document id is the file path.
struct FileSource;

impl DocumentSource for FileSource {
    fn fetch(&mut self, id: &str) -> BuildResult<Document> {
        let unavailable = |message: String| BuildError::DocumentUnavailable {
            id: id.to_string(),
            message,
        };
        let json = fs::read_to_string(id).map_err(|e| unavailable(e.to_string()))?;
        Document::from_json(&json).map_err(|e| unavailable(format!("invalid document: {e}")))
    }
}

fn read_json_file(path: &Path, what: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {what} {}: {e}", path.display()))
}

fn load_catalog(path: Option<&Path>) -> Result<TemplateCatalog, String> {
    match path {
        Some(path) => {
            let json = read_json_file(path, "catalog")?;
            TemplateCatalog::from_json(&json)
                .map_err(|e| format!("invalid catalog {}: {e}", path.display()))
        }
        None => Ok(TemplateCatalog::builtin()),
    }
}

fn load_config(path: Option<&Path>) -> Result<BuildConfig, String> {
    match path {
        Some(path) => {
            let json = read_json_file(path, "config")?;
            BuildConfig::from_json(&json)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))
        }
        None => Ok(BuildConfig::default()),
    }
}

/// Load the inputs named by `args` and run the stock pipeline.
fn build_document(args: &BuildArgs) -> Result<Built, String> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let config = load_config(args.config.as_deref())?;

    let mut loader = MapLoader::new();
    let id = args.document.to_string_lossy();
    loader
        .load_from(&mut FileSource, &id)
        .map_err(|e| e.to_string())?;
    let document = loader
        .current()
        .cloned()
        .ok_or_else(|| format!("no document loaded from {id}"))?;

    let mut scene = Scene::new();
    let mut ship = ShipState::with_minimap(&mut scene);
    let output = BuildPipeline::new(config)
        .run(BuildInput {
            document: &document,
            scene: &mut scene,
            ship: Some(&mut ship),
            resolver: &catalog,
        })
        .map_err(|e| format!("build failed: {e}"))?;
    info!("{} scene nodes", scene.len());

    Ok(Built {
        document,
        ship,
        output,
    })
}
