use std::collections::HashSet;

use serde::Serialize;

use crate::config::GenConfig;
use crate::diagnostics::{self, Diagnostic, Diagnostics};
use crate::emit::{group_by_class, Emitter, GeneratedSource};
use crate::error::Result;
use crate::model::{Compilation, Snapshot};
use crate::resolve::{HostTypes, Resolver};

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Diagnostics,
}

/// One full pass: discovery -> resolution -> aggregation -> emission.
///
/// Only a missing well-known host type aborts; everything else ends up in
/// `diagnostics` and the affected member or class is skipped.
pub fn generate(compilation: &Compilation, config: &GenConfig) -> Result<GenerationOutput> {
    let host = HostTypes::resolve(compilation, config)?;
    let resolver = Resolver::new(compilation, host, config);

    let mut diagnostics = Diagnostics::new();
    let mut additions = Vec::new();
    let mut seen = HashSet::new();

    for syntax in compilation.classes() {
        let Some(id) = compilation.lookup(&syntax.name) else {
            diagnostics.push(Diagnostic::warning(
                diagnostics::UNRESOLVED_CLASS,
                format!(
                    "Unable to find declared symbol for {}. Skipping.",
                    syntax.name
                ),
                &syntax.location,
            ));
            continue;
        };
        // 同一个 partial 类的多处声明只处理一次
        if !seen.insert(id) {
            continue;
        }
        let class = compilation.get(id);
        let resolution = resolver.resolve_class(id);
        diagnostics.extend(resolution.diagnostics);
        if class.nested_in.is_some() && !resolution.additions.is_empty() {
            diagnostics.push(Diagnostic::warning(
                diagnostics::NESTED_CLASS,
                format!(
                    "{} is nested inside {}; nested classes are not generated. Skipping.",
                    class.name,
                    class.nested_in.as_deref().unwrap_or_default()
                ),
                &syntax.location,
            ));
            continue;
        }
        additions.extend(resolution.additions);
    }

    let emitter = Emitter::new(compilation, config);
    let sources: Vec<GeneratedSource> = group_by_class(additions)
        .iter()
        .map(|group| emitter.emit(group))
        .collect();

    tracing::info!(
        sources = sources.len(),
        errors = diagnostics.error_count(),
        warnings = diagnostics.len() - diagnostics.error_count(),
        "generation finished"
    );
    Ok(GenerationOutput {
        sources,
        diagnostics,
    })
}

/// Parses a JSON snapshot and runs [`generate`] with its embedded config.
pub fn generate_from_json(text: &str) -> Result<GenerationOutput> {
    let (compilation, config) = Snapshot::from_json(text)?.into_parts()?;
    generate(&compilation, &config)
}
