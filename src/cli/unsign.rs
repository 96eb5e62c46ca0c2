//! Standalone unsign command: strip signatures, no re-sign.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::pipeline::ResignPipeline;
use crate::core::progress::ProgressSink;
use crate::core::store::ProfileStore;
use crate::core::tools;
use crate::error::Result;

/// Prints each phase label as the pipeline reaches it.
struct PhasePrinter;

impl ProgressSink for PhasePrinter {
    fn phase(&self, label: &str) {
        output::dimmed(label);
    }
    fn fraction(&self, _value: f64) {}
    fn console(&self, line: &str) {
        println!("{}", line);
    }
}

pub fn execute(source: &Path, target: &Path) -> Result<()> {
    info!("unsigning {} -> {}", source.display(), target.display());

    // The store is consulted for jdkHome only; no unlock needed.
    let store = ProfileStore::open()?;
    let jar = tools::find_tool(&store.document.jdk_home, tools::JAR)?;
    let scratch = ProfileStore::data_dir()?;

    // jarsigner is unused on this path but the pipeline carries it.
    let jarsigner = tools::find_tool(&store.document.jdk_home, tools::JARSIGNER)
        .unwrap_or_else(|_| "jarsigner".into());

    let pipeline = ResignPipeline::new(jar, jarsigner, scratch);
    pipeline.unsign(source, target, &PhasePrinter)?;

    output::success(&format!(
        "wrote unsigned {}",
        output::path(&target.display().to_string())
    ));
    Ok(())
}
