//! Whole-project processing: every version, then the history.
//!
//! Each version is extracted on its own (in parallel when the parser config
//! asks for it). Completions go through a [`ReorderBuffer`] so that the
//! [`SignatureHistory`] always sees versions in chronological order,
//! whatever order they finished in.

use crate::config::ProjectConfig;
use crate::diagnostics::{check_snapshot, DiagnosticKind, Diagnostics};
use crate::error::{DocError, Result};
use crate::history::{HistoryEntry, SignatureHistory, VersionOrder};
use crate::provider::TreeProvider;
use crate::reorder::ReorderBuffer;
use crate::snapshot::{DocumentSnapshot, SnapshotBuilder};
use docgraph_parser_api::{HeaderParser, ParserConfig};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::mpsc;
use std::time::Instant;

type VersionResult = Result<(DocumentSnapshot, Diagnostics)>;

/// Everything a project run produces
#[derive(Debug, Default)]
pub struct ProjectOutput {
    /// Snapshots of the versions that succeeded, oldest first
    pub snapshots: Vec<(String, DocumentSnapshot)>,
    /// Function name → history across the successful versions
    pub history: BTreeMap<String, HistoryEntry>,
    /// `(version, error)` for versions that produced no snapshot
    pub failed_versions: Vec<(String, String)>,
    /// Warnings about the latest snapshot and every failed version
    pub diagnostics: Diagnostics,
}

impl ProjectOutput {
    /// Snapshot of one version
    pub fn snapshot(&self, version: &str) -> Option<&DocumentSnapshot> {
        self.snapshots
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, snapshot)| snapshot)
    }

    /// The most recent successful snapshot
    pub fn latest(&self) -> Option<(&str, &DocumentSnapshot)> {
        self.snapshots
            .last()
            .map(|(version, snapshot)| (version.as_str(), snapshot))
    }
}

/// Extract one version into a snapshot
///
/// Fails only when the provider does, or when the version has no headers
/// under its input directory. Individual files that fail are reported as
/// diagnostics inside the result.
pub fn extract_version<P, H>(
    provider: &P,
    parser: &H,
    project: &ProjectConfig,
    config: &ParserConfig,
    version: &str,
) -> VersionResult
where
    P: TreeProvider + ?Sized,
    H: HeaderParser + ?Sized,
{
    let start = Instant::now();
    let files = project.select_headers(version, provider.headers(version)?);
    if files.is_empty() {
        return Err(DocError::provider(
            version,
            format!("no headers under {}", project.input_for(version)),
        ));
    }

    let tree = parser.parse_tree(&files);
    debug!(
        "{version}: parsed {}/{} headers in {:?}",
        tree.headers.len(),
        tree.total_files(),
        tree.total_parse_time
    );

    let mut builder = SnapshotBuilder::new(config);
    builder.add_tree(tree);
    let (snapshot, diagnostics) = builder.build();

    info!(
        "{version}: {} functions, {} types in {:?}",
        snapshot.functions.len(),
        snapshot.types.len(),
        start.elapsed()
    );
    Ok((snapshot, diagnostics))
}

/// Applies in-order version results to the history
struct Aggregator {
    history: SignatureHistory,
    output: ProjectOutput,
    latest_diagnostics: Diagnostics,
}

impl Aggregator {
    fn new(order: &VersionOrder) -> Self {
        Self {
            history: SignatureHistory::new(order.clone()),
            output: ProjectOutput::default(),
            latest_diagnostics: Diagnostics::new(),
        }
    }

    fn apply(&mut self, version: &str, result: VersionResult) -> Result<()> {
        match result {
            Ok((snapshot, diagnostics)) => {
                self.history.record(version, &snapshot)?;
                self.latest_diagnostics = diagnostics;
                self.output.snapshots.push((version.to_string(), snapshot));
            }
            Err(e) => {
                warn!("version {version} failed: {e}");
                self.history.skip(version)?;
                self.output
                    .diagnostics
                    .push(DiagnosticKind::FailedVersion, version, e.to_string());
                self.output
                    .failed_versions
                    .push((version.to_string(), e.to_string()));
            }
        }
        Ok(())
    }

    fn finish(self) -> ProjectOutput {
        let Aggregator {
            history,
            mut output,
            latest_diagnostics,
        } = self;

        output.history = history.finalize();
        output.diagnostics.extend(latest_diagnostics);
        if let Some((version, snapshot)) = output.snapshots.last() {
            let checks = check_snapshot(snapshot, &output.history, version);
            output.diagnostics.extend(checks);
        }
        output
    }
}

/// Extract every version of `order` and build the signature history
///
/// A version whose extraction fails is left out of the snapshots and the
/// history and reported in `failed_versions`; the other versions are not
/// affected. Versions run in parallel when the parser config enables it.
pub fn process_project<P, H>(
    provider: &P,
    order: &VersionOrder,
    parser: &H,
    project: &ProjectConfig,
) -> Result<ProjectOutput>
where
    P: TreeProvider + ?Sized,
    H: HeaderParser + ?Sized,
{
    let start = Instant::now();
    let mut config = parser.config().clone();
    if let Some(prefix) = project.prefix.as_ref().filter(|p| !p.is_empty()) {
        config.prefix = Some(prefix.clone());
    }

    info!(
        "processing {} versions ({})",
        order.len(),
        if config.parallel { "parallel" } else { "sequential" }
    );

    let mut aggregator = Aggregator::new(order);
    if config.parallel {
        run_parallel(provider, order, parser, project, &config, &mut aggregator)?;
    } else {
        for version in order.iter() {
            let result = extract_version(provider, parser, project, &config, version);
            aggregator.apply(version, result)?;
        }
    }

    let output = aggregator.finish();
    info!(
        "processed {} versions ({} failed) in {:?}",
        order.len(),
        output.failed_versions.len(),
        start.elapsed()
    );
    Ok(output)
}

fn run_parallel<P, H>(
    provider: &P,
    order: &VersionOrder,
    parser: &H,
    project: &ProjectConfig,
    config: &ParserConfig,
    aggregator: &mut Aggregator,
) -> Result<()>
where
    P: TreeProvider + ?Sized,
    H: HeaderParser + ?Sized,
{
    let (tx, rx) = mpsc::channel::<(usize, VersionResult)>();

    std::thread::scope(|scope| -> Result<()> {
        scope.spawn(move || {
            let extract_all = move || {
                order
                    .versions()
                    .par_iter()
                    .enumerate()
                    .for_each_with(tx, |tx, (index, version)| {
                        let result = extract_version(provider, parser, project, config, version);
                        // the receiver is gone once aggregation failed
                        let _ = tx.send((index, result));
                    })
            };

            match config.parallel_workers {
                Some(workers) => match rayon::ThreadPoolBuilder::new().num_threads(workers).build()
                {
                    Ok(pool) => pool.install(extract_all),
                    Err(e) => {
                        warn!("failed to build a pool of {workers} workers, using the global pool: {e}");
                        extract_all()
                    }
                },
                None => extract_all(),
            }
        });

        let mut buffer = ReorderBuffer::new();
        for (index, result) in rx {
            buffer.push(index, result);
            for (index, result) in buffer.drain_ready() {
                let version = order.get(index).unwrap_or_default();
                aggregator.apply(version, result)?;
            }
        }

        if buffer.pending() > 0 {
            warn!("{} version results never became ready", buffer.pending());
        }
        Ok(())
    })
}
