//! Generate service: one full compilation run, from house description to
//! written artifacts.

use std::path::PathBuf;

use roomgen_domain::definition::HouseDefinition;
use roomgen_domain::error::CompileError;
use roomgen_domain::group::RoomGroups;
use roomgen_domain::house::CompiledHouse;

use crate::artifact::{Artifact, WriteOutcome};
use crate::ports::{ArtifactSink, SinkError};
use crate::render::room::RoomSections;
use crate::render::{self, RenderOptions};

/// Anything that aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Room keys, in input order.
    pub rooms: Vec<String>,
    /// Artifacts written, in write order.
    pub written: Vec<PathBuf>,
    /// Customization stubs left untouched because they already existed.
    pub kept: Vec<PathBuf>,
}

/// Compile a house and write every artifact through an [`ArtifactSink`].
pub struct GenerateService<S> {
    sink: S,
    options: RenderOptions,
}

impl<S: ArtifactSink> GenerateService<S> {
    /// Create a new service writing to `sink`.
    pub fn new(sink: S, options: RenderOptions) -> Self {
        Self { sink, options }
    }

    /// Run one compilation.
    ///
    /// Every room is compiled, assembled and rendered before the first
    /// write, so an invalid house never leaves partial output behind.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Compile`] for any catalog or validation
    /// failure, and [`GenerateError::Sink`] when an artifact cannot be
    /// written. Both abort the run.
    #[tracing::instrument(skip_all, fields(rooms = house.rooms.len()))]
    pub fn run(&mut self, house: &HouseDefinition) -> Result<GenerationReport, GenerateError> {
        tracing::info!("compiling house description");
        let compiled = CompiledHouse::compile(house)?;
        let artifacts = plan(&compiled, &self.options)?;

        let mut report = GenerationReport {
            rooms: compiled
                .rooms
                .iter()
                .map(|room| room.short_name().to_string())
                .collect(),
            ..GenerationReport::default()
        };

        for artifact in &artifacts {
            match self.sink.write(artifact)? {
                WriteOutcome::Written => {
                    tracing::debug!(path = %artifact.path.display(), "artifact written");
                    report.written.push(artifact.path.clone());
                }
                WriteOutcome::Kept => {
                    tracing::info!(
                        path = %artifact.path.display(),
                        "customization file exists, keeping it"
                    );
                    report.kept.push(artifact.path.clone());
                }
            }
        }

        tracing::info!(
            rooms = report.rooms.len(),
            written = report.written.len(),
            kept = report.kept.len(),
            "generation finished"
        );
        Ok(report)
    }

    /// Give the sink back, e.g. to inspect it.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Render every artifact of `house`: per room its module and stub, then the
/// registry.
///
/// # Errors
///
/// Returns [`CompileError::Validation`] when a room's groups cannot be
/// assembled.
pub fn plan(house: &CompiledHouse, options: &RenderOptions) -> Result<Vec<Artifact>, CompileError> {
    let mut artifacts = Vec::with_capacity(house.rooms.len() * 2 + 1);
    for room in &house.rooms {
        let groups = RoomGroups::assemble(room)?;
        tracing::debug!(
            room = room.short_name(),
            devices = room.devices().count(),
            groups = groups.kinds().len(),
            "room compiled"
        );
        let module = RoomSections::build(room, &groups, options).into_module();
        artifacts.push(Artifact::generated(
            render::room_module_path(room),
            module.to_source(),
        ));
        artifacts.push(Artifact::stub(
            render::customization_path(room),
            render::customization::render(room).to_source(),
        ));
    }
    artifacts.push(Artifact::generated(
        options.registry_file.as_str(),
        render::registry::render(&house.rooms, options).to_source(),
    ));
    Ok(artifacts)
}
