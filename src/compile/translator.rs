use crate::compile::inputs::InputRegistry;
use crate::compile::overlay::compose;
use crate::compile::tracks::{TrackCtx, translate_track};
use crate::foundation::error::{ReelError, ReelResult};
use crate::graph::command::Command;
use crate::timeline::model::{Project, Track};

/// Compiles a [`Project`] into a filter-graph [`Command`].
///
/// The translator only borrows the project, so it can be reused: translating the same project
/// twice yields identical commands. The returned command has no outputs yet; see
/// [`crate::RenderOptions::configure_output`].
#[derive(Clone, Copy, Debug)]
pub struct Translator<'a> {
    project: &'a Project,
}

impl<'a> Translator<'a> {
    /// Create a translator for `project`.
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// The project being translated.
    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// Run one compilation pass.
    ///
    /// Fails with [`ReelError::InvalidInput`] when the canvas or frame rate is unusable, and with
    /// [`ReelError::TrackTranslation`] naming the track when one of its nodes is invalid.
    #[tracing::instrument(skip(self), fields(tracks = self.project.tracks.len()))]
    pub fn translate(&self) -> ReelResult<Command> {
        self.project.validate_header()?;

        let mut cmd = Command::new();
        let mut inputs = InputRegistry::default();
        let mut layers = Vec::new();
        let timeline_secs = self.project.duration_secs();

        for (track_index, track) in z_sorted(&self.project.tracks).into_iter().enumerate() {
            let mut ctx = TrackCtx {
                cmd: &mut cmd,
                inputs: &mut inputs,
                track_index,
                canvas: &self.project.size,
                timeline_secs,
            };
            let produced = translate_track(track, &mut ctx)
                .map_err(|e| ReelError::track(track.name(), e))?;
            tracing::debug!(
                track = track.name(),
                kind = track.kind(),
                z = track.z(),
                track_index,
                layers = produced.len(),
                "translated track"
            );
            layers.extend(produced);
        }

        compose(&mut cmd, self.project, layers);
        tracing::debug!(
            inputs = inputs.len(),
            filters = cmd.filters.len(),
            "translation complete"
        );
        Ok(cmd)
    }
}

/// Tracks in ascending Z order; equal keys keep declaration order.
pub(crate) fn z_sorted(tracks: &[Track]) -> Vec<&Track> {
    let mut sorted: Vec<&Track> = tracks.iter().collect();
    sorted.sort_by_key(|t| t.z());
    sorted
}

#[cfg(test)]
#[path = "../../tests/unit/compile/translator.rs"]
mod tests;
