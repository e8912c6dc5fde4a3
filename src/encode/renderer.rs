use crate::compile::translator::Translator;
use crate::encode::executor::{CancelToken, Executor, ExecutorOpts};
use crate::encode::options::RenderOptions;
use crate::foundation::error::ReelResult;
use crate::graph::command::Command;
use crate::timeline::model::Project;

/// One-call facade: translate a project, attach the output, and run or print the command.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    opts: ExecutorOpts,
}

impl Renderer {
    /// Renderer that runs processes with `opts`.
    pub fn new(opts: ExecutorOpts) -> Self {
        Self { opts }
    }

    /// Translated command, without outputs.
    pub fn command(&self, project: &Project) -> ReelResult<Command> {
        Translator::new(project).translate()
    }

    /// Shell-pasteable command line for `project`, without running anything.
    pub fn command_string(&self, project: &Project, options: &RenderOptions) -> ReelResult<String> {
        Ok(self.finalized(project, options)?.render())
    }

    /// Translate and run to completion.
    pub fn render(&self, project: &Project, options: &RenderOptions) -> ReelResult<()> {
        self.render_with_cancel(project, options, &CancelToken::default())
    }

    /// Translate and run, honoring `cancel` and the configured timeout.
    ///
    /// Outside dry-run mode the `ffmpeg` binary is checked before anything is spawned for real.
    #[tracing::instrument(skip_all, fields(out = %options.output_path.display()))]
    pub fn render_with_cancel(
        &self,
        project: &Project,
        options: &RenderOptions,
        cancel: &CancelToken,
    ) -> ReelResult<()> {
        let cmd = self.finalized(project, options)?;
        let executor = Executor::new(self.opts.clone())
            .dry_run(options.dry_run)
            .verbose(options.verbose);
        if !options.dry_run {
            let version = executor.check_ffmpeg()?;
            tracing::debug!(%version, "found ffmpeg");
        }
        executor.execute_with_cancel(&cmd, cancel)
    }

    fn finalized(&self, project: &Project, options: &RenderOptions) -> ReelResult<Command> {
        let mut cmd = self.command(project)?;
        options.configure_output(&mut cmd)?;
        Ok(cmd)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/renderer.rs"]
mod tests;
