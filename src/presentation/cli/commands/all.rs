use indicatif::ProgressBar;
use std::io::{self, Write};

use crate::application::use_cases::dispatch_command::DispatchObserver;
use crate::common::result::{GitwsResult, ResultExt};
use crate::domain::entities::execution::ExecutionResult;
use crate::presentation::cli::context::CommandContext;
use crate::presentation::ui::report::ReportRenderer;

/// Run a version-control command in every repository
pub struct AllCommand {
    pub args: Vec<String>,
}

impl AllCommand {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Always exits zero once dispatch happened, whatever the repositories report
    pub async fn execute(&self, ctx: &CommandContext) -> GitwsResult<i32> {
        let workspace = ctx.discover_workspace()?;
        ctx.record_history(&workspace);
        let config = ctx.load_config(&workspace)?;
        let command = ctx.command_line(&self.args)?;
        let dispatcher = ctx.dispatcher()?;

        let mut report = StreamingReport::new(
            ReportRenderer::new(ctx.display.use_color),
            io::stdout(),
            ctx.display.create_progress_bar(0, &command.to_string()),
        );
        let outcome = dispatcher
            .dispatch_all_with(&config, &command, &mut report)
            .await;
        report.progress.finish_and_clear();

        outcome?;
        report
            .finish()
            .with_filesystem_error("Failed to write report", None)?;
        Ok(0)
    }
}

/// Writes each block as soon as every earlier one is known
pub struct StreamingReport<W: Write + Send> {
    renderer: ReportRenderer,
    out: W,
    progress: ProgressBar,
    write_error: Option<io::Error>,
}

impl<W: Write + Send> StreamingReport<W> {
    pub fn new(renderer: ReportRenderer, out: W, progress: ProgressBar) -> Self {
        Self {
            renderer,
            out,
            progress,
            write_error: None,
        }
    }

    /// First write failure, if any, and the writer
    pub fn finish(self) -> io::Result<W> {
        match self.write_error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

impl<W: Write + Send> DispatchObserver for StreamingReport<W> {
    fn on_dispatch_started(&mut self, total: usize, _reachable: usize) {
        self.progress.set_length(total as u64);
    }

    fn on_completed(&mut self, result: &ExecutionResult) {
        self.progress.set_message(result.repository_name.clone());
        self.progress.inc(1);
    }

    fn on_ready(&mut self, result: &ExecutionResult) {
        if self.write_error.is_some() {
            return;
        }
        let Self {
            renderer,
            out,
            progress,
            write_error,
        } = self;
        let written = progress.suspend(|| {
            renderer
                .write_block(&mut *out, result)
                .and_then(|_| out.flush())
        });
        if let Err(e) = written {
            *write_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::command_line::CommandLine;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn test_streaming_report_writes_ready_blocks() {
        let renderer = ReportRenderer::new(false);
        let progress = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        let mut report = StreamingReport::new(renderer.clone(), Vec::new(), progress);
        let command = CommandLine::new("git", ["status"]).unwrap();
        let first = ExecutionResult::completed("a", "/w/a", command.clone(), 0, "one\n", 1);
        let second = ExecutionResult::skipped("b", "/w/b", command);

        report.on_dispatch_started(2, 1);
        report.on_completed(&second);
        report.on_completed(&first);
        report.on_ready(&first);
        report.on_ready(&second);
        assert_eq!(report.progress.position(), 2);

        let out = report.finish().unwrap();
        let expected = renderer.render(&[first, second]).concat();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
