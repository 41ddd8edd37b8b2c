//! Command: provision the machine.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::{Cli, VERSION};
use crate::engine::{self, RunOptions};
use crate::error::{ConfigError, ProvisionError};
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::platform::Platform;
use crate::plan::{self, Context};
use crate::prompt::{FixedPrompter, Prompter, TerminalPrompter};

/// Run the provisioning command.
///
/// Non-fatal step failures are reported in the summary and do not make this
/// return an error.
///
/// # Errors
///
/// Returns an error on a configuration problem, when `--only`/`--skip`
/// leave nothing to run, or when a fatal step fails.
pub fn run(args: &Cli, log: &Logger) -> Result<()> {
    log.info(&format!("provision {VERSION}"));
    let setup = CommandSetup::init(args, log)?;
    let home = plan::home_dir();

    let executor = SystemExecutor::with_search_paths(&plan::bin_dirs(&setup.config, &home))
        .context("configure command search path")?;
    let terminal = TerminalPrompter::new();
    let fixed = FixedPrompter::yes();
    let prompter: &dyn Prompter = if args.yes { &fixed } else { &terminal };

    let ctx = Context {
        executor: &executor,
        prompter,
        home,
        user: plan::current_user(),
        platform: Platform::detect(),
    };
    log.debug(&format!(
        "platform: {}, user: {}",
        ctx.platform.os, ctx.user
    ));

    let steps = plan::build(&setup.config, &ctx);
    let planned = steps.len();
    let steps = plan::filter(steps, &args.only, &args.skip);
    if steps.len() < planned {
        log.debug(&format!(
            "filters kept {} of {planned} steps",
            steps.len()
        ));
    }
    if steps.is_empty() {
        return Err(ProvisionError::from(ConfigError::EmptyPlan).into());
    }

    let opts = RunOptions {
        dry_run: args.dry_run,
    };
    let result = engine::run(&steps, &opts, log).map_err(ProvisionError::from)?;
    log.print_summary(&result);
    result.into_result().map_err(ProvisionError::from)?;
    Ok(())
}
