use ledtag_design::DeviceConfig;

use crate::cmd::NewArgs;
use crate::exit::{design_error, CliError, CliResult, FAILURE, SUCCESS};

pub fn run(args: NewArgs) -> CliResult<i32> {
    if args.design.exists() && !args.force {
        return Err(CliError::new(
            FAILURE,
            format!(
                "{} already exists (use --force to replace it)",
                args.design.display()
            ),
        ));
    }

    DeviceConfig::new()
        .save(&args.design)
        .map_err(|err| design_error(&format!("save {}", args.design.display()), err))?;
    tracing::info!(path = %args.design.display(), "created design");
    Ok(SUCCESS)
}
