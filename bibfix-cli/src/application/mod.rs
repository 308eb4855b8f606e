pub mod handlers;
pub mod rules;

use crate::presentation::cli::{Cli, Commands};
use bibfix_core::error::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = handlers::Context::from_env(cli.backup);

    match cli.command {
        Commands::Show { id } => handlers::handle_show(&ctx, id),
        Commands::Validate { id } => handlers::handle_validate(&ctx, id),
        Commands::Fix { id } => handlers::handle_fix(&ctx, id),
        Commands::LocalFix { input, output } => handlers::handle_local_fix(input, output),
        Commands::FileFix {
            input,
            chunksize,
            timeinterval,
        } => handlers::handle_file_fix(&ctx, input, chunksize, timeinterval),
        Commands::FixMultiple {
            ids,
            chunksize,
            timeinterval,
        } => handlers::handle_fix_multiple(&ctx, &ids, chunksize, timeinterval),
        Commands::Undo { id } => handlers::handle_undo(&ctx, id),
        Commands::UndoBatch { batchid } => handlers::handle_undo_batch(&ctx, &batchid),
        Commands::Reset => handlers::handle_reset(&ctx),
    }
}
