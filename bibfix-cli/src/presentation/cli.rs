use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "bibfix: validate, fix and revert catalog records", long_about = None)]
pub struct Cli {
    /// Backup journal path (default: BIBFIX_BACKUP_PATH or bibfix-backup.log)
    #[arg(long, global = true)]
    pub backup: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one record and print it
    Show {
        #[arg(long)]
        id: u32,
    },

    /// Validate one record without writing anything back
    Validate {
        #[arg(long)]
        id: u32,
    },

    /// Validate one record and write the corrected version back
    Fix {
        #[arg(long)]
        id: u32,
    },

    /// Validate records from a local file, writing corrected records to
    /// an output file; the remote catalog is never touched
    LocalFix {
        input: PathBuf,
        output: PathBuf,
    },

    /// Batch-fix every record listed in a local file
    FileFix {
        input: PathBuf,

        #[arg(long, default_value_t = 5)]
        chunksize: usize,

        /// Daily operating window, e.g. 17-06
        #[arg(long)]
        timeinterval: Option<String>,
    },

    /// Batch-fix the given record ids
    FixMultiple {
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        ids: Vec<u32>,

        #[arg(long, default_value_t = 5)]
        chunksize: usize,

        /// Daily operating window, e.g. 17-06
        #[arg(long)]
        timeinterval: Option<String>,
    },

    /// Revert one record to its most recent backup snapshot
    Undo {
        #[arg(long)]
        id: u32,
    },

    /// Revert every record of one batch
    UndoBatch {
        #[arg(long)]
        batchid: String,
    },

    /// Delete the entire backup history. Irreversible
    Reset,
}
