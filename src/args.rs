use clap::{Parser, Subcommand};

/// Archive and transcoder command-line surface.
#[derive(Parser, Debug)]
#[command(
    name = "rgss-transcoder",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print usage text
    Help,
    /// Print the tool version
    Version,
    /// List every entry in an archive
    List {
        /// Path to an RGSSAD/RGSS2A/RGSS3A archive
        archive: String,
    },
    /// Extract matching entries from an archive into a directory
    Unpack {
        /// Path to an RGSSAD/RGSS2A/RGSS3A archive
        archive: String,
        /// Directory entries are written into, created if missing
        dir: String,
        /// Only entries whose name matches this regex are extracted
        filter: Option<String>,
    },
    /// Pack a directory's files into a new archive
    Pack {
        /// Directory walked for input files
        dir: String,
        /// Archive file to create
        archive: String,
        /// Archive version: 1, 2, or 3 (default 1)
        version: Option<u8>,
    },
    /// Project every `Data/*.rvdata2` file under a directory into MV/MZ JSON
    Transcode {
        /// Project root containing a `Data` subdirectory
        dir: String,
    },
}

pub const USAGE: &str = "\
rgss-transcoder <command> [args]

Commands:
  help                                    show this message
  version                                 print the tool version
  list <archive>                          list every entry in an archive
  unpack <archive> <dir> [regex]          extract matching entries (default regex: .*)
  pack <dir> <archive> [version]          pack a directory into an archive (default version: 1)
  transcode <dir>                         project Data/*.rvdata2 files into MV/MZ JSON
";
