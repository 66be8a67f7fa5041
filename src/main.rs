use clap::Parser;
use fancy_regex::Regex;
use rgss_transcoder::archive::{self, Archive, Version};
use rgss_transcoder::args::{Cli, Command, USAGE};
use rgss_transcoder::error::{Error, Result};
use rgss_transcoder::transcode;
use rgss_transcoder::utils::counter::{Counter, RunResult};
use rgss_transcoder::utils::files::{find_files_relative, make_sure_dir_exists};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        None | Some(Command::Help) => {
            print!("{USAGE}");
            Ok(())
        }
        Some(Command::Version) => {
            println!("version: 1.0.0");
            Ok(())
        }
        Some(Command::List { archive }) => list(&archive),
        Some(Command::Unpack { archive, dir, filter }) => unpack(&archive, &dir, filter.as_deref()),
        Some(Command::Pack { dir, archive, version }) => pack(&dir, &archive, version.unwrap_or(1)),
        Some(Command::Transcode { dir }) => transcode::run(Path::new(&dir)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open_archive(path: &str) -> Result<Archive<BufReader<File>>> {
    let file = File::open(path)?;
    Archive::open(BufReader::new(file))
}

fn list(path: &str) -> Result<()> {
    let archive = open_archive(path)?;
    for entry in archive.entries() {
        println!(
            "{}: size={}, offset={}, magic={}",
            entry.name, entry.size, entry.offset, entry.start_magic
        );
    }
    Ok(())
}

fn unpack(archive_path: &str, dir: &str, filter: Option<&str>) -> Result<()> {
    let pattern = filter.unwrap_or(".*");
    let regex = Regex::new(pattern).map_err(|e| Error::InvalidFilter {
        pattern: pattern.to_string(),
        source: e,
    })?;

    let mut archive = open_archive(archive_path)?;
    let out_dir = PathBuf::from(dir);
    std::fs::create_dir_all(&out_dir)?;

    let entries = archive.entries().to_vec();
    let counter = Counter::new();
    for entry in &entries {
        match regex.is_match(&entry.name) {
            Ok(true) => {}
            Ok(false) => {
                counter.inc(RunResult::Ignored);
                continue;
            }
            Err(e) => {
                return Err(Error::InvalidFilter {
                    pattern: pattern.to_string(),
                    source: e,
                });
            }
        }

        println!("Extracting: {}", entry.name);
        let out_path = out_dir.join(&entry.name);
        make_sure_dir_exists(&out_path)?;
        let mut out_file = File::create(&out_path)?;
        match archive.extract_entry(entry, &mut out_file) {
            Ok(()) => counter.inc(RunResult::Ok),
            Err(e) => {
                eprintln!("Failed to extract {}: {e}", entry.name);
                counter.inc_error();
            }
        }
    }

    println!("{counter}");
    if counter.had_errors() {
        return Err(Error::UnexpectedShape {
            context: "unpack".to_string(),
            detail: "one or more entries failed to extract".to_string(),
        });
    }
    Ok(())
}

fn pack(dir: &str, archive_path: &str, version: u8) -> Result<()> {
    let dir_path = Path::new(dir);
    if !dir_path.is_dir() {
        return Err(Error::NotADirectory(dir_path.to_path_buf()));
    }
    let version = Version::from_byte(version)?;

    let mut files = Vec::new();
    for (name, path) in find_files_relative(dir_path)? {
        let data = std::fs::read(&path)?;
        files.push((name, data));
    }

    make_sure_dir_exists(archive_path)?;
    let mut out_file = File::create(archive_path)?;
    archive::write_archive(&mut out_file, version, &files)?;
    println!("Packed {} file(s) into {archive_path}", files.len());
    Ok(())
}
