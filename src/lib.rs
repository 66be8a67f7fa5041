//! A codec for RPG Maker XP/VX/VX Ace's RGSSAD archive family, and a transcoder that
//! re-projects RPG Maker VX Ace's rvdata2 game data into the MV/MZ JSON schema.
pub mod archive;
pub mod args;
pub mod command_rewriter;
pub mod error;
pub mod ext;
pub mod schema;
pub mod transcode;
pub mod utils;
pub mod valuetree;

pub use error::{Error, Result};
