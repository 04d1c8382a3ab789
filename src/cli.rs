use crate::paginator::Profile;
use clap::Parser;
use std::path::PathBuf;

/// Parse EPUB and FB2 books and paginate them for small-screen reading
#[derive(Parser, Debug)]
#[command(name = "webbooks", version, about)]
pub struct Cli {
    /// Book files to read (.epub or .fb2)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Font size profile that decides line width and page height
    #[arg(short, long, value_enum, default_value_t = Profile::default())]
    pub profile: Profile,

    /// Print one JSON document per book instead of a summary
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Log per-chapter decisions (same as RUST_LOG=webbooks=debug)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
