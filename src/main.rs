//! manchego: convert a document tree and generate per-directory TOCs

use anyhow::Result;

fn main() -> Result<()> {
    manchego::cli::run()
}
