use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::Path,
};

use boardfile_core::boards::BoardInfo;
use log::info;

pub fn describe<P: AsRef<Path>>(
    output_path: Option<P>,
    board: &dyn BoardInfo,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Describing {} ({})",
        board.info().name,
        board.chip().part
    );

    let output_path = match output_path {
        Some(output_path) => output_path.as_ref().with_extension("json"),
        None => {
            boardfile_core::describe(board, io::stdout().lock(), pretty)?;
            println!();
            return Ok(());
        }
    };

    let output = BufWriter::new(File::create(&output_path)?);

    if let Err(err) = boardfile_core::describe(board, output, pretty) {
        fs::remove_file(&output_path)?;
        return Err(Box::new(err));
    }

    info!("Wrote {}", output_path.display());

    Ok(())
}
