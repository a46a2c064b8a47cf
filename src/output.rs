// src/output.rs
use crate::mc::path_batch::SamplePathBatch;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Writes one row per (path, observation): `path_id,time,x0,..,x{d-1}`.
pub fn write_batch_to_csv(filename: &str, batch: &SamplePathBatch) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write!(file, "path_id,time")?;
    for j in 0..batch.dimension() {
        write!(file, ",x{}", j)?;
    }
    writeln!(file)?;

    for (i, path) in batch.values().outer_iter().enumerate() {
        for (t, state) in batch.times().iter().zip(path.outer_iter()) {
            write!(file, "{},{}", i, t)?;
            for value in state.iter() {
                write!(file, ",{}", value)?;
            }
            writeln!(file)?;
        }
    }
    file.flush()
}

pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, &str)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
