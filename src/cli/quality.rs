//! `quality` command: print the selector quality for byte sizes.

use std::io::{Write, stdout};

use anyhow::{Context, Result};

use crate::negotiate::quality::quality;

/// One `SIZE<TAB>QUALITY` line per size, in argument order.
pub fn print_qualities(sizes: &[u64]) -> Result<()> {
    let mut stdout = stdout().lock();
    write_qualities(&mut stdout, sizes).context("failed to write to stdout")
}

fn write_qualities(out: &mut impl Write, sizes: &[u64]) -> std::io::Result<()> {
    for &size in sizes {
        writeln!(out, "{size}\t{}", quality(size))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_qualities() {
        let mut out = Vec::new();
        write_qualities(&mut out, &[40, 0]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "40\t0.024390243902\n0\t1.000000000000\n"
        );
    }
}
