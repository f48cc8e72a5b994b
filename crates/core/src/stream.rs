use std::io::{self, BufRead, Write};

use crate::compact::Compactor;
use crate::tokenize::decode_line;
use crate::types::{CompactOptions, CompactOutcome};

/// Compacts one input stream into `out` with fresh state.
///
/// Write failures abort with `Err`. A read failure stops reading, but the
/// lines already read are still drained before it is reported in
/// [`CompactOutcome::read_error`].
pub fn compact_stream<R: BufRead, W: Write>(
    mut input: R,
    out: W,
    options: &CompactOptions,
) -> io::Result<CompactOutcome> {
    let mut compactor = Compactor::new(out, options);
    let mut buf = Vec::new();
    let mut read_error = None;

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => compactor.push_line(&decode_line(&buf))?,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                read_error = Some(err);
                break;
            }
        }
    }

    let (stats, _out) = compactor.finish()?;
    Ok(CompactOutcome { stats, read_error })
}
