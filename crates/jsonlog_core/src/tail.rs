//! Reading the last lines of a backend.

use jsonlog_storage::{StorageBackend, StorageResult};

/// Bytes read per backward step.
const CHUNK_SIZE: u64 = 4096;

/// Returns the last `n` lines of `backend`, oldest first, without their
/// terminating `\n`.
///
/// The backend is read backwards in chunks and only as far as needed. A
/// newline at the very end of the data terminates the last line rather
/// than starting an empty one, so `"a\nb\n"` holds two lines. Blank lines
/// in the middle count as lines.
///
/// # Errors
///
/// Returns the first backend read failure.
pub fn tail_lines<B: StorageBackend + ?Sized>(
    backend: &B,
    n: usize,
) -> StorageResult<Vec<Vec<u8>>> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let size = backend.size()?;
    if size == 0 {
        return Ok(Vec::new());
    }

    let mut chunks = Vec::new();
    let mut start = size;
    let mut newlines = 0usize;
    let mut boundary = None;

    while start > 0 && boundary.is_none() {
        let len = CHUNK_SIZE.min(start);
        let chunk_start = start - len;
        let chunk = backend.read_at(chunk_start, len as usize)?;

        for (i, &byte) in chunk.iter().enumerate().rev() {
            let position = chunk_start + i as u64;
            if byte == b'\n' && position != size - 1 {
                newlines += 1;
                if newlines == n {
                    boundary = Some(position + 1);
                    break;
                }
            }
        }

        chunks.push(chunk);
        start = chunk_start;
    }

    let mut tail = Vec::with_capacity((size - start) as usize);
    for chunk in chunks.iter().rev() {
        tail.extend_from_slice(chunk);
    }

    let skip = (boundary.unwrap_or(start) - start) as usize;
    let tail = &tail[skip..];
    let tail = tail.strip_suffix(b"\n").unwrap_or(tail);

    Ok(tail.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect())
}
