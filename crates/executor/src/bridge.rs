//! Line-oriented JSON bridge.
//!
//! Each input line is one JSON-encoded [`Command`]; each output line is the
//! matching [`Response`]. Blank lines are skipped. A line that does not
//! parse produces a failure response and the loop carries on.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::{Command, Error, Response, Session};

/// Execute one request line and render the response line.
pub fn handle_line(session: &mut Session, line: &str) -> String {
    let response = match serde_json::from_str::<Command>(line) {
        Ok(cmd) => {
            let result = session.execute(cmd);
            if let Err(e) = &result {
                debug!(target: "recordkeeper::bridge", kind = e.kind(), error = %e, "command failed");
            }
            Response::from_result(&result)
        }
        Err(e) => {
            warn!(target: "recordkeeper::bridge", error = %e, "malformed request");
            Response::failure(&Error::InvalidInput {
                reason: e.to_string(),
            })
        }
    };
    response.to_json_line()
}

/// Serve requests from `input` until EOF, writing one response per request.
///
/// Returns the number of requests handled.
///
/// # Errors
///
/// Returns any I/O error from reading `input` or writing `output`.
pub fn serve<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> io::Result<usize> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(session, line);
        writeln!(output, "{}", response)?;
        output.flush()?;
        handled += 1;
    }
    debug!(target: "recordkeeper::bridge", handled, "input closed");
    Ok(handled)
}
