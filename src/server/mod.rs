//! Plan-choice server
//!
//! Hosts one [`PlanAdapter`] and answers plan-choice requests. Transport is
//! line-delimited JSON over any reader/writer pair (stdin/stdout for
//! `pgl serve`):
//!
//! ```text
//! -> {"plans": ["[{\"Plan\": {...}}]", "[{\"Plan\": {...}}]"]}
//! <- {"status":"ok","data":{"chosen_plan_index":1}}
//! ```
//!
//! A bad request is answered with an error line and serving continues.
//! Only I/O failures end the loop.

mod errors;
mod handler;

use std::io::{BufRead, Write};

use crate::adapter::PlanAdapter;
use crate::observability::ObservationScope;

pub use errors::{ServerError, ServerResult};
pub use handler::{ChoosePlanRequest, ChoosePlanResponse, PlanServer};

/// Serve requests from `reader` until end of input.
///
/// Returns the number of requests answered successfully.
pub fn run_server<A, R, W>(adapter: A, reader: R, mut writer: W) -> ServerResult<u64>
where
    A: PlanAdapter,
    R: BufRead,
    W: Write,
{
    let scope = ObservationScope::new("SERVER");
    let mut server = PlanServer::new(adapter);

    let result = (|| -> ServerResult<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = server.handle_line(&line);
            serde_json::to_writer(&mut writer, &response)
                .map_err(|e| ServerError::Io(e.into()))?;
            writeln!(writer)?;
            writer.flush()?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => {
            scope.complete_with_fields(&[("served", &server.served().to_string())]);
            Ok(server.served())
        }
        Err(e) => {
            scope.fail(&e.to_string());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::adapter::{FirstPlanAdapter, LowestCostAdapter};

    fn output_lines(output: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_response_per_request() {
        let input = concat!(
            r#"{"plans": ["[{\"Plan\": {\"Total Cost\": 4}}]", "[{\"Plan\": {\"Total Cost\": 1}}]"]}"#,
            "\n",
            "\n",
            r#"{"plans": ["[{\"Plan\": {\"Total Cost\": 0.5}}]"]}"#,
            "\n",
        );
        let mut output = Vec::new();

        let served = run_server(LowestCostAdapter, Cursor::new(input), &mut output).unwrap();

        assert_eq!(served, 2);
        let lines = output_lines(output);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["data"]["chosen_plan_index"], 1);
        assert_eq!(lines[1]["data"]["chosen_plan_index"], 0);
    }

    #[test]
    fn test_bad_request_does_not_stop_serving() {
        let input = "not json\n{\"plans\": []}\n{\"plans\": [\"{}\"]}\n";
        let mut output = Vec::new();

        let served = run_server(FirstPlanAdapter, Cursor::new(input), &mut output).unwrap();

        assert_eq!(served, 1);
        let lines = output_lines(output);
        assert_eq!(lines[0]["code"], "PGL_SERVER_INVALID_REQUEST");
        assert_eq!(lines[1]["code"], "PGL_ADAPTER_NO_CANDIDATES");
        assert_eq!(lines[2]["status"], "ok");
    }

    #[test]
    fn test_empty_input() {
        let mut output = Vec::new();
        let served = run_server(FirstPlanAdapter, Cursor::new(""), &mut output).unwrap();
        assert_eq!(served, 0);
        assert!(output.is_empty());
    }
}
