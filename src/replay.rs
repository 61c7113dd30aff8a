//! Replay Module
//!
//! Reconstructs the recorded call history of an instrumented operation.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::instrument::Operation;
use crate::store::Store;

// == Call Record ==
/// One recorded call: rendered arguments and rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Rendered argument tuple
    pub input: String,
    /// Rendered return value
    pub output: String,
}

// == Replay ==
/// Full call history of an operation, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    /// Qualified name of the operation
    pub operation: String,
    /// Number of recorded inputs
    pub total_calls: usize,
    /// Input/output pairs, truncated to the shorter of the two lists
    pub calls: Vec<CallRecord>,
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.operation, self.total_calls)?;
        for call in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.operation, call.input, call.output)?;
        }
        Ok(())
    }
}

// == Replay ==
/// Reads the whole input and output history of `op`.
///
/// The header count is the number of recorded inputs. Inputs and outputs
/// are paired by index; if the lists differ in length (a call failed after
/// its input was recorded) the extra entries are dropped.
pub async fn replay<S: Store + ?Sized>(store: &S, op: &Operation) -> Result<Replay> {
    let inputs = store.lrange(&op.inputs_key(), 0, -1).await?;
    let outputs = store.lrange(&op.outputs_key(), 0, -1).await?;

    // Suspect: a length mismatch hides failed calls rather than reporting them
    if inputs.len() != outputs.len() {
        warn!(
            "{} history is misaligned: {} inputs, {} outputs",
            op,
            inputs.len(),
            outputs.len()
        );
    }

    let calls = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(input, output)| CallRecord {
            input: String::from_utf8_lossy(input).into_owned(),
            output: String::from_utf8_lossy(output).into_owned(),
        })
        .collect();

    Ok(Replay {
        operation: op.name().to_string(),
        total_calls: inputs.len(),
        calls,
    })
}

/// Prints the replay of `op` to stdout.
pub async fn print_replay<S: Store + ?Sized>(store: &S, op: &Operation) -> Result<()> {
    let history = replay(store, op).await?;
    println!("{}", history);
    Ok(())
}
