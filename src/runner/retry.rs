//! Abort/retry/cancel gate around fallible operations

use crate::error::ExecutionResult;
use crate::runner::{Operator, Recovery};
use tracing::warn;

/// Run `operation`, asking the operator how to proceed whenever it fails.
///
/// Returns `Ok(())` when the operation eventually succeeds or the operator
/// cancels it, and the operation's error when the operator aborts.
pub fn guard<F>(operator: &mut dyn Operator, mut operation: F) -> ExecutionResult<()>
where
    F: FnMut() -> ExecutionResult<()>,
{
    loop {
        let err = match operation() {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        match operator.recover(&err)? {
            Recovery::Abort => return Err(err),
            Recovery::Retry => continue,
            Recovery::Cancel => {
                warn!("cancelled after error: {}", err);
                return Ok(());
            }
        }
    }
}
