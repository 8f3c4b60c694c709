//! Accept and reject predicates
//!
//! Predicates are commands run with captured output. Their exit status is
//! an answer, never an error: a succeeding reject or a failing accept
//! skips the task.

use crate::runner::{check_command, Catalog, Context, SkipReason, Task};

/// Decide whether `task` should be skipped.
///
/// Rejects are evaluated first, then accepts, each in declared order; the
/// first decisive predicate wins.
pub fn skip_reason(task: &Task, catalog: &Catalog, ctx: &mut Context) -> Option<SkipReason> {
    for reject in &task.rejects {
        if check_command(reject, catalog, ctx) {
            return Some(SkipReason::Rejected(reject.join(" ")));
        }
    }

    for accept in &task.accepts {
        if !check_command(accept, catalog, ctx) {
            return Some(SkipReason::NotAccepted(accept.join(" ")));
        }
    }

    None
}
