//! Stored op-tree loader.
//!
//! Public API: parse authored op-tree JSON (the serde form of `Op`, see
//! `fixtures/ops/*.json`) into validated `Op` values ready to hand to a
//! `Script`.
//!
//! Notes:
//! - The stored form is exactly `Op`'s tagged serde representation
//!   (`"kind"` discriminates variants, tween targets are path strings).
//! - Validation rejects reserved wrap extrapolation, mismatched tween
//!   endpoint kinds, and infinite repeats of zero-duration children.
//! - Target paths are not resolved here; resolution against the property
//!   book happens when a task activates the tree.

use serde::Deserialize;

use crate::error::SequencerError;
use crate::ops::Op;

/// Parse one stored op tree.
pub fn parse_op_json(s: &str) -> Result<Op, SequencerError> {
    let op: Op = serde_json::from_str(s)
        .map_err(|e| SequencerError::corrupt(format!("op parse error: {e}")))?;
    op.validate()?;
    Ok(op)
}

/// Parse a stored procedure: a JSON array of op trees yielded in order.
pub fn parse_ops_json(s: &str) -> Result<Vec<Op>, SequencerError> {
    #[derive(Deserialize)]
    #[serde(transparent)]
    struct StoredOps(Vec<Op>);

    let StoredOps(ops) = serde_json::from_str(s)
        .map_err(|e| SequencerError::corrupt(format!("ops parse error: {e}")))?;
    for op in &ops {
        op.validate()?;
    }
    Ok(ops)
}
