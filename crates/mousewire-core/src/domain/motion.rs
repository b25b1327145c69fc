//! Step decomposition: splitting a coordinate delta into bounded device steps.
//!
//! HID mouse devices move in small relative steps, so a large jump on one
//! axis has to be expressed as a run of steps no bigger than the device's
//! per-event limit. The decomposition is quotient/remainder: `delta` is
//! covered by `delta / max_step` full-size steps followed by one remainder
//! step of `delta % max_step`, with the signs mirrored for negative deltas.

/// Decomposes the move from `current` to `target` into an ordered sequence
/// of steps, each of magnitude at most `max_step`, whose sum is exactly
/// `target - current`.
///
/// Pure and restartable: calling it again with the same inputs yields the
/// same output. Zero-valued remainder steps are filtered out, so an even
/// division produces only full-size steps and a zero delta produces an
/// empty sequence.
///
/// `max_step` must be at least 1. It is a parameter rather than a constant
/// so that a different step granularity is a configuration change; the
/// bridge runs with `max_step = 1`, where the decomposition degenerates to
/// `|delta|` unit steps of the correct sign.
///
/// # Examples
///
/// ```rust
/// use mousewire_core::domain::motion::decompose;
///
/// assert_eq!(decompose(0, 3, 1), vec![1, 1, 1]);
/// assert_eq!(decompose(5, 2, 1), vec![-1, -1, -1]);
/// assert_eq!(decompose(0, 7, 3), vec![3, 3, 1]);
/// assert_eq!(decompose(4, 4, 1), Vec::<i32>::new());
/// ```
pub fn decompose(current: i32, target: i32, max_step: i32) -> Vec<i32> {
    debug_assert!(max_step >= 1, "max_step must be positive");

    let delta = target - current;
    if delta == 0 {
        return Vec::new();
    }

    // Full-size steps carry the sign of the delta; dividing same-signed
    // operands keeps the quotient non-negative and the remainder on the
    // delta's side of zero, so the parts always sum back to delta.
    let step = if delta > 0 { max_step } else { -max_step };
    let count = (delta / step) as usize;
    let remainder = delta % step;

    let mut steps = vec![step; count];
    if remainder != 0 {
        steps.push(remainder);
    }
    steps
}

// ── Tests ─────────────────────────────────────────────────────────────────────
