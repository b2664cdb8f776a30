/// Classification for retry policy.
///
/// Used by callers to decide whether repeating a failed valuation request
/// can ever succeed.
///
/// # Behavior Summary
///
/// | Class | Retry the operation? |
/// |-------|----------------------|
/// | `Never` | No - fix the assignment or configuration first |
/// | `Retryable` | Yes - retry the whole `refresh`, values already persisted are untouched |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - invalid parameters, unknown provider, or a terminal
    /// answer such as "no data". The request is fundamentally invalid and
    /// retrying won't help.
    Never,

    /// A transient external failure (network, timeout, upstream outage).
    /// The caller may retry the whole operation later; nothing persisted
    /// was corrupted by the failure.
    Retryable,
}
