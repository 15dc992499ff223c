//! Helper macros used across the crate.

/// Returns early with `$error` when `$predicate` does not hold.
///
/// Like `assert!`, but yields an `Err` instead of panicking, which keeps size and
/// sanity checks in decoders and socket setup on a single line.
///
/// ```ignore
/// ensure!(src.len() <= self.max_header_bytes, ParseError::too_large_header(src.len(), self.max_header_bytes));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
