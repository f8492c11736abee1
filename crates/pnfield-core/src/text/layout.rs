pub const COMMENT_START: &[u8] = b"<!--";
pub const COMMENT_END: &[u8] = b"-->";

/// Bound on each line read while skipping the body of a comment.
pub const MAX_LINE_LENGTH: usize = 1024;
