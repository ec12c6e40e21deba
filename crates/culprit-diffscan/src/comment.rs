/// Line-leading tokens that open a comment in the supported syntaxes.
const COMMENT_OPENERS: [&str; 4] = ["#", "//", "<!--", "/*"];

/// Line-trailing tokens that close a comment.
const COMMENT_CLOSERS: [&str; 2] = ["--!>", "*/"];

/// Whether a diff deletion line is a pure comment line.
///
/// `line` must start with the `-` deletion marker; the marker character is
/// ignored. The remainder counts as a comment if it opens with `#`, `//`,
/// `<!--`, or `/*` after optional leading whitespace, or ends with `--!>`
/// or `*/` before optional trailing whitespace.
///
/// This is a single-line heuristic: it keeps no multi-line comment state, so
/// a line *inside* a block comment that carries no opening or closing token
/// is not filtered. That is a documented limitation of the classifier, not
/// something callers should compensate for.
///
/// # Examples
///
/// ```
/// use culprit_diffscan::is_comment_line;
///
/// assert!(is_comment_line("-    // drop the old check"));
/// assert!(is_comment_line("-# legacy shim"));
/// assert!(is_comment_line("-   end of block */  "));
/// assert!(!is_comment_line("-    let x = 1;"));
/// ```
pub fn is_comment_line(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next(); // skip the deletion marker
    let content = chars.as_str();

    let head = content.trim_start();
    if COMMENT_OPENERS.iter().any(|tok| head.starts_with(tok)) {
        return true;
    }

    let tail = content.trim_end();
    COMMENT_CLOSERS.iter().any(|tok| tail.ends_with(tok))
}
