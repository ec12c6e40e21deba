use culprit_core::ChangeMap;

use crate::comment::is_comment_line;

/// Pre-image position while walking one hunk's deletion lines.
struct HunkCursor {
    next_line: u32,
    remaining: u32,
}

/// Extract the pre-image line numbers a fix rewrote from unified-diff text.
///
/// The input is expected to be a zero-context (`-U0`) histogram diff, but
/// the parser only relies on the standard unified-diff shape. It scans line
/// by line over three token classes:
///
/// - `+++ b/<path>` file headers set the current file, flushing the previous
///   file's accumulated numbers (only if non-empty);
/// - `@@ -<start>[,<count>] +<start2>[,<count2>] @@` hunk headers position a
///   cursor at the pre-image start (count defaults to 1 when omitted);
/// - deletion body lines are recorded at the next sequential pre-image
///   number unless [`is_comment_line`] classifies them as comments.
///
/// Anything that matches no token class — including malformed headers — is
/// skipped without error. The resulting map keeps file paths in first-seen
/// order and line numbers in hunk-emission order, undeduplicated.
///
/// # Examples
///
/// ```
/// use culprit_diffscan::extract_changes;
///
/// let diff = "\
/// +++ b/xla/service/gpu/runtime.cc
/// @@ -3469 +3468,0 @@
/// -  int64_t launch_id = 0;
/// ";
/// let changes = extract_changes(diff);
/// assert_eq!(
///     changes.lines_for("xla/service/gpu/runtime.cc"),
///     Some([3469].as_slice())
/// );
///
/// assert!(extract_changes("").is_empty());
/// ```
pub fn extract_changes(diff: &str) -> ChangeMap {
    let mut map = ChangeMap::new();
    let mut current_path: Option<String> = None;
    let mut numbers: Vec<u32> = Vec::new();
    let mut cursor: Option<HunkCursor> = None;

    for line in diff.lines() {
        if let Some(path) = line.strip_prefix("+++ b/") {
            if let Some(prev) = current_path.take() {
                map.insert(prev, std::mem::take(&mut numbers));
            }
            current_path = Some(path.to_string());
            cursor = None;
            continue;
        }

        if let Some((start, count)) = parse_hunk_header(line) {
            cursor = Some(HunkCursor {
                next_line: start,
                remaining: count,
            });
            continue;
        }

        if let Some(hunk) = cursor.as_mut() {
            if hunk.remaining > 0 && line.starts_with('-') {
                let number = hunk.next_line;
                hunk.next_line += 1;
                hunk.remaining -= 1;
                if !is_comment_line(line) {
                    numbers.push(number);
                }
            }
        }
    }

    if let Some(path) = current_path {
        map.insert(path, numbers);
    }

    map
}

/// Parse `@@ -<start>[,<count>] +<start2>[,<count2>] @@` into the pre-image
/// range. Returns `None` for anything that is not a well-formed hunk header.
fn parse_hunk_header(line: &str) -> Option<(u32, u32)> {
    let inner = line.strip_prefix("@@ -")?;
    let end = inner.find(" @@")?;
    let inner = &inner[..end];

    let (old, new) = inner.split_once(' ')?;
    new.strip_prefix('+')?;

    parse_range(old)
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
