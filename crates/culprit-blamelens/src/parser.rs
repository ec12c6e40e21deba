/// One per-line attribution extracted from blame text.
///
/// Blame rendered with full per-line metadata (`git blame --line-porcelain`)
/// emits, for every source line, a header of the form
/// `<hash> <orig_line> <final_line> [<group_size>]` followed by metadata
/// lines including `author <name>`.
///
/// `final_line` is the line number *in the revision being blamed*. Because
/// blame always runs at a fix's parent, it is the number the diff-side
/// pre-image line numbers are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameRecord {
    /// Hash of the commit that last touched the line.
    pub hash: String,
    /// Line number in the attributed commit.
    pub orig_line: u32,
    /// Line number in the revision being blamed.
    pub final_line: u32,
    /// Group size, present on the first line of an attribution group.
    pub group_size: Option<u32>,
    /// Author name from the `author` metadata line.
    pub author: String,
}

/// Parse blame text into attribution records.
///
/// A small line parser over three token classes: header lines open a
/// pending record, `author <name>` lines complete it, and everything else
/// is skipped. Source content lines (tab-prefixed in porcelain output) are
/// ignored outright so code that happens to look like a header cannot
/// produce a phantom record. Malformed input never fails; it simply
/// contributes nothing.
///
/// # Examples
///
/// ```
/// use culprit_blamelens::parse_blame;
///
/// let blame = "\
/// f4529e8414f1fa1f91f38a0407d8f5b53e95a7d1 1 1 1
/// author Adrian Kuegel
/// author-time 1635000000
/// \tsome source line
/// ";
/// let records = parse_blame(blame);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].final_line, 1);
/// assert_eq!(records[0].author, "Adrian Kuegel");
/// ```
pub fn parse_blame(text: &str) -> Vec<BlameRecord> {
    let mut records = Vec::new();
    let mut pending: Option<(String, u32, u32, Option<u32>)> = None;

    for line in text.lines() {
        if line.starts_with('\t') {
            continue;
        }

        if let Some(header) = parse_header(line) {
            pending = Some(header);
            continue;
        }

        if let Some(name) = line.strip_prefix("author ") {
            if let Some((hash, orig_line, final_line, group_size)) = pending.take() {
                records.push(BlameRecord {
                    hash,
                    orig_line,
                    final_line,
                    group_size,
                    author: name.to_string(),
                });
            }
        }
    }

    records
}

/// Parse `<hash> <orig> <final> [<group>]` where the hash is a lowercase
/// hex string of at least 6 characters.
fn parse_header(line: &str) -> Option<(String, u32, u32, Option<u32>)> {
    let mut parts = line.split_whitespace();

    let hash = parts.next()?;
    if hash.len() < 6 || !hash.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()) {
        return None;
    }

    let orig_line: u32 = parts.next()?.parse().ok()?;
    let final_line: u32 = parts.next()?.parse().ok()?;
    let group_size = match parts.next() {
        Some(token) => Some(token.parse().ok()?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    Some((hash.to_string(), orig_line, final_line, group_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLAME: &str = "\
f4529e8414f1fa1f91f38a0407d8f5b53e95a7d1 1 1 1
author Adrian Kuegel
author-mail <akuegel@google.com>
author-time 1635000000
summary Add a missing guard
filename xla/service/gpu/runtime.cc
\t#include <cstdint>
85ac1c43308b9d8467bb9f7121ad71e78f09afbd 35 35 2
author Sergey Kozub
author-time 1636000000
summary Rework launch ids
\tint64_t launch_id = 0;
";

    #[test]
    fn parses_hash_lines_and_authors() {
        let records = parse_blame(BLAME);
        assert_eq!(records.len(), 2);

        assert_eq!(
            records[0].hash,
            "f4529e8414f1fa1f91f38a0407d8f5b53e95a7d1"
        );
        assert_eq!(records[0].orig_line, 1);
        assert_eq!(records[0].final_line, 1);
        assert_eq!(records[0].group_size, Some(1));
        assert_eq!(records[0].author, "Adrian Kuegel");

        assert_eq!(records[1].author, "Sergey Kozub");
        assert_eq!(records[1].final_line, 35);
    }

    #[test]
    fn group_size_is_optional() {
        let records = parse_blame("abcdef123456 4 9\nauthor someone\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].group_size, None);
        assert_eq!(records[0].final_line, 9);
    }

    #[test]
    fn short_or_uppercase_hashes_are_not_headers() {
        assert!(parse_blame("abc12 1 1\nauthor x\n").is_empty());
        assert!(parse_blame("ABCDEF123456 1 1\nauthor x\n").is_empty());
    }

    #[test]
    fn metadata_words_are_not_headers() {
        let text = "\
previous deadbeefdeadbeefdeadbeefdeadbeefdeadbeef file.rs
filename file.rs
boundary
author orphan author line
";
        // The author line has no pending header, so nothing is emitted.
        assert!(parse_blame(text).is_empty());
    }

    #[test]
    fn tab_prefixed_content_cannot_fake_a_header() {
        let text = "\
\tdeadbeef 12 34
author not me
";
        assert!(parse_blame(text).is_empty());
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_blame("").is_empty());
    }
}
