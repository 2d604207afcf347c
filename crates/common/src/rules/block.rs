/// Name used in the `# BEGIN` / `# END` lines delimiting our block
pub const BLOCK_MARKER: &str = "MediaGate";

#[derive(Clone, Copy)]
enum Section {
    Before,
    Inside,
    After,
}

/// Replace the block delimited by `# BEGIN <marker>` and `# END <marker>`
///  in `existing` with `block`, or append one if there is none yet.
///
/// Everything outside the markers is left as it was.
pub fn splice_block(existing: &str, marker: &str, block: &str) -> String {
    let begin = format!("# BEGIN {}", marker);
    let end = format!("# END {}", marker);

    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut section = Section::Before;
    // an unterminated block runs to the end of the file
    for line in existing.lines() {
        match section {
            Section::Before if line.trim() == begin => section = Section::Inside,
            Section::Before => before.push(line),
            Section::Inside if line.trim() == end => section = Section::After,
            Section::Inside => {}
            Section::After => after.push(line),
        }
    }

    let mut out = String::new();
    for line in &before {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&begin);
    out.push('\n');
    for line in block.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&end);
    out.push('\n');
    for line in &after {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_when_missing() {
        let spliced = splice_block("# BEGIN WordPress\nRewriteBase /\n# END WordPress\n", "X", "a\nb");
        assert_eq!(
            spliced,
            "# BEGIN WordPress\nRewriteBase /\n# END WordPress\n# BEGIN X\na\nb\n# END X\n"
        );
    }

    #[test]
    fn test_replaces_existing_block() {
        let existing = "head\n# BEGIN X\nold rule\nolder rule\n# END X\ntail\n";
        let spliced = splice_block(existing, "X", "new rule");
        assert_eq!(spliced, "head\n# BEGIN X\nnew rule\n# END X\ntail\n");

        // splicing again with the same block is a no-op
        assert_eq!(splice_block(&spliced, "X", "new rule"), spliced);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(splice_block("", "X", ""), "# BEGIN X\n# END X\n");
    }
}
