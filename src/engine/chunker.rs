/// A contiguous run of source lines sent to the model in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Lines joined with `\n`
    pub text: String,
    /// 1-based line number of the first line in the original file
    pub start_line: usize,
}

/// Approximate token count of a line: whitespace-delimited words.
pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Split `lines` into blocks of at most `budget` words each.
///
/// A line is never split: a line longer than `budget` on its own still
/// lands in a block by itself. With `whole_file` the entire input becomes
/// a single block starting at line 1, even when empty.
pub fn split<S: AsRef<str>>(lines: &[S], budget: usize, whole_file: bool) -> Vec<Block> {
    if whole_file {
        return vec![Block {
            text: join(lines),
            start_line: 1,
        }];
    }

    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_start = 1;
    let mut words = 0;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let line_words = word_count(line);

        if words + line_words > budget && !current.is_empty() {
            blocks.push(Block {
                text: current.join("\n"),
                start_line: current_start,
            });
            current.clear();
            current_start = idx + 1;
            words = 0;
        }

        current.push(line);
        words += line_words;
    }

    if !current.is_empty() {
        blocks.push(Block {
            text: current.join("\n"),
            start_line: current_start,
        });
    }

    blocks
}

fn join<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}
