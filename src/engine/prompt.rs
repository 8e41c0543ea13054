use crate::engine::chunker::Block;
use crate::report::finding::NO_FINDINGS;

/// Reviewer persona passed as the system prompt
pub const SYSTEM_PROMPT: &str = "You are a senior C/C++ security auditor. \
You review code for memory-safety bugs, injection, integer overflows, \
race conditions, use of unsafe APIs and other exploitable weaknesses. \
You answer only in the exact format you are given.";

/// Build the analysis prompt for one block.
///
/// The block's absolute start line is embedded so the model reports line
/// numbers of the original file rather than of the excerpt.
pub fn render(block: &Block) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\
         \n\
         Analyze the code below for security vulnerabilities.\n\
         \n\
         Output rules:\n\
         - Write one finding per line and nothing else.\n\
         - Every finding must use exactly this format:\n\
         Line <N>: <vulnerability type> — <cause> — FIX: <fix>\n\
         - Use `Lines <N>-<M>:` or `Lines <N>,<M>:` when a finding spans several lines.\n\
         - Do not repeat the code, do not add explanations, headings or markdown.\n\
         - If there are no issues, output exactly: {NO_FINDINGS}\n\
         \n\
         The first line of the excerpt is line {start} of the file. \
         Report absolute line numbers counted from there.\n\
         \n\
         ```\n\
         {code}\n\
         ```\n",
        start = block.start_line,
        code = block.text,
    )
}
