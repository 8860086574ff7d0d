pub mod inline;

use crate::model::Block;

pub use inline::split_styled_runs;

/// Parse markdown-lite text into one block per line.
///
/// `# ` is a level-1 heading, `## ` a level-2 heading, `- ` a bullet and a
/// blank line a spacer; anything else is plain text kept with its leading
/// whitespace. Trailing whitespace is always dropped. The empty string is a
/// single empty line and therefore parses to one `Spacer`.
pub fn parse_rich_text(text: &str) -> Vec<Block> {
    text.split('\n').map(parse_line).collect()
}

fn parse_line(raw: &str) -> Block {
    let line = raw.trim_end();

    if line.trim().is_empty() {
        return Block::Spacer;
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Heading2(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Block::Heading1(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Block::Bullet(rest.trim().to_string());
    }
    Block::Text(line.to_string())
}
