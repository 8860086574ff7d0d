use richtext_pdf::{Block, RunStyle, StyledRun, parse_rich_text, split_styled_runs};

fn run(text: &str, style: RunStyle) -> StyledRun {
    StyledRun::new(text, style)
}

#[test]
fn classifies_each_line_by_prefix() {
    let blocks = parse_rich_text("# Title\n## Sub\n- item\nplain words\n\n   ");
    assert_eq!(
        blocks,
        vec![
            Block::Heading1("Title".into()),
            Block::Heading2("Sub".into()),
            Block::Bullet("item".into()),
            Block::Text("plain words".into()),
            Block::Spacer,
            Block::Spacer,
        ]
    );
}

#[test]
fn one_block_per_line_in_order() {
    let input = "a\n\n# b\nc\n- d\n## e\n";
    let blocks = parse_rich_text(input);
    assert_eq!(blocks.len(), input.split('\n').count());
    let texts: Vec<_> = blocks.iter().map(|b| b.text()).collect();
    assert_eq!(
        texts,
        vec![Some("a"), None, Some("b"), Some("c"), Some("d"), Some("e"), None]
    );
}

#[test]
fn empty_input_is_a_single_spacer() {
    assert_eq!(parse_rich_text(""), vec![Block::Spacer]);
}

#[test]
fn trailing_whitespace_is_ignored() {
    assert_eq!(
        parse_rich_text("# Heading   \ttext  "),
        vec![Block::Heading1("Heading   \ttext".into())]
    );
    assert_eq!(parse_rich_text("body  \r"), vec![Block::Text("body".into())]);
}

#[test]
fn heading_two_wins_over_heading_one() {
    assert_eq!(parse_rich_text("##  spaced"), vec![Block::Heading2("spaced".into())]);
    assert_eq!(parse_rich_text("##nospace"), vec![Block::Text("##nospace".into())]);
    assert_eq!(parse_rich_text("#nospace"), vec![Block::Text("#nospace".into())]);
}

#[test]
fn marker_needs_trailing_space() {
    assert_eq!(parse_rich_text("-item"), vec![Block::Text("-item".into())]);
    assert_eq!(parse_rich_text("  - item"), vec![Block::Text("  - item".into())]);
}

#[test]
fn bold_and_italic_runs() {
    assert_eq!(
        split_styled_runs("a **bold** and *it* end"),
        vec![
            run("a ", RunStyle::Normal),
            run("bold", RunStyle::Bold),
            run(" and ", RunStyle::Normal),
            run("it", RunStyle::Italic),
            run(" end", RunStyle::Normal),
        ]
    );
}

#[test]
fn plain_line_is_one_normal_run() {
    assert_eq!(split_styled_runs("no markers"), vec![run("no markers", RunStyle::Normal)]);
    assert!(split_styled_runs("").is_empty());
}

#[test]
fn balanced_bold_concatenates_to_stripped_line() {
    for line in [
        "**x**",
        "lead **x** tail",
        "**one** then **two**",
        "mixed **bold** with spaces  ",
    ] {
        let joined: String = split_styled_runs(line).into_iter().map(|r| r.text).collect();
        assert_eq!(joined, line.replace("**", ""), "{line}");
    }
}

#[test]
fn unmatched_italic_is_literal_remainder() {
    assert_eq!(
        split_styled_runs("price *approx"),
        vec![run("price ", RunStyle::Normal), run("*approx", RunStyle::Normal)]
    );
    assert_eq!(split_styled_runs("*"), vec![run("*", RunStyle::Normal)]);
}

#[test]
fn unmatched_bold_is_literal_remainder() {
    assert_eq!(
        split_styled_runs("**open and *closed*"),
        vec![run("**open and *closed*", RunStyle::Normal)]
    );
}

#[test]
fn empty_spans_produce_empty_runs() {
    assert_eq!(split_styled_runs("****"), vec![run("", RunStyle::Bold)]);
    assert_eq!(
        split_styled_runs("a**b"),
        vec![run("a", RunStyle::Normal), run("**b", RunStyle::Normal)]
    );
}

#[test]
fn nearest_marker_decides_style() {
    assert_eq!(
        split_styled_runs("*a* **b**"),
        vec![
            run("a", RunStyle::Italic),
            run(" ", RunStyle::Normal),
            run("b", RunStyle::Bold),
        ]
    );
}
