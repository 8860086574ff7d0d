mod common;

use common::{FIXED_DATE_LABEL, body_texts, fixed_date, mono_measure, short_lines};
use richtext_pdf::config::{Colors, Config, Margins};
use richtext_pdf::fonts::{FontFace, FontSet};
use richtext_pdf::model::Rgb;
use richtext_pdf::pdf::header_footer::{RunningText, page_label, stamp_pages};
use richtext_pdf::pdf::{DrawOp, Page, PageFlow, PageGeometry, TextOp};
use richtext_pdf::{Assets, GenerateRequest, Session, wrap_line};

// Wrapping

#[test]
fn wraps_greedily_on_spaces() {
    // 5pt per char at size 10, so 10 chars per line.
    let lines = wrap_line("the quick brown fox jumps", mono_measure, 10.0, 50.0);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
}

#[test]
fn every_line_fits_or_is_a_single_word() {
    let text = "a fairly long sentence with an extraordinarilylongunbreakableword in the middle of it";
    for max in [20.0, 35.0, 60.0, 120.0] {
        for line in wrap_line(text, mono_measure, 10.0, max) {
            assert!(
                mono_measure(&line, 10.0) <= max || !line.contains(' '),
                "{line:?} exceeds {max}"
            );
        }
    }
}

#[test]
fn oversized_word_gets_its_own_line() {
    let lines = wrap_line("a supercalifragilistic b", mono_measure, 10.0, 50.0);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn rewrapping_a_fitting_line_is_identity() {
    let text = "one two three four five six seven eight nine ten eleven twelve";
    for line in wrap_line(text, mono_measure, 10.0, 80.0) {
        assert_eq!(wrap_line(&line, mono_measure, 10.0, 80.0), vec![line.clone()]);
    }
}

#[test]
fn wrapping_keeps_every_word_in_order() {
    let text = "alpha beta gamma delta epsilon zeta eta theta";
    let lines = wrap_line(text, mono_measure, 10.0, 60.0);
    assert_eq!(lines.join(" "), text);
}

#[test]
fn empty_text_wraps_to_nothing() {
    assert!(wrap_line("", mono_measure, 10.0, 50.0).is_empty());
}

// Page flow

const LINE: f32 = 18.5;

/// content top 250, footer boundary 65: exactly ten lines per page.
fn small_geometry() -> PageGeometry {
    PageGeometry {
        width: 200.0,
        height: 300.0,
        margins: Margins {
            top: 40.0,
            bottom: 20.0,
            left: 10.0,
            right: 10.0,
        },
    }
}

fn flow_lines(lines: usize) -> Vec<Page> {
    let mut flow = PageFlow::new(small_geometry(), None);
    for i in 0..lines {
        flow.ensure_space(LINE);
        let y = flow.y();
        flow.draw(DrawOp::Text(TextOp {
            x: 10.0,
            y,
            size: 10.0,
            face: FontFace::Regular,
            color: Rgb::new(0.0, 0.0, 0.0),
            text: i.to_string(),
        }));
        flow.advance(LINE);
    }
    flow.finish()
}

#[test]
fn geometry_derives_from_margins() {
    let g = small_geometry();
    assert_eq!(g.content_top(), 250.0);
    assert_eq!(g.footer_boundary(), 65.0);
    assert_eq!(g.usable_height(), 185.0);
    assert_eq!(g.max_width(), 180.0);
}

#[test]
fn page_count_is_ceil_of_content_over_usable_height() {
    let usable = small_geometry().usable_height();
    for lines in [1, 9, 10, 11, 19, 20, 21, 100] {
        let needed = lines as f32 * LINE;
        let expected = (needed / usable).ceil() as usize;
        assert_eq!(flow_lines(lines).len(), expected, "{lines} lines");
    }
}

#[test]
fn no_line_crosses_footer_boundary() {
    let boundary = small_geometry().footer_boundary();
    for page in flow_lines(47) {
        for t in page.texts() {
            assert!(t.y - LINE >= boundary, "line {} at y={}", t.text, t.y);
        }
    }
}

#[test]
fn lines_keep_their_order_across_pages() {
    let pages = flow_lines(25);
    let order: Vec<usize> = pages
        .iter()
        .flat_map(|p| p.texts().map(|t| t.text.parse::<usize>().unwrap()))
        .collect();
    assert_eq!(order, (0..25).collect::<Vec<_>>());
    assert_eq!(pages[1].texts().next().unwrap().y, small_geometry().content_top());
}

#[test]
fn fresh_page_never_breaks() {
    let mut flow = PageFlow::new(small_geometry(), None);
    assert!(!flow.ensure_space(1000.0));
    flow.advance(1000.0);
    assert!(flow.ensure_space(LINE));
    assert!(!flow.ensure_space(1000.0));
    assert_eq!(flow.page_count(), 2);
}

#[test]
fn rendered_document_respects_footer_boundary() {
    let config = Config::default();
    let content = format!(
        "# Report\n{}\n## Details\n- **first** bullet\n- *second* bullet\n\n{}",
        short_lines(40),
        short_lines(40)
    );
    let request = GenerateRequest::new("Long", content);
    let session = Session::new(&request, &config, &Assets::default(), fixed_date());
    let pages = session.layout();
    assert!(pages.len() >= 2);

    let boundary = PageGeometry::from_config(&config).footer_boundary();
    let theme = config.theme;
    for page in &pages {
        for t in body_texts(page, &config) {
            let needed = if t.size == theme.heading1_size {
                22.0
            } else if t.size == theme.heading2_size {
                20.0
            } else {
                theme.line_height
            };
            assert!(t.y - needed >= boundary - 1e-3, "{:?} at y={}", t.text, t.y);
        }
    }
}

#[test]
fn first_page_holds_thirty_seven_body_lines() {
    let config = Config::default();
    let request = GenerateRequest::new("T", short_lines(38));
    let pages = Session::new(&request, &config, &Assets::default(), fixed_date()).layout();
    assert_eq!(pages.len(), 2);
    // Title banner plus 37 lines on page one.
    assert_eq!(body_texts(&pages[0], &config).len(), 38);
    assert_eq!(body_texts(&pages[1], &config).len(), 1);
}

#[test]
fn styled_runs_advance_along_the_line() {
    let config = Config::default();
    let request = GenerateRequest::new("T", "plain **bold** *slanted*");
    let session = Session::new(&request, &config, &Assets::default(), fixed_date());
    let pages = session.layout();
    let runs: Vec<_> = body_texts(&pages[0], &config).into_iter().skip(1).collect();

    assert_eq!(runs.len(), 4);
    assert_eq!(runs[0].text, "plain ");
    assert_eq!(runs[1].face, FontFace::Bold);
    assert_eq!(runs[3].face, FontFace::Italic);
    assert!(runs.iter().all(|r| r.y == runs[0].y));
    for pair in runs.windows(2) {
        let width = session.fonts().face(pair[0].face).text_width(&pair[0].text, pair[0].size);
        assert!((pair[1].x - (pair[0].x + width)).abs() < 1e-3);
    }
}

#[test]
fn bullets_draw_glyph_and_indent_text() {
    let config = Config::default();
    let request = GenerateRequest::new("T", "- item");
    let pages = Session::new(&request, &config, &Assets::default(), fixed_date()).layout();
    let texts = body_texts(&pages[0], &config);
    let glyph = texts.iter().find(|t| t.text == "\u{2022}").unwrap();
    let item = texts.iter().find(|t| t.text == "item").unwrap();
    assert_eq!(glyph.x, config.margins.left);
    assert_eq!(item.x, config.margins.left + config.theme.bullet_indent);
    assert_eq!(glyph.y, item.y);
}

#[test]
fn headings_keep_markers_literal() {
    let config = Config::default();
    let request = GenerateRequest::new("T", "# **Loud** heading");
    let pages = Session::new(&request, &config, &Assets::default(), fixed_date()).layout();
    assert!(pages[0].has_text("**Loud** heading"));
}

// Header and footer

fn running<'a>(fonts: &'a FontSet, margins: &'a Margins, colors: &'a Colors) -> RunningText<'a> {
    RunningText {
        title: "Quarterly",
        date: FIXED_DATE_LABEL,
        fonts,
        margins,
        colors,
    }
}

#[test]
fn every_page_gets_header_footer_and_label() {
    let config = Config::default();
    let fonts = FontSet::builtin();
    let mut pages = vec![Page::new(config.page.width, config.page.height); 3];
    stamp_pages(&mut pages, &running(&fonts, &config.margins, &config.colors));

    for (i, page) in pages.iter().enumerate() {
        assert!(page.has_text("Quarterly"));
        assert!(page.has_text(&format!("Generated: {FIXED_DATE_LABEL}")));
        assert!(page.has_text(&format!("Page {} of 3", i + 1)));
        let rules = page.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
        assert_eq!(rules, 2);
    }
}

#[test]
fn page_label_is_flush_right_for_any_digit_count() {
    let config = Config::default();
    let fonts = FontSet::builtin();
    let mut pages = vec![Page::new(config.page.width, config.page.height); 12];
    stamp_pages(&mut pages, &running(&fonts, &config.margins, &config.colors));

    let right_edge = config.page.width - config.margins.right;
    for (i, page) in pages.iter().enumerate() {
        let label = page_label(i + 1, 12);
        let op = page.texts().find(|t| t.text == label).unwrap();
        let end = op.x + fonts.regular().text_width(&label, op.size);
        assert!((end - right_edge).abs() < 1e-3, "{label} ends at {end}");
    }
}

#[test]
fn header_sits_above_top_margin_and_footer_below_bottom() {
    let config = Config::default();
    let fonts = FontSet::builtin();
    let mut pages = vec![Page::new(config.page.width, config.page.height)];
    stamp_pages(&mut pages, &running(&fonts, &config.margins, &config.colors));

    let top = config.page.height - config.margins.top;
    let title = pages[0].texts().find(|t| t.text == "Quarterly").unwrap();
    assert_eq!(title.y, top + 28.0);
    assert_eq!(title.face, FontFace::Bold);
    let generated = pages[0].texts().find(|t| t.text.starts_with("Generated")).unwrap();
    assert_eq!(generated.y, config.margins.bottom - 32.0);
    assert_eq!(generated.color, config.colors.muted);
}

#[test]
fn stamped_label_uses_final_page_count() {
    let config = Config::default();
    let request = GenerateRequest::new("T", short_lines(80));
    let session = Session::new(&request, &config, &Assets::default(), fixed_date());
    let pages = session.layout();
    let total = pages.len();
    assert_eq!(total, 3);
    for (i, page) in pages.iter().enumerate() {
        assert!(page.has_text(&page_label(i + 1, total)));
    }
}
