use ps_gen::layout::{Cursor, Line, LineOutcome, Margins};
use ps_gen::*;
use std::rc::Rc;

fn mono() -> Rc<dyn FontInstance> {
    Rc::new(
        FixedPitchFont::new("Mono", Pt(10.0))
            .with_advance(0.5)
            .with_line_height(Pt(12.0)),
    )
}

/// A box `chars` characters wide and `lines` lines tall
fn text_box(chars: f32, lines: f32) -> TextBox {
    TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(5.0 * chars), Pt(12.0 * lines)))
}

fn boxes(chars: f32, lines: f32) -> impl Iterator<Item = TextBox> {
    std::iter::repeat_with(move || text_box(chars, lines))
}

fn texts(regions: &[TextBox]) -> Vec<Vec<String>> {
    regions.iter().map(TextBox::texts).collect()
}

#[test]
fn a_short_paragraph_is_one_line() {
    let text = Text::from_source("Hello world.", mono(), None, ParagraphStyle::default())
        .expect("valid text");

    let region = text_box(40.0, 5.0);
    let mut cursor = Cursor::new(&text);
    let line = match Line::build(&region, Pt::ZERO, &mut cursor).expect("line") {
        LineOutcome::Fits(line) => line,
        other => panic!("expected one line, got {other:?}"),
    };
    assert_eq!(line.units().len(), 2);
    assert!(line.is_last_of_hard_paragraph());

    let regions = text.typeset(boxes(40.0, 5.0)).expect("enough regions");
    assert_eq!(texts(&regions), vec![vec!["Hello world.".to_string()]]);
}

#[test]
fn unbreakable_words_are_forced_and_layout_carries_on() {
    let never: Hyphenator = Rc::new(|_: &str| None::<Vec<String>>);
    let text = Text::from_source(
        "tiny Pneumonoultramicroscopicsilicovolcanoconiosis tiny",
        mono(),
        Some(never),
        ParagraphStyle::default(),
    )
    .expect("valid text");

    let mut typesetter = layout::Typesetter::new(&text, boxes(10.0, 1.0));
    typesetter.typeset().expect("enough regions");
    assert_eq!(typesetter.forced_placements(), 1);

    let regions = typesetter.into_regions();
    assert_eq!(
        texts(&regions),
        vec![
            vec!["tiny".to_string()],
            vec!["Pneumonoultramicroscopicsilicovolcanoconiosis".to_string()],
            vec!["tiny".to_string()],
        ]
    );
}

#[test]
fn overflowing_words_stay_in_a_region_with_room() {
    let text = Text::from_source(
        "xx\n\naa abcdefghijkl bb",
        mono(),
        None,
        ParagraphStyle::default(),
    )
    .expect("valid text");

    let mut typesetter = layout::Typesetter::new(&text, boxes(5.0, 10.0).take(1));
    typesetter.typeset().expect("one region is enough");
    assert_eq!(typesetter.forced_placements(), 1);
    assert_eq!(
        texts(&typesetter.into_regions()),
        vec![vec![
            "xx".to_string(),
            "aa".to_string(),
            "abcdefghijkl".to_string(),
            "bb".to_string(),
        ]]
    );
}

#[test]
fn shaped_regions_narrow_their_lines() {
    let text = Text::from_source(
        "aa bb cc dd ee ff gg hh",
        mono(),
        None,
        ParagraphStyle::default(),
    )
    .expect("valid text");

    // ten characters wide for two lines, then five characters indented by five
    let region = TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(60.0))).with_shape(
        |y, _| {
            if y < Pt(24.0) {
                Some((Pt(0.0), Pt(50.0)))
            } else {
                Some((Pt(25.0), Pt(25.0)))
            }
        },
    );

    let regions = text.typeset(std::iter::once(region)).expect("one region is enough");
    assert_eq!(
        texts(&regions),
        vec![vec![
            "aa bb cc".to_string(),
            "dd ee ff".to_string(),
            "gg hh".to_string(),
        ]]
    );

    let lines = regions[0].lines();
    let xs: Vec<Pt> = lines[2].spans.iter().map(|span| span.coords.0).collect();
    assert_eq!(xs, vec![Pt(25.0), Pt(40.0)]);
    for line in &lines[..2] {
        let last = line.spans.last().expect("spans");
        assert!(last.coords.0 + last.font.chars_width(&last.text) <= Pt(50.0));
    }
}

#[test]
fn paragraphs_that_do_not_fit_start_a_region_without_their_top_margin() {
    let style = ParagraphStyle::default().margins(Pt(6.0), Pt(0.0));
    let text = Text::from_source("aa bb cc\n\ndd", mono(), None, style).expect("valid text");

    let regions = text.typeset(boxes(5.0, 2.0)).expect("enough regions");
    assert_eq!(
        texts(&regions),
        vec![
            vec!["aa bb".to_string(), "cc".to_string()],
            vec!["dd".to_string()],
        ]
    );
    assert_eq!(regions[1].lines()[0].top, Pt::ZERO);
}

#[test]
fn justified_paragraphs_end_ragged() {
    let style = ParagraphStyle::default().align(Align::Block);
    let text = Text::from_source("aa b cc dd e ff g", mono(), None, style).expect("valid text");

    let regions = text.typeset(boxes(8.0, 10.0)).expect("enough regions");
    let region = &regions[0];
    let right = region.rect().x2;
    let lines = region.lines();
    assert!(lines.len() > 1);

    for line in &lines[..lines.len() - 1] {
        let last = line.spans.last().expect("spans");
        let end = last.coords.0 + last.font.chars_width(&last.text);
        assert!((end - right).0.abs() < 1e-3, "{end} should reach {right}");
    }

    let last = lines.last().expect("lines");
    let natural: Vec<Pt> = last.spans.iter().map(|span| span.coords.0).collect();
    let mut expected = Vec::new();
    let mut x = Pt::ZERO;
    for span in &last.spans {
        expected.push(x);
        x += span.font.chars_width(&span.text) + Pt(5.0);
    }
    assert_eq!(natural, expected);
}

#[test]
fn soft_hyphens_decide_where_words_break() {
    let elsewhere: Hyphenator = Rc::new(|word: &str| {
        let (head, tail) = word.split_at(2);
        Some(vec![head.to_string(), tail.to_string()])
    });
    let text = Text::from_source(
        "recon\u{ad}sider",
        mono(),
        Some(elsewhere),
        ParagraphStyle::default(),
    )
    .expect("valid text");

    let regions = text.typeset(boxes(7.0, 2.0)).expect("enough regions");
    assert_eq!(
        texts(&regions),
        vec![vec!["recon-".to_string(), "sider".to_string()]]
    );
}

#[test]
fn lines_never_exceed_their_region() {
    let by_threes: Hyphenator = Rc::new(|word: &str| {
        let chars: Vec<char> = word.chars().collect();
        Some(chars.chunks(3).map(|c| c.iter().collect::<String>()).collect())
    });
    let source = format!(
        "{}\n{}\n\n{}",
        lipsum::lipsum(40),
        lipsum::lipsum(25),
        lipsum::lipsum(120)
    );
    for align in [Align::Left, Align::Right, Align::Center, Align::Block] {
        let text = Text::from_source(
            &source,
            mono(),
            Some(by_threes.clone()),
            ParagraphStyle::default().align(align).margins(Pt(6.0), Pt(6.0)),
        )
        .expect("valid text");

        let regions = text.typeset(boxes(23.0, 7.0)).expect("enough regions");
        assert!(regions.len() > 1);
        for region in &regions {
            let rect = region.rect();
            for span in region.spans() {
                let end = span.coords.0 + span.font.chars_width(&span.text);
                assert!(span.coords.0 >= rect.x1 - Pt(1e-3), "{span:?} starts left of {rect:?}");
                assert!(end <= rect.x2 + Pt(1e-3), "{span:?} ends right of {rect:?}");
            }
            for line in region.lines() {
                assert!(line.top + line.height <= rect.height() + Pt(1e-3));
            }
        }
    }
}

#[test]
fn every_word_is_placed_once_in_order() {
    let source = lipsum::lipsum(150);
    let text = Text::from_source(&source, mono(), None, ParagraphStyle::default())
        .expect("valid text");
    let regions = text.typeset(boxes(30.0, 6.0)).expect("enough regions");

    let placed: Vec<String> = regions
        .iter()
        .flat_map(|region| region.spans().map(|span| span.text.clone()))
        .collect();
    let words: Vec<String> = source.split_whitespace().map(String::from).collect();
    assert_eq!(placed, words);
}

#[test]
fn orphaned_first_lines_move_to_the_next_region() {
    let text = Text::from_source(
        "xx yy\n\naa bb cc dd ee",
        mono(),
        None,
        ParagraphStyle::default().dangle_threshold(2),
    )
    .expect("valid text");

    let regions = text.typeset(boxes(5.0, 3.0)).expect("enough regions");
    assert_eq!(
        texts(&regions),
        vec![
            vec!["xx yy".to_string()],
            vec!["aa bb".to_string(), "cc dd".to_string(), "ee".to_string()],
        ]
    );
}

#[test]
fn widowed_last_lines_gain_company() {
    let text = Text::from_source(
        "aa bb cc dd ee",
        mono(),
        None,
        ParagraphStyle::default().dangle_threshold(1),
    )
    .expect("valid text");

    let regions = text.typeset(boxes(2.0, 4.0)).expect("enough regions");
    assert_eq!(
        texts(&regions),
        vec![
            vec!["aa".to_string(), "bb".to_string(), "cc".to_string()],
            vec!["dd".to_string(), "ee".to_string()],
        ]
    );
}

#[test]
fn running_out_of_regions_is_an_error() {
    let text = Text::from_source(&lipsum::lipsum(100), mono(), None, ParagraphStyle::default())
        .expect("valid text");
    let result = text.typeset(boxes(20.0, 3.0).take(2));
    assert!(matches!(result, Err(TypesetError::RegionsExhausted)));
}

#[test]
fn borrowed_regions_can_be_rendered_afterwards() {
    let text = Text::from_source(
        "First paragraph.\n\nSecond (and last) paragraph.",
        mono(),
        None,
        ParagraphStyle::default().margins(Pt(12.0), Pt(12.0)),
    )
    .expect("valid text");

    let page = Rect::from((Pt(300.0), Pt(400.0)));
    let mut pages = vec![
        TextBox::with_margins(page, &Margins::all(Pt(36.0))),
        TextBox::with_margins(page, &Margins::all(Pt(36.0))),
    ];
    let used = text.typeset(pages.iter_mut()).expect("enough regions");
    assert_eq!(used.len(), 1);

    let postscript = String::from_utf8(pages[0].render().expect("renders")).expect("ascii");
    assert!(postscript.contains("/Mono 10 selectfont\n"));
    assert!(postscript.contains("(First) show\n"));
    assert!(postscript.contains("(\\(and) show\n"));
    assert!(pages[1].is_empty());
    assert!(pages[1].render().expect("renders").is_empty());
}
