use ps_gen::layout::Margins;
use ps_gen::*;
use std::io::Write;
use std::rc::Rc;

const HALF_LETTER: (Pt, Pt) = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));

/// Splits words into pairs of letters, which is terrible but shows hyphenation off
fn hyphenate(word: &str) -> Option<Vec<String>> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 6 {
        return None;
    }
    Some(chars.chunks(2).map(|c| c.iter().collect()).collect())
}

fn main() {
    let font = Rc::new(FixedPitchFont::courier(Pt(11.0)));
    let source = format!(
        "{}\n{}\n\n{}\n\n{}",
        lipsum::lipsum(3),
        lipsum::lipsum(40),
        lipsum::lipsum(256),
        lipsum::lipsum(128),
    );
    let style = ParagraphStyle::default()
        .align(Align::Block)
        .margins(In(0.125), In(0.125));
    let text = Text::from_source(&source, font, Some(Rc::new(hyphenate)), style)
        .expect("valid text");

    let mut page_index = 0;
    let pages = std::iter::from_fn(|| {
        // add a 0.5in gutter
        let mut margins = Margins::all(In(0.5));
        if page_index % 2 == 0 {
            margins.left += In(0.5).into();
        } else {
            margins.right += In(0.5).into();
        }
        page_index += 1;
        Some(TextBox::with_margins(Rect::from(HALF_LETTER), &margins))
    });
    let boxes = text.typeset(pages).expect("pages never run out");

    let mut out = std::fs::File::create("lorem-ipsum.ps").unwrap();
    writeln!(out, "%!PS-Adobe-3.0").unwrap();
    writeln!(out, "%%Pages: {}", boxes.len()).unwrap();
    writeln!(out, "%%EndComments").unwrap();
    for (i, text_box) in boxes.iter().enumerate() {
        writeln!(out, "%%Page: {} {}", i + 1, i + 1).unwrap();
        out.write_all(&text_box.render().unwrap()).unwrap();
        writeln!(out, "showpage").unwrap();
    }
    writeln!(out, "%%EOF").unwrap();
}
