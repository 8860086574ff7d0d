pub mod flow;
pub mod header_footer;
pub mod layout;
pub mod watermark;

use std::collections::{BTreeSet, HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{EmbeddedFont, FontFace, FontSet};
use crate::model::Rgb;

pub use flow::{DrawOp, Page, PageFlow, PageGeometry, TextOp};
use watermark::{ImagePixels, Watermark};

const WATERMARK_XOBJECT: &[u8] = b"Wm1";

fn set_fill(content: &mut Content, c: Rgb) {
    content.set_fill_rgb(c.r, c.g, c.b);
}

/// Write the watermark image once; every page references the same XObject.
fn embed_watermark(pdf: &mut Pdf, wm: &Watermark, alloc: &mut impl FnMut() -> Ref) -> Ref {
    let xobj_ref = alloc();
    let (w, h) = (wm.image.pixel_width as i32, wm.image.pixel_height as i32);

    match &wm.image.pixels {
        ImagePixels::Jpeg { data, grayscale } => {
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w);
            xobj.height(h);
            if *grayscale {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
        }
        ImagePixels::Rgba(rgba) => {
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    xobj_ref
}

/// Graphics-state resource names keyed by the opacity they set.
struct AlphaStates {
    states: Vec<(u32, String, Ref)>,
}

impl AlphaStates {
    fn name_for(&self, opacity: f32) -> Option<&str> {
        self.states
            .iter()
            .find(|(bits, _, _)| *bits == opacity.to_bits())
            .map(|(_, name, _)| name.as_str())
    }
}

fn write_page_content(
    content: &mut Content,
    page: &Page,
    fonts: &HashMap<FontFace, EmbeddedFont>,
    alpha: &AlphaStates,
) {
    for op in &page.ops {
        match op {
            DrawOp::Text(t) => {
                let Some(font) = fonts.get(&t.face) else {
                    continue;
                };
                content.begin_text();
                set_fill(content, t.color);
                content.set_font(Name(font.pdf_name.as_bytes()), t.size);
                content.next_line(t.x, t.y);
                content.show(Str(&font.encode(&t.text)));
                content.end_text();
            }
            DrawOp::Line {
                from,
                to,
                thickness,
                color,
            } => {
                content.save_state();
                content.set_line_width(*thickness);
                content.set_stroke_rgb(color.r, color.g, color.b);
                content.move_to(from.0, from.1);
                content.line_to(to.0, to.1);
                content.stroke();
                content.restore_state();
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
            } => {
                content.save_state();
                content.transform([*width, 0.0, 0.0, *height, *x, *y]);
                content.x_object(Name(WATERMARK_XOBJECT));
                content.restore_state();
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
                opacity,
            } => {
                content.save_state();
                if let Some(name) = alpha.name_for(*opacity) {
                    content.set_parameters(Name(name.as_bytes()));
                }
                set_fill(content, *color);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
        }
    }
}

/// Serialize finished pages into a PDF. Fonts are embedded once per face that
/// actually draws text, subset to the characters it draws.
pub fn write_pdf(
    pages: &[Page],
    fonts: &FontSet,
    watermark: Option<&Watermark>,
) -> Result<Vec<u8>, Error> {
    if pages.is_empty() {
        return Err(Error::Render("no pages to write".into()));
    }

    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: fonts, subset to the characters each face draws
    let mut used_chars: HashMap<FontFace, HashSet<char>> = HashMap::new();
    for text in pages.iter().flat_map(|p| p.texts()) {
        used_chars.entry(text.face).or_default().extend(text.text.chars());
    }
    for chars in used_chars.values_mut() {
        chars.insert(' ');
    }

    let dropped: BTreeSet<char> = used_chars
        .iter()
        .flat_map(|(face, chars)| fonts.face(*face).missing_chars(chars.iter().copied()))
        .collect();
    if !dropped.is_empty() {
        log::warn!(
            "{} character(s) have no glyph in the selected fonts and were dropped: {}",
            dropped.len(),
            dropped.iter().map(|c| format!("{c:?}")).collect::<Vec<_>>().join(" "),
        );
    }

    let mut embedded: HashMap<FontFace, EmbeddedFont> = HashMap::new();
    for face in FontFace::ALL {
        let Some(chars) = used_chars.get(&face) else {
            continue;
        };
        let pdf_name = format!("F{}", embedded.len() + 1);
        let entry = fonts.face(face).embed(&mut pdf, pdf_name, chars, &mut alloc);
        embedded.insert(face, entry);
    }

    let t_fonts = t0.elapsed();

    // Phase 2: watermark image and translucency states
    let watermark_ref = watermark.map(|wm| embed_watermark(&mut pdf, wm, &mut alloc));

    let mut alpha = AlphaStates { states: Vec::new() };
    for op in pages.iter().flat_map(|p| p.ops.iter()) {
        if let DrawOp::Rect { opacity, .. } = op
            && *opacity < 1.0
            && alpha.name_for(*opacity).is_none()
        {
            let gs_ref = alloc();
            pdf.ext_graphics(gs_ref).non_stroking_alpha(*opacity);
            let name = format!("Gs{}", alpha.states.len() + 1);
            alpha.states.push((opacity.to_bits(), name, gs_ref));
        }
    }

    let t_images = t0.elapsed();

    // Phase 3: page content streams and the page tree
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        write_page_content(&mut content, page, &embedded, &alpha);
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let mut font_pairs: Vec<(&str, Ref)> = embedded
        .values()
        .map(|f| (f.pdf_name.as_str(), f.font_ref))
        .collect();
    font_pairs.sort_by(|a, b| a.0.cmp(b.0));

    for (i, p) in pages.iter().enumerate() {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, p.width, p.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if let Some(xobj_ref) = watermark_ref {
            resources.x_objects().pair(Name(WATERMARK_XOBJECT), xobj_ref);
        }
        if !alpha.states.is_empty() {
            let mut states = resources.ext_g_states();
            for (_, name, gs_ref) in &alpha.states {
                states.pair(Name(name.as_bytes()), *gs_ref);
            }
        }
    }

    let t_assembly = t0.elapsed();

    log::info!(
        "PDF phases: font_embed={:.1}ms, images={:.1}ms, assembly={:.1}ms ({} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_assembly - t_images).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
