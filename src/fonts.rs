use std::collections::{HashMap, HashSet};

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::assets::Assets;
use crate::model::RunStyle;

/// The three faces a document can draw with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Italic];

    pub fn for_style(style: RunStyle) -> Self {
        match style {
            RunStyle::Normal => FontFace::Regular,
            RunStyle::Bold => FontFace::Bold,
            RunStyle::Italic => FontFace::Italic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    fn base_font(self) -> &'static [u8] {
        match self {
            BuiltinFont::Helvetica => b"Helvetica",
            BuiltinFont::HelveticaBold => b"Helvetica-Bold",
            BuiltinFont::HelveticaOblique => b"Helvetica-Oblique",
        }
    }
}

#[derive(Clone, Debug)]
enum FontSource {
    TrueType { data: Vec<u8>, ps_name: String },
    Builtin(BuiltinFont),
}

/// A resolved face plus the metrics the layout engine measures text with.
#[derive(Clone, Debug)]
pub struct LoadedFont {
    source: FontSource,
    /// Advance widths at 1000 units/em for WinAnsi bytes 32..=255.
    widths_1000: Vec<f32>,
}

impl LoadedFont {
    /// Parse custom TrueType/OpenType bytes. `None` if the data is not a font.
    pub fn truetype(data: Vec<u8>) -> Option<Self> {
        let face = Face::parse(&data, 0).ok()?;
        let units = face.units_per_em() as f32;
        let widths_1000 = (32u8..=255u8)
            .map(|byte| {
                face.glyph_index(winansi_to_char(byte))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0)
            })
            .collect();
        let ps_name = postscript_name(&face).unwrap_or_else(|| "CustomFont".to_string());
        drop(face);
        Some(Self {
            source: FontSource::TrueType { data, ps_name },
            widths_1000,
        })
    }

    pub fn builtin(font: BuiltinFont) -> Self {
        Self {
            source: FontSource::Builtin(font),
            widths_1000: builtin_widths(font == BuiltinFont::HelveticaBold),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Builtin(_))
    }

    pub fn name(&self) -> &str {
        match &self.source {
            FontSource::TrueType { ps_name, .. } => ps_name,
            FontSource::Builtin(b) => std::str::from_utf8(b.base_font()).unwrap_or("Helvetica"),
        }
    }

    /// Width of a single character in 1000-units. WinAnsi characters come from
    /// the precomputed table; anything else is looked up in the face directly.
    pub fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            return self.widths_1000[(byte - 32) as usize];
        }
        match &self.source {
            FontSource::TrueType { data, .. } => Face::parse(data, 0)
                .ok()
                .and_then(|face| {
                    let units = face.units_per_em() as f32;
                    face.glyph_index(ch)
                        .and_then(|gid| face.glyph_hor_advance(gid))
                        .map(|adv| adv as f32 / units * 1000.0)
                })
                .unwrap_or(0.0),
            FontSource::Builtin(_) => 0.0,
        }
    }

    /// Characters this face cannot draw: anything outside WinAnsi for the
    /// built-in faces, anything without a glyph for custom ones. Sorted.
    pub fn missing_chars(&self, chars: impl IntoIterator<Item = char>) -> Vec<char> {
        let mut missing: Vec<char> = match &self.source {
            FontSource::Builtin(_) => chars
                .into_iter()
                .filter(|&c| char_to_winansi(c) == 0)
                .collect(),
            FontSource::TrueType { data, .. } => match Face::parse(data, 0) {
                Ok(face) => chars
                    .into_iter()
                    .filter(|&c| face.glyph_index(c).is_none())
                    .collect(),
                Err(_) => chars.into_iter().collect(),
            },
        };
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    /// Write this face into `pdf` under resource name `pdf_name`. TrueType data
    /// is subset to `used_chars`; a face that cannot be embedded degrades to
    /// Helvetica.
    pub(crate) fn embed(
        &self,
        pdf: &mut Pdf,
        pdf_name: String,
        used_chars: &HashSet<char>,
        alloc: &mut impl FnMut() -> Ref,
    ) -> EmbeddedFont {
        let t0 = std::time::Instant::now();
        let font_ref = alloc();

        let char_to_gid = match &self.source {
            FontSource::TrueType { data, ps_name } => {
                let embedded = embed_truetype(pdf, font_ref, ps_name, data, used_chars, alloc);
                if embedded.is_none() {
                    log::warn!("Embedding {ps_name} failed, using Helvetica");
                    write_type1(pdf, font_ref, BuiltinFont::Helvetica);
                }
                embedded
            }
            FontSource::Builtin(font) => {
                write_type1(pdf, font_ref, *font);
                None
            }
        };

        log::debug!(
            "embed font {} as {pdf_name}: {} chars → {:.1}ms",
            self.name(),
            used_chars.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );

        EmbeddedFont {
            pdf_name,
            font_ref,
            char_to_gid,
        }
    }
}

/// The faces used by one document. Italic is optional: without it, italic runs
/// draw with the regular face.
#[derive(Clone, Debug)]
pub struct FontSet {
    regular: LoadedFont,
    bold: LoadedFont,
    italic: Option<LoadedFont>,
}

/// Try each candidate in order; the first that parses wins, otherwise the
/// built-in face is the terminal outcome.
fn resolve_face(label: &str, custom: Option<&Vec<u8>>, builtin: BuiltinFont) -> LoadedFont {
    if let Some(bytes) = custom {
        if let Some(font) = LoadedFont::truetype(bytes.clone()) {
            log::debug!("{label} font: custom {}", font.name());
            return font;
        }
        log::warn!("{label} font data is not a usable TrueType/OpenType face, using built-in");
    }
    LoadedFont::builtin(builtin)
}

impl FontSet {
    pub fn load(assets: &Assets) -> Self {
        let regular = resolve_face("regular", assets.font_regular.as_ref(), BuiltinFont::Helvetica);
        let bold = resolve_face("bold", assets.font_bold.as_ref(), BuiltinFont::HelveticaBold);
        let italic = match assets.font_italic.as_ref().and_then(|b| LoadedFont::truetype(b.clone())) {
            Some(font) => Some(font),
            None if regular.is_builtin() => Some(LoadedFont::builtin(BuiltinFont::HelveticaOblique)),
            None => None,
        };
        Self {
            regular,
            bold,
            italic,
        }
    }

    pub fn builtin() -> Self {
        Self::load(&Assets::default())
    }

    pub fn face(&self, face: FontFace) -> &LoadedFont {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => self.italic.as_ref().unwrap_or(&self.regular),
        }
    }

    /// The face a styled run actually draws with.
    pub fn resolve(&self, style: RunStyle) -> FontFace {
        match FontFace::for_style(style) {
            FontFace::Italic if self.italic.is_none() => FontFace::Regular,
            face => face,
        }
    }

    pub fn regular(&self) -> &LoadedFont {
        &self.regular
    }

    pub fn bold(&self) -> &LoadedFont {
        &self.bold
    }
}

pub(crate) struct EmbeddedFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl EmbeddedFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

fn postscript_name(face: &Face) -> Option<String> {
    let mut family = None;
    for name in face.names() {
        if !name.is_unicode() {
            continue;
        }
        if name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME
            && let Some(s) = name.to_string()
        {
            return Some(s.replace(' ', ""));
        }
        if name.name_id == ttf_parser::name_id::FAMILY && family.is_none() {
            family = name.to_string();
        }
    }
    family.map(|f| f.replace(' ', ""))
}

fn write_type1(pdf: &mut Pdf, font_ref: Ref, font: BuiltinFont) {
    pdf.type1_font(font_ref)
        .base_font(Name(font.base_font()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert UTF-8 text to WinAnsi bytes for a simple-font `Str`. Characters
/// outside the code page are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match char_to_winansi(c) {
            0 => None,
            b => Some(b),
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn builtin_widths(bold: bool) -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match (b, bold) {
            (32, _) => 278.0,                              // space
            (33..=47, _) => 333.0,                         // punctuation
            (48..=57, _) => 556.0,                         // digits
            (58..=64, _) => 333.0,                         // more punctuation
            (73 | 74, _) => 278.0,                         // I J (narrow uppercase)
            (77, _) => 833.0,                              // M (wide)
            (65..=90, false) => 667.0,                     // uppercase A-Z (average)
            (65..=90, true) => 722.0,
            (91..=96, _) => 333.0,                         // brackets etc.
            (102 | 105 | 106 | 108 | 116, false) => 278.0, // narrow lowercase: f i j l t
            (102 | 105 | 106 | 108 | 116, true) => 333.0,
            (109 | 119, false) => 833.0,                   // m w (wide)
            (109 | 119, true) => 889.0,
            (97..=122, false) => 556.0,                    // lowercase a-z (average)
            (97..=122, true) => 611.0,
            (0x95, _) => 350.0,                            // bullet
            _ => 556.0,
        })
        .collect()
}

/// Descriptor metrics in PDF glyph space (1000 units/em).
struct FaceMetrics {
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: Rect,
    italic: bool,
    italic_angle: f32,
}

impl FaceMetrics {
    fn of(face: &Face) -> Self {
        let units = face.units_per_em() as f32;
        let scale = |v: i16| v as f32 * 1000.0 / units;
        let bb = face.global_bounding_box();
        Self {
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: face.capital_height().map(scale).unwrap_or(700.0),
            bbox: Rect::new(scale(bb.x_min), scale(bb.y_min), scale(bb.x_max), scale(bb.y_max)),
            italic: face.is_italic(),
            italic_angle: face.italic_angle(),
        }
    }
}

/// Glyphs kept in the subset: the remapper for `subsetter`, the char to new
/// glyph id table for content streams, and the `/W` widths sorted by new id.
struct SubsetPlan {
    remapper: subsetter::GlyphRemapper,
    char_to_gid: HashMap<char, u16>,
    widths: Vec<(u16, f32)>,
}

impl SubsetPlan {
    fn new(face: &Face, used_chars: &HashSet<char>) -> Self {
        let units = face.units_per_em() as f32;
        let mut remapper = subsetter::GlyphRemapper::new();
        let mut char_to_gid = HashMap::new();
        let mut widths = Vec::new();

        for &ch in used_chars {
            let Some(gid) = face.glyph_index(ch) else {
                continue;
            };
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let advance = face.glyph_hor_advance(gid).unwrap_or(0);
            widths.push((new_gid, advance as f32 * 1000.0 / units));
        }
        widths.sort_by_key(|&(gid, _)| gid);
        widths.dedup_by_key(|&mut (gid, _)| gid);

        Self {
            remapper,
            char_to_gid,
            widths,
        }
    }
}

fn identity_system_info() -> pdf_writer::types::SystemInfo<'static> {
    pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    }
}

/// Write a custom face as a Type0 font over a CIDFontType2 descendant with
/// Identity-H encoding, subset to `used_chars`, plus a ToUnicode CMap so the
/// text stays extractable. Returns the char to glyph id table content streams
/// encode with.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, 0).ok()?;
    let metrics = FaceMetrics::of(&face);
    let plan = SubsetPlan::new(&face, used_chars);
    let base_font = Name(ps_name.as_bytes());

    let program = match subsetter::subset(font_data, 0, &plan.remapper) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("subsetting {ps_name} failed ({e}), embedding the whole font");
            font_data.to_vec()
        }
    };
    let program_len = i32::try_from(program.len()).ok()?;

    let data_ref = alloc();
    pdf.stream(data_ref, &program)
        .pair(Name(b"Length1"), program_len);

    let descriptor_ref = alloc();
    let mut flags = pdf_writer::types::FontFlags::NON_SYMBOLIC;
    if metrics.italic {
        flags |= pdf_writer::types::FontFlags::ITALIC;
    }
    pdf.font_descriptor(descriptor_ref)
        .name(base_font)
        .flags(flags)
        .bbox(metrics.bbox)
        .italic_angle(metrics.italic_angle)
        .ascent(metrics.ascent)
        .descent(metrics.descent)
        .cap_height(metrics.cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let mut cid = pdf.cid_font(cid_font_ref);
    cid.subtype(pdf_writer::types::CidFontType::Type2)
        .base_font(base_font)
        .system_info(identity_system_info())
        .font_descriptor(descriptor_ref)
        .default_width(0.0)
        .cid_to_gid_map_predefined(Name(b"Identity"));
    if !plan.widths.is_empty() {
        let mut w = cid.widths();
        for &(gid, width) in &plan.widths {
            w.consecutive(gid, [width]);
        }
    }
    drop(cid);

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), identity_system_info());
    for (&ch, &gid) in &plan.char_to_gid {
        cmap.pair(gid, ch);
    }
    let tounicode_ref = alloc();
    pdf.stream(tounicode_ref, cmap.finish().as_slice());

    pdf.type0_font(font_ref)
        .base_font(base_font)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(plan.char_to_gid)
}
