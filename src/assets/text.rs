use std::sync::Arc;

use crate::assets::font::FontSource;
use crate::foundation::error::{TuneframeError, TuneframeResult};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Family and attributes parley needs to select one registered face.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FaceSelector {
    pub(crate) family: String,
    pub(crate) weight: parley::style::FontWeight,
    pub(crate) style: parley::style::FontStyle,
    pub(crate) width: parley::style::FontWidth,
}

type RegisteredFamilies = Vec<(parley::fontique::FamilyId, Vec<parley::fontique::FontInfo>)>;

/// Stateful helper for building Parley text layouts from raw font bytes.
///
/// Each distinct font blob is registered with the font collection once.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: Vec<(Arc<Vec<u8>>, RegisteredFamilies)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
        }
    }

    /// Number of font blobs registered so far.
    pub(crate) fn registered_font_count(&self) -> usize {
        self.registered.len()
    }

    fn families_for(&mut self, font: &FontSource) -> TuneframeResult<RegisteredFamilies> {
        let known = self
            .registered
            .iter()
            .find(|(bytes, _)| Arc::ptr_eq(bytes, &font.bytes) || **bytes == *font.bytes);
        if let Some((_, families)) = known {
            return Ok(families.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        if families.is_empty() {
            return Err(TuneframeError::render(
                "no font families registered from caption font bytes",
            ));
        }
        self.registered
            .push((Arc::clone(&font.bytes), families.clone()));
        Ok(families)
    }

    /// Resolve the registered face matching `font.index`, preferring `font.family` by name.
    pub(crate) fn select_face(&mut self, font: &FontSource) -> TuneframeResult<FaceSelector> {
        let families = self.families_for(font)?;
        let collection = &mut self.font_ctx.collection;

        let mut candidates = Vec::new();
        for (id, infos) in &families {
            let Some(info) = infos
                .iter()
                .find(|i| i.index() == font.index)
                .or_else(|| infos.first())
            else {
                continue;
            };
            let exact = info.index() == font.index;
            if let Some(name) = collection.family_name(*id) {
                candidates.push((name.to_owned(), info.clone(), exact));
            }
        }

        let preferred = font.family.as_deref();
        let pick = candidates
            .iter()
            .find(|(name, _, exact)| *exact && Some(name.as_str()) == preferred)
            .or_else(|| candidates.iter().find(|(_, _, exact)| *exact))
            .or_else(|| candidates.first())
            .ok_or_else(|| TuneframeError::render("registered font family has no name"))?;

        Ok(FaceSelector {
            family: pick.0.clone(),
            weight: pick.1.weight(),
            style: pick.1.style(),
            width: pick.1.width(),
        })
    }

    /// Shape and lay out a single caption with the given font.
    ///
    /// Lines only break on explicit newlines; multi-line captions are start-aligned inside their
    /// block, and the block as a whole is centered by the compositor.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        font: &FontSource,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TuneframeResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TuneframeError::validation(
                "caption font size must be finite and > 0",
            ));
        }

        let face = self.select_face(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(face.style));
        builder.push_default(parley::style::StyleProperty::FontWidth(face.width));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}
