use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{TuneframeError, TuneframeResult};

/// Font face bytes used for caption rendering.
#[derive(Clone, Debug)]
pub struct FontSource {
    /// Raw font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    /// Family name, when known up front.
    pub family: Option<String>,
}

/// Load a font from an explicit file.
pub fn load_font_file(path: &Path) -> TuneframeResult<FontSource> {
    let bytes = std::fs::read(path).map_err(|e| {
        TuneframeError::render(format!("cannot read font '{}': {e}", path.display()))
    })?;
    if bytes.is_empty() {
        return Err(TuneframeError::render(format!(
            "font '{}' is empty",
            path.display()
        )));
    }
    Ok(FontSource {
        bytes: Arc::new(bytes),
        index: 0,
        family: None,
    })
}

/// Find a system font for `family`, preferring bold faces.
///
/// Falls back to a generic sans-serif face, then to any installed face. Fails only when the
/// system has no usable fonts at all.
#[tracing::instrument]
pub fn resolve_system_font(family: &str, bold: bool) -> TuneframeResult<FontSource> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    resolve_in_db(&db, family, bold)
}

fn resolve_in_db(db: &fontdb::Database, family: &str, bold: bool) -> TuneframeResult<FontSource> {
    let weight = if bold {
        fontdb::Weight::BOLD
    } else {
        fontdb::Weight::NORMAL
    };
    let families = [fontdb::Family::Name(family), fontdb::Family::SansSerif];
    let query = fontdb::Query {
        families: &families,
        weight,
        ..Default::default()
    };

    let id = db
        .query(&query)
        .or_else(|| {
            // The generic sans-serif slot maps to a family that may not be installed.
            db.faces()
                .filter(|f| f.families.iter().any(|(name, _)| name.contains("Sans")))
                .min_by_key(|f| fallback_rank(f.stretch, f.style, f.weight, weight))
                .map(|f| f.id)
        })
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| {
            TuneframeError::render("no system fonts available for caption rendering")
        })?;

    let family_name = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()));
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| TuneframeError::render("failed to load system font data"))?;

    tracing::debug!(requested = family, resolved = ?family_name, "resolved caption font");
    Ok(FontSource {
        bytes: Arc::new(bytes),
        index,
        family: family_name,
    })
}

/// Sort key for fallback faces: upright normal-width faces first, then closest weight.
fn fallback_rank(
    stretch: fontdb::Stretch,
    style: fontdb::Style,
    weight: fontdb::Weight,
    want: fontdb::Weight,
) -> (bool, bool, u16) {
    (
        stretch != fontdb::Stretch::Normal,
        style != fontdb::Style::Normal,
        weight.0.abs_diff(want.0),
    )
}
