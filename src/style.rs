//! Cosmetic video style catalog.
//!
//! A style names a visual mood for a job. It is carried through the job for display and logging
//! only and never changes rendered pixels.

use crate::foundation::error::{TuneframeError, TuneframeResult};

/// One entry of the style gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StyleDescriptor {
    /// Display name, unique within [`CATALOG`].
    pub name: &'static str,
    /// Relative path of the animated thumbnail.
    pub thumbnail: &'static str,
    /// Relative path of the preview clip.
    pub preview: &'static str,
    /// One-line description shown next to the thumbnail.
    pub description: &'static str,
}

/// Built-in styles, in gallery order.
pub const CATALOG: &[StyleDescriptor] = &[
    StyleDescriptor {
        name: "Urban Glitch",
        thumbnail: "thumbnails/glitch.gif",
        preview: "previews/glitch.mp4",
        description: "Edgy, neon, and chaotic. Perfect for trap or electronic beats.",
    },
    StyleDescriptor {
        name: "VHS Retro",
        thumbnail: "thumbnails/vhs.gif",
        preview: "previews/vhs.mp4",
        description: "Old-school grain with 90s nostalgia. Best for lofi or synth.",
    },
    StyleDescriptor {
        name: "Anime Visualizer",
        thumbnail: "thumbnails/anime.gif",
        preview: "previews/anime.mp4",
        description: "Animated vibes, inspired by AMVs. Ideal for pop or K-rap.",
    },
    StyleDescriptor {
        name: "Dreamscape AI",
        thumbnail: "thumbnails/ai.gif",
        preview: "previews/ai.mp4",
        description: "Surreal, AI-generated worlds. Works great with ambient or R&B.",
    },
    StyleDescriptor {
        name: "Cyberpunk City",
        thumbnail: "thumbnails/cyberpunk.gif",
        preview: "previews/cyberpunk.mp4",
        description: "Futuristic, neon-lit cityscapes. Works great with synthwave or EDM.",
    },
    StyleDescriptor {
        name: "Street Graffiti",
        thumbnail: "thumbnails/graffiti.gif",
        preview: "previews/graffiti.mp4",
        description: "Bold, animated street art. Perfect for hip-hop or underground rap.",
    },
    StyleDescriptor {
        name: "Cosmic Nebula",
        thumbnail: "thumbnails/nebula.gif",
        preview: "previews/nebula.mp4",
        description: "Epic space visuals and nebulas. Best for chill, spacey beats.",
    },
    StyleDescriptor {
        name: "Matrix Code",
        thumbnail: "thumbnails/matrix.gif",
        preview: "previews/matrix.mp4",
        description: "Code rain, digital effects. Killer for dark techno or cyber themes.",
    },
];

/// Look up a style by name, ignoring ASCII case and surrounding whitespace.
pub fn find_style(name: &str) -> Option<&'static StyleDescriptor> {
    let name = name.trim();
    CATALOG.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Like [`find_style`], but an unknown name is a validation error listing the valid names.
pub fn require_style(name: &str) -> TuneframeResult<&'static StyleDescriptor> {
    find_style(name).ok_or_else(|| {
        let known = CATALOG.iter().map(|s| s.name).collect::<Vec<_>>().join(", ");
        TuneframeError::validation(format!("unknown style '{name}' (known: {known})"))
    })
}

/// Catalog as pretty-printed JSON.
pub fn catalog_json() -> TuneframeResult<String> {
    Ok(serde_json::to_string_pretty(CATALOG)?)
}
