use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{StoryError, StoryResult};

/// Label selected when a brand has no (or an unknown) font preference.
pub const DEFAULT_FONT_LABEL: &str = "Noto Sans JP Bold";

/// A `(family, weight)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Family name.
    pub family: String,
    /// CSS-style numeric weight.
    pub weight: u16,
}

const FONT_TABLE: &[(&str, &str, u16)] = &[
    ("Noto Sans JP Bold", "Noto Sans JP", 700),
    ("Inter Extra Bold", "Inter", 800),
    ("M PLUS Rounded 1c", "M PLUS Rounded 1c", 700),
    ("Shippori Mincho", "Shippori Mincho", 400),
];

impl FontSpec {
    /// Look a preference label up in the fixed font table, falling back to Noto Sans JP 700.
    pub fn from_label(label: &str) -> Self {
        let (_, family, weight) = FONT_TABLE
            .iter()
            .find(|(l, _, _)| *l == label)
            .copied()
            .unwrap_or(FONT_TABLE[0]);
        Self {
            family: family.to_owned(),
            weight,
        }
    }

    /// Every known label.
    pub fn labels() -> impl Iterator<Item = &'static str> {
        FONT_TABLE.iter().map(|(l, _, _)| *l)
    }

    /// CSS font shorthand prefix used by the preview, e.g. `700 72px "Noto Sans JP"`.
    pub fn css(&self, size_px: f64) -> String {
        format!("{} {}px \"{}\"", self.weight, size_px, self.family)
    }
}

/// One loaded font face.
#[derive(Clone)]
pub struct FontFace {
    /// Family name as reported by the font itself.
    pub family: String,
    /// Numeric weight.
    pub weight: u16,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fonts available to the compositor.
///
/// Rendering only ever uses faces registered here. System fonts are added only through
/// [`FontLibrary::load_system_fonts`].
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    faces: Vec<FontFace>,
}

impl FontLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered faces in registration order.
    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    /// True when no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Register a font file. The family name is read from the font; `weight` defaults to 400.
    pub fn register_bytes(&mut self, bytes: Vec<u8>, weight: Option<u16>) -> StoryResult<&FontFace> {
        let family = family_name_of(&bytes)?;
        self.register_named(family, weight.unwrap_or(400), bytes);
        self.faces
            .last()
            .ok_or_else(|| StoryError::validation("font registration produced no face"))
    }

    /// Register a font under an explicit family name.
    pub fn register_named(&mut self, family: impl Into<String>, weight: u16, bytes: Vec<u8>) {
        self.faces.push(FontFace {
            family: family.into(),
            weight,
            bytes: Arc::new(bytes),
        });
    }

    /// Load every `.ttf`/`.otf` file in `dir` (non-recursive, sorted by file name).
    ///
    /// Weights are inferred from file names such as `Inter-ExtraBold.ttf`. Files that fail to
    /// parse are skipped with a warning. Returns the number of faces added.
    pub fn load_dir(&mut self, dir: &Path) -> StoryResult<usize> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?
        {
            let path = entry.context("read font dir entry")?.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if is_font {
                paths.push(path);
            }
        }
        paths.sort();

        let mut added = 0;
        for path in paths {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            match self.register_bytes(bytes, Some(weight_from_file_name(stem))) {
                Ok(face) => {
                    tracing::debug!(family = %face.family, weight = face.weight, path = %path.display(), "registered font");
                    added += 1;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable font");
                }
            }
        }
        Ok(added)
    }

    /// Register one installed system face per spec: the requested family with the nearest
    /// weight, else the system sans-serif, else any installed "Sans" face. Font collections (`.ttc` faces past index 0) are
    /// skipped. Returns the number of faces added.
    pub fn load_system_fonts(&mut self, specs: &[FontSpec]) -> usize {
        use usvg::fontdb::{Database, Family, Query, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let mut added = 0;
        for spec in specs {
            let weight = Weight(spec.weight);
            let id = db
                .query(&Query {
                    families: &[Family::Name(&spec.family)],
                    weight,
                    ..Query::default()
                })
                .or_else(|| {
                    db.query(&Query {
                        families: &[Family::SansSerif],
                        weight,
                        ..Query::default()
                    })
                })
                .or_else(|| any_sans_face(&db));
            let Some(info) = id.and_then(|id| db.face(id)) else {
                tracing::debug!(family = %spec.family, "no system font found");
                continue;
            };
            if info.index != 0 {
                tracing::debug!(family = %spec.family, "system font is inside a collection; skipping");
                continue;
            }
            let Some(bytes) = db.with_face_data(info.id, |data, _| data.to_vec()) else {
                continue;
            };
            let family = info
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| spec.family.clone());
            tracing::debug!(requested = %spec.family, %family, weight = info.weight.0, "using system font");
            self.register_named(family, info.weight.0, bytes);
            added += 1;
        }
        added
    }

    /// Pick the face for `spec`: same family with the nearest weight, else the nearest weight
    /// of any family. Ties go to the earlier registration.
    pub fn resolve(&self, spec: &FontSpec) -> Option<&FontFace> {
        let same_family = self
            .faces
            .iter()
            .filter(|f| f.family.eq_ignore_ascii_case(&spec.family));
        nearest_weight(same_family, spec.weight)
            .or_else(|| nearest_weight(self.faces.iter(), spec.weight))
    }
}

fn any_sans_face(db: &usvg::fontdb::Database) -> Option<usvg::fontdb::ID> {
    db.faces()
        .filter(|f| f.index == 0)
        .find(|f| f.families.iter().any(|(name, _)| name.contains("Sans")))
        .map(|f| f.id)
}

fn nearest_weight<'a>(
    faces: impl Iterator<Item = &'a FontFace>,
    weight: u16,
) -> Option<&'a FontFace> {
    faces.min_by_key(|f| f.weight.abs_diff(weight))
}

fn family_name_of(bytes: &[u8]) -> StoryResult<String> {
    let mut font_ctx = parley::FontContext::default();
    let collection = &mut font_ctx.collection;
    let families = collection.register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| StoryError::validation("no font families registered from font bytes"))?;
    collection
        .family_name(family_id)
        .map(str::to_owned)
        .ok_or_else(|| StoryError::validation("registered font family has no name"))
}

/// Infer a numeric weight from a font file stem such as `NotoSansJP-Bold`.
pub(crate) fn weight_from_file_name(stem: &str) -> u16 {
    let s = stem.to_ascii_lowercase().replace(['-', '_', ' '], "");
    // Longest names first so "extrabold" does not match "bold".
    const NAMES: &[(&str, u16)] = &[
        ("extralight", 200),
        ("ultralight", 200),
        ("extrabold", 800),
        ("ultrabold", 800),
        ("semibold", 600),
        ("demibold", 600),
        ("hairline", 100),
        ("regular", 400),
        ("medium", 500),
        ("black", 900),
        ("heavy", 900),
        ("light", 300),
        ("thin", 100),
        ("bold", 700),
    ];
    NAMES
        .iter()
        .find(|(name, _)| s.contains(name))
        .map(|(_, w)| *w)
        .unwrap_or(400)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fonts.rs"]
mod tests;
