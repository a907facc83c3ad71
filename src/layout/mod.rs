pub(crate) mod fonts;
pub(crate) mod presets;
pub(crate) mod text;
