pub(crate) mod logo_drag;
