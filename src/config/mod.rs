pub(crate) mod brand_store;
