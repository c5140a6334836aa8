pub(crate) mod icons;
pub(crate) mod plan;
pub(crate) mod theme;
