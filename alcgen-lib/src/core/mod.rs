pub(crate) mod closing;
pub(crate) mod format;
pub(crate) mod generator;
pub(crate) mod leaf;
pub(crate) mod minimize;
pub(crate) mod skeleton;
pub(crate) mod syntax;
