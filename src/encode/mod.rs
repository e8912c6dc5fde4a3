pub(crate) mod executor;
pub(crate) mod options;
pub(crate) mod renderer;
