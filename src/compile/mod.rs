pub(crate) mod inputs;
pub(crate) mod layers;
pub(crate) mod overlay;
pub(crate) mod tracks;
pub(crate) mod translator;
