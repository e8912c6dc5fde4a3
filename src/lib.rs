//! reelc compiles a declarative, multi-track timeline into a single `ffmpeg` invocation.
//!
//! The flow is:
//!
//! - Describe a [`Project`] (JSON or the [`ProjectBuilder`] DSL)
//! - Compile it with a [`Translator`] into a [`Command`] (inputs, filter graph, outputs)
//! - Attach an output with [`RenderOptions`] and print it or run it through an [`Executor`]
//!
//! [`Renderer`] bundles those steps.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod compile;
pub(crate) mod encode;
pub(crate) mod graph;
pub(crate) mod timeline;

pub use crate::foundation::core::{Pos, Size};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::compile::overlay::{AUDIO_MIX_LABEL, BASE_LABEL, FINAL_LABEL};
pub use crate::compile::translator::Translator;
pub use crate::encode::executor::{CancelToken, Executor, ExecutorOpts};
pub use crate::encode::options::{Format, Quality, RenderOptions};
pub use crate::encode::renderer::Renderer;
pub use crate::graph::command::{Command, Filter, Input, Output, Params};
pub use crate::graph::escape::{escape_option, quote_graph, quote_text, shell_quote};
pub use crate::timeline::dsl::ProjectBuilder;
pub use crate::timeline::model::{
    AudioNode, AudioTrack, ImageNode, ImageTrack, Project, TextAlign, TextNode, TextStyle,
    TextTrack, Track, VideoNode, VideoTrack,
};
