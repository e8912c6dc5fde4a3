use crate::foundation::error::{ReelError, ReelResult};
use serde::{Deserialize, Serialize};

/// Width/height pair kept as strings so tool expressions such as `iw/2` pass through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels or an expression understood by the external tool.
    pub width: String,
    /// Height in pixels or an expression understood by the external tool.
    pub height: String,
}

impl Size {
    /// Create a size from anything string-like (`Size::new(1280, 720)` works too).
    pub fn new(width: impl ToString, height: impl ToString) -> Self {
        Self {
            width: width.to_string(),
            height: height.to_string(),
        }
    }

    /// Return `true` when both dimensions are set.
    pub fn is_specified(&self) -> bool {
        !self.width.is_empty() && !self.height.is_empty()
    }

    /// Check that numeric dimensions are positive. Expressions are passed through untouched.
    pub fn validate(&self, what: &str) -> ReelResult<()> {
        for (axis, v) in [("width", &self.width), ("height", &self.height)] {
            if let Ok(n) = v.trim().parse::<f64>()
                && (!n.is_finite() || n <= 0.0)
            {
                return Err(ReelError::validation(format!(
                    "{what} {axis} must be positive, got '{v}'"
                )));
            }
        }
        Ok(())
    }

    /// `W:H`, the positional form taken by `scale`.
    pub fn scale_arg(&self) -> String {
        format!("{}:{}", self.width, self.height)
    }

    /// `WxH`, the form taken by source filters such as `color`.
    pub fn video_size_arg(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Absolute pixel position on the canvas. Unsigned, so never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pos {
    /// Horizontal offset from the left edge.
    pub x: u32,
    /// Vertical offset from the top edge.
    pub y: u32,
}

impl Pos {
    /// Create a position.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl<'de> Deserialize<'de> for Pos {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([u32; 2]),
            Obj { x: u32, y: u32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// Check a destination window `[start, end)` given in seconds.
pub fn check_window(start: f64, end: f64, what: &str) -> ReelResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ReelError::validation(format!(
            "{what} window must be finite"
        )));
    }
    if start < 0.0 {
        return Err(ReelError::validation(format!(
            "{what} start must be >= 0, got {start}"
        )));
    }
    if end < start {
        return Err(ReelError::validation(format!(
            "{what} end ({end}) must be >= start ({start})"
        )));
    }
    Ok(())
}

/// Check a source trim window where the end is optional.
pub fn check_trim(src_start: f64, src_end: Option<f64>, what: &str) -> ReelResult<()> {
    if !src_start.is_finite() || src_start < 0.0 {
        return Err(ReelError::validation(format!(
            "{what} source start must be a finite value >= 0"
        )));
    }
    if let Some(end) = src_end
        && (!end.is_finite() || end < src_start)
    {
        return Err(ReelError::validation(format!(
            "{what} source end ({end}) must be >= source start ({src_start})"
        )));
    }
    Ok(())
}

/// Seconds with millisecond precision, the form used for every time value in the graph.
pub fn fmt_secs(secs: f64) -> String {
    format!("{secs:.3}")
}

/// Shortest decimal rendering of `v` up to three places (`30`, `29.97`, `23.976`).
pub fn fmt_num(v: f64) -> String {
    fmt_trimmed(v, 3)
}

/// Gain factors keep six places so small but non-zero levels stay audible.
pub fn fmt_gain(v: f64) -> String {
    fmt_trimmed(v, 6)
}

fn fmt_trimmed(v: f64, places: usize) -> String {
    let s = format!("{v:.places$}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
