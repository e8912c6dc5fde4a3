use crate::graph::escape::shell_quote;

/// A source opened by the tool, preceded by its own options (`-loop 1 -t 2.000 -i logo.png`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Input {
    /// Source path.
    pub path: String,
    /// Options placed before `-i`.
    pub options: Vec<String>,
}

/// Ordered `key=value` parameters of one filter.
///
/// Insertion order is kept so rendering is reproducible. An entry with an empty key renders as
/// its bare value (single positional argument), an entry with an empty value as its bare key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single positional argument, e.g. `scale=1280:720`.
    pub fn positional(value: impl Into<String>) -> Self {
        Self(vec![(String::new(), value.into())])
    }

    /// Append `key=value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append `key=value` in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Look up the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| match (k.is_empty(), v.is_empty()) {
                (true, _) => v.clone(),
                (false, true) => k.clone(),
                (false, false) => format!("{k}={v}"),
            })
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One node of the filter graph: labeled inputs, a named operation and a labeled output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    /// Filter name (`scale`, `overlay`, ...).
    pub name: String,
    /// Parameters in rendering order.
    pub params: Params,
    /// Input labels, bracketed (`[0:v]`).
    pub inputs: Vec<String>,
    /// Output label, bracketed.
    pub output: String,
}

impl Filter {
    /// Textual form: `[in0][in1]name=k=v:k2=v2[out]`.
    pub fn render(&self) -> String {
        let mut s = self.inputs.concat();
        s.push_str(&self.name);
        if !self.params.is_empty() {
            s.push('=');
            s.push_str(&self.params.render());
        }
        s.push_str(&self.output);
        s
    }
}

/// A destination written by the tool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    /// Destination path.
    pub path: String,
    /// Options placed before the path.
    pub options: Vec<String>,
}

/// Inputs, filter graph and outputs of one tool invocation.
///
/// Built append-only by the translator; rendering is a pure function of the contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Command {
    /// Sources in `-i` order; position is the input index used in `[N:v]` labels.
    pub inputs: Vec<Input>,
    /// Filters in emission order.
    pub filters: Vec<Filter>,
    /// Destinations.
    pub outputs: Vec<Output>,
    /// Terminal graph labels selected into every output with `-map`.
    pub maps: Vec<String>,
}

impl Command {
    /// Empty command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source. Duplicates are not detected here.
    pub fn add_input<I, S>(&mut self, path: impl Into<String>, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(Input {
            path: path.into(),
            options: options.into_iter().map(Into::into).collect(),
        });
    }

    /// Append a filter.
    pub fn add_filter(
        &mut self,
        name: impl Into<String>,
        inputs: Vec<String>,
        output: impl Into<String>,
        params: Params,
    ) {
        self.filters.push(Filter {
            name: name.into(),
            params,
            inputs,
            output: output.into(),
        });
    }

    /// Append a destination.
    pub fn add_output<I, S>(&mut self, path: impl Into<String>, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.push(Output {
            path: path.into(),
            options: options.into_iter().map(Into::into).collect(),
        });
    }

    /// Drop every destination.
    pub fn clear_outputs(&mut self) {
        self.outputs.clear();
    }

    /// Route a terminal graph label to the outputs.
    pub fn map(&mut self, label: impl Into<String>) {
        self.maps.push(label.into());
    }

    /// The `-filter_complex` argument: rendered filters joined with `;`.
    pub fn filter_graph(&self) -> String {
        self.filters
            .iter()
            .map(Filter::render)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Argument vector, without the program name or overwrite flag.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for input in &self.inputs {
            args.extend(input.options.iter().cloned());
            args.push("-i".to_string());
            args.push(input.path.clone());
        }
        if !self.filters.is_empty() {
            args.push("-filter_complex".to_string());
            args.push(self.filter_graph());
        }
        for output in &self.outputs {
            for label in &self.maps {
                args.push("-map".to_string());
                args.push(label.clone());
            }
            args.extend(output.options.iter().cloned());
            args.push(output.path.clone());
        }
        args
    }

    /// Shell-pasteable command line, starting with `ffmpeg`.
    pub fn render(&self) -> String {
        let mut s = String::from("ffmpeg");
        for arg in self.args() {
            s.push(' ');
            s.push_str(&shell_quote(&arg));
        }
        s
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/command.rs"]
mod tests;
