//! Descriptor assembly and emission.
//!
//! A descriptor is a short program fragment: shape parameters first, then the
//! benchmark's named inputs, then an include of the routine definitions and a
//! single `%bench`-tagged invocation that applies the routine to the inputs in
//! declaration order.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{Span, field, instrument};

use crate::{
    error::{DexError, Result},
    random::RandomTensor,
};

/// File extension shared by descriptors and the routine sources they include.
pub const DESCRIPTOR_EXTENSION: &str = "dx";

/// Name bound to the benchmark invocation.
pub const RESULT_NAME: &str = "result";

/// Right-hand side of a value binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Pre-rendered literal text, such as a formatted table.
    Literal(String),
    /// An integer scalar.
    Integer(i64),
    /// A symbolic random tensor, rendered at emission time.
    Random(RandomTensor),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Random(tensor) => write!(f, "{tensor}"),
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<RandomTensor> for Expr {
    fn from(tensor: RandomTensor) -> Self {
        Self::Random(tensor)
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

/// Preamble entry binding a type-level size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeParameter {
    name: String,
    size: String,
}

impl ShapeParameter {
    /// Binds `name` to an arbitrary size expression.
    #[must_use]
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
        }
    }

    /// Binds `name` to the finite index set `Fin <size>`.
    ///
    /// # Examples
    /// ```
    /// use dexprep_core::ShapeParameter;
    ///
    /// assert_eq!(ShapeParameter::fin("hid", 16).size(), "Fin 16");
    /// ```
    #[must_use]
    pub fn fin(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, format!("Fin {size}"))
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size expression text.
    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }
}

/// A named benchmark input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueBinding {
    name: String,
    expr: Expr,
}

impl ValueBinding {
    /// Binds `name` to `expr`.
    #[must_use]
    pub fn new(name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            name: name.into(),
            expr: expr.into(),
        }
    }

    /// Binding name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound expression.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }
}

/// Emission toggles threaded into [`Descriptor::write_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitOptions {
    echo_result: bool,
}

impl EmitOptions {
    /// Options with every toggle disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self { echo_result: false }
    }

    /// Appends a bare `result` line so the runtime prints the outcome.
    #[must_use]
    pub const fn with_echo_result(mut self, echo_result: bool) -> Self {
        self.echo_result = echo_result;
        self
    }

    /// Whether the trailing `result` line is emitted.
    #[must_use]
    pub const fn echo_result(&self) -> bool {
        self.echo_result
    }
}

/// A fully assembled benchmark descriptor.
///
/// # Examples
/// ```
/// use dexprep_core::{Descriptor, EmitOptions};
///
/// let descriptor = Descriptor::builder("hotspot")
///     .with_binding("numIterations", 360)
///     .with_binding("T", "[[1.0,2.0]]".to_owned())
///     .build()
///     .expect("names are unique");
/// let text = descriptor.render(&EmitOptions::new());
/// assert!(text.ends_with("%bench \"hotspot\"\nresult = hotspot numIterations T\n"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    benchmark: String,
    preamble: Vec<ShapeParameter>,
    bindings: Vec<ValueBinding>,
}

impl Descriptor {
    /// Starts assembling a descriptor that invokes `benchmark`.
    #[must_use]
    pub fn builder(benchmark: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            benchmark: benchmark.into(),
            preamble: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Benchmark routine name.
    #[must_use]
    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    /// Preamble entries in declaration order.
    #[must_use]
    pub fn preamble(&self) -> &[ShapeParameter] {
        &self.preamble
    }

    /// Value bindings in declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[ValueBinding] {
        &self.bindings
    }

    /// The `result = ...` invocation line, without its newline.
    #[must_use]
    pub fn invocation(&self) -> String {
        let mut line = format!("{RESULT_NAME} = {}", self.benchmark);
        for binding in &self.bindings {
            line.push(' ');
            line.push_str(binding.name());
        }
        line
    }

    /// Returns a [`fmt::Display`] adapter rendering the descriptor text.
    #[must_use]
    pub const fn display<'a>(&'a self, options: &'a EmitOptions) -> DisplayDescriptor<'a> {
        DisplayDescriptor {
            descriptor: self,
            options,
        }
    }

    /// Writes the descriptor text to `writer`.
    ///
    /// # Errors
    /// Returns [`io::Error`] if writing to the supplied writer fails.
    pub fn write_to(&self, mut writer: impl Write, options: &EmitOptions) -> io::Result<()> {
        write!(writer, "{}", self.display(options))
    }

    /// Renders the descriptor to a string.
    #[must_use]
    pub fn render(&self, options: &EmitOptions) -> String {
        self.display(options).to_string()
    }
}

/// Display adapter returned by [`Descriptor::display`].
#[derive(Clone, Copy, Debug)]
pub struct DisplayDescriptor<'a> {
    descriptor: &'a Descriptor,
    options: &'a EmitOptions,
}

impl fmt::Display for DisplayDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = self.descriptor;
        for parameter in &descriptor.preamble {
            writeln!(f, "{} = {}", parameter.name, parameter.size)?;
        }
        for binding in &descriptor.bindings {
            writeln!(f, "{} = {}", binding.name, binding.expr)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "include \"{}.{DESCRIPTOR_EXTENSION}\"",
            descriptor.benchmark
        )?;
        writeln!(f)?;
        writeln!(f, "%bench \"{}\"", descriptor.benchmark)?;
        writeln!(f, "{}", descriptor.invocation())?;
        if self.options.echo_result() {
            writeln!(f)?;
            writeln!(f, "{RESULT_NAME}")?;
        }
        Ok(())
    }
}

/// Collects preamble and value bindings for a [`Descriptor`].
#[derive(Clone, Debug)]
pub struct DescriptorBuilder {
    benchmark: String,
    preamble: Vec<ShapeParameter>,
    bindings: Vec<ValueBinding>,
}

impl DescriptorBuilder {
    /// Appends a preamble shape parameter.
    #[must_use]
    pub fn with_shape(mut self, parameter: ShapeParameter) -> Self {
        self.preamble.push(parameter);
        self
    }

    /// Appends a value binding; its position fixes its argument position.
    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.bindings.push(ValueBinding::new(name, expr));
        self
    }

    /// Validates the collected entries.
    ///
    /// # Errors
    /// Returns [`DexError::EmptyBenchmarkName`] when no benchmark is named and
    /// [`DexError::DuplicateBinding`] when a name is declared twice across the
    /// preamble and value bindings.
    pub fn build(self) -> Result<Descriptor> {
        if self.benchmark.trim().is_empty() {
            return Err(DexError::EmptyBenchmarkName);
        }
        let mut seen = HashSet::new();
        let names = self
            .preamble
            .iter()
            .map(ShapeParameter::name)
            .chain(self.bindings.iter().map(ValueBinding::name));
        for name in names {
            if !seen.insert(name) {
                return Err(DexError::DuplicateBinding {
                    name: name.to_owned(),
                });
            }
        }
        Ok(Descriptor {
            benchmark: self.benchmark,
            preamble: self.preamble,
            bindings: self.bindings,
        })
    }
}

/// Creates or overwrites `path` with the rendered `descriptor`.
///
/// # Errors
/// Returns [`DexError::DescriptorWrite`] when the file cannot be created,
/// written or flushed.
#[instrument(
    name = "descriptor.write",
    err,
    skip(path, descriptor, options),
    fields(path = field::Empty, benchmark = descriptor.benchmark(), bindings = descriptor.bindings().len()),
)]
pub fn write_descriptor_file(
    path: &Path,
    descriptor: &Descriptor,
    options: &EmitOptions,
) -> Result<()> {
    Span::current().record("path", field::display(path.display()));
    let write_error = |source| DexError::DescriptorWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    descriptor
        .write_to(&mut writer, options)
        .map_err(write_error)?;
    writer.flush().map_err(write_error)
}
