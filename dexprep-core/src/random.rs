//! Symbolic random tensors.
//!
//! The generator never materializes random values. A [`RandomTensor`] renders
//! to an expression that the runtime evaluates at load time, deriving every
//! element from a fixed key and the element's index tuple, so the same
//! descriptor always yields the same tensor.

use std::fmt;

/// Element type of a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Floating-point elements.
    Float,
    /// Integer elements.
    Int,
}

impl ElementType {
    /// Returns the runtime's spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Int => "Int",
        }
    }
}

/// One axis of a tensor type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexSet {
    /// An index set referenced by name, such as a preamble shape parameter.
    Named(String),
    /// A labelled sum of index sets, rendered as `{ a: A | b: B }`.
    Record(Vec<(String, IndexSet)>),
}

impl IndexSet {
    /// Index set referenced by `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `{ b: Unit | w: <inner> }`: `inner` extended with one bias slot.
    ///
    /// # Examples
    /// ```
    /// use dexprep_core::IndexSet;
    ///
    /// assert_eq!(IndexSet::with_bias("in").to_string(), "{ b: Unit | w: in }");
    /// ```
    #[must_use]
    pub fn with_bias(inner: impl Into<String>) -> Self {
        Self::Record(vec![
            ("b".to_owned(), Self::named("Unit")),
            ("w".to_owned(), Self::named(inner)),
        ])
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Record(fields) => {
                f.write_str("{ ")?;
                for (index, (label, set)) in fields.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{label}: {set}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Type annotation of a tensor: its axes from outermost to innermost, then
/// its element type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorType {
    axes: Vec<IndexSet>,
    element: ElementType,
}

impl TensorType {
    /// Creates a tensor type from explicit axes.
    #[must_use]
    pub const fn new(axes: Vec<IndexSet>, element: ElementType) -> Self {
        Self { axes, element }
    }

    /// Rank 1 tensor over `axis`.
    #[must_use]
    pub fn vector(axis: IndexSet, element: ElementType) -> Self {
        Self::new(vec![axis], element)
    }

    /// Rank 2 tensor over `rows` then `cols`.
    ///
    /// # Examples
    /// ```
    /// use dexprep_core::{ElementType, IndexSet, TensorType};
    ///
    /// let ty = TensorType::matrix(IndexSet::with_bias("hid"), IndexSet::named("out"), ElementType::Float);
    /// assert_eq!(ty.to_string(), "{ b: Unit | w: hid }=>out=>Float");
    /// ```
    #[must_use]
    pub fn matrix(rows: IndexSet, cols: IndexSet, element: ElementType) -> Self {
        Self::new(vec![rows, cols], element)
    }

    /// Number of axes.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.axes.len()
    }

    /// Element type.
    #[must_use]
    pub const fn element(&self) -> ElementType {
        self.element
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in &self.axes {
            write!(f, "{axis}=>")?;
        }
        f.write_str(self.element.as_str())
    }
}

/// Pseudo-random element generator provided by the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Generator {
    /// Continuous samples (`rand`).
    #[default]
    Rand,
    /// Discrete samples (`randInt`).
    RandInt,
}

impl Generator {
    /// Name of the runtime function.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rand => "rand",
            Self::RandInt => "randInt",
        }
    }
}

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0;

const INDEX_NAMES: [&str; 5] = ["i", "j", "k", "l", "m"];

/// Symbolic description of a deterministically seeded random tensor.
///
/// # Examples
/// ```
/// use dexprep_core::{ElementType, Generator, IndexSet, RandomTensor, TensorType};
///
/// let world = RandomTensor::new(TensorType::matrix(
///     IndexSet::named("rows"),
///     IndexSet::named("cols"),
///     ElementType::Int,
/// ))
/// .with_generator(Generator::RandInt);
/// assert_eq!(
///     world.render(),
///     "((for i j. randInt (ixkey (newKey 0) (i, j))) : (rows=>cols=>Int))",
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RandomTensor {
    tensor_type: TensorType,
    seed: u64,
    generator: Generator,
}

impl RandomTensor {
    /// Continuous random tensor of `tensor_type` seeded with [`DEFAULT_SEED`].
    #[must_use]
    pub const fn new(tensor_type: TensorType) -> Self {
        Self {
            tensor_type,
            seed: DEFAULT_SEED,
            generator: Generator::Rand,
        }
    }

    /// Overrides the element generator.
    #[must_use]
    pub const fn with_generator(mut self, generator: Generator) -> Self {
        self.generator = generator;
        self
    }

    /// Overrides the key seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Tensor type annotation.
    #[must_use]
    pub const fn tensor_type(&self) -> &TensorType {
        &self.tensor_type
    }

    /// Key seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Element generator.
    #[must_use]
    pub const fn generator(&self) -> Generator {
        self.generator
    }

    /// Renders the runtime expression.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RandomTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let generator = self.generator.as_str();
        let seed = self.seed;
        let ty = &self.tensor_type;
        let names: Vec<String> = (0..ty.rank()).map(index_name).collect();
        match names.as_slice() {
            [] => write!(f, "(({generator} (newKey {seed})) : ({ty}))"),
            [only] => write!(
                f,
                "((for {only}. {generator} (ixkey (newKey {seed}) {only})) : ({ty}))"
            ),
            many => write!(
                f,
                "((for {}. {generator} (ixkey (newKey {seed}) ({}))) : ({ty}))",
                many.join(" "),
                many.join(", "),
            ),
        }
    }
}

fn index_name(position: usize) -> String {
    INDEX_NAMES
        .get(position)
        .map_or_else(|| format!("i{position}"), |name| (*name).to_owned())
}
