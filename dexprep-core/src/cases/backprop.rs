//! Backprop cases over symbolic random inputs and weights.
//!
//! No dataset is read. Every input is a seeded random tensor whose shape is
//! expressed through three preamble index sets, with weight matrices indexed
//! by a record axis that carries one extra bias row.

use std::path::{Path, PathBuf};

use tracing::instrument;

use super::{Family, OutputLayout, descriptor_path, emit_case, generate_all, prepare_dir};
use crate::{
    descriptor::{Descriptor, EmitOptions, ShapeParameter},
    error::Result,
    random::{ElementType, IndexSet, RandomTensor, TensorType},
};

const HIDDEN_FEATURES: usize = 16;
const OUTPUT_FEATURES: usize = 1;
const INPUT_FEATURES: [usize; 2] = [512, 123];

/// Whether the runtime differentiates the routine automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Hand-written gradients.
    Plain,
    /// Gradients derived by automatic differentiation.
    AutoDiff,
}

impl Mode {
    /// Output subdirectory for this mode.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Plain => "backprop",
            Self::AutoDiff => "backprop-ad",
        }
    }
}

/// One network size in one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackpropCase {
    /// Input layer width.
    pub input_features: usize,
    /// Hidden layer width.
    pub hidden_features: usize,
    /// Output layer width.
    pub output_features: usize,
    /// Differentiation mode, selecting the output directory.
    pub mode: Mode,
}

impl BackpropCase {
    /// Output file stem: `<in>_<hid>_<out>`.
    #[must_use]
    pub fn stem(&self) -> String {
        format!(
            "{}_{}_{}",
            self.input_features, self.hidden_features, self.output_features
        )
    }
}

/// The generated case list: every input width in both modes.
#[must_use]
pub fn cases() -> Vec<BackpropCase> {
    INPUT_FEATURES
        .iter()
        .flat_map(|&input_features| {
            [Mode::Plain, Mode::AutoDiff].map(|mode| BackpropCase {
                input_features,
                hidden_features: HIDDEN_FEATURES,
                output_features: OUTPUT_FEATURES,
                mode,
            })
        })
        .collect()
}

fn random_vector(axis: &str) -> RandomTensor {
    RandomTensor::new(TensorType::vector(IndexSet::named(axis), ElementType::Float))
}

fn random_weights(from: &str, to: &str) -> RandomTensor {
    RandomTensor::new(TensorType::matrix(
        IndexSet::with_bias(from),
        IndexSet::named(to),
        ElementType::Float,
    ))
}

/// Builds the descriptor for `case`.
///
/// # Errors
/// Propagates descriptor validation failures.
pub fn descriptor(case: &BackpropCase) -> Result<Descriptor> {
    Descriptor::builder(Family::Backprop.as_str())
        .with_shape(ShapeParameter::fin("in", case.input_features))
        .with_shape(ShapeParameter::fin("hid", case.hidden_features))
        .with_shape(ShapeParameter::fin("out", case.output_features))
        .with_binding("input", random_vector("in"))
        .with_binding("target", random_vector("out"))
        .with_binding("inputWeights", random_weights("in", "hid"))
        .with_binding("hiddenWeights", random_weights("hid", "out"))
        .with_binding("oldInputWeights", random_weights("in", "hid"))
        .with_binding("oldHiddenWeights", random_weights("hid", "out"))
        .build()
}

/// Generates the descriptor for a single case.
///
/// # Errors
/// Returns a [`crate::DexError`] when the output directory or descriptor
/// cannot be written.
#[instrument(
    name = "backprop.case",
    err,
    skip(layout, case, options),
    fields(input_features = case.input_features, mode = case.mode.dir_name()),
)]
pub fn generate_case(
    layout: &OutputLayout,
    case: &BackpropCase,
    options: &EmitOptions,
) -> Result<PathBuf> {
    let dir = layout.output_dir(case.mode.dir_name());
    prepare_dir(&dir)?;
    emit_case(descriptor_path(&dir, &case.stem()), &descriptor(case)?, options)
}

/// Generates every case in [`cases`], passing each written file to
/// `on_created`.
///
/// # Errors
/// Stops at the first case that fails.
pub fn generate(
    layout: &OutputLayout,
    options: &EmitOptions,
    on_created: &mut dyn FnMut(&Path),
) -> Result<Vec<PathBuf>> {
    for mode in [Mode::Plain, Mode::AutoDiff] {
        prepare_dir(&layout.output_dir(mode.dir_name()))?;
    }
    generate_all(&cases(), on_created, |case| {
        generate_case(layout, case, options)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cases_cover_every_width_in_both_modes() {
        let listed: Vec<(usize, Mode)> = cases()
            .iter()
            .map(|case| (case.input_features, case.mode))
            .collect();
        assert_eq!(
            listed,
            [
                (512, Mode::Plain),
                (512, Mode::AutoDiff),
                (123, Mode::Plain),
                (123, Mode::AutoDiff),
            ]
        );
    }

    #[test]
    fn descriptor_declares_shapes_then_six_tensors() {
        let case = BackpropCase {
            input_features: 123,
            hidden_features: HIDDEN_FEATURES,
            output_features: OUTPUT_FEATURES,
            mode: Mode::Plain,
        };
        let text = descriptor(&case)
            .expect("names are unique")
            .render(&EmitOptions::new());
        let expected = "\
in = Fin 123
hid = Fin 16
out = Fin 1
input = ((for i. rand (ixkey (newKey 0) i)) : (in=>Float))
target = ((for i. rand (ixkey (newKey 0) i)) : (out=>Float))
inputWeights = ((for i j. rand (ixkey (newKey 0) (i, j))) : ({ b: Unit | w: in }=>hid=>Float))
hiddenWeights = ((for i j. rand (ixkey (newKey 0) (i, j))) : ({ b: Unit | w: hid }=>out=>Float))
oldInputWeights = ((for i j. rand (ixkey (newKey 0) (i, j))) : ({ b: Unit | w: in }=>hid=>Float))
oldHiddenWeights = ((for i j. rand (ixkey (newKey 0) (i, j))) : ({ b: Unit | w: hid }=>out=>Float))

include \"backprop.dx\"

%bench \"backprop\"
result = backprop input target inputWeights hiddenWeights oldInputWeights oldHiddenWeights
";
        assert_eq!(text, expected);
    }

    #[test]
    fn both_modes_share_a_file_stem() {
        let stems: Vec<String> = cases()
            .iter()
            .filter(|case| case.input_features == 512)
            .map(BackpropCase::stem)
            .collect();
        assert_eq!(stems, ["512_16_1", "512_16_1"]);
    }
}
