//! The demo state: a list edited as text, a secret matrix, free text, an
//! enum and a flag set, plus three actions with different validation gates.

use dialogui::bitflags::bitflags;
use dialogui::prelude::*;
use serde_json::{Value, json};
use tracing::info;

/// Edits a list of strings as one comma separated line.
#[derive(Default)]
pub struct CommaList;

impl ReversibleMapper for CommaList {
    type Inner = Vec<String>;
    type Outer = String;

    fn try_map_to_outer(&self, inner: &Vec<String>) -> Option<String> {
        Some(inner.join(","))
    }

    fn try_map_to_inner(&self, outer: &String) -> Option<Vec<String>> {
        Some(outer.split(',').map(str::to_string).collect())
    }
}

impl Construct for CommaList {
    fn empty() -> Option<Self> {
        Some(CommaList)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Matrix {
    pub m00: f32,
    pub m01: f32,
    pub m10: f32,
    pub m11: f32,
}

reflect_struct!(Matrix {
    m00: f32,
    m01: f32,
    m10: f32,
    m11: f32,
});

impl Matrix {
    pub fn determinant(&self) -> f32 {
        self.m00 * self.m11 - self.m01 * self.m10
    }
}

dialog_enum! {
    #[derive(Debug)]
    pub enum Quality { Low = 0, Medium = 1, High = 2, Ultra = 4 }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Channels: u8 {
        const RED = 1;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

dialog_flags!(Channels);

#[derive(Debug, Clone)]
pub struct SampleState {
    pub list: Vec<String>,
    pub output: String,
    pub matrix: Matrix,
    pub text: String,
    pub quality: Quality,
    pub channels: Channels,
}

impl Default for SampleState {
    fn default() -> Self {
        Self {
            list: vec!["A".into(), "B".into(), "C".into()],
            output: String::new(),
            matrix: Matrix {
                m00: 2.0,
                m11: 1.0,
                ..Matrix::default()
            },
            text: String::new(),
            quality: Quality::Medium,
            channels: Channels::RED | Channels::BLUE,
        }
    }
}

impl SampleState {
    pub fn summary(&self) -> Value {
        json!({
            "list": self.list,
            "output": self.output,
            "matrix": [[self.matrix.m00, self.matrix.m01], [self.matrix.m10, self.matrix.m11]],
            "text": self.text,
            "quality": format!("{:?}", self.quality),
            "channels": self.channels.bits(),
        })
    }
}

impl DialogState for SampleState {
    fn describe(members: &mut Members<Self>) {
        members
            .option(
                "list",
                DialogOption::new("List").with_mapper::<CommaList>(),
                field!(SampleState, list),
            )
            .option(
                "output",
                DialogOption::new("Output").without_errors(),
                field!(SampleState, output),
            )
            .option(
                "matrix",
                DialogOption::new("A Matrix").secret(),
                field!(SampleState, matrix),
            )
            .option("text", DialogOption::new("Some Text"), field!(SampleState, text))
            .option("quality", DialogOption::new("Quality"), field!(SampleState, quality))
            .option("channels", DialogOption::new("Channels"), field!(SampleState, channels))
            .action("left", DialogAction::new("Left"), |state: &mut SampleState| {
                state.output = "OnLeft".into();
            })
            .action(
                "middle",
                DialogAction::new("Middle").validate_any(),
                |state: &mut SampleState| state.output = "OnMiddle".into(),
            )
            .action(
                "right",
                DialogAction::new("Right").validate_keys(["text"]),
                |state: &mut SampleState| state.output = "OnRight".into(),
            );
    }

    fn validate(&mut self, _changed: Option<&Key>) -> ErrorMap {
        let mut errors = ErrorMap::new();
        if self.list.iter().any(String::is_empty) {
            errors.insert("list".into(), "Items must be non-empty!".into());
        }
        let determinant = self.matrix.determinant();
        if determinant == 0.0 {
            errors.insert("matrix".into(), "Determinant == 0".into());
        } else if determinant == 1.0 {
            errors.insert("matrix".into(), "Determinant == 1".into());
        }
        if self.text.is_empty() {
            errors.insert("text".into(), "Missing text".into());
        } else if self.text.to_lowercase() == self.text && self.matrix.m00 == 0.0 {
            errors.insert("special".into(), "lowercase text and matrix_0_0 == 0".into());
        }
        errors
    }

    fn dispose(&mut self) {
        info!(output = %self.output, "sample state disposed");
    }
}
