//! Bound argument values handed to a command handler.

use super::{
    error::{ShellError, ShellResult},
    kind::{FromValue, ParamKind, Value},
};

/// Positionally ordered values for every declared parameter of a command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Read the value at `position` as `T`.
    ///
    /// Fails with [`ShellError::ArgumentType`] when the position is out of
    /// range or holds a different kind, which means the handler disagrees with
    /// its own signature.
    pub fn get<T: FromValue>(&self, position: usize) -> ShellResult<T> {
        self.values
            .get(position)
            .and_then(T::from_value)
            .ok_or(ShellError::ArgumentType {
                position,
                expected: T::KIND,
            })
    }

    /// Borrow a string argument without cloning.
    pub fn str(&self, position: usize) -> ShellResult<&str> {
        self.values
            .get(position)
            .and_then(Value::as_str)
            .ok_or(ShellError::ArgumentType {
                position,
                expected: ParamKind::String,
            })
    }

    pub fn value(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.iter()
    }
}
