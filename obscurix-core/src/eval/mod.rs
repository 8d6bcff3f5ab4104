#[cfg(test)]
mod tests;

pub mod error;
pub mod evaluator;

pub mod prelude {
    pub use super::{
        error::*,
        evaluator::*
    };
}
