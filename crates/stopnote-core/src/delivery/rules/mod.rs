//! Rule-driven field extractors for delivery notes.

pub mod address;
pub mod closing;
pub mod driver;
pub mod empties;
pub mod goods;
pub mod patterns;
pub mod plates;
pub mod ruleset;
pub mod temperature;
pub mod timestamps;

pub use address::extract_address;
pub use closing::{extract_closing, extract_signer};
pub use driver::extract_driver;
pub use empties::{extract_confirmation, extract_empties, EmptiesBlock, EmptiesLayout};
pub use goods::{extract_goods_total, GoodsLineExtractor};
pub use plates::{extract_plates, PlateExtractor, Plates};
pub use ruleset::RuleSet;
pub use temperature::TemperatureExtractor;
pub use timestamps::{extract_stop, hhmm_delta, normalize_date_time, time_after_label};

use tracing::trace;

/// Trait for extractors of repeating fields.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A match together with where it was found.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

type Strategy<'a, T> = Box<dyn Fn() -> Option<T> + 'a>;

/// Ordered list of strategies for one field; the first hit wins.
pub struct FallbackChain<'a, T> {
    field: &'static str,
    strategies: Vec<(&'static str, Strategy<'a, T>)>,
}

impl<'a, T> FallbackChain<'a, T> {
    /// Create an empty chain for `field`.
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy.
    pub fn then(mut self, name: &'static str, strategy: impl Fn() -> Option<T> + 'a) -> Self {
        self.strategies.push((name, Box::new(strategy)));
        self
    }

    /// Run strategies in order until one yields a value.
    pub fn run(self) -> Option<T> {
        for (name, strategy) in self.strategies {
            if let Some(value) = strategy() {
                trace!("{}: matched by {}", self.field, name);
                return Some(value);
            }
        }
        trace!("{}: no strategy matched", self.field);
        None
    }
}
