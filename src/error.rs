//! Error catalog and the typed errors built on it.
//!
//! Errors come in three levels, matching how far they abort processing:
//!
//! - [`StreamError`]: the whole input is rejected; returned as the `Err` of a
//!   stream call.
//! - [`RuleError`]: one order line is rejected; collected in
//!   [`StreamReport::errors`](crate::StreamReport) while the batch continues.
//! - [`FulfillmentError`]: one parsed order could not be allocated; stored in
//!   place of that order in [`StreamReport::orders`](crate::StreamReport).
//!
//! Every error maps to exactly one catalog [`ErrorKind`] and exposes its
//! symbolic name, code, message and optional structured data through
//! [`CatalogedError`].

use crate::{BouquetRequest, Species};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use thiserror::Error;

/// How much work an error aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Stream,
    Rule,
    Fulfillment,
}

error_catalog! {
    InvalidStream => {
        name: "INVALID_STREAM",
        code: 100,
        level: Stream,
        message: "Input must be text holding an order block and an inventory block separated by one blank line",
    },
    EmptyBouquetStream => {
        name: "EMPTY_BOUTQUET_STREAM",
        code: 101,
        level: Stream,
        message: "Input holds no bouquet orders",
    },
    EmptyFlowerList => {
        name: "EMPTY_FLOWER_LIST",
        code: 102,
        level: Stream,
        message: "Input holds no flower inventory",
    },
    InvalidFlowerStream => {
        name: "INVALID_FLOWER_STREAM",
        code: 103,
        level: Stream,
        message: "Inventory line must be a lowercase species followed by S or L",
    },
    InvalidRule => {
        name: "INVALID_RULE",
        code: 200,
        level: Rule,
        message: "Bouquet rule does not match the bouquet grammar",
    },
    InvalidRuleLength => {
        name: "INVALID_RULE_LENGTH",
        code: 201,
        level: Rule,
        message: "Bouquet rule is too short",
    },
    InvalidParsedRule => {
        name: "INVALID_PARSED_RULE",
        code: 202,
        level: Rule,
        message: "Bouquet rule lists no flowers",
    },
    InvalidFlowerSumatory => {
        name: "INVALID_FLOWER_SUMATORY",
        code: 203,
        level: Rule,
        message: "Sum of flower quantities exceeds the bouquet total",
    },
    InvalidFlowerArguments => {
        name: "INVALID_FLOWER_ARGUMENTS",
        code: 204,
        level: Rule,
        message: "Flower list holds uppercase, zero-quantity or out-of-order entries",
    },
    DuplicatedFlowerDefinition => {
        name: "DUPLICATED_FLOWER_DEFINITION",
        code: 205,
        level: Rule,
        message: "Flower species is listed more than once",
    },
    InventoryNotEnough => {
        name: "INVENTORY_NOT_ENOUGH",
        code: 300,
        level: Fulfillment,
        message: "Not enough flowers in stock to fulfil the bouquet",
    },
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform view over the three error levels.
pub trait CatalogedError: std::error::Error {
    /// Catalog entry this error belongs to.
    fn kind(&self) -> ErrorKind;

    /// Structured diagnostics, when the kind carries any.
    fn data(&self) -> Option<Value> {
        None
    }

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn code(&self) -> u16 {
        self.kind().code()
    }

    fn message(&self) -> &'static str {
        self.kind().message()
    }
}

/// Serialize any cataloged error as `{ name, code, message, data }`.
fn serialize_cataloged<E, S>(error: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: CatalogedError + ?Sized,
    S: Serializer,
{
    let mut state = serializer.serialize_struct("Error", 4)?;
    state.serialize_field("name", error.name())?;
    state.serialize_field("code", &error.code())?;
    state.serialize_field("message", error.message())?;
    state.serialize_field("data", &error.data())?;
    state.end()
}

// --- Stream level -------------------------------------------------------------

/// The input as a whole could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("INVALID_STREAM: input is not valid UTF-8 text ({0})")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("INVALID_STREAM: expected 2 blocks separated by one blank line, found {blocks}")]
    InvalidStream { blocks: usize },

    #[error("EMPTY_BOUTQUET_STREAM: input holds no bouquet orders")]
    EmptyBouquetStream,

    #[error("EMPTY_FLOWER_LIST: input holds no flower inventory")]
    EmptyFlowerList,

    #[error("INVALID_FLOWER_STREAM: inventory line {index} ({line:?}) is not <species><S|L>")]
    InvalidFlowerStream { line: String, index: usize },
}

impl CatalogedError for StreamError {
    fn kind(&self) -> ErrorKind {
        match self {
            StreamError::InvalidEncoding(_) | StreamError::InvalidStream { .. } => ErrorKind::InvalidStream,
            StreamError::EmptyBouquetStream => ErrorKind::EmptyBouquetStream,
            StreamError::EmptyFlowerList => ErrorKind::EmptyFlowerList,
            StreamError::InvalidFlowerStream { .. } => ErrorKind::InvalidFlowerStream,
        }
    }

    fn data(&self) -> Option<Value> {
        match self {
            StreamError::InvalidFlowerStream { line, index } => Some(json!({ "flower": line, "index": index })),
            _ => None,
        }
    }
}

impl Serialize for StreamError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_cataloged(self, serializer)
    }
}

// --- Rule level ---------------------------------------------------------------

/// One order line was rejected by the rule parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("INVALID_RULE: line does not match <name><S|L>(<qty><species>)*<total>")]
    InvalidRule,

    #[error("INVALID_RULE_LENGTH: line has {length} characters, at least 6 are required")]
    InvalidRuleLength { length: usize },

    #[error("INVALID_PARSED_RULE: no flowers listed")]
    InvalidParsedRule,

    #[error("INVALID_FLOWER_SUMATORY: flowers add up to {requested}, bouquet total is {total}")]
    InvalidFlowerSumatory { requested: u128, total: u64 },

    #[error("INVALID_FLOWER_ARGUMENTS: parsed {parsed:?}, only {valid:?} are valid")]
    InvalidFlowerArguments { parsed: Vec<String>, valid: Vec<String> },

    #[error("DUPLICATED_FLOWER_DEFINITION: species '{species}' is listed more than once")]
    DuplicatedFlowerDefinition { species: char },
}

impl CatalogedError for RuleError {
    fn kind(&self) -> ErrorKind {
        match self {
            RuleError::InvalidRule => ErrorKind::InvalidRule,
            RuleError::InvalidRuleLength { .. } => ErrorKind::InvalidRuleLength,
            RuleError::InvalidParsedRule => ErrorKind::InvalidParsedRule,
            RuleError::InvalidFlowerSumatory { .. } => ErrorKind::InvalidFlowerSumatory,
            RuleError::InvalidFlowerArguments { .. } => ErrorKind::InvalidFlowerArguments,
            RuleError::DuplicatedFlowerDefinition { .. } => ErrorKind::DuplicatedFlowerDefinition,
        }
    }

    fn data(&self) -> Option<Value> {
        match self {
            RuleError::InvalidFlowerArguments { parsed, valid } => Some(json!({ "parsed": parsed, "valid": valid })),
            RuleError::DuplicatedFlowerDefinition { species } => Some(json!(species.to_string())),
            _ => None,
        }
    }
}

impl Serialize for RuleError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_cataloged(self, serializer)
    }
}

// --- Fulfillment level ----------------------------------------------------------

/// A parsed order could not be allocated from the remaining inventory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    #[error("INVENTORY_NOT_ENOUGH: order {index} ({}) is short of {missing:?}", .bouquet.initial_design)]
    InventoryNotEnough { bouquet: Box<BouquetRequest>, index: usize, missing: Vec<Species> },
}

impl FulfillmentError {
    /// The order that could not be fulfilled, unpadded.
    pub fn bouquet(&self) -> &BouquetRequest {
        match self {
            FulfillmentError::InventoryNotEnough { bouquet, .. } => bouquet,
        }
    }
}

impl CatalogedError for FulfillmentError {
    fn kind(&self) -> ErrorKind {
        match self {
            FulfillmentError::InventoryNotEnough { .. } => ErrorKind::InventoryNotEnough,
        }
    }

    fn data(&self) -> Option<Value> {
        match self {
            FulfillmentError::InventoryNotEnough { bouquet, index, missing } => {
                Some(json!({ "bouquet": bouquet, "index": index, "missing": missing }))
            }
        }
    }
}

impl Serialize for FulfillmentError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_cataloged(self, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_and_codes_are_unique() {
        let names: HashSet<_> = ErrorKind::ALL.iter().map(|k| k.name()).collect();
        let codes: HashSet<_> = ErrorKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(names.len(), ErrorKind::ALL.len());
        assert_eq!(codes.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn catalog_levels_follow_code_ranges() {
        for kind in ErrorKind::ALL {
            let expected = match kind.code() {
                100..=199 => ErrorLevel::Stream,
                200..=299 => ErrorLevel::Rule,
                _ => ErrorLevel::Fulfillment,
            };
            assert_eq!(kind.level(), expected, "{kind}");
        }
    }

    #[test]
    fn duplicated_flower_data_is_the_letter() {
        let err = RuleError::DuplicatedFlowerDefinition { species: 'a' };
        assert_eq!(err.name(), "DUPLICATED_FLOWER_DEFINITION");
        assert_eq!(err.code(), 205);
        assert_eq!(err.data(), Some(json!("a")));
    }

    #[test]
    fn utf8_failure_is_an_invalid_stream() {
        let bytes = [0x61, 0xff];
        let err: StreamError = std::str::from_utf8(&bytes).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::InvalidStream);
        assert!(err.data().is_none());
    }

    #[test]
    fn errors_serialize_with_catalog_fields() {
        let err = StreamError::InvalidFlowerStream { line: "Ax".into(), index: 3 };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["name"], "INVALID_FLOWER_STREAM");
        assert_eq!(value["code"], 103);
        assert_eq!(value["data"]["flower"], "Ax");
        assert_eq!(value["data"]["index"], 3);
    }
}
