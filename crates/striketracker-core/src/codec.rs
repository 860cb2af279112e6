//! Weighted collection codec
//!
//! Terraform stores rule blocks (origin pull and browser cache policies, edge
//! rules, static headers) as sets, so enumeration order carries no meaning.
//! Each block therefore holds an explicit `weight`. The StrikeTracker API stores the same
//! rules as JSON arrays where position is precedence.
//!
//! - [`decode`] turns the weighted set into the ordered list sent to the API.
//! - [`encode`] turns the list returned by the API back into weighted records.
//!
//! Weights are dense zero-based positions. For `N` rules the weights must be
//! exactly `{0, 1, .., N-1}`. A duplicate, an out-of-range value or a gap is a
//! configuration error that names the rule family and the offending index.
//!
//! ```
//! use striketracker_core::codec::{self, RuleFamily, Weighted};
//!
//! let local = vec![Weighted::new(1, "Y"), Weighted::new(0, "X")];
//! let ordered = codec::decode(RuleFamily::StaticHeader, local).unwrap();
//! assert_eq!(ordered, vec!["X", "Y"]);
//!
//! let back = codec::encode(ordered);
//! assert_eq!(back, vec![Weighted::new(0, "X"), Weighted::new(1, "Y")]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rule families that round-trip through the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    /// Origin pull (cache) policies
    OriginPullPolicy,
    /// Browser cache policies
    CacheControl,
    /// Modifications of requests sent to the origin
    OriginRequestEdgeRule,
    /// Modifications of responses received from the origin
    OriginResponseEdgeRule,
    /// Modifications of requests received from clients
    ClientRequestEdgeRule,
    /// Modifications of responses sent to clients
    ClientResponseEdgeRule,
    /// Static headers
    StaticHeader,
}

impl RuleFamily {
    /// All families, in the order they are attached to a configuration
    pub const ALL: [RuleFamily; 7] = [
        RuleFamily::OriginPullPolicy,
        RuleFamily::CacheControl,
        RuleFamily::OriginRequestEdgeRule,
        RuleFamily::OriginResponseEdgeRule,
        RuleFamily::ClientRequestEdgeRule,
        RuleFamily::ClientResponseEdgeRule,
        RuleFamily::StaticHeader,
    ];

    /// Attribute name of the family in resource state
    pub fn attribute(&self) -> &'static str {
        match self {
            RuleFamily::OriginPullPolicy => "origin_pull_policy",
            RuleFamily::CacheControl => "cache_control",
            RuleFamily::OriginRequestEdgeRule => "origin_request_edge_rule",
            RuleFamily::OriginResponseEdgeRule => "origin_response_edge_rule",
            RuleFamily::ClientRequestEdgeRule => "client_request_edge_rule",
            RuleFamily::ClientResponseEdgeRule => "client_response_edge_rule",
            RuleFamily::StaticHeader => "static_header",
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// A rule together with its position in the family
///
/// The payload is flattened so that in state the weight sits beside the
/// rule's own attributes: `{ "weight": 0, "enabled": true, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weighted<T> {
    /// Zero-based application order
    pub weight: i64,

    /// Family-specific payload
    #[serde(flatten)]
    pub rule: T,
}

impl<T> Weighted<T> {
    /// Attach a weight to a rule
    pub fn new(weight: i64, rule: T) -> Self {
        Self { weight, rule }
    }
}

/// Order a weighted collection by weight, dropping the weights
///
/// The input may arrive in any order. Fails without producing any output if
/// a weight is negative, `>= len`, repeated, or if a position is left empty.
pub fn decode<T>(family: RuleFamily, records: Vec<Weighted<T>>) -> Result<Vec<T>> {
    let len = records.len();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(len).collect();

    for record in records {
        let weight = record.weight;
        let index = usize::try_from(weight)
            .ok()
            .filter(|i| *i < len)
            .ok_or(Error::WeightOutOfRange {
                family,
                weight,
                len,
            })?;

        let slot = &mut slots[index];
        if slot.is_some() {
            return Err(Error::DuplicateWeight { family, weight });
        }
        *slot = Some(record.rule);
    }

    // Every position must be filled
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(Error::WeightGap { family, index }))
        .collect()
}

/// Attach positional weights to an ordered collection
///
/// `rules[i]` receives weight `i`. Pure and stable: the same input always
/// produces the same output.
pub fn encode<T>(rules: Vec<T>) -> Vec<Weighted<T>> {
    rules
        .into_iter()
        .enumerate()
        .map(|(position, rule)| Weighted::new(position as i64, rule))
        .collect()
}

/// Decode, then convert every payload into its wire form
pub fn decode_into<T, W>(family: RuleFamily, records: Vec<Weighted<T>>) -> Result<Vec<W>>
where
    W: From<T>,
{
    Ok(decode(family, records)?.into_iter().map(W::from).collect())
}

/// Convert every wire payload into its state form, then encode
pub fn encode_from<W, T>(rules: Vec<W>) -> Vec<Weighted<T>>
where
    T: From<W>,
{
    encode(rules.into_iter().map(T::from).collect())
}
