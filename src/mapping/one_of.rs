//! Exactly-one-of block groups
//!
//! State documents model a choice as sibling optional blocks. A block counts
//! as set when it is present and either declares no attributes or has at
//! least one non-null attribute; a block whose attributes are all null is
//! treated as absent.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Whether an optional block counts as set
pub fn is_set<B: Serialize>(block: Option<&B>) -> bool {
    let Some(block) = block else {
        return false;
    };
    match serde_json::to_value(block) {
        Ok(Value::Object(map)) => map.is_empty() || map.values().any(|v| !v.is_null()),
        Ok(Value::Null) => false,
        Ok(_) => true,
        Err(_) => false,
    }
}

type Mapper<'a, R> = Box<dyn FnOnce() -> Result<R> + 'a>;

/// Builder over the candidate blocks of one group, in declared order
pub struct OneOf<'a, R> {
    group: String,
    names: Vec<&'static str>,
    chosen: Vec<(&'static str, Mapper<'a, R>)>,
}

impl<'a, R> OneOf<'a, R> {
    /// Start a group; `group` is the field path reported in errors
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            names: Vec::new(),
            chosen: Vec::new(),
        }
    }

    /// Add a candidate block and the mapper used when it is the chosen one
    pub fn variant<B, F>(mut self, name: &'static str, block: Option<&'a B>, map: F) -> Self
    where
        B: Serialize + 'a,
        F: FnOnce(&'a B) -> Result<R> + 'a,
    {
        self.names.push(name);
        if let Some(block) = block.filter(|b| is_set(Some(*b))) {
            self.chosen.push((name, Box::new(move || map(block))));
        }
        self
    }

    /// Exactly one candidate must be set
    pub fn required(self) -> Result<R> {
        let group = self.group.clone();
        let names = self.names.join(", ");
        self.resolve()?.ok_or_else(|| {
            Error::invalid_configuration(group, format!("exactly one of {names} must be set"))
        })
    }

    /// Zero or one candidate may be set
    pub fn optional(self) -> Result<Option<R>> {
        self.resolve()
    }

    fn resolve(self) -> Result<Option<R>> {
        let Self {
            group,
            names,
            mut chosen,
        } = self;
        match chosen.len() {
            0 => Ok(None),
            1 => {
                let (_, map) = chosen.remove(0);
                map().map(Some)
            }
            _ => {
                let set: Vec<&str> = chosen.iter().map(|(n, _)| *n).collect();
                Err(Error::invalid_configuration(
                    group,
                    format!(
                        "exactly one of {} must be set, got {}",
                        names.join(", "),
                        set.join(", ")
                    ),
                ))
            }
        }
    }
}
