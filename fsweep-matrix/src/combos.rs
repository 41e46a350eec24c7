//! Combination Generation
//!
//! Walks the Cartesian product of all parameter value sequences lazily, in
//! standard product order: the rightmost (last-declared) parameter varies
//! fastest. Combinations are produced one at a time and never materialized
//! as a whole; a sweep over millions of combinations holds one odometer
//! vector, nothing more.

use crate::params::ParameterSet;
use serde_json::{Map, Value};

/// One concrete assignment of a single value to every swept parameter.
#[derive(Debug, Clone)]
pub struct Combination<'a> {
    set: &'a ParameterSet,
    indices: Vec<usize>,
}

impl<'a> Combination<'a> {
    /// Ordered `(name, value)` pairs, in parameter declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + '_ {
        self.indices
            .iter()
            .enumerate()
            .map(|(param, &value)| (self.set.name_at(param), &self.set.values_at(param)[value]))
    }

    /// The value assigned to a parameter, if the parameter exists.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.pairs().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Build the ordered `args` map recorded with this combination's results.
    pub fn args(&self) -> Map<String, Value> {
        let mut args = Map::new();
        for (name, value) in self.pairs() {
            args.insert(name.to_string(), value.clone());
        }
        args
    }
}

/// Lazy iterator over all combinations of a [`ParameterSet`].
///
/// Finite and non-restartable; obtain a fresh one from
/// [`ParameterSet::combinations`] to iterate again.
#[derive(Debug)]
pub struct Combinations<'a> {
    set: &'a ParameterSet,
    odometer: Vec<usize>,
    done: bool,
}

impl ParameterSet {
    /// Iterate every combination in Cartesian product order.
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            set: self,
            odometer: vec![0; self.len()],
            done: self.is_empty(),
        }
    }
}

impl<'a> Iterator for Combinations<'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = Combination {
            set: self.set,
            indices: self.odometer.clone(),
        };

        // Advance the odometer, rightmost digit fastest.
        let mut pos = self.odometer.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.odometer[pos] += 1;
            if self.odometer[pos] < self.set.values_at(pos).len() {
                break;
            }
            self.odometer[pos] = 0;
        }

        Some(current)
    }
}
