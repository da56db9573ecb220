#![allow(missing_docs, dead_code)]

use std::{collections::BTreeMap, vec::Vec};

use bstr::{BStr, BString};
use makefrag::Host;

/// A scripted host: serves `expand` from a fixed variable table and records
/// every evaluated directive in order.
#[derive(Debug, Default)]
pub struct MockHost {
    vars: BTreeMap<BString, BString>,
    pub evaluated: Vec<BString>,
}

impl MockHost {
    pub fn with_var(mut self, expr: &str, value: &str) -> Self {
        self.vars.insert(BString::from(expr), BString::from(value));
        self
    }

    /// The `idx`-th evaluated directive as text.
    pub fn directive(&self, idx: usize) -> &str {
        std::str::from_utf8(&self.evaluated[idx]).expect("directive is not UTF-8")
    }
}

impl Host for MockHost {
    fn expand(&mut self, expr: &BStr) -> Option<Vec<u8>> {
        self.vars.get(expr).map(|value| value.to_vec())
    }

    fn eval(&mut self, directive: &BStr) {
        self.evaluated.push(BString::from(directive));
    }
}
