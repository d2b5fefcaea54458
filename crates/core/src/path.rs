use std::fmt;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSeg {
    Field(String),
    Index(usize),
    /// Entry of a map-of-T field.
    Key(String),
}

/// Location of a value inside an object, rendered like `endpoints[3].addresses[0]`
/// or `overhead.podFixed[cpu]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(SmallVec<[PathSeg; 8]>);

impl FieldPath {
    pub fn root() -> Self { Self::default() }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn segments(&self) -> &[PathSeg] { &self.0 }

    pub fn child(&self, name: &str) -> Self { self.with(PathSeg::Field(name.to_string())) }

    pub fn index(&self, i: usize) -> Self { self.with(PathSeg::Index(i)) }

    pub fn key(&self, k: &str) -> Self { self.with(PathSeg::Key(k.to_string())) }

    fn with(&self, seg: PathSeg) -> Self {
        let mut next = self.clone();
        next.0.push(seg);
        next
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSeg::Field(name) if i == 0 => f.write_str(name)?,
                PathSeg::Field(name) => write!(f, ".{}", name)?,
                PathSeg::Index(idx) => write!(f, "[{}]", idx)?,
                PathSeg::Key(k) => write!(f, "[{}]", k)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fields_indices_and_keys() {
        let p = FieldPath::root().child("endpoints").index(3).child("addresses").index(0);
        assert_eq!(p.to_string(), "endpoints[3].addresses[0]");
        let m = FieldPath::root().child("overhead").child("podFixed").key("cpu");
        assert_eq!(m.to_string(), "overhead.podFixed[cpu]");
        assert_eq!(FieldPath::root().to_string(), "<root>");
        assert_eq!(serde_json::to_value(&p).unwrap(), serde_json::json!("endpoints[3].addresses[0]"));
    }
}
