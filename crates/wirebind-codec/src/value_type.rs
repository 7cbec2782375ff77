use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of a Rust type taking part in encoding.
///
/// Equality and hashing use the [`TypeId`] only; the name is for diagnostics.
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, e.g. `Vec<u8>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
                out.push_str(last_segment(&segment));
                segment.clear();
                out.push(ch);
            } else {
                segment.push(ch);
            }
        }
        out.push_str(last_segment(&segment));
        out
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_follows_type_identity() {
        assert_eq!(ValueType::of::<u32>(), ValueType::of::<u32>());
        assert_ne!(ValueType::of::<u32>(), ValueType::of::<i32>());
        assert!(ValueType::of::<String>().is::<String>());
        assert!(!ValueType::of::<String>().is::<&str>());
    }

    #[test]
    fn short_name_strips_paths() {
        assert_eq!(ValueType::of::<String>().short_name(), "String");
        assert_eq!(ValueType::of::<Vec<u8>>().short_name(), "Vec<u8>");
        assert_eq!(ValueType::of::<i64>().short_name(), "i64");
        assert_eq!(
            ValueType::of::<Option<Vec<String>>>().short_name(),
            "Option<Vec<String>>"
        );
    }
}
