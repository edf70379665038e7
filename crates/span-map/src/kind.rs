//! Node kind taxonomy.
//!
//! Kinds classify the syntactic regions tracked by a structure tree. They are
//! exposed outward so callers (highlighting, navigation, folding) can classify
//! a query result without reaching into tree internals.

/// A coarse classification of a tracked source region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// The whole-document root node.
    CompilationUnit,
    /// A type-introducing region (class, struct, enum, interface, module).
    TypeDefinition,
    /// A method or function definition.
    Method,
    /// A field or other member-level declaration.
    Field,
    /// A braced/indented block of statements.
    Block,
    /// A single statement.
    Statement,
    /// An expression region.
    Expression,
    /// A comment region.
    Comment,
    /// An integration-defined kind value.
    Custom(u32),
}

impl NodeKind {
    /// Returns `true` for kinds that normally carry child structure.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::CompilationUnit | Self::TypeDefinition | Self::Method | Self::Block
        )
    }

    /// Convert a raw numeric kind value into a [`NodeKind`].
    ///
    /// Values outside the built-in range map to [`NodeKind::Custom`], so
    /// integrations can round-trip their own kinds through the same channel.
    pub fn from_raw(kind: u32) -> Self {
        match kind {
            0 => Self::CompilationUnit,
            1 => Self::TypeDefinition,
            2 => Self::Method,
            3 => Self::Field,
            4 => Self::Block,
            5 => Self::Statement,
            6 => Self::Expression,
            7 => Self::Comment,
            other => Self::Custom(other),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompilationUnit => write!(f, "compilation unit"),
            Self::TypeDefinition => write!(f, "type definition"),
            Self::Method => write!(f, "method"),
            Self::Field => write!(f, "field"),
            Self::Block => write!(f, "block"),
            Self::Statement => write!(f, "statement"),
            Self::Expression => write!(f, "expression"),
            Self::Comment => write!(f, "comment"),
            Self::Custom(id) => write!(f, "custom({})", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_round_trip() {
        assert_eq!(NodeKind::from_raw(0), NodeKind::CompilationUnit);
        assert_eq!(NodeKind::from_raw(2), NodeKind::Method);
        assert_eq!(NodeKind::from_raw(7), NodeKind::Comment);
        assert_eq!(NodeKind::from_raw(42), NodeKind::Custom(42));
    }

    #[test]
    fn test_container_kinds() {
        assert!(NodeKind::CompilationUnit.is_container());
        assert!(NodeKind::Method.is_container());
        assert!(!NodeKind::Statement.is_container());
        assert!(!NodeKind::Comment.is_container());
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeKind::TypeDefinition.to_string(), "type definition");
        assert_eq!(NodeKind::Custom(9).to_string(), "custom(9)");
    }
}
