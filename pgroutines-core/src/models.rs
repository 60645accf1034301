//! Routine metadata as read from the PostgreSQL catalog.

use std::fmt;

/// Kind of stored routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    /// `CREATE FUNCTION` (prokind `f`)
    Function,
    /// `CREATE PROCEDURE` (prokind `p`, PostgreSQL 11+)
    Procedure,
}

impl RoutineKind {
    /// Maps a `pg_proc.prokind` value to a routine kind.
    ///
    /// Aggregates (`a`) and window functions (`w`) are not routines for
    /// export purposes and map to `None`.
    pub fn from_prokind(prokind: &str) -> Option<Self> {
        match prokind {
            "f" => Some(Self::Function),
            "p" => Some(Self::Procedure),
            _ => None,
        }
    }

    /// Directory name used for this kind in the output tree.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Procedure => "procedure",
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored function or procedure as of query time.
///
/// Built once from a catalog row and never mutated. Overloads share `name`;
/// `oid` tells them apart and is the key for fetching the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    /// `pg_proc.oid`
    pub oid: u32,
    /// Database the routine lives in
    pub catalog: String,
    /// Containing schema
    pub schema: String,
    /// Declared name
    pub name: String,
    /// Function or procedure
    pub kind: RoutineKind,
    /// `pg_get_function_identity_arguments`, empty for no arguments
    pub identity_args: String,
}

impl Routine {
    /// Creates a routine record. `identity_args` of `None` means no arguments.
    pub fn new(
        oid: u32,
        catalog: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
        kind: RoutineKind,
        identity_args: Option<String>,
    ) -> Self {
        Self {
            oid,
            catalog: catalog.into(),
            schema: schema.into(),
            name: name.into(),
            kind,
            identity_args: identity_args.unwrap_or_default(),
        }
    }

    /// Human-readable `name(identity_args)`. Not a storage key.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.identity_args)
    }

    /// Schema-qualified signature used in log messages.
    pub fn qualified_signature(&self) -> String {
        format!("{}.{}", self.schema, self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_kind_from_prokind() {
        assert_eq!(RoutineKind::from_prokind("f"), Some(RoutineKind::Function));
        assert_eq!(RoutineKind::from_prokind("p"), Some(RoutineKind::Procedure));
        assert_eq!(RoutineKind::from_prokind("a"), None);
        assert_eq!(RoutineKind::from_prokind("w"), None);
        assert_eq!(RoutineKind::from_prokind(""), None);
    }

    #[test]
    fn test_routine_kind_display() {
        assert_eq!(RoutineKind::Function.to_string(), "function");
        assert_eq!(RoutineKind::Procedure.to_string(), "procedure");
    }

    #[test]
    fn test_routine_signature() {
        let add = Routine::new(
            100,
            "mydb",
            "public",
            "add",
            RoutineKind::Function,
            Some("integer, integer".to_string()),
        );
        assert_eq!(add.signature(), "add(integer, integer)");
        assert_eq!(add.qualified_signature(), "public.add(integer, integer)");

        let refresh = Routine::new(7, "mydb", "ops", "refresh", RoutineKind::Procedure, None);
        assert_eq!(refresh.identity_args, "");
        assert_eq!(refresh.signature(), "refresh()");
    }
}
