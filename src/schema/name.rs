//! Avro names, namespaces, and full-name resolution.

use crate::error::SchemaError;

/// A validated Avro name: simple name, optional namespace, and the full
/// name joining the two.
///
/// A declared name containing dots is already fully qualified and overrides
/// any separately declared namespace. Otherwise the declared namespace wins
/// over the enclosing lexical namespace, and a name with neither stays bare.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    simple: String,
    namespace: Option<String>,
    full: String,
}

impl Name {
    /// Resolve a declared name against a declared namespace and the
    /// enclosing lexical namespace inherited from the nearest enclosing
    /// named schema.
    pub fn new(
        name: &str,
        namespace: Option<&str>,
        enclosing: Option<&str>,
    ) -> Result<Self, SchemaError> {
        if let Some((ns, simple)) = name.rsplit_once('.') {
            validate_namespace(ns)?;
            validate_name(simple)?;
            return Ok(Self {
                simple: simple.to_string(),
                namespace: Some(ns.to_string()),
                full: name.to_string(),
            });
        }

        validate_name(name)?;
        let namespace = match namespace {
            Some(ns) => {
                validate_namespace(ns)?;
                Some(ns.to_string())
            }
            None => enclosing.map(String::from),
        };
        let full = match &namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        };

        Ok(Self {
            simple: name.to_string(),
            namespace,
            full,
        })
    }

    /// Get the simple (unqualified) name.
    pub fn name(&self) -> &str {
        &self.simple
    }

    /// Get the namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> &str {
        &self.full
    }

    /// Qualify an alias declared on this name's schema: a dotted alias is
    /// already full, a bare alias shares this name's namespace.
    pub fn qualify_alias(&self, alias: &str) -> Result<String, SchemaError> {
        if let Some((ns, simple)) = alias.rsplit_once('.') {
            validate_namespace(ns)?;
            validate_name(simple)?;
            return Ok(alias.to_string());
        }
        validate_name(alias)?;
        Ok(match &self.namespace {
            Some(ns) => format!("{}.{}", ns, alias),
            None => alias.to_string(),
        })
    }
}

/// Validate a simple name: `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn validate_name(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(c) => {
            return Err(SchemaError::InvalidName(format!(
                "name '{}' must start with a letter or underscore, found '{}'",
                name, c
            )));
        }
        None => {
            return Err(SchemaError::InvalidName("name cannot be empty".to_string()));
        }
    }
    for c in chars {
        if !c.is_ascii_alphanumeric() && c != '_' {
            return Err(SchemaError::InvalidName(format!(
                "name '{}' contains invalid character '{}'",
                name, c
            )));
        }
    }
    Ok(())
}

/// Validate a namespace: non-empty, dot-separated simple names.
pub(crate) fn validate_namespace(namespace: &str) -> Result<(), SchemaError> {
    if namespace.is_empty() {
        return Err(SchemaError::InvalidName(
            "namespace cannot be empty".to_string(),
        ));
    }
    for part in namespace.split('.') {
        if validate_name(part).is_err() {
            return Err(SchemaError::InvalidName(format!(
                "namespace '{}' has invalid component '{}'",
                namespace, part
            )));
        }
    }
    Ok(())
}
