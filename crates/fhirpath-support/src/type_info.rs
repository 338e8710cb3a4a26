use std::fmt;

/// Result of the FHIRPath `type()` function.
///
/// Model types report the `FHIR` namespace, values produced by an evaluator
/// report `System`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfoResult {
    pub namespace: String,
    pub name: String,
}

impl TypeInfoResult {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn fhir(name: &str) -> Self {
        Self::new("FHIR", name)
    }

    pub fn system(name: &str) -> Self {
        Self::new("System", name)
    }

    pub fn is_fhir(&self) -> bool {
        self.namespace == "FHIR"
    }
}

impl fmt::Display for TypeInfoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_qualified_name() {
        assert_eq!(TypeInfoResult::fhir("Coding").to_string(), "FHIR.Coding");
        assert_eq!(TypeInfoResult::system("String").to_string(), "System.String");
        assert!(TypeInfoResult::fhir("dateTime").is_fhir());
    }
}
