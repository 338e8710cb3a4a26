use thiserror::Error;

/// Failure of a FHIRPath conversion function.
///
/// A conversion that is allowed but whose input has no representation in the
/// target type (for example `'abc'.toInteger()`) is not an error, it yields an
/// empty result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("cannot convert {from} to {to}")]
    NotConvertible { from: String, to: &'static str },

    #[error("{from} is not implicitly convertible to {to}, use an explicit conversion")]
    NotImplicit { from: String, to: &'static str },
}

impl ConversionError {
    pub fn not_convertible(from: impl Into<String>, to: &'static str) -> Self {
        ConversionError::NotConvertible {
            from: from.into(),
            to,
        }
    }

    pub fn not_implicit(from: impl Into<String>, to: &'static str) -> Self {
        ConversionError::NotImplicit {
            from: from.into(),
            to,
        }
    }
}
