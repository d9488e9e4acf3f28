use go_syntax::ParseFailure;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("could not parse source file: {0}")]
    Parse(#[from] ParseFailure),
    #[error("no type definition found at the target line")]
    NotFound,
}

impl GenerateError {
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            GenerateError::NotFound.to_string(),
            "no type definition found at the target line"
        );
        let failure = go_syntax::parse_source("package p\n}").unwrap_err();
        let err = GenerateError::from(failure);
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "could not parse source file: 2:1: expected declaration, found '}'"
        );
    }
}
