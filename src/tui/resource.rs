/// Resource type for tracking an asynchronous request explicitly.
///
/// Inspired by Elm's RemoteData pattern:
/// - NotAsked: no request in flight (idle)
/// - Loading: request in progress
/// - Success: request completed with data
/// - Failure: request failed with an error
///
/// This replaces separate `saving: bool`, `error: bool` and
/// `error_message: String` flags with a single value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Resource<T, E = String> {
    #[default]
    NotAsked,
    Loading,
    Success(T),
    Failure(E),
}

impl<T, E> Resource<T, E> {
    /// Create a Resource from a Result
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(e) => Resource::Failure(e),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Resource::Failure(_))
    }

    pub fn is_not_asked(&self) -> bool {
        matches!(self, Resource::NotAsked)
    }

    /// Get a reference to the data if successful
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Get a reference to the error if failed
    pub fn error(&self) -> Option<&E> {
        match self {
            Resource::Failure(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_asked() {
        let resource: Resource<u32> = Resource::default();
        assert!(resource.is_not_asked());
        assert!(resource.data().is_none());
    }

    #[test]
    fn test_from_result() {
        let ok: Resource<u32> = Resource::from_result(Ok(3));
        assert_eq!(ok.data(), Some(&3));

        let err: Resource<u32> = Resource::from_result(Err("boom".to_string()));
        assert!(err.is_failure());
        assert_eq!(err.error().map(String::as_str), Some("boom"));
    }
}
