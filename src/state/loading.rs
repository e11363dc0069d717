// Loading state for async data shared by all tabs.

/// Lifecycle of one fetched dataset.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// Placeholder for an absent result; the cause is in the console.
    Unavailable,
}

impl<T> LoadingState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, LoadingState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Resolve from an accessor result: absent becomes a placeholder state.
    pub fn resolve(result: Option<T>) -> Self {
        match result {
            Some(data) => LoadingState::Loaded(data),
            None => LoadingState::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_maps_absent_to_unavailable() {
        let loaded = LoadingState::resolve(Some(7));
        assert_eq!(loaded.data(), Some(&7));

        let absent: LoadingState<u32> = LoadingState::resolve(None);
        assert!(absent.data().is_none());
        assert!(matches!(absent, LoadingState::Unavailable));
    }
}
