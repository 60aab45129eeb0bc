/// Result of one endpoint call that reached the server.
///
/// `is_success` holds exactly when the status was 2xx and the body decoded.
/// Otherwise `value` is `T::default()` and `status_code` is what the server
/// sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    is_success: bool,
    value: T,
    status_code: u16,
}

impl<T> Outcome<T> {
    pub fn success(value: T, status_code: u16) -> Self {
        Self {
            is_success: true,
            value,
            status_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The decoded value, or `None` for a non-success status.
    pub fn into_value(self) -> Option<T> {
        self.is_success.then_some(self.value)
    }
}

impl<T: Default> Outcome<T> {
    pub fn failure(status_code: u16) -> Self {
        Self {
            is_success: false,
            value: T::default(),
            status_code,
        }
    }
}
