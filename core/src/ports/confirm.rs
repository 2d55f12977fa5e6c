//! Operator confirmation port (interface).

use crate::domain::PortProcess;

/// Port for asking the operator before any signal is sent.
pub trait Confirmer: Send + Sync {
    /// Return `true` only on an explicit affirmative answer.
    fn confirm(&self, target: &PortProcess)
        -> impl std::future::Future<Output = bool> + Send;
}
