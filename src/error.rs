use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SodiumError {
    /// A sink was sent to from inside a listener or a mapping function. Use
    /// `Operational::defer` or `SodiumCtx::post` to feed values back.
    #[error("send() may not be called while a transaction is propagating")]
    SendDuringPropagation
}
